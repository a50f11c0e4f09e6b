use puregl::Error;

fn assert_send_sync<T>()
where
    T: Send + Sync,
{
}

#[test]
fn error_is_send_sync() {
    assert_send_sync::<Error>();
}
