use std::error::Error;
use std::process;

use log::error;
use winit::event_loop::EventLoop;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let event_loop = EventLoop::new()?;
    match puregl_smoke::run(event_loop) {
        Err(err) if err.downcast_ref::<puregl::Error>().is_some() => {
            error!("failed to load the OpenGL core profile function table: {err}");
            process::exit(-1);
        },
        other => other,
    }
}
