//! Function table construction and verification.

use std::collections::HashSet;
use std::ffi::{c_void, CStr, CString};
use std::ptr;

use crate::error::{Error, ErrorKind, Result};
use crate::gl;

/// Entry points every core profile implementation has to expose.
///
/// Kept sorted. Deliberately a cross-section of the profile: the GL 1.x
/// state setters live in the base library while the object APIs only come
/// from the extension loader, so a table passing this check resolved through
/// both paths.
const REQUIRED_SYMBOLS: &[&str] = &[
    "glBindVertexArray",
    "glClear",
    "glClearColor",
    "glClearDepth",
    "glCreateProgram",
    "glDrawArrays",
    "glEnable",
    "glGenBuffers",
    "glGenVertexArrays",
    "glGetIntegerv",
    "glGetString",
    "glViewport",
];

/// Build the core profile function table with the provided loader.
///
/// `loadfn` receives every entry point name the profile defines and returns
/// its address, or null for symbols it doesn't know. The signature matches
/// [`glutin`'s `GlDisplay::get_proc_address`], so a display can be handed in
/// unchanged. A context should be current while resolving.
///
/// # Errors
///
/// Fails with [`ErrorKind::NotFound`] when entry points from the required
/// set did not resolve, naming each of them in the error message.
///
/// [`glutin`'s `GlDisplay::get_proc_address`]: https://docs.rs/glutin/latest/glutin/display/trait.GlDisplay.html#tymethod.get_proc_address
pub fn load_with<F>(mut loadfn: F) -> Result<gl::Gl>
where
    F: FnMut(&CStr) -> *const c_void,
{
    let mut resolved = HashSet::new();
    let table = gl::Gl::load_with(|symbol| {
        let name = match CString::new(symbol) {
            Ok(name) => name,
            Err(_) => return ptr::null(),
        };

        let addr = loadfn(&name);
        if !addr.is_null() {
            resolved.insert(symbol);
        }
        addr
    });

    let missing: Vec<_> =
        REQUIRED_SYMBOLS.iter().copied().filter(|name| !resolved.contains(name)).collect();

    if missing.is_empty() {
        Ok(table)
    } else {
        Err(Error::new(
            None,
            Some(format!("missing core profile entry points: {}", missing.join(", "))),
            ErrorKind::NotFound,
        ))
    }
}

/// Build the core profile function table from the system OpenGL library.
///
/// Resolution goes through the platform's extension loading entry point
/// (`glXGetProcAddress` on free unix, `wglGetProcAddress` on Windows, plain
/// exports on Apple) with a fall back to the library's own exports. On
/// Windows the extension loader only answers while a context is current.
#[cfg(any(free_unix, apple, windows))]
pub fn load_system() -> Result<gl::Gl> {
    let lib = crate::lib_loading::GlLibrary::system()?;
    load_with(|symbol| lib.symbol(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    extern "system" fn stub() {}

    #[test]
    fn rejects_loader_that_resolves_nothing() {
        let err = match load_with(|_| ptr::null()) {
            Ok(_) => panic!("expected loader to fail"),
            Err(err) => err,
        };
        assert_eq!(err.error_kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("glClearColor"));
        assert!(err.to_string().contains("glBindVertexArray"));
    }

    #[test]
    fn accepts_loader_that_resolves_everything() {
        // The stub address is never called, only stored.
        assert!(load_with(|_| stub as *const c_void).is_ok());
    }

    #[test]
    fn required_symbols_are_sorted_and_unique() {
        let mut sorted = REQUIRED_SYMBOLS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, REQUIRED_SYMBOLS);
    }
}
