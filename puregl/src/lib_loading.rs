//! System OpenGL library loading routines.

use std::ffi::{c_char, c_void, CStr};
use std::ptr;
use std::sync::Arc;

use libloading::Library;
use once_cell::sync::OnceCell;

#[cfg(windows)]
use libloading::os::windows::{Library as WinLibrary, LOAD_LIBRARY_SEARCH_DEFAULT_DIRS};

use crate::error::{Error, ErrorKind, Result};

/// Libraries tried, in order, when opening the system OpenGL.
#[cfg(free_unix)]
const LIB_PATHS: &[&str] = &["libGL.so.1", "libGL.so"];
#[cfg(apple)]
const LIB_PATHS: &[&str] = &["/System/Library/Frameworks/OpenGL.framework/OpenGL"];
#[cfg(windows)]
const LIB_PATHS: &[&str] = &["opengl32.dll"];

/// Extension loading entry points exported by the library, in preference
/// order. Apple resolves everything through plain exports.
#[cfg(free_unix)]
const PROC_ADDRESS_SYMBOLS: &[&[u8]] = &[b"glXGetProcAddressARB\0", b"glXGetProcAddress\0"];
#[cfg(apple)]
const PROC_ADDRESS_SYMBOLS: &[&[u8]] = &[];
#[cfg(windows)]
const PROC_ADDRESS_SYMBOLS: &[&[u8]] = &[b"wglGetProcAddress\0"];

#[cfg(windows)]
type GetProcAddressFn = unsafe extern "system" fn(*const c_char) -> *const c_void;
#[cfg(not(windows))]
type GetProcAddressFn = unsafe extern "C" fn(*const c_char) -> *const c_void;

/// The opened system library together with its extension loader.
///
/// Function pointers copied out of the library must not outlive it, so the
/// handle is reference counted and cached for the lifetime of the process.
pub(crate) struct GlLibrary {
    lib: Arc<Library>,
    get_proc_address: Option<GetProcAddressFn>,
}

impl GlLibrary {
    /// The process-wide library handle, opened on first use.
    pub(crate) fn system() -> Result<&'static Self> {
        static SYSTEM: OnceCell<GlLibrary> = OnceCell::new();
        SYSTEM.get_or_try_init(Self::open)
    }

    fn open() -> Result<Self> {
        let mut last_error = None;

        for path in LIB_PATHS {
            #[cfg(windows)]
            let lib = unsafe {
                WinLibrary::load_with_flags(path, LOAD_LIBRARY_SEARCH_DEFAULT_DIRS).map(From::from)
            };

            #[cfg(not(windows))]
            let lib = unsafe { Library::new(path) };

            match lib {
                Ok(lib) => {
                    let get_proc_address = find_proc_address_loader(&lib);
                    return Ok(Self { lib: Arc::new(lib), get_proc_address });
                },
                Err(err) => last_error = Some(err.to_string()),
            }
        }

        Err(Error::new(None, last_error, ErrorKind::NotFound))
    }

    /// Resolve `name`, preferring the extension loader over direct exports.
    ///
    /// `wglGetProcAddress` returns null for GL 1.1 entry points and
    /// `glXGetProcAddress` for nothing at all, so the direct lookup covers
    /// whatever the loader declines.
    pub(crate) fn symbol(&self, name: &CStr) -> *const c_void {
        if let Some(get_proc_address) = self.get_proc_address {
            let addr = unsafe { get_proc_address(name.as_ptr()) };
            if !addr.is_null() {
                return addr;
            }
        }

        unsafe {
            self.lib
                .get::<*const c_void>(name.to_bytes_with_nul())
                .map(|sym| *sym)
                .unwrap_or(ptr::null())
        }
    }
}

fn find_proc_address_loader(lib: &Library) -> Option<GetProcAddressFn> {
    PROC_ADDRESS_SYMBOLS
        .iter()
        .find_map(|name| unsafe { lib.get::<GetProcAddressFn>(name).ok().map(|sym| *sym) })
}
