//! Loading of the OpenGL core profile function table.
//!
//! Core profile entry points are not statically linked on most platforms;
//! they have to be resolved at runtime, either through the windowing stack's
//! `get_proc_address` or from the system OpenGL library itself. This crate
//! generates struct-style bindings for the core profile at build time and
//! wraps both resolution paths behind [`load_with`] and [`load_system`].
//!
//! Loading is verified: entry points the core profile is required to carry
//! must actually resolve, so a successful load means the returned table is
//! usable rather than a grid of panicking stubs.
//!
//! ```no_run
//! let gl = puregl::load_system()?;
//! unsafe { gl.ClearColor(0.5, 0.5, 0.5, 1.0) };
//! # Ok::<(), puregl::Error>(())
//! ```

pub mod error;
#[cfg(any(free_unix, apple, windows))]
mod lib_loading;
mod loader;

pub use crate::error::{Error, ErrorKind, Result};
#[cfg(any(free_unix, apple, windows))]
pub use crate::loader::load_system;
pub use crate::loader::load_with;

/// Generated core profile bindings.
pub mod gl {
    #![allow(clippy::all)]
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}
