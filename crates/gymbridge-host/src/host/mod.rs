//! Host capability surface.
//!
//! The closed set of import functions the trainer guest may call. Each
//! function decodes its wire arguments, calls into the registries,
//! encodes the result into guest memory, and returns; every fault
//! becomes a trap. Host functions never re-enter the guest.

mod console;
mod gym;
mod memory;

use wasmtime::Linker;

use crate::error::HostError;
use crate::state::HostState;

/// Import module providing the environment operations.
pub const GYMNASIUM_MODULE: &str = "gymnasium";

/// Import module providing diagnostic output.
pub const CONSOLE_MODULE: &str = "console";

/// Register the complete capability surface on `linker`.
///
/// # Errors
///
/// Returns an error if a definition clashes with one already present
/// on the linker.
pub fn add_to_linker(linker: &mut Linker<HostState>) -> wasmtime::Result<()> {
    gym::add_to_linker(linker)?;
    console::add_to_linker(linker)?;
    Ok(())
}

/// Convert a surface fault into a guest trap.
pub(crate) fn trap(err: impl Into<HostError>) -> wasmtime::Error {
    wasmtime::Error::new(err.into())
}
