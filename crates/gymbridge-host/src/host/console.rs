//! Diagnostic output for the guest.

use tracing::debug;
use wasmtime::{Caller, Linker};

use crate::codec;
use crate::host::{CONSOLE_MODULE, memory, trap};
use crate::state::HostState;

pub(crate) fn add_to_linker(linker: &mut Linker<HostState>) -> wasmtime::Result<()> {
    linker.func_wrap(CONSOLE_MODULE, "print", print)?;
    Ok(())
}

/// `print(ptr, len)`: decode UTF-16 text and emit one line on the
/// host's output stream. No return value.
fn print(mut caller: Caller<'_, HostState>, ptr: u32, len: u32) -> wasmtime::Result<()> {
    let bytes = memory::read_bytes(&mut caller, ptr, len, memory::MAX_TEXT_LEN)?;
    let text = codec::decode_text(&bytes).map_err(trap)?;
    debug!(chars = text.chars().count(), "guest print");
    caller.data_mut().print_line(&text).map_err(trap)?;
    Ok(())
}
