//! Bounded access to the guest's linear memory.

use wasmtime::{Caller, Extern, Memory};

use crate::state::HostState;

/// Maximum accepted length for a guest text buffer (64 KiB).
pub(crate) const MAX_TEXT_LEN: u32 = 64 * 1024;

/// Maximum accepted length for a packed layout buffer (256 KiB).
pub(crate) const MAX_ROWS_LEN: u32 = 256 * 1024;

/// Resolve the guest's exported linear memory.
pub(crate) fn guest_memory(caller: &mut Caller<'_, HostState>) -> wasmtime::Result<Memory> {
    match caller.get_export("memory") {
        Some(Extern::Memory(memory)) => Ok(memory),
        _ => anyhow::bail!("guest does not export a linear memory"),
    }
}

/// Read `len` bytes at `ptr`, enforcing `limit` before allocation.
pub(crate) fn read_bytes(
    caller: &mut Caller<'_, HostState>,
    ptr: u32,
    len: u32,
    limit: u32,
) -> wasmtime::Result<Vec<u8>> {
    if len > limit {
        anyhow::bail!("guest buffer of {len} bytes exceeds limit of {limit} bytes");
    }
    let memory = guest_memory(caller)?;
    let mut buf = vec![0u8; len as usize];
    memory
        .read(&mut *caller, ptr as usize, &mut buf)
        .map_err(|err| anyhow::anyhow!("guest memory read at {ptr}: {err}"))?;
    Ok(buf)
}

/// Write `bytes` into guest memory at `ptr`.
pub(crate) fn write_bytes(
    caller: &mut Caller<'_, HostState>,
    ptr: u32,
    bytes: &[u8],
) -> wasmtime::Result<()> {
    let memory = guest_memory(caller)?;
    memory
        .write(&mut *caller, ptr as usize, bytes)
        .map_err(|err| anyhow::anyhow!("guest memory write at {ptr}: {err}"))
}
