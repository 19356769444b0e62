//! Runtime bridge.
//!
//! Loads the guest binary image, links the capability surface as the
//! complete set of guest-importable functions, instantiates the module,
//! and invokes its entry point once to completion. There is no pause,
//! resume, or repeated invocation within one process lifetime.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use wasmtime::{Engine, Linker, Module, Store};

use crate::error::BridgeError;
use crate::host;
use crate::state::HostState;

/// File name of the guest binary image, resolved next to the host
/// executable.
pub const GUEST_MODULE_FILE: &str = "trainer.wasm";

/// Name of the guest entry-point export, with signature `() -> ()`.
pub const GUEST_ENTRY: &str = "run";

/// Owns the execution engine and drives guest modules to completion.
pub struct Runtime {
    engine: Engine,
}

impl Runtime {
    /// Runtime with the default engine configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Engine::default(),
        }
    }

    /// Load the guest image at `path` and run it to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ModuleNotFound`] if `path` is not a file,
    /// or [`BridgeError::Wasm`] for load, link, instantiation, or guest
    /// execution failures.
    pub fn run_file(&self, path: &Path, state: HostState) -> Result<(), BridgeError> {
        if !path.is_file() {
            return Err(BridgeError::ModuleNotFound(path.to_path_buf()));
        }
        info!(path = %path.display(), "loading guest module");
        let module = Module::from_file(&self.engine, path)?;
        self.run(&module, state)
    }

    /// Compile `bytes` as a guest module and run it to completion.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Wasm`] for compile, link, instantiation,
    /// or guest execution failures.
    pub fn run_module(&self, bytes: &[u8], state: HostState) -> Result<(), BridgeError> {
        let module = Module::new(&self.engine, bytes)?;
        self.run(&module, state)
    }

    fn run(&self, module: &Module, state: HostState) -> Result<(), BridgeError> {
        let mut linker = Linker::new(&self.engine);
        host::add_to_linker(&mut linker)?;
        let mut store = Store::new(&self.engine, state);
        let instance = linker.instantiate(&mut store, module)?;
        let entry = instance.get_typed_func::<(), ()>(&mut store, GUEST_ENTRY)?;
        debug!(entry = GUEST_ENTRY, "invoking guest entry point");
        entry.call(&mut store, ())?;
        info!(
            environments = store.data().envs.len(),
            spaces = store.data().spaces.len(),
            "guest module ran to completion"
        );
        Ok(())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Default location of the guest image: [`GUEST_MODULE_FILE`] alongside
/// the running executable.
///
/// # Errors
///
/// Returns [`BridgeError::NoExecutablePath`] if the executable path
/// cannot be resolved.
pub fn default_module_path() -> Result<PathBuf, BridgeError> {
    let exe = std::env::current_exe().map_err(BridgeError::NoExecutablePath)?;
    Ok(exe.with_file_name(GUEST_MODULE_FILE))
}
