//! Shared state for host capability functions.
//!
//! One [`HostState`] lives inside the `wasmtime::Store` for the length
//! of a run. All mutation happens on the guest's single thread of
//! control inside blocking host calls, so no locking is needed.

use std::fmt;
use std::io::Write;

use crate::registry::{EnvRegistry, SpaceRegistry};

/// State accessible to every host function through the store.
pub struct HostState {
    /// Live environment instances.
    pub envs: EnvRegistry,
    /// Registered space descriptors.
    pub spaces: SpaceRegistry,
    output: Box<dyn Write + Send>,
}

impl HostState {
    /// State writing guest diagnostics to the process stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Box::new(std::io::stdout()))
    }

    /// State with a custom diagnostic sink.
    #[must_use]
    pub fn with_output(output: Box<dyn Write + Send>) -> Self {
        Self {
            envs: EnvRegistry::new(),
            spaces: SpaceRegistry::new(),
            output,
        }
    }

    /// Write one line of guest diagnostic output.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the sink rejects the write.
    pub fn print_line(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostState")
            .field("envs", &self.envs.len())
            .field("spaces", &self.spaces.len())
            .finish_non_exhaustive()
    }
}
