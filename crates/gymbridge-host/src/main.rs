//! Gymbridge host binary.
//!
//! Flagless: loads `trainer.wasm` from beside the executable and drives
//! its `run` entry point to completion. The exit status reflects the
//! guest's completion status; any fault ends the process non-zero.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]

use gymbridge_host::{HostState, Runtime, default_module_path};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,gymbridge_host=info")),
        )
        .init();

    let path = default_module_path()?;
    if let Err(err) = Runtime::new().run_file(&path, HostState::new()) {
        error!(error = %err, "guest run failed");
        return Err(err.into());
    }
    Ok(())
}
