//! Host-side error taxonomy.
//!
//! Nothing here is transient or retryable: boundary-encoding faults,
//! handle-validity faults, and environment-library faults all abort the
//! current guest call as traps, and bridge failures end the process
//! with a non-zero exit.

use std::path::PathBuf;

use gymbridge_envs::{EnvError, EnvKind};

use crate::registry::{EnvHandle, SpaceHandle};

/// Boundary-encoding faults: structurally invalid wire data crossing
/// the guest boundary.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// UTF-16 text with an odd number of bytes.
    #[error("utf-16 text has odd byte length {0}")]
    OddLength(usize),

    /// UTF-16 text containing an unpaired surrogate.
    #[error("utf-16 text contains an unpaired surrogate")]
    UnpairedSurrogate,

    /// A packed row sequence ended in the middle of a record.
    #[error("row sequence truncated at byte {0}")]
    TruncatedRows(usize),
}

/// Faults raised by capability-surface operations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The handle was never issued by an environment creation call.
    #[error("unknown environment handle {0}")]
    UnknownEnv(EnvHandle),

    /// The handle was never issued by a space registration.
    #[error("unknown space handle {0}")]
    UnknownSpace(SpaceHandle),

    /// A kind-specific call reached an environment of another kind.
    #[error("environment {handle} is {actual}, expected {expected}")]
    KindMismatch {
        /// Handle the guest passed.
        handle: EnvHandle,
        /// Kind the call is defined for.
        expected: EnvKind,
        /// Kind actually registered at the handle.
        actual: EnvKind,
    },

    /// Sampling is only exposed for discrete spaces.
    #[error("space {0} does not support sampling")]
    Unsampleable(SpaceHandle),

    /// Malformed wire data.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Environment-library failure.
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Writing guest diagnostic output failed.
    #[error("diagnostic output failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Failures loading or driving the guest module.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The guest binary image is missing.
    #[error("guest module not found at {}", .0.display())]
    ModuleNotFound(PathBuf),

    /// The host executable location could not be resolved.
    #[error("cannot locate host executable: {0}")]
    NoExecutablePath(std::io::Error),

    /// Compilation, linking, instantiation, or guest execution failed.
    #[error("guest runtime failure: {0:#}")]
    Wasm(wasmtime::Error),
}

// `wasmtime::Error` is `anyhow::Error`, which does not implement
// `std::error::Error`, so it cannot ride a `#[from]` attribute.
impl From<wasmtime::Error> for BridgeError {
    fn from(err: wasmtime::Error) -> Self {
        Self::Wasm(err)
    }
}
