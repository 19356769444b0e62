//! Environment error types.

/// Errors raised by environment construction or stepping.
///
/// None of these are transient; the host treats every one as fatal to
/// the current run.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// A custom grid layout failed validation.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// The render mode string is not one the library recognizes.
    #[error("invalid render mode: {0:?}")]
    InvalidRenderMode(String),

    /// A discrete action outside the environment's action space.
    #[error("action {action} out of range for {n} actions")]
    ActionOutOfRange {
        /// The action the caller supplied.
        action: u32,
        /// Size of the discrete action space.
        n: u32,
    },
}

/// Result type for environment operations.
pub type EnvResult<T> = Result<T, EnvError>;
