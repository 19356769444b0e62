//! Render mode parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::EnvError;

/// Requested render mode for an environment.
///
/// Rendering itself is not implemented by this library; the mode is
/// validated at construction and recorded for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// No rendering output.
    #[default]
    None,
    /// Interactive window rendering.
    Human,
    /// Text rendering.
    Ansi,
    /// Pixel-array rendering.
    RgbArray,
}

impl RenderMode {
    /// Canonical name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Human => "human",
            Self::Ansi => "ansi",
            Self::RgbArray => "rgb_array",
        }
    }
}

impl FromStr for RenderMode {
    type Err = EnvError;

    /// The empty string selects [`RenderMode::None`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::None),
            "human" => Ok(Self::Human),
            "ansi" => Ok(Self::Ansi),
            "rgb_array" => Ok(Self::RgbArray),
            other => Err(EnvError::InvalidRenderMode(other.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
