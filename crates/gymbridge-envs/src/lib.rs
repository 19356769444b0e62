//! Gymbridge environment library.
//!
//! Native implementations of the environment kinds the WASM trainer guest
//! may request:
//! - [`FrozenLake`] — grid-navigation over a tile map, with optional
//!   slippery dynamics
//! - [`LunarLander`] — simplified continuous-control landing task
//!
//! The library deals in native spaces, observations, and step outcomes.
//! It knows nothing about handles, wire encodings, or the guest ABI;
//! the host crate owns that boundary. Step outcomes carry termination
//! and truncation as separate flags — collapsing them into a single
//! `done` is a wire-contract concern.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod env;
mod error;
mod frozen_lake;
mod lunar_lander;
mod render;
mod space;

pub use env::{EnvKind, Environment, Observation, ResetOutcome, StepOutcome, TransitionInfo};
pub use error::{EnvError, EnvResult};
pub use frozen_lake::{FrozenLake, FrozenLakeConfig, GridStep, MAP_4X4, MAP_8X8};
pub use lunar_lander::{LanderStep, LunarLander, OBS_DIM};
pub use render::RenderMode;
pub use space::{Sample, Space};
