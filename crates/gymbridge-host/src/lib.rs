//! Gymbridge host runtime.
//!
//! Loads a WASM trainer guest and exposes reinforcement-learning
//! environments to it through a closed set of host import functions:
//! - handle-table registries owning environments and space descriptors
//! - a marshalling codec for the guest's wire types (UTF-16 text,
//!   optional seeds, optional row sequences, widened floats)
//! - the capability surface registered on the `wasmtime` linker
//! - the runtime bridge that instantiates the guest and drives its
//!   entry point to completion
//!
//! Every host call is synchronous and non-reentrant: the guest blocks
//! until the host returns, and the host never calls back into the
//! guest. Faults of any class trap the guest and end the run.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod bridge;
pub mod codec;
mod error;
pub mod host;
mod registry;
mod state;

pub use bridge::{GUEST_ENTRY, GUEST_MODULE_FILE, Runtime, default_module_path};
pub use error::{BridgeError, CodecError, HostError};
pub use registry::{EnvHandle, EnvRegistry, SpaceHandle, SpaceRegistry};
pub use state::HostState;
