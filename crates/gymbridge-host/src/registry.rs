//! Handle-table registries for host-owned objects.
//!
//! Handles are monotonically assigned indexes, never reused or freed
//! within a run; objects live until process teardown. Environments and
//! spaces are numbered independently, both starting at zero.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use gymbridge_envs::{Environment, Sample, Space};

use crate::error::HostError;

/// Opaque reference to a host-owned environment instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvHandle(pub u32);

impl fmt::Display for EnvHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "env#{}", self.0)
    }
}

/// Opaque reference to a host-owned space descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpaceHandle(pub u32);

impl fmt::Display for SpaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space#{}", self.0)
    }
}

/// Exclusive owner of live environment instances.
#[derive(Debug, Default)]
pub struct EnvRegistry {
    envs: Vec<Environment>,
}

impl EnvRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `env`, returning its handle.
    ///
    /// The handle equals the registry length before insertion.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, env: Environment) -> EnvHandle {
        let handle = EnvHandle(self.envs.len() as u32);
        self.envs.push(env);
        handle
    }

    /// Look up a live environment.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownEnv`] for handles never issued by
    /// [`insert`](Self::insert).
    pub fn get_mut(&mut self, handle: EnvHandle) -> Result<&mut Environment, HostError> {
        self.envs
            .get_mut(handle.0 as usize)
            .ok_or(HostError::UnknownEnv(handle))
    }

    /// Number of live environments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.envs.len()
    }

    /// Whether no environment has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }
}

/// Exclusive owner of space descriptors and the sampling stream.
#[derive(Debug)]
pub struct SpaceRegistry {
    spaces: Vec<Space>,
    rng: StdRng,
}

impl Default for SpaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SpaceRegistry {
    /// Registry with an entropy-seeded sampling stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spaces: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Registry with a deterministic sampling stream.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            spaces: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Register a descriptor, returning its handle.
    ///
    /// The handle equals the registry length before insertion.
    #[allow(clippy::cast_possible_truncation)]
    pub fn register(&mut self, space: Space) -> SpaceHandle {
        let handle = SpaceHandle(self.spaces.len() as u32);
        self.spaces.push(space);
        handle
    }

    /// Inspect a registered descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSpace`] for handles never issued by
    /// [`register`](Self::register).
    pub fn get(&self, handle: SpaceHandle) -> Result<&Space, HostError> {
        self.spaces
            .get(handle.0 as usize)
            .ok_or(HostError::UnknownSpace(handle))
    }

    /// Draw one value uniformly from the discrete space at `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownSpace`] for unissued handles and
    /// [`HostError::Unsampleable`] when the space is empty or not
    /// discrete.
    pub fn sample_discrete(&mut self, handle: SpaceHandle) -> Result<u32, HostError> {
        let space = self
            .spaces
            .get(handle.0 as usize)
            .ok_or(HostError::UnknownSpace(handle))?;
        match space.sample(&mut self.rng) {
            Some(Sample::Discrete(value)) => Ok(value),
            _ => Err(HostError::Unsampleable(handle)),
        }
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    /// Whether no descriptor has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}
