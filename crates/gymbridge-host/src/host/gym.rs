//! Environment operations exposed to the guest.
//!
//! Out-record layouts (little-endian byte offsets):
//!
//! | call | record |
//! |------|--------|
//! | `*_make` | `0` env: u32, `4` action space: u32, `8` action n: u32, `12` obs space: u32, `16` obs n: u32 |
//! | `frozen_lake_reset` | `0` observation: u32, `8` prob: f64 |
//! | `frozen_lake_step` | `0` observation: u32, `4` done: u32, `8` reward: f64, `16` prob: f64 |
//! | `lunar_lander_reset` | `0` observation: 8 × f64 |
//! | `lunar_lander_step` | `0` observation: 8 × f64, `64` reward: f64, `72` done: u32 |
//!
//! Rewards and lander observations are widened from the library-native
//! `f32` to `f64` on the wire. `done` collapses termination and
//! truncation into one flag, matching the guest-facing contract.

use tracing::debug;
use wasmtime::{Caller, Linker};

use gymbridge_envs::{
    EnvKind, Environment, FrozenLake, FrozenLakeConfig, LunarLander, RenderMode, Space,
};

use crate::codec;
use crate::error::HostError;
use crate::host::{GYMNASIUM_MODULE, memory, trap};
use crate::registry::{EnvHandle, SpaceHandle};
use crate::state::HostState;

pub(crate) fn add_to_linker(linker: &mut Linker<HostState>) -> wasmtime::Result<()> {
    linker.func_wrap(GYMNASIUM_MODULE, "frozen_lake_make", frozen_lake_make)?;
    linker.func_wrap(GYMNASIUM_MODULE, "frozen_lake_reset", frozen_lake_reset)?;
    linker.func_wrap(GYMNASIUM_MODULE, "frozen_lake_step", frozen_lake_step)?;
    linker.func_wrap(GYMNASIUM_MODULE, "lunar_lander_make", lunar_lander_make)?;
    linker.func_wrap(GYMNASIUM_MODULE, "lunar_lander_reset", lunar_lander_reset)?;
    linker.func_wrap(GYMNASIUM_MODULE, "lunar_lander_step", lunar_lander_step)?;
    linker.func_wrap(GYMNASIUM_MODULE, "discrete_sample", discrete_sample)?;
    Ok(())
}

/// Creation result embedded in every `*_make` record.
struct MakeRecord {
    env: EnvHandle,
    action_space: SpaceHandle,
    action_n: u32,
    obs_space: SpaceHandle,
    obs_n: u32,
}

impl MakeRecord {
    fn to_bytes(&self) -> [u8; 20] {
        let mut bytes = [0u8; 20];
        bytes[0..4].copy_from_slice(&self.env.0.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.action_space.0.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.action_n.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.obs_space.0.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.obs_n.to_le_bytes());
        bytes
    }
}

/// Insert the environment and register its two spaces, action first.
fn create(state: &mut HostState, env: Environment) -> MakeRecord {
    let action = env.action_space();
    let observation = env.observation_space();
    let env_handle = state.envs.insert(env);
    let action_space = state.spaces.register(action.clone());
    let obs_space = state.spaces.register(observation.clone());
    MakeRecord {
        env: env_handle,
        action_space,
        action_n: space_size(&action),
        obs_space,
        obs_n: space_size(&observation),
    }
}

/// Discrete cardinality, or vector dimension for box spaces.
#[allow(clippy::cast_possible_truncation)]
fn space_size(space: &Space) -> u32 {
    match space {
        Space::Discrete { n } => *n,
        Space::Box { low, .. } => low.len() as u32,
    }
}

fn decode_render_mode(
    caller: &mut Caller<'_, HostState>,
    ptr: u32,
    len: u32,
) -> wasmtime::Result<RenderMode> {
    let bytes = memory::read_bytes(caller, ptr, len, memory::MAX_TEXT_LEN)?;
    let text = codec::decode_text(&bytes).map_err(trap)?;
    text.parse().map_err(trap)
}

fn as_frozen_lake(
    state: &mut HostState,
    handle: EnvHandle,
) -> Result<&mut FrozenLake, HostError> {
    match state.envs.get_mut(handle)? {
        Environment::FrozenLake(env) => Ok(env),
        other => Err(HostError::KindMismatch {
            handle,
            expected: EnvKind::FrozenLake,
            actual: other.kind(),
        }),
    }
}

fn as_lunar_lander(
    state: &mut HostState,
    handle: EnvHandle,
) -> Result<&mut LunarLander, HostError> {
    match state.envs.get_mut(handle)? {
        Environment::LunarLander(env) => Ok(env),
        other => Err(HostError::KindMismatch {
            handle,
            expected: EnvKind::LunarLander,
            actual: other.kind(),
        }),
    }
}

#[allow(clippy::too_many_arguments)]
fn frozen_lake_make(
    mut caller: Caller<'_, HostState>,
    render_ptr: u32,
    render_len: u32,
    is_slippery: u32,
    has_map: u32,
    map_ptr: u32,
    map_len: u32,
    out_ptr: u32,
) -> wasmtime::Result<()> {
    let render_mode = decode_render_mode(&mut caller, render_ptr, render_len)?;
    // Absence of the whole layout is distinct from an empty layout.
    let layout = if has_map == 0 {
        None
    } else {
        let bytes = memory::read_bytes(&mut caller, map_ptr, map_len, memory::MAX_ROWS_LEN)?;
        Some(codec::decode_rows(&bytes).map_err(trap)?)
    };
    let env = FrozenLake::new(FrozenLakeConfig {
        render_mode,
        is_slippery: is_slippery != 0,
        layout,
    })
    .map_err(trap)?;
    debug!(
        mode = %env.render_mode(),
        slippery = env.is_slippery(),
        "creating frozen lake environment"
    );
    let record = create(caller.data_mut(), Environment::FrozenLake(env));
    debug!(env = %record.env, action = %record.action_space, observation = %record.obs_space, "issued handles");
    memory::write_bytes(&mut caller, out_ptr, &record.to_bytes())
}

fn frozen_lake_reset(
    mut caller: Caller<'_, HostState>,
    env: u32,
    has_seed: u32,
    seed: u64,
    out_ptr: u32,
) -> wasmtime::Result<()> {
    let seed = codec::decode_seed(has_seed, seed);
    let (observation, prob) = as_frozen_lake(caller.data_mut(), EnvHandle(env))
        .map_err(trap)?
        .reset(seed);
    debug!(env, observation, ?seed, "frozen lake reset");
    let mut record = [0u8; 16];
    record[0..4].copy_from_slice(&observation.to_le_bytes());
    record[8..16].copy_from_slice(&f64::from(prob).to_le_bytes());
    memory::write_bytes(&mut caller, out_ptr, &record)
}

fn frozen_lake_step(
    mut caller: Caller<'_, HostState>,
    env: u32,
    action: u32,
    out_ptr: u32,
) -> wasmtime::Result<()> {
    let step = as_frozen_lake(caller.data_mut(), EnvHandle(env))
        .map_err(trap)?
        .step(action)
        .map_err(trap)?;
    let done = step.terminated || step.truncated;
    debug!(env, action, observation = step.observation, done, "frozen lake step");
    let mut record = [0u8; 24];
    record[0..4].copy_from_slice(&step.observation.to_le_bytes());
    record[4..8].copy_from_slice(&u32::from(done).to_le_bytes());
    record[8..16].copy_from_slice(&f64::from(step.reward).to_le_bytes());
    record[16..24].copy_from_slice(&f64::from(step.prob).to_le_bytes());
    memory::write_bytes(&mut caller, out_ptr, &record)
}

fn lunar_lander_make(
    mut caller: Caller<'_, HostState>,
    render_ptr: u32,
    render_len: u32,
    out_ptr: u32,
) -> wasmtime::Result<()> {
    let render_mode = decode_render_mode(&mut caller, render_ptr, render_len)?;
    let env = LunarLander::new(render_mode);
    debug!(mode = %env.render_mode(), "creating lunar lander environment");
    let record = create(caller.data_mut(), Environment::LunarLander(env));
    debug!(env = %record.env, action = %record.action_space, observation = %record.obs_space, "issued handles");
    memory::write_bytes(&mut caller, out_ptr, &record.to_bytes())
}

fn lunar_lander_reset(
    mut caller: Caller<'_, HostState>,
    env: u32,
    has_seed: u32,
    seed: u64,
    out_ptr: u32,
) -> wasmtime::Result<()> {
    let seed = codec::decode_seed(has_seed, seed);
    let observation = as_lunar_lander(caller.data_mut(), EnvHandle(env))
        .map_err(trap)?
        .reset(seed);
    debug!(env, ?seed, "lunar lander reset");
    memory::write_bytes(&mut caller, out_ptr, &encode_vector(&observation))
}

fn lunar_lander_step(
    mut caller: Caller<'_, HostState>,
    env: u32,
    action: u32,
    out_ptr: u32,
) -> wasmtime::Result<()> {
    let step = as_lunar_lander(caller.data_mut(), EnvHandle(env))
        .map_err(trap)?
        .step(action)
        .map_err(trap)?;
    let done = step.terminated || step.truncated;
    debug!(env, action, reward = step.reward, done, "lunar lander step");
    let mut record = Vec::with_capacity(76);
    record.extend_from_slice(&encode_vector(&step.observation));
    record.extend_from_slice(&f64::from(step.reward).to_le_bytes());
    record.extend_from_slice(&u32::from(done).to_le_bytes());
    memory::write_bytes(&mut caller, out_ptr, &record)
}

fn discrete_sample(mut caller: Caller<'_, HostState>, space: u32) -> wasmtime::Result<u32> {
    let value = caller
        .data_mut()
        .spaces
        .sample_discrete(SpaceHandle(space))
        .map_err(trap)?;
    debug!(space, value, "sampled discrete space");
    Ok(value)
}

/// Widen a native observation vector to `f64` wire cells.
fn encode_vector(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&v| f64::from(v).to_le_bytes())
        .collect()
}
