//! The closed set of environment kinds.
//!
//! The host dispatches on [`EnvKind`] rather than through open-ended
//! dynamic dispatch; the kind set is fixed and small, and each kind has
//! its own parameter and result payloads.

use std::fmt;

use crate::error::EnvResult;
use crate::frozen_lake::FrozenLake;
use crate::lunar_lander::LunarLander;
use crate::space::Space;

/// Tag distinguishing environment families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKind {
    /// Grid-navigation task.
    FrozenLake,
    /// Continuous-control landing task.
    LunarLander,
}

impl EnvKind {
    /// Stable name of the kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FrozenLake => "frozen-lake",
            Self::LunarLander => "lunar-lander",
        }
    }
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An observation produced by an environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// A single cell index (grid-navigation kind).
    Discrete(u32),
    /// A fixed-length real vector (continuous-control kind).
    Continuous(Vec<f32>),
}

/// Kind-specific diagnostics attached to reset and step outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionInfo {
    /// The kind defines no diagnostic payload.
    None,
    /// Probability of the executed (or initial) transition.
    Prob(f32),
}

impl TransitionInfo {
    /// The transition probability, when the kind reports one.
    #[must_use]
    pub fn prob(self) -> Option<f32> {
        match self {
            Self::None => None,
            Self::Prob(prob) => Some(prob),
        }
    }
}

/// Result of resetting an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetOutcome {
    /// Initial observation.
    pub observation: Observation,
    /// Kind-specific diagnostics.
    pub info: TransitionInfo,
}

/// Result of advancing an environment by one action.
///
/// Termination and truncation are distinct here; the wire contract
/// collapses them into a single `done`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Observation after the step.
    pub observation: Observation,
    /// Library-native reward.
    pub reward: f32,
    /// Natural episode termination.
    pub terminated: bool,
    /// Externally imposed truncation (step limit).
    pub truncated: bool,
    /// Kind-specific diagnostics.
    pub info: TransitionInfo,
}

/// A live environment instance, dispatched over the closed kind set.
#[derive(Debug)]
pub enum Environment {
    /// Grid-navigation task.
    FrozenLake(FrozenLake),
    /// Continuous-control landing task.
    LunarLander(LunarLander),
}

impl Environment {
    /// The kind of this instance.
    #[must_use]
    pub fn kind(&self) -> EnvKind {
        match self {
            Self::FrozenLake(_) => EnvKind::FrozenLake,
            Self::LunarLander(_) => EnvKind::LunarLander,
        }
    }

    /// Descriptor of the valid actions.
    #[must_use]
    pub fn action_space(&self) -> Space {
        match self {
            Self::FrozenLake(env) => env.action_space(),
            Self::LunarLander(env) => env.action_space(),
        }
    }

    /// Descriptor of the produced observations.
    #[must_use]
    pub fn observation_space(&self) -> Space {
        match self {
            Self::FrozenLake(env) => env.observation_space(),
            Self::LunarLander(env) => env.observation_space(),
        }
    }

    /// Reset to an initial state, optionally deterministic under `seed`.
    pub fn reset(&mut self, seed: Option<u64>) -> ResetOutcome {
        match self {
            Self::FrozenLake(env) => {
                let (observation, prob) = env.reset(seed);
                ResetOutcome {
                    observation: Observation::Discrete(observation),
                    info: TransitionInfo::Prob(prob),
                }
            }
            Self::LunarLander(env) => ResetOutcome {
                observation: Observation::Continuous(env.reset(seed).to_vec()),
                info: TransitionInfo::None,
            },
        }
    }

    /// Advance by one discrete action.
    ///
    /// # Errors
    ///
    /// Returns an error for actions outside the kind's action space.
    pub fn step(&mut self, action: u32) -> EnvResult<StepOutcome> {
        match self {
            Self::FrozenLake(env) => {
                let step = env.step(action)?;
                Ok(StepOutcome {
                    observation: Observation::Discrete(step.observation),
                    reward: step.reward,
                    terminated: step.terminated,
                    truncated: step.truncated,
                    info: TransitionInfo::Prob(step.prob),
                })
            }
            Self::LunarLander(env) => {
                let step = env.step(action)?;
                Ok(StepOutcome {
                    observation: Observation::Continuous(step.observation.to_vec()),
                    reward: step.reward,
                    terminated: step.terminated,
                    truncated: step.truncated,
                    info: TransitionInfo::None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::frozen_lake::FrozenLakeConfig;
    use crate::render::RenderMode;

    use super::*;

    #[test]
    fn test_dispatch_over_kinds() {
        let mut grid = Environment::FrozenLake(
            FrozenLake::new(FrozenLakeConfig::default()).unwrap(),
        );
        assert_eq!(grid.kind(), EnvKind::FrozenLake);
        let outcome = grid.reset(Some(0));
        assert_eq!(outcome.observation, Observation::Discrete(0));
        assert_eq!(outcome.info.prob(), Some(1.0));

        let mut lander = Environment::LunarLander(LunarLander::new(RenderMode::None));
        assert_eq!(lander.kind(), EnvKind::LunarLander);
        let outcome = lander.reset(Some(0));
        assert!(matches!(outcome.observation, Observation::Continuous(ref v) if v.len() == 8));
        assert_eq!(outcome.info.prob(), None);
    }

    #[test]
    fn test_step_carries_distinct_termination_flags() {
        let mut grid = Environment::FrozenLake(
            FrozenLake::new(FrozenLakeConfig::default()).unwrap(),
        );
        grid.reset(Some(0));
        let mut outcome = grid.step(FrozenLake::LEFT).unwrap();
        for _ in 1..100 {
            outcome = grid.step(FrozenLake::LEFT).unwrap();
        }
        assert!(outcome.truncated);
        assert!(!outcome.terminated);
    }
}
