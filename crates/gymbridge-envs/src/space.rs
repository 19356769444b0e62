//! Action and observation space descriptors.

use rand::Rng;

/// Describes the set of valid actions or observations for an environment.
///
/// Immutable after creation. Every environment produces exactly one
/// action space and one observation space, registered by the host when
/// the environment is created.
#[derive(Debug, Clone, PartialEq)]
pub enum Space {
    /// The integers `0..n`.
    Discrete {
        /// Number of valid values.
        n: u32,
    },
    /// Real-valued vectors with per-element bounds.
    Box {
        /// Lower bound per element.
        low: Vec<f32>,
        /// Upper bound per element.
        high: Vec<f32>,
    },
}

impl Space {
    /// Whether the space contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Discrete { n } => *n == 0,
            Self::Box { low, .. } => low.is_empty(),
        }
    }

    /// Draw one value uniformly from the space.
    ///
    /// Returns `None` for an empty space, which has nothing to draw.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<Sample> {
        if self.is_empty() {
            return None;
        }
        Some(match self {
            Self::Discrete { n } => Sample::Discrete(rng.gen_range(0..*n)),
            Self::Box { low, high } => Sample::Continuous(
                low.iter()
                    .zip(high)
                    .map(|(&lo, &hi)| rng.gen_range(lo..=hi))
                    .collect(),
            ),
        })
    }
}

/// A value drawn from a [`Space`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Drawn from a discrete space.
    Discrete(u32),
    /// Drawn from a box space.
    Continuous(Vec<f32>),
}
