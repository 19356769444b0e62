//! Simplified continuous-control landing task.
//!
//! A planar lander under gravity with a main engine and two side
//! engines. The observation is the 8-vector `[x, y, vx, vy, angle,
//! angular velocity, left contact, right contact]`. The guest-facing
//! contract fixes only the observation shape and the discrete engine
//! actions; the dynamics here are intentionally lightweight.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{EnvError, EnvResult};
use crate::render::RenderMode;
use crate::space::Space;

/// Observation vector dimension.
pub const OBS_DIM: usize = 8;

/// Steps before an episode is truncated.
const MAX_EPISODE_STEPS: u32 = 1000;

const DT: f32 = 0.02;
const GRAVITY: f32 = -10.0;
const MAIN_ENGINE_ACCEL: f32 = 15.0;
const SIDE_ENGINE_ACCEL: f32 = 3.0;
const SIDE_ENGINE_TORQUE: f32 = 1.5;
const MAIN_ENGINE_FUEL_COST: f32 = 0.3;
const SIDE_ENGINE_FUEL_COST: f32 = 0.03;

/// Horizontal extent of the world; leaving it ends the episode.
const WORLD_HALF_WIDTH: f32 = 2.5;
/// Landing tolerances for velocity and attitude.
const SOFT_LANDING_SPEED: f32 = 0.5;
const SOFT_LANDING_ANGLE: f32 = 0.25;
/// Half-width of the landing pad around the origin.
const PAD_HALF_WIDTH: f32 = 1.0;

/// Outcome of a single lander step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanderStep {
    /// Observation after the step.
    pub observation: [f32; OBS_DIM],
    /// Shaping reward plus any terminal bonus or penalty.
    pub reward: f32,
    /// The lander touched down, crashed, or left the world.
    pub terminated: bool,
    /// The episode hit its step limit.
    pub truncated: bool,
}

/// Continuous-control landing environment.
#[derive(Debug, Clone)]
pub struct LunarLander {
    render_mode: RenderMode,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    angle: f32,
    angular_velocity: f32,
    left_contact: bool,
    right_contact: bool,
    steps: u32,
    last_shaping: f32,
    rng: StdRng,
}

impl LunarLander {
    /// Action index: all engines idle.
    pub const IDLE: u32 = 0;
    /// Action index: fire the left side engine.
    pub const LEFT_ENGINE: u32 = 1;
    /// Action index: fire the main engine.
    pub const MAIN_ENGINE: u32 = 2;
    /// Action index: fire the right side engine.
    pub const RIGHT_ENGINE: u32 = 3;

    /// Build an environment with the given render mode.
    #[must_use]
    pub fn new(render_mode: RenderMode) -> Self {
        let mut env = Self {
            render_mode,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            angular_velocity: 0.0,
            left_contact: false,
            right_contact: false,
            steps: 0,
            last_shaping: 0.0,
            rng: StdRng::from_entropy(),
        };
        env.place_at_spawn();
        env
    }

    /// The render mode this environment was created with.
    #[must_use]
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Action space: idle, left engine, main engine, right engine.
    #[must_use]
    pub fn action_space(&self) -> Space {
        Space::Discrete { n: 4 }
    }

    /// Observation space: position, velocity, attitude, and contacts.
    #[must_use]
    pub fn observation_space(&self) -> Space {
        Space::Box {
            low: vec![
                -WORLD_HALF_WIDTH,
                -WORLD_HALF_WIDTH,
                -10.0,
                -10.0,
                -std::f32::consts::TAU,
                -10.0,
                0.0,
                0.0,
            ],
            high: vec![
                WORLD_HALF_WIDTH,
                WORLD_HALF_WIDTH,
                10.0,
                10.0,
                std::f32::consts::TAU,
                10.0,
                1.0,
                1.0,
            ],
        }
    }

    /// Reset above the pad with a small random initial impulse.
    ///
    /// A seed reseeds the RNG deterministically; no seed continues the
    /// current stream.
    pub fn reset(&mut self, seed: Option<u64>) -> [f32; OBS_DIM] {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.place_at_spawn();
        self.observation()
    }

    /// Advance one action.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ActionOutOfRange`] for actions outside `0..4`.
    pub fn step(&mut self, action: u32) -> EnvResult<LanderStep> {
        if action >= 4 {
            return Err(EnvError::ActionOutOfRange { action, n: 4 });
        }

        let mut ax = 0.0;
        let mut ay = GRAVITY;
        let mut fuel_cost = 0.0;
        match action {
            Self::MAIN_ENGINE => {
                ax += -self.angle.sin() * MAIN_ENGINE_ACCEL;
                ay += self.angle.cos() * MAIN_ENGINE_ACCEL;
                fuel_cost = MAIN_ENGINE_FUEL_COST;
            }
            Self::LEFT_ENGINE => {
                ax += SIDE_ENGINE_ACCEL;
                self.angular_velocity += SIDE_ENGINE_TORQUE * DT;
                fuel_cost = SIDE_ENGINE_FUEL_COST;
            }
            Self::RIGHT_ENGINE => {
                ax -= SIDE_ENGINE_ACCEL;
                self.angular_velocity -= SIDE_ENGINE_TORQUE * DT;
                fuel_cost = SIDE_ENGINE_FUEL_COST;
            }
            _ => {}
        }

        self.vx += ax * DT;
        self.vy += ay * DT;
        self.x += self.vx * DT;
        self.y += self.vy * DT;
        self.angle += self.angular_velocity * DT;
        self.steps += 1;

        let shaping = self.shaping();
        let mut reward = shaping - self.last_shaping - fuel_cost;
        self.last_shaping = shaping;

        let mut terminated = false;
        if self.y <= 0.0 {
            self.y = 0.0;
            self.left_contact = true;
            self.right_contact = true;
            terminated = true;
            let soft = self.vx.abs() <= SOFT_LANDING_SPEED
                && self.vy.abs() <= SOFT_LANDING_SPEED
                && self.angle.abs() <= SOFT_LANDING_ANGLE;
            let on_pad = self.x.abs() <= PAD_HALF_WIDTH;
            reward += if soft && on_pad { 100.0 } else { -100.0 };
        } else if self.x.abs() > WORLD_HALF_WIDTH {
            terminated = true;
            reward -= 100.0;
        }

        Ok(LanderStep {
            observation: self.observation(),
            reward,
            terminated,
            truncated: self.steps >= MAX_EPISODE_STEPS,
        })
    }

    fn place_at_spawn(&mut self) {
        self.x = 0.0;
        self.y = 1.4;
        self.vx = self.rng.gen_range(-0.5..=0.5);
        self.vy = self.rng.gen_range(-0.5..=0.0);
        self.angle = self.rng.gen_range(-0.1..=0.1);
        self.angular_velocity = 0.0;
        self.left_contact = false;
        self.right_contact = false;
        self.steps = 0;
        self.last_shaping = self.shaping();
    }

    fn shaping(&self) -> f32 {
        -100.0 * (self.x * self.x + self.y * self.y).sqrt()
            - 100.0 * (self.vx * self.vx + self.vy * self.vy).sqrt()
            - 100.0 * self.angle.abs()
    }

    fn observation(&self) -> [f32; OBS_DIM] {
        [
            self.x,
            self.y,
            self.vx,
            self.vy,
            self.angle,
            self.angular_velocity,
            f32::from(u8::from(self.left_contact)),
            f32::from(u8::from(self.right_contact)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_shape_and_spawn() {
        let mut env = LunarLander::new(RenderMode::None);
        let observation = env.reset(Some(0));
        assert_eq!(observation.len(), OBS_DIM);
        assert!((observation[0] - 0.0).abs() < f32::EPSILON);
        assert!(observation[1] > 0.0);
        assert!((observation[6] - 0.0).abs() < f32::EPSILON);
        assert!((observation[7] - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_seeded_reset_is_deterministic() {
        let mut a = LunarLander::new(RenderMode::None);
        let mut b = LunarLander::new(RenderMode::None);
        assert_eq!(a.reset(Some(17)), b.reset(Some(17)));
        for _ in 0..20 {
            assert_eq!(
                a.step(LunarLander::MAIN_ENGINE).unwrap(),
                b.step(LunarLander::MAIN_ENGINE).unwrap()
            );
        }
    }

    #[test]
    fn test_free_fall_reaches_ground() {
        let mut env = LunarLander::new(RenderMode::None);
        env.reset(Some(4));
        let mut landed = false;
        for _ in 0..MAX_EPISODE_STEPS {
            let step = env.step(LunarLander::IDLE).unwrap();
            if step.terminated {
                assert!((step.observation[6] - 1.0).abs() < f32::EPSILON);
                assert!((step.observation[7] - 1.0).abs() < f32::EPSILON);
                landed = true;
                break;
            }
        }
        assert!(landed, "an idle lander must reach the ground");
    }

    #[test]
    fn test_spaces() {
        let env = LunarLander::new(RenderMode::None);
        assert_eq!(env.action_space(), Space::Discrete { n: 4 });
        let Space::Box { low, high } = env.observation_space() else {
            panic!("lander observation space must be a box");
        };
        assert_eq!(low.len(), OBS_DIM);
        assert_eq!(high.len(), OBS_DIM);
    }

    #[test]
    fn test_action_out_of_range() {
        let mut env = LunarLander::new(RenderMode::None);
        env.reset(Some(0));
        assert!(matches!(
            env.step(9),
            Err(EnvError::ActionOutOfRange { action: 9, n: 4 })
        ));
    }

    #[test]
    fn test_main_engine_slows_descent() {
        let mut idle = LunarLander::new(RenderMode::None);
        let mut thrust = LunarLander::new(RenderMode::None);
        idle.reset(Some(2));
        thrust.reset(Some(2));
        let mut idle_vy = 0.0;
        let mut thrust_vy = 0.0;
        for _ in 0..10 {
            idle_vy = idle.step(LunarLander::IDLE).unwrap().observation[3];
            thrust_vy = thrust.step(LunarLander::MAIN_ENGINE).unwrap().observation[3];
        }
        assert!(thrust_vy > idle_vy);
    }
}
