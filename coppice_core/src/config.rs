// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World tuning knobs.
//!
//! All rates are expressed in two time units: *ticks* (one
//! [`World::update`](crate::world::World::update) call, i.e. one frame) and
//! *lifecycle ticks* (one tick of tree aging, gated to every
//! [`SkyConfig::lifecycle_divisor`] frames so that aging is independent of
//! animation smoothness).

/// Number of child slots per branch.
///
/// The growth policy only ever fills the first two; the third slot is a
/// deliberate extension point, not dead state (see
/// [`tree`](crate::tree) docs).
pub const BRANCH_SLOTS: usize = 3;

/// Maximum number of concurrently alive trees.
pub const FOREST_CAPACITY: usize = 8;

/// Branch growth and tree lifecycle thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthConfig {
    /// Growth events happen on lifecycle ticks where `age % interval == 0`.
    pub interval: u32,
    /// No growth once `age` reaches this value.
    pub cutoff: u32,
    /// The tree dies (its slot is released) when `age` exceeds this value.
    pub death_age: u32,
    /// Arena capacity per tree, in branches. Growth steps that would
    /// overflow it fail with
    /// [`GrowthError::ResourceExhausted`](crate::tree::GrowthError) and are
    /// retried on the next eligible tick.
    pub branch_budget: usize,
}

/// Forest pool policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForestConfig {
    /// A spawn is attempted with probability `1/spawn_odds` per lifecycle
    /// tick; `0` disables spawning entirely.
    pub spawn_odds: u32,
}

/// Day/night cycle and cloud pacing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyConfig {
    /// Period of the time-of-day counter, in ticks.
    pub day_ticks: u32,
    /// One lifecycle tick fires every this many ticks.
    pub lifecycle_divisor: u32,
    /// While the cloud is inactive, it activates with probability
    /// `1/cloud_odds` per tick; `0` disables the cloud.
    pub cloud_odds: u32,
    /// Rightward cloud drift per tick, in pixels.
    pub cloud_drift: f64,
}

/// Complete world configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Screen width in pixels.
    pub width: f64,
    /// Screen height in pixels.
    pub height: f64,
    /// Height of the ground band at the bottom of the screen.
    pub ground_height: f64,
    /// Growth and lifecycle thresholds.
    pub growth: GrowthConfig,
    /// Forest pool policy.
    pub forest: ForestConfig,
    /// Day/night cycle pacing.
    pub sky: SkyConfig,
}

impl WorldConfig {
    /// The original demo's tuning: 720×480 over a 25 px ground band, a
    /// 3600-tick day with tree aging every 60 frames.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            width: 720.0,
            height: 480.0,
            ground_height: 25.0,
            growth: GrowthConfig {
                interval: 4,
                cutoff: 40,
                death_age: 99,
                branch_budget: 128,
            },
            forest: ForestConfig { spawn_odds: 15 },
            sky: SkyConfig {
                day_ticks: 3600,
                lifecycle_divisor: 60,
                cloud_odds: 400,
                cloud_drift: 2.0,
            },
        }
    }

    /// Y coordinate of the horizon (top of the ground band).
    #[must_use]
    pub fn horizon(&self) -> f64 {
        self.height - self.ground_height
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::classic()
    }
}
