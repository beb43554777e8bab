// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-of-day clock, sky colors, celestial positions, and the cloud.
//!
//! Everything here is a continuous function of the clock's *phase* (the
//! time-of-day counter as an angle), so the sky cycles with no discrete
//! steps. Phase 0 is midnight; the sun rises on the left at a quarter day
//! and sets on the right at three quarters, and the moon traces the
//! antiphase ellipse so it is up exactly while the sun is down.
//!
//! The color policy is time-of-day modulation of the sky only. Ground color
//! is fixed; a seasonal ground variant would be a coherent alternative but
//! must not be mixed with time-of-day modulation of the same channel.
//!
//! [`SkyFrame`] is the quantized value record the double-buffer tracker
//! compares per bank: two frames that quantize equal produce identical
//! pixels, so an equal frame needs no repaint.

use core::f64::consts::{FRAC_PI_2, TAU};

use kurbo::Point;
use rand::Rng;

use crate::color::{Hsv, Rgb};
use crate::config::{SkyConfig, WorldConfig};
use crate::surface::SpriteId;

/// The cloud sprite asset.
pub const CLOUD_SPRITE: SpriteId = SpriteId(0);

/// Width of the cloud sprite; the cloud spawns fully off the left edge.
pub const CLOUD_SPRITE_WIDTH: f64 = 64.0;

/// Sun disc radius in pixels.
pub const SUN_RADIUS: f64 = 24.0;

/// Moon disc radius in pixels.
pub const MOON_RADIUS: f64 = 18.0;

/// Sun pen color.
pub const SUN_COLOR: Rgb = Rgb::new(255, 214, 64);

/// Moon pen color.
pub const MOON_COLOR: Rgb = Rgb::new(224, 224, 208);

/// Fixed, time-invariant ground color.
pub const GROUND_COLOR: Hsv = Hsv::new(0.29, 0.55, 0.30);

/// Cyclic time-of-day counter with a slower lifecycle gate.
#[derive(Clone, Copy, Debug)]
pub struct SkyClock {
    time: u32,
    day_ticks: u32,
    lifecycle_divisor: u32,
}

impl SkyClock {
    /// Creates a clock at midnight.
    #[must_use]
    pub const fn new(cfg: &SkyConfig) -> Self {
        Self {
            time: 0,
            day_ticks: cfg.day_ticks,
            lifecycle_divisor: cfg.lifecycle_divisor,
        }
    }

    /// Advances one tick, wrapping modulo the day period.
    ///
    /// Returns `true` when this tick is a lifecycle tick (tree aging fires
    /// once per [`SkyConfig::lifecycle_divisor`] ticks).
    pub fn advance(&mut self) -> bool {
        self.time += 1;
        if self.time == self.day_ticks {
            self.time = 0;
        }
        self.time % self.lifecycle_divisor == 0
    }

    /// Current time-of-day counter value, in `0..day_ticks`.
    #[must_use]
    pub const fn time(&self) -> u32 {
        self.time
    }

    /// The counter as an angle in `0..TAU`.
    #[must_use]
    pub fn phase(&self) -> f64 {
        TAU * f64::from(self.time) / f64::from(self.day_ticks)
    }
}

/// Sky backdrop color for a phase: dark at midnight, bright at midday,
/// with a small sinusoidal hue drift toward dawn/dusk tints.
#[must_use]
pub fn sky_color(phase: f64) -> Hsv {
    let daylight = 0.5 * (1.0 - libm::cos(phase));
    Hsv::new(0.58 + 0.03 * libm::sin(phase), 0.65, 0.10 + 0.65 * daylight)
}

/// Sun center for a phase: an ellipse spanning the screen, rising at the
/// left end of the day period and setting at the right.
#[must_use]
pub fn sun_position(phase: f64, cfg: &WorldConfig) -> Point {
    celestial(phase - FRAC_PI_2, cfg)
}

/// Moon center for a phase: the sun's ellipse in antiphase with inverted
/// amplitude, above the horizon exactly while the sun is below it.
#[must_use]
pub fn moon_position(phase: f64, cfg: &WorldConfig) -> Point {
    celestial(phase + FRAC_PI_2, cfg)
}

fn celestial(angle: f64, cfg: &WorldConfig) -> Point {
    let horizon = cfg.horizon();
    Point::new(
        cfg.width / 2.0 - libm::cos(angle) * cfg.width * 0.45,
        horizon - libm::sin(angle) * horizon * 0.8,
    )
}

/// What changed about the cloud this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloudChange {
    /// Activated off the left edge.
    Spawned,
    /// Drifted past the right edge and deactivated.
    Retired,
}

/// The single drifting cloud: inactive, or active with a position.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cloud {
    pos: Option<Point>,
}

impl Cloud {
    /// Creates an inactive cloud.
    #[must_use]
    pub const fn idle() -> Self {
        Self { pos: None }
    }

    /// Current position, if active.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        self.pos
    }

    /// Advances one tick: maybe activate; drift rightward with bounded
    /// vertical jitter; deactivate the instant the position passes the
    /// right edge.
    pub fn update<R: Rng>(&mut self, rng: &mut R, cfg: &WorldConfig) -> Option<CloudChange> {
        match self.pos {
            None => {
                let odds = cfg.sky.cloud_odds;
                if odds != 0 && rng.gen_ratio(1, odds) {
                    let y = rng.gen_range(0.0..cfg.height / 2.0);
                    self.pos = Some(Point::new(-CLOUD_SPRITE_WIDTH, y));
                    Some(CloudChange::Spawned)
                } else {
                    None
                }
            }
            Some(p) => {
                let x = p.x + cfg.sky.cloud_drift;
                let y = (p.y + rng.gen_range(-1.0..=1.0)).clamp(0.0, cfg.height / 2.0);
                if x > cfg.width {
                    self.pos = None;
                    Some(CloudChange::Retired)
                } else {
                    self.pos = Some(Point::new(x, y));
                    None
                }
            }
        }
    }
}

/// Quantized sky content for one frame.
///
/// Celestial bodies are recorded only while their center is above the
/// horizon; positions are rounded to whole pixels so that sub-pixel motion
/// does not force a repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkyFrame {
    /// Backdrop pen color.
    pub color: Rgb,
    /// Sun center, if above the horizon.
    pub sun: Option<(i32, i32)>,
    /// Moon center, if above the horizon.
    pub moon: Option<(i32, i32)>,
    /// Cloud sprite position, if active.
    pub cloud: Option<(i32, i32)>,
}

impl SkyFrame {
    /// Computes the frame for the current clock and cloud state.
    #[must_use]
    pub fn compute(clock: &SkyClock, cloud: &Cloud, cfg: &WorldConfig) -> Self {
        let phase = clock.phase();
        let horizon = cfg.horizon();
        Self {
            color: sky_color(phase).to_rgb(),
            sun: visible(sun_position(phase, cfg), horizon),
            moon: visible(moon_position(phase, cfg), horizon),
            cloud: cloud.position().map(quantize),
        }
    }
}

/// Quantized ground-band content for one frame.
///
/// The ground color never varies, but a sun or moon disc whose center sits
/// just above the horizon spills into the ground band. Recording the
/// spilling disc here keeps the band repainting while the spill moves, and
/// once more after it clears, so no disc sliver outlives the body that
/// painted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroundFrame {
    /// Backdrop pen color.
    pub color: Rgb,
    /// Sun center, if its disc crosses the horizon line.
    pub sun_spill: Option<(i32, i32)>,
    /// Moon center, if its disc crosses the horizon line.
    pub moon_spill: Option<(i32, i32)>,
}

impl GroundFrame {
    /// Computes the frame for an already-quantized sky frame.
    #[must_use]
    pub fn compute(sky: &SkyFrame, horizon: f64) -> Self {
        Self {
            color: GROUND_COLOR.to_rgb(),
            sun_spill: spill(sky.sun, SUN_RADIUS, horizon),
            moon_spill: spill(sky.moon, MOON_RADIUS, horizon),
        }
    }
}

fn spill(center: Option<(i32, i32)>, radius: f64, horizon: f64) -> Option<(i32, i32)> {
    center.filter(|&(_, y)| f64::from(y) + radius > horizon)
}

fn visible(center: Point, horizon: f64) -> Option<(i32, i32)> {
    (center.y < horizon).then(|| quantize(center))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "positions stay within a few screen widths of the origin"
)]
fn quantize(p: Point) -> (i32, i32) {
    (libm::round(p.x) as i32, libm::round(p.y) as i32)
}

#[cfg(test)]
mod tests {
    use core::f64::consts::PI;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn clock_wraps_exactly_once_per_period() {
        let cfg = WorldConfig::classic();
        let mut clock = SkyClock::new(&cfg.sky);
        let mut zero_visits = 0;
        for step in 1..=cfg.sky.day_ticks {
            clock.advance();
            if clock.time() == 0 {
                zero_visits += 1;
                assert_eq!(step, cfg.sky.day_ticks, "wrap only on the final tick");
            } else {
                assert_eq!(clock.time(), step, "no value skipped or repeated");
            }
        }
        assert_eq!(zero_visits, 1, "exactly one wrap per period");
    }

    #[test]
    fn lifecycle_gate_fires_once_per_divisor() {
        let cfg = WorldConfig::classic();
        let mut clock = SkyClock::new(&cfg.sky);
        let fired = (0..cfg.sky.day_ticks)
            .filter(|_| clock.advance())
            .count();
        assert_eq!(
            fired,
            (cfg.sky.day_ticks / cfg.sky.lifecycle_divisor) as usize,
            "one lifecycle tick per divisor window"
        );
    }

    #[test]
    fn sun_and_moon_are_never_both_up() {
        let cfg = WorldConfig::classic();
        let horizon = cfg.horizon();
        let mut sun_up = 0;
        let mut moon_up = 0;
        for t in 0..cfg.sky.day_ticks {
            let phase = TAU * f64::from(t) / f64::from(cfg.sky.day_ticks);
            let sun = sun_position(phase, &cfg).y < horizon;
            let moon = moon_position(phase, &cfg).y < horizon;
            assert!(!(sun && moon), "tick {t}: both bodies above the horizon");
            sun_up += u32::from(sun);
            moon_up += u32::from(moon);
        }
        // Each body is up for (nearly) half the day; only the two crossing
        // instants belong to neither.
        assert!(sun_up > cfg.sky.day_ticks * 45 / 100, "sun up half the day");
        assert!(moon_up > cfg.sky.day_ticks * 45 / 100, "moon up half the day");
    }

    #[test]
    fn sun_rises_left_and_sets_right() {
        let cfg = WorldConfig::classic();
        let quarter = TAU * 0.25;
        let rise = sun_position(quarter + 0.05, &cfg);
        let set = sun_position(TAU * 0.75 - 0.05, &cfg);
        assert!(rise.x < cfg.width / 2.0, "sunrise on the left half");
        assert!(set.x > cfg.width / 2.0, "sunset on the right half");
        let noon = sun_position(PI, &cfg);
        assert!(noon.y < cfg.horizon() / 2.0, "sun high at noon");
    }

    #[test]
    fn sky_brightens_toward_noon() {
        let midnight = sky_color(0.0);
        let noon = sky_color(PI);
        assert!(noon.v > midnight.v + 0.5, "midday much brighter");
    }

    #[test]
    fn cloud_drifts_monotonically_and_retires_past_the_edge() {
        let mut cfg = WorldConfig::classic();
        cfg.sky.cloud_odds = 1;
        let mut rng = SmallRng::seed_from_u64(11);
        let mut cloud = Cloud::idle();

        assert_eq!(cloud.update(&mut rng, &cfg), Some(CloudChange::Spawned));
        let start = cloud.position().expect("cloud active after spawn");
        assert_eq!(start.x, -CLOUD_SPRITE_WIDTH);

        let mut last_x = start.x;
        loop {
            match cloud.update(&mut rng, &cfg) {
                None => {
                    let p = cloud.position().expect("still active");
                    assert!(p.x >= last_x, "x never decreases");
                    assert!(p.x <= cfg.width, "active cloud never past the edge");
                    assert!(p.y >= 0.0 && p.y <= cfg.height / 2.0, "jitter clamped");
                    last_x = p.x;
                }
                Some(CloudChange::Retired) => {
                    assert!(cloud.position().is_none(), "inactive after retiring");
                    assert!(last_x + cfg.sky.cloud_drift > cfg.width, "left via the edge");
                    break;
                }
                Some(CloudChange::Spawned) => panic!("spawned while active"),
            }
        }
    }

    #[test]
    fn disabled_cloud_never_spawns() {
        let mut cfg = WorldConfig::classic();
        cfg.sky.cloud_odds = 0;
        let mut rng = SmallRng::seed_from_u64(3);
        let mut cloud = Cloud::idle();
        for _ in 0..1000 {
            assert_eq!(cloud.update(&mut rng, &cfg), None);
        }
    }

    #[test]
    fn ground_frame_records_discs_crossing_the_horizon() {
        let cfg = WorldConfig::classic();
        let horizon = cfg.horizon();
        let mut clock = SkyClock::new(&cfg.sky);
        let cloud = Cloud::idle();
        let mut sun_spills = 0;
        let mut moon_spills = 0;
        for _ in 0..cfg.sky.day_ticks {
            let sky = SkyFrame::compute(&clock, &cloud, &cfg);
            let ground = GroundFrame::compute(&sky, horizon);
            if let Some((x, y)) = ground.sun_spill {
                sun_spills += 1;
                assert_eq!(sky.sun, Some((x, y)), "a spill is a visible body");
                assert!(f64::from(y) + SUN_RADIUS > horizon, "disc crosses the line");
            }
            if ground.moon_spill.is_some() {
                moon_spills += 1;
            }
            assert_eq!(ground.color, GROUND_COLOR.to_rgb());
            clock.advance();
        }
        // Each body grazes the horizon twice a day, a few dozen ticks each.
        assert!(sun_spills > 20, "sunrise and sunset graze the ground band");
        assert!(moon_spills > 20, "so do moonrise and moonset");
    }

    #[test]
    fn sky_frame_quantizes_sub_pixel_motion_away() {
        let cfg = WorldConfig::classic();
        let clock = SkyClock::new(&cfg.sky);
        let a = SkyFrame::compute(&clock, &Cloud::idle(), &cfg);
        let b = SkyFrame::compute(&clock, &Cloud::idle(), &cfg);
        assert_eq!(a, b, "same state quantizes identically");
        assert!(a.sun.is_none(), "midnight: sun below the horizon");
        assert!(a.moon.is_some(), "midnight: moon up");
    }
}
