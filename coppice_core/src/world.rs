// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The orchestrator: owns every subsystem and drives the frame loop.
//!
//! A frame is four phases in a fixed order:
//!
//! 1. **render** — repaint stale regions of the back bank.
//! 2. **flip (async)** — hand the back bank to the display.
//! 3. **update** — advance the clock, cloud, and (on lifecycle ticks) the
//!    forest. The simulation runs while the flip is in flight.
//! 4. **wait** — block until the flip lands, then the banks swap roles.
//!
//! Rendering consults two staleness signals per region: the dirty flag the
//! update phase raised for this bank, and a comparison of the region's
//! computed appearance against what this bank last showed. Either one forces
//! a repaint. Regions paint in back-to-front order, and repainting a
//! backdrop region forces every region above it to repaint too, since the
//! trees overlay the sky and ground pixels.

use kurbo::{Circle, Point, Rect};
use rand::Rng;

use crate::banks::{Bank, Banked, Region, RegionTracker};
use crate::config::WorldConfig;
use crate::forest::Forest;
use crate::sky::{
    CLOUD_SPRITE, Cloud, GroundFrame, MOON_COLOR, MOON_RADIUS, SUN_COLOR, SUN_RADIUS, SkyClock,
    SkyFrame,
};
use crate::surface::{DrawSurface, FlipDriver};
use crate::tree::leaf_tint;
use crate::trace::{
    CloudEvent, FlipEvent, FrameBeginEvent, FrameSummary, LifecycleEvent, RedrawCause,
    RegionRedrawEvent, Tracer,
};

/// The whole scene: clock, cloud, forest, and per-bank staleness state.
#[derive(Debug)]
pub struct World {
    cfg: WorldConfig,
    clock: SkyClock,
    cloud: Cloud,
    forest: Forest,
    tracker: RegionTracker,
    target: Bank,
    frame_index: u64,
    pending_sky: SkyFrame,
    pending_ground: GroundFrame,
    pending_leaf: i8,
    rendered_sky: Banked<Option<SkyFrame>>,
    rendered_ground: Banked<Option<GroundFrame>>,
    rendered_leaf: Banked<Option<i8>>,
}

impl World {
    /// Creates a world at midnight with an empty forest. Both banks start
    /// with no recorded content, so each one's first frame paints fully.
    #[must_use]
    pub fn new(cfg: WorldConfig) -> Self {
        let clock = SkyClock::new(&cfg.sky);
        let cloud = Cloud::idle();
        let pending_sky = SkyFrame::compute(&clock, &cloud, &cfg);
        let pending_ground = GroundFrame::compute(&pending_sky, cfg.horizon());
        Self {
            cfg,
            clock,
            cloud,
            forest: Forest::new(),
            tracker: RegionTracker::new(),
            target: Bank::A,
            frame_index: 0,
            pending_sky,
            pending_ground,
            pending_leaf: leaf_tint(clock.phase()),
            rendered_sky: Banked::splat(None),
            rendered_ground: Banked::splat(None),
            rendered_leaf: Banked::splat(None),
        }
    }

    /// The configuration this world was built with.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    /// The time-of-day clock.
    #[must_use]
    pub const fn clock(&self) -> &SkyClock {
        &self.clock
    }

    /// The forest.
    #[must_use]
    pub const fn forest(&self) -> &Forest {
        &self.forest
    }

    /// The cloud.
    #[must_use]
    pub const fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    /// The bank the next render pass draws into.
    #[must_use]
    pub const fn target_bank(&self) -> Bank {
        self.target
    }

    /// Frames completed so far.
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Marks a region stale in both banks (external damage, e.g. the
    /// display was re-exposed).
    pub fn invalidate(&mut self, region: Region) {
        self.tracker.invalidate(region);
    }

    /// Marks every region stale in both banks.
    pub fn invalidate_all(&mut self) {
        self.tracker.invalidate_all();
    }

    /// Render phase: repaint the target bank's stale regions back to front.
    ///
    /// Returns the number of regions repainted (0 when the bank is already
    /// current).
    pub fn render(&mut self, surface: &mut dyn DrawSurface, tracer: &mut Tracer<'_>) -> u8 {
        let bank = self.target;
        self.frame_index += 1;
        tracer.frame_begin(&FrameBeginEvent {
            frame_index: self.frame_index,
            bank,
            time: u64::from(self.clock.time()),
        });

        let sky_cause = self.region_cause(Region::Sky, bank, false);
        let ground_cause = self.region_cause(Region::Ground, bank, false);
        let backdrop = sky_cause.is_some() || ground_cause.is_some();
        let forest_cause = self.region_cause(Region::Forest, bank, backdrop);

        let mut drawn = 0;
        if let Some(cause) = sky_cause {
            self.draw_sky(surface);
            *self.rendered_sky.get_mut(bank) = Some(self.pending_sky);
            drawn += 1;
            tracer.region_redraw(&RegionRedrawEvent {
                frame_index: self.frame_index,
                bank,
                region: Region::Sky,
                cause,
            });
        }
        if let Some(cause) = ground_cause {
            self.draw_ground(surface);
            *self.rendered_ground.get_mut(bank) = Some(self.pending_ground);
            drawn += 1;
            tracer.region_redraw(&RegionRedrawEvent {
                frame_index: self.frame_index,
                bank,
                region: Region::Ground,
                cause,
            });
        }
        if let Some(cause) = forest_cause {
            self.forest.render(surface, self.clock.phase());
            *self.rendered_leaf.get_mut(bank) = Some(self.pending_leaf);
            drawn += 1;
            tracer.region_redraw(&RegionRedrawEvent {
                frame_index: self.frame_index,
                bank,
                region: Region::Forest,
                cause,
            });
        }

        self.tracker.clear_bank(bank);
        drawn
    }

    /// Update phase: advance the clock and cloud every tick, and run the
    /// forest lifecycle on lifecycle ticks. Ends by retargeting the other
    /// bank.
    ///
    /// Returns `true` when this tick was a lifecycle tick.
    pub fn update<R: Rng>(&mut self, rng: &mut R, tracer: &mut Tracer<'_>) -> bool {
        let lifecycle = self.clock.advance();

        if let Some(change) = self.cloud.update(rng, &self.cfg) {
            tracer.cloud(&CloudEvent {
                frame_index: self.frame_index,
                change,
            });
        }

        if lifecycle {
            let changes = self.forest.tick(rng, &self.cfg);
            if changes.any() {
                // A reaped tree leaves stale skeleton pixels behind, so the
                // whole backdrop must be rebuilt under the survivors.
                if changes.died > 0 {
                    self.tracker.invalidate_all();
                } else {
                    self.tracker.invalidate(Region::Forest);
                }
                tracer.lifecycle(&LifecycleEvent::new(
                    self.frame_index,
                    u64::from(self.clock.time()),
                    &changes,
                ));
            }
        }

        // Cloud motion, sky drift, horizon-grazing discs, and the canopy
        // tint need no dirty flag: the render phase compares these
        // recomputed values against each bank's records.
        self.pending_sky = SkyFrame::compute(&self.clock, &self.cloud, &self.cfg);
        self.pending_ground = GroundFrame::compute(&self.pending_sky, self.cfg.horizon());
        self.pending_leaf = leaf_tint(self.clock.phase());

        self.target = self.target.other();
        lifecycle
    }

    fn region_cause(&self, region: Region, bank: Bank, backdrop: bool) -> Option<RedrawCause> {
        if self.tracker.is_pending(region, bank) {
            return Some(RedrawCause::Flagged);
        }
        let value_changed = match region {
            Region::Sky => *self.rendered_sky.get(bank) != Some(self.pending_sky),
            Region::Ground => *self.rendered_ground.get(bank) != Some(self.pending_ground),
            // An empty forest paints nothing, so its record only matters
            // while trees are up.
            Region::Forest => {
                !self.forest.is_empty() && *self.rendered_leaf.get(bank) != Some(self.pending_leaf)
            }
        };
        if value_changed {
            Some(RedrawCause::ValueChanged)
        } else if backdrop {
            Some(RedrawCause::Backdrop)
        } else {
            None
        }
    }

    fn draw_sky(&self, surface: &mut dyn DrawSurface) {
        let frame = &self.pending_sky;
        let horizon = self.cfg.horizon();
        surface.set_color(frame.color);
        surface.fill_rect(Rect::new(0.0, 0.0, self.cfg.width, horizon));
        if let Some((x, y)) = frame.sun {
            surface.set_color(SUN_COLOR);
            surface.fill_circle(Circle::new(Point::new(x.into(), y.into()), SUN_RADIUS));
        }
        if let Some((x, y)) = frame.moon {
            surface.set_color(MOON_COLOR);
            surface.fill_circle(Circle::new(Point::new(x.into(), y.into()), MOON_RADIUS));
        }
        if let Some((x, y)) = frame.cloud {
            surface.sprite(CLOUD_SPRITE, Point::new(x.into(), y.into()));
        }
    }

    fn draw_ground(&self, surface: &mut dyn DrawSurface) {
        surface.set_color(self.pending_ground.color);
        surface.fill_rect(Rect::new(
            0.0,
            self.cfg.horizon(),
            self.cfg.width,
            self.cfg.height,
        ));
    }
}

/// Runs one full frame: render, request the flip, update the simulation
/// while the flip is in flight, then wait for the flip to land.
pub fn run_frame<R: Rng>(
    world: &mut World,
    surface: &mut dyn DrawSurface,
    driver: &mut dyn FlipDriver,
    rng: &mut R,
    tracer: &mut Tracer<'_>,
) {
    let bank = world.target_bank();
    let drawn = world.render(surface, tracer);
    let frame_index = world.frame_index();

    tracer.flip(&FlipEvent { frame_index, bank });
    driver.flip_async();

    let lifecycle = world.update(rng, tracer);

    driver.wait_for_flip();

    #[expect(
        clippy::cast_possible_truncation,
        reason = "forest capacity is single digits"
    )]
    tracer.frame_summary(&FrameSummary {
        frame_index,
        bank,
        time: u64::from(world.clock().time()),
        regions_drawn: drawn,
        lifecycle,
        trees: world.forest().len() as u32,
    });
}
