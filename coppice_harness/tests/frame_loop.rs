// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end frame-loop tests over the recording harness.

use std::cell::RefCell;
use std::rc::Rc;

use coppice_core::banks::{Bank, Region};
use coppice_core::color::Rgb;
use coppice_core::config::WorldConfig;
use coppice_core::surface::{DrawSurface, FlipDriver, SpriteId};
use coppice_core::trace::{RedrawCause, Tracer};
use coppice_core::world::{World, run_frame};
use coppice_harness::{CountingFlipDriver, RecordingSurface, SummarySink};
use kurbo::{Circle, Line, Point, Rect};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// A config with every random subsystem disabled: only the clock moves.
fn quiet_cfg() -> WorldConfig {
    let mut cfg = WorldConfig::classic();
    cfg.forest.spawn_odds = 0;
    cfg.sky.cloud_odds = 0;
    cfg
}

#[test]
fn first_two_frames_prime_both_banks() {
    let mut world = World::new(quiet_cfg());
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut sink = SummarySink::new();

    for _ in 0..2 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
    }

    let summaries = sink.summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].bank, Bank::A);
    assert_eq!(summaries[0].regions_drawn, 3, "bank A starts fully stale");
    assert_eq!(summaries[1].bank, Bank::B);
    assert_eq!(summaries[1].regions_drawn, 3, "bank B starts fully stale");
    assert!(driver.balanced());
}

#[test]
fn frames_draw_iff_a_region_was_repainted() {
    let mut world = World::new(quiet_cfg());
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(2);
    let mut sink = SummarySink::new();

    for frame in 0..100 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
        let drawn = sink.summaries()[frame].regions_drawn;
        let ops = surface.take_ops();
        assert_eq!(
            drawn == 0,
            ops.is_empty(),
            "frame {frame}: {drawn} regions but {} ops",
            ops.len()
        );
    }
}

#[test]
fn settled_banks_skip_most_frames() {
    // Stretch the day so celestial motion is far below one pixel per tick;
    // quantization then leaves the sky frame unchanged for long stretches.
    let mut cfg = quiet_cfg();
    cfg.sky.day_ticks = 360_000;
    let mut world = World::new(cfg);
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut sink = SummarySink::new();

    for _ in 0..200 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
    }

    // After both banks are primed, only sub-pixel celestial motion and the
    // slow sky gradient can force work, and most ticks quantize away.
    let skipped = sink.summaries()[2..]
        .iter()
        .filter(|s| s.regions_drawn == 0)
        .count();
    assert!(
        skipped > 150,
        "dirty tracking saves work on a quiet scene (skipped {skipped}/198)"
    );
}

#[test]
fn a_repainted_sky_always_carries_the_forest_with_it() {
    let mut world = World::new(quiet_cfg());
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(4);
    let mut sink = SummarySink::new();

    for _ in 0..300 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
    }

    let mut sky_repaints = 0;
    for summary in sink.summaries() {
        let sky = sink
            .redraws_for(summary.frame_index)
            .any(|e| e.region == Region::Sky);
        let forest = sink
            .redraws_for(summary.frame_index)
            .any(|e| e.region == Region::Forest);
        if sky {
            sky_repaints += 1;
            assert!(
                forest,
                "frame {}: sky repainted without the forest overlay",
                summary.frame_index
            );
        }
    }
    assert!(sky_repaints > 2, "celestial motion repaints the sky");
}

#[test]
fn a_disc_grazing_the_horizon_repaints_the_ground_band() {
    let mut world = World::new(quiet_cfg());
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(8);
    let mut sink = SummarySink::new();

    // Run through sunrise (a quarter day in): first the setting moon and
    // then the rising sun overlap the ground band, and each overlap must
    // drag the band along so no disc sliver is left behind in either bank.
    for _ in 0..960 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
    }

    let ground_frames: Vec<u64> = sink
        .redraws()
        .iter()
        .filter(|e| e.region == Region::Ground)
        .map(|e| e.frame_index)
        .collect();
    let grazing = ground_frames.iter().filter(|&&f| f > 2).count();
    assert!(
        grazing > 10,
        "the grazing discs repainted the ground past priming ({grazing} repaints)"
    );
    assert!(
        ground_frames
            .iter()
            .all(|&f| f <= 2 || (860..=950).contains(&f)),
        "ground repaints cluster around the horizon crossings: {ground_frames:?}"
    );
}

#[test]
fn lifecycle_growth_repaints_the_forest() {
    let mut cfg = quiet_cfg();
    cfg.forest.spawn_odds = 1;
    cfg.sky.lifecycle_divisor = 1;
    let mut world = World::new(cfg);
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(5);
    let mut sink = SummarySink::new();

    for _ in 0..20 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
    }

    assert!(!world.forest().is_empty(), "eager odds sprouted trees");
    assert!(!sink.lifecycles().is_empty(), "lifecycle events were traced");
    assert!(
        sink.redraws()
            .iter()
            .any(|e| e.region == Region::Forest && e.cause == RedrawCause::Flagged),
        "forest growth flags a forest repaint"
    );
}

#[test]
fn a_death_rebuilds_the_whole_scene_in_both_banks() {
    let mut cfg = quiet_cfg();
    cfg.forest.spawn_odds = 1;
    cfg.sky.lifecycle_divisor = 1;
    cfg.growth.death_age = 3;
    let mut world = World::new(cfg);
    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::seed_from_u64(6);
    let mut sink = SummarySink::new();

    for _ in 0..30 {
        let mut tracer = Tracer::new(&mut sink);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);
    }

    let deaths: u32 = sink.lifecycles().iter().map(|e| e.died).sum();
    assert!(deaths > 0, "short-lived trees died during the run");

    // Find a frame right after a death and check that it and its successor
    // (the two banks) repainted everything.
    let death_frame = sink
        .lifecycles()
        .iter()
        .find(|e| e.died > 0)
        .map(|e| e.frame_index)
        .unwrap();
    for frame in [death_frame + 1, death_frame + 2] {
        let summary = &sink.summaries()[usize::try_from(frame - 1).unwrap()];
        assert_eq!(
            summary.regions_drawn, 3,
            "frame {frame}: a death forces a full repaint in each bank"
        );
    }
}

/// Interleaving stamps shared between a surface and a flip driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stamp {
    Draw,
    FlipRequested,
    FlipAwaited,
}

#[derive(Clone)]
struct LogSurface(Rc<RefCell<Vec<Stamp>>>);

impl DrawSurface for LogSurface {
    fn set_color(&mut self, _color: Rgb) {
        self.0.borrow_mut().push(Stamp::Draw);
    }
    fn line(&mut self, _line: Line) {
        self.0.borrow_mut().push(Stamp::Draw);
    }
    fn thick_line(&mut self, _line: Line, _width: f64) {
        self.0.borrow_mut().push(Stamp::Draw);
    }
    fn fill_circle(&mut self, _circle: Circle) {
        self.0.borrow_mut().push(Stamp::Draw);
    }
    fn fill_rect(&mut self, _rect: Rect) {
        self.0.borrow_mut().push(Stamp::Draw);
    }
    fn sprite(&mut self, _id: SpriteId, _at: Point) {
        self.0.borrow_mut().push(Stamp::Draw);
    }
}

#[derive(Clone)]
struct LogDriver(Rc<RefCell<Vec<Stamp>>>);

impl FlipDriver for LogDriver {
    fn flip_async(&mut self) {
        self.0.borrow_mut().push(Stamp::FlipRequested);
    }
    fn wait_for_flip(&mut self) {
        self.0.borrow_mut().push(Stamp::FlipAwaited);
    }
}

#[test]
fn rendering_finishes_before_the_flip_is_requested() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut surface = LogSurface(Rc::clone(&log));
    let mut driver = LogDriver(Rc::clone(&log));

    let mut cfg = quiet_cfg();
    cfg.forest.spawn_odds = 1;
    cfg.sky.lifecycle_divisor = 1;
    let mut world = World::new(cfg);
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..25 {
        run_frame(
            &mut world,
            &mut surface,
            &mut driver,
            &mut rng,
            &mut Tracer::none(),
        );
    }

    let log = log.borrow();
    let mut in_flight = false;
    let mut requests = 0;
    let mut awaits = 0;
    for stamp in log.iter() {
        match stamp {
            Stamp::Draw => {
                assert!(!in_flight, "draw call while a flip was in flight");
            }
            Stamp::FlipRequested => {
                assert!(!in_flight, "flip requested twice without a wait");
                in_flight = true;
                requests += 1;
            }
            Stamp::FlipAwaited => {
                assert!(in_flight, "wait without a pending flip");
                in_flight = false;
                awaits += 1;
            }
        }
    }
    assert_eq!(requests, 25, "exactly one flip per frame");
    assert_eq!(awaits, 25, "every flip was awaited");
}
