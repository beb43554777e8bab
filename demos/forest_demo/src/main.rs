// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame loop that grows a forest under a day/night sky.
//!
//! Runs 600 synthetic frames against a recording surface, printing trace
//! lines via [`PrettyPrintSink`](coppice_debug::pretty::PrettyPrintSink) and
//! exporting a Chrome trace JSON file. A redraw sparkline at the end shows
//! how much work the dirty tracking saved.

use std::fs::File;
use std::io::BufWriter;

use coppice_core::config::WorldConfig;
use coppice_core::trace::{
    CloudEvent, FlipEvent, FrameBeginEvent, FrameSummary, LifecycleEvent, RegionRedrawEvent,
    TraceSink, Tracer,
};
use coppice_core::world::{World, run_frame};
use coppice_harness::{CountingFlipDriver, RecordingSurface, RedrawStats};

use coppice_debug::chrome::ChromeTraceExporter;
use coppice_debug::pretty::PrettyPrintSink;

use rand::SeedableRng;
use rand::rngs::SmallRng;

const FRAME_COUNT: u64 = 600;

/// Feeds per-frame summaries into a [`RedrawStats`] ring.
#[derive(Debug, Default)]
struct StatsSink {
    stats: RedrawStats<60>,
    max_trees: u32,
}

impl TraceSink for StatsSink {
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.stats.observe(s.regions_drawn);
        self.max_trees = self.max_trees.max(s.trees);
    }
}

/// Fans every event out to a list of sinks.
struct TeeSink<'a> {
    sinks: Vec<&'a mut dyn TraceSink>,
}

impl TraceSink for TeeSink<'_> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        for sink in &mut self.sinks {
            sink.on_frame_begin(e);
        }
    }

    fn on_region_redraw(&mut self, e: &RegionRedrawEvent) {
        for sink in &mut self.sinks {
            sink.on_region_redraw(e);
        }
    }

    fn on_flip(&mut self, e: &FlipEvent) {
        for sink in &mut self.sinks {
            sink.on_flip(e);
        }
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        for sink in &mut self.sinks {
            sink.on_lifecycle(e);
        }
    }

    fn on_cloud(&mut self, e: &CloudEvent) {
        for sink in &mut self.sinks {
            sink.on_cloud(e);
        }
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        for sink in &mut self.sinks {
            sink.on_frame_summary(s);
        }
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut chrome = ChromeTraceExporter::default();
    let mut stats = StatsSink::default();

    // -- world -------------------------------------------------------------
    // Compress the day and the lifecycle so 600 frames show a full cycle of
    // sunrise, growth, death, and sunset.
    let mut cfg = WorldConfig::classic();
    cfg.sky.day_ticks = 600;
    cfg.sky.lifecycle_divisor = 10;
    cfg.sky.cloud_odds = 60;
    cfg.forest.spawn_odds = 5;
    cfg.growth.death_age = 30;
    let mut world = World::new(cfg);

    let mut surface = RecordingSurface::new();
    let mut driver = CountingFlipDriver::new();
    let mut rng = SmallRng::from_entropy();

    // -- frame loop --------------------------------------------------------
    for _ in 0..FRAME_COUNT {
        let mut tee = TeeSink {
            sinks: vec![&mut pretty, &mut chrome, &mut stats],
        };
        let mut tracer = Tracer::new(&mut tee);
        run_frame(&mut world, &mut surface, &mut driver, &mut rng, &mut tracer);

        // A real display backend would blit these; the demo just drops them.
        surface.take_ops();
    }

    // -- report ------------------------------------------------------------
    assert!(driver.balanced(), "every flip must be awaited");
    println!(
        "frames={} skipped={} mean_regions={:.2} max_trees={}",
        stats.stats.total_frames(),
        stats.stats.skipped_frames(),
        stats.stats.mean_regions_per_frame(),
        stats.max_trees,
    );
    println!("redraw [{}]", stats.stats.sparkline_ascii());
    println!(
        "trees={} time={} day_ticks={}",
        world.forest().len(),
        world.clock().time(),
        world.config().sky.day_ticks,
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    chrome
        .write_to(&mut writer)
        .expect("failed to write Chrome trace");
    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
