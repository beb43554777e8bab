// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`ChromeTraceExporter`] implements [`TraceSink`], buffers everything it
//! sees, and writes [Chrome Trace Event Format][spec] JSON to a writer,
//! suitable for loading into `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/).
//!
//! The simulation has no wall clock, so frames are laid out on a synthetic
//! timeline at a fixed number of microseconds per frame.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use coppice_core::trace::{
    CloudEvent, FlipEvent, FrameSummary, LifecycleEvent, RegionRedrawEvent, TraceSink,
};

/// Buffers trace events and exports them as Chrome Trace Event Format JSON.
#[derive(Debug)]
pub struct ChromeTraceExporter {
    events: Vec<Value>,
    us_per_frame: f64,
}

impl Default for ChromeTraceExporter {
    fn default() -> Self {
        // 60 fps nominal.
        Self::new(16_667.0)
    }
}

impl ChromeTraceExporter {
    /// Creates an exporter that spaces frames `us_per_frame` apart on the
    /// synthetic timeline.
    #[must_use]
    pub fn new(us_per_frame: f64) -> Self {
        Self {
            events: Vec::new(),
            us_per_frame,
        }
    }

    /// Events buffered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Writes the buffered events as a JSON array.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn ts(&self, frame_index: u64) -> f64 {
        frame_index as f64 * self.us_per_frame
    }
}

impl TraceSink for ChromeTraceExporter {
    fn on_region_redraw(&mut self, e: &RegionRedrawEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "RegionRedraw",
            "cat": "Render",
            "ts": self.ts(e.frame_index),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "frame_index": e.frame_index,
                "bank": format!("{:?}", e.bank),
                "region": format!("{:?}", e.region),
                "cause": format!("{:?}", e.cause),
            }
        }));
    }

    fn on_flip(&mut self, e: &FlipEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "Flip",
            "cat": "Render",
            "ts": self.ts(e.frame_index),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "frame_index": e.frame_index,
                "bank": format!("{:?}", e.bank),
            }
        }));
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "Lifecycle",
            "cat": "World",
            "ts": self.ts(e.frame_index),
            "pid": 0,
            "tid": 0,
            "s": "g",
            "args": {
                "frame_index": e.frame_index,
                "time": e.time,
                "spawned": e.spawned,
                "grew": e.grew,
                "died": e.died,
                "splits": e.splits,
                "skipped": e.skipped,
            }
        }));
    }

    fn on_cloud(&mut self, e: &CloudEvent) {
        self.events.push(json!({
            "ph": "i",
            "name": "Cloud",
            "cat": "World",
            "ts": self.ts(e.frame_index),
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "frame_index": e.frame_index,
                "change": format!("{:?}", e.change),
            }
        }));
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.events.push(json!({
            "ph": "X",
            "name": "Frame",
            "cat": "Frame",
            "ts": self.ts(s.frame_index.saturating_sub(1)),
            "dur": self.us_per_frame,
            "pid": 0,
            "tid": 0,
            "args": {
                "frame_index": s.frame_index,
                "bank": format!("{:?}", s.bank),
                "time": s.time,
                "regions_drawn": s.regions_drawn,
                "lifecycle": s.lifecycle,
                "trees": s.trees,
            }
        }));
    }
}
