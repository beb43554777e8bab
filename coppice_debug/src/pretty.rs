// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use coppice_core::banks::{Bank, Region};
use coppice_core::trace::{
    CloudEvent, FlipEvent, FrameBeginEvent, FrameSummary, LifecycleEvent, RegionRedrawEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn bank_name(bank: Bank) -> &'static str {
    match bank {
        Bank::A => "A",
        Bank::B => "B",
    }
}

fn region_name(region: Region) -> &'static str {
    match region {
        Region::Sky => "sky",
        Region::Ground => "ground",
        Region::Forest => "forest",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] frame={} bank={} t={}",
            e.frame_index,
            bank_name(e.bank),
            e.time,
        );
    }

    fn on_region_redraw(&mut self, e: &RegionRedrawEvent) {
        let _ = writeln!(
            self.writer,
            "[redraw] frame={} bank={} region={} cause={:?}",
            e.frame_index,
            bank_name(e.bank),
            region_name(e.region),
            e.cause,
        );
    }

    fn on_flip(&mut self, e: &FlipEvent) {
        let _ = writeln!(
            self.writer,
            "[flip] frame={} bank={}",
            e.frame_index,
            bank_name(e.bank),
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[life] frame={} t={} spawned={} grew={} died={} splits={} skipped={}",
            e.frame_index, e.time, e.spawned, e.grew, e.died, e.splits, e.skipped,
        );
    }

    fn on_cloud(&mut self, e: &CloudEvent) {
        let _ = writeln!(
            self.writer,
            "[cloud] frame={} {:?}",
            e.frame_index, e.change,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} bank={} t={} drawn={} lifecycle={} trees={}",
            s.frame_index,
            bank_name(s.bank),
            s.time,
            s.regions_drawn,
            s.lifecycle,
            s.trees,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coppice_core::trace::RedrawCause;

    #[test]
    fn pretty_print_redraw() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_region_redraw(&RegionRedrawEvent {
            frame_index: 7,
            bank: Bank::B,
            region: Region::Forest,
            cause: RedrawCause::Flagged,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[redraw]"), "got: {output}");
        assert!(output.contains("frame=7"), "got: {output}");
        assert!(output.contains("region=forest"), "got: {output}");
    }

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_summary(&FrameSummary {
            frame_index: 3,
            bank: Bank::A,
            time: 120,
            regions_drawn: 2,
            lifecycle: true,
            trees: 4,
        });
        let output = String::from_utf8(sink.writer).unwrap();
        assert!(output.contains("[summary]"), "got: {output}");
        assert!(output.contains("drawn=2"), "got: {output}");
        assert!(output.contains("trees=4"), "got: {output}");
    }
}
