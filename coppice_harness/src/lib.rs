// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording surfaces, counting flip drivers, and redraw metrics.
//!
//! Nothing here touches a real display. [`RecordingSurface`] captures draw
//! calls as [`DrawOp`] values so tests can assert on exactly what a frame
//! painted, [`CountingFlipDriver`] stands in for the display's flip
//! machinery, and [`RedrawStats`] keeps a rolling per-frame repaint history
//! with an ASCII sparkline for demo HUDs.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use coppice_core::color::Rgb;
use coppice_core::surface::{DrawSurface, FlipDriver, SpriteId};
use coppice_core::trace::{FrameSummary, LifecycleEvent, RegionRedrawEvent, TraceSink};
use kurbo::{Circle, Line, Point, Rect};

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One captured draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    /// Pen color change.
    SetColor(Rgb),
    /// One-pixel line.
    Line(Line),
    /// Line with an explicit width.
    ThickLine(Line, f64),
    /// Filled circle.
    FillCircle(Circle),
    /// Filled axis-aligned rectangle.
    FillRect(Rect),
    /// Sprite blit.
    Sprite(SpriteId, Point),
}

/// A [`DrawSurface`] that appends every call to an op log.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured ops, in call order.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Takes the captured ops, leaving the log empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        core::mem::take(&mut self.ops)
    }

    /// Number of captured ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing has been drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl DrawSurface for RecordingSurface {
    fn set_color(&mut self, color: Rgb) {
        self.ops.push(DrawOp::SetColor(color));
    }

    fn line(&mut self, line: Line) {
        self.ops.push(DrawOp::Line(line));
    }

    fn thick_line(&mut self, line: Line, width: f64) {
        self.ops.push(DrawOp::ThickLine(line, width));
    }

    fn fill_circle(&mut self, circle: Circle) {
        self.ops.push(DrawOp::FillCircle(circle));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::FillRect(rect));
    }

    fn sprite(&mut self, id: SpriteId, at: Point) {
        self.ops.push(DrawOp::Sprite(id, at));
    }
}

// ---------------------------------------------------------------------------
// CountingFlipDriver
// ---------------------------------------------------------------------------

/// A [`FlipDriver`] that only counts requests and completions.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountingFlipDriver {
    requested: u64,
    completed: u64,
}

impl CountingFlipDriver {
    /// Creates a driver with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requested: 0,
            completed: 0,
        }
    }

    /// Flips requested so far.
    #[must_use]
    pub const fn requested(&self) -> u64 {
        self.requested
    }

    /// Flips completed so far.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    /// Whether every requested flip has been awaited.
    #[must_use]
    pub const fn balanced(&self) -> bool {
        self.requested == self.completed
    }
}

impl FlipDriver for CountingFlipDriver {
    fn flip_async(&mut self) {
        self.requested += 1;
    }

    fn wait_for_flip(&mut self) {
        self.completed += 1;
    }
}

// ---------------------------------------------------------------------------
// SummarySink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that keeps per-frame summaries, region redraws, and
/// lifecycle events for later assertions.
#[derive(Clone, Debug, Default)]
pub struct SummarySink {
    summaries: Vec<FrameSummary>,
    redraws: Vec<RegionRedrawEvent>,
    lifecycles: Vec<LifecycleEvent>,
}

impl SummarySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-frame summaries, in frame order.
    #[must_use]
    pub fn summaries(&self) -> &[FrameSummary] {
        &self.summaries
    }

    /// Every region redraw observed.
    #[must_use]
    pub fn redraws(&self) -> &[RegionRedrawEvent] {
        &self.redraws
    }

    /// Every lifecycle event observed.
    #[must_use]
    pub fn lifecycles(&self) -> &[LifecycleEvent] {
        &self.lifecycles
    }

    /// Redraws recorded for the given frame.
    pub fn redraws_for(&self, frame_index: u64) -> impl Iterator<Item = &RegionRedrawEvent> {
        self.redraws
            .iter()
            .filter(move |e| e.frame_index == frame_index)
    }
}

impl TraceSink for SummarySink {
    fn on_region_redraw(&mut self, e: &RegionRedrawEvent) {
        self.redraws.push(*e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.lifecycles.push(*e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.summaries.push(*s);
    }
}

// ---------------------------------------------------------------------------
// RedrawStats
// ---------------------------------------------------------------------------

/// Rolling repaint metrics with a fixed-size per-frame history.
#[derive(Debug)]
pub struct RedrawStats<const N: usize> {
    drawn: [u8; N],
    cursor: usize,
    total_frames: u64,
    total_regions: u64,
    skipped_frames: u64,
}

impl<const N: usize> Default for RedrawStats<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RedrawStats<N> {
    /// Creates empty stats.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            drawn: [0; N],
            cursor: 0,
            total_frames: 0,
            total_regions: 0,
            skipped_frames: 0,
        }
    }

    /// Observes one frame's repainted-region count.
    pub fn observe(&mut self, regions_drawn: u8) {
        self.drawn[self.cursor % N] = regions_drawn;
        self.cursor = (self.cursor + 1) % N;
        self.total_frames = self.total_frames.saturating_add(1);
        self.total_regions = self.total_regions.saturating_add(u64::from(regions_drawn));
        if regions_drawn == 0 {
            self.skipped_frames = self.skipped_frames.saturating_add(1);
        }
    }

    /// Frames observed.
    #[must_use]
    pub const fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Frames that repainted nothing.
    #[must_use]
    pub const fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Mean regions repainted per frame.
    #[must_use]
    pub fn mean_regions_per_frame(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.total_regions as f64 / self.total_frames as f64
        }
    }

    /// Returns the ring-buffer history oldest→newest.
    #[must_use]
    pub fn history(&self) -> [u8; N] {
        let mut out = [0; N];
        let mut i = 0;
        while i < N {
            out[i] = self.drawn[(self.cursor + i) % N];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline of the history (one glyph per frame,
    /// blank = nothing repainted, denser = more regions).
    #[must_use]
    pub fn sparkline_ascii(&self) -> String {
        const LEVELS: &[u8] = b" .=#";
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let level = usize::from(self.drawn[(self.cursor + i) % N]).min(LEVELS.len() - 1);
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}
