// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! orchestrator calls at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::banks::{Bank, Region};
use crate::forest::ForestChanges;
use crate::sky::CloudChange;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a region was repainted this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RedrawCause {
    /// The region's dirty flag was set for the target bank.
    Flagged,
    /// The region's computed appearance differs from what this bank last
    /// showed (e.g. the quantized sky frame moved).
    ValueChanged,
    /// A region painted underneath was repainted, so this one must be too.
    Backdrop,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of the render phase, before any region is examined.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Which bank this frame draws into.
    pub bank: Bank,
    /// Simulation time at the start of the frame.
    pub time: u64,
}

/// Emitted for every region that is repainted.
#[derive(Clone, Copy, Debug)]
pub struct RegionRedrawEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which bank was drawn into.
    pub bank: Bank,
    /// Which region was repainted.
    pub region: Region,
    /// Why it was repainted.
    pub cause: RedrawCause,
}

/// Emitted when the render phase hands the back bank to the flip driver.
#[derive(Clone, Copy, Debug)]
pub struct FlipEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The bank being sent to the display.
    pub bank: Bank,
}

/// Emitted on lifecycle ticks that changed the forest.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Simulation time of the lifecycle tick.
    pub time: u64,
    /// Whether a tree sprouted.
    pub spawned: bool,
    /// Trees that grew this tick.
    pub grew: u32,
    /// Trees reaped this tick.
    pub died: u32,
    /// Leaf splits across the forest.
    pub splits: u32,
    /// Leaf splits skipped for lack of branch budget.
    pub skipped: u32,
}

impl LifecycleEvent {
    /// Builds the event from a forest tick's changes.
    #[must_use]
    pub const fn new(frame_index: u64, time: u64, changes: &ForestChanges) -> Self {
        Self {
            frame_index,
            time,
            spawned: changes.spawned,
            grew: changes.grew,
            died: changes.died,
            splits: changes.growth.splits,
            skipped: changes.growth.skipped,
        }
    }
}

/// Emitted when a cloud spawns or drifts off-screen.
#[derive(Clone, Copy, Debug)]
pub struct CloudEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// What happened to the cloud.
    pub change: CloudChange,
}

/// Per-frame summary, emitted after the flip completes.
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Which bank was drawn into.
    pub bank: Bank,
    /// Simulation time at the end of the frame.
    pub time: u64,
    /// Regions repainted this frame (0..=3).
    pub regions_drawn: u8,
    /// Whether this frame ran a lifecycle tick.
    pub lifecycle: bool,
    /// Live trees after the update phase.
    pub trees: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of the render phase.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called for every region that gets repainted.
    fn on_region_redraw(&mut self, e: &RegionRedrawEvent) {
        _ = e;
    }

    /// Called when the rendered bank is handed to the flip driver.
    fn on_flip(&mut self, e: &FlipEvent) {
        _ = e;
    }

    /// Called on lifecycle ticks that changed the forest.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called when the cloud spawns or retires.
    fn on_cloud(&mut self, e: &CloudEvent) {
        _ = e;
    }

    /// Called with a per-frame summary after the flip completes.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RegionRedrawEvent`].
    #[inline]
    pub fn region_redraw(&mut self, e: &RegionRedrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_region_redraw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FlipEvent`].
    #[inline]
    pub fn flip(&mut self, e: &FlipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_flip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CloudEvent`].
    #[inline]
    pub fn cloud(&mut self, e: &CloudEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cloud(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_redraw() -> RegionRedrawEvent {
        RegionRedrawEvent {
            frame_index: 42,
            bank: Bank::A,
            region: Region::Sky,
            cause: RedrawCause::Flagged,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_region_redraw(&sample_redraw());
        sink.on_frame_summary(&FrameSummary {
            frame_index: 0,
            bank: Bank::B,
            time: 0,
            regions_drawn: 0,
            lifecycle: false,
            trees: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.region_redraw(&sample_redraw());
        tracer.flip(&FlipEvent {
            frame_index: 1,
            bank: Bank::A,
        });
    }

    #[test]
    fn lifecycle_event_copies_forest_changes() {
        let changes = ForestChanges {
            spawned: true,
            grew: 2,
            died: 1,
            growth: crate::tree::GrowthReport {
                splits: 5,
                skipped: 1,
            },
        };
        let e = LifecycleEvent::new(9, 180, &changes);
        assert!(e.spawned);
        assert_eq!(e.grew, 2);
        assert_eq!(e.died, 1);
        assert_eq!(e.splits, 5);
        assert_eq!(e.skipped, 1);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            regions: Vec<Region>,
        }
        impl TraceSink for RecordingSink {
            fn on_region_redraw(&mut self, e: &RegionRedrawEvent) {
                self.regions.push(e.region);
            }
        }

        let mut sink = RecordingSink {
            regions: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.region_redraw(&sample_redraw());
        drop(tracer);
        assert_eq!(sink.regions, &[Region::Sky]);
    }
}
