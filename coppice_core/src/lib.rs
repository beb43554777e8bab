// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World model and dirty-tracked frame loop for a procedural forest demo.
//!
//! `coppice_core` grows a small forest of trees under a day/night sky and
//! decides, frame by frame, which screen regions of which physical display
//! bank must be redrawn. It is `no_std` compatible (with `alloc`) and owns no
//! pixels: drawing and buffer flipping happen behind the traits in
//! [`surface`].
//!
//! # Architecture
//!
//! The crate is organized around a double-buffered frame loop that overlaps
//! logical updates with the in-flight buffer flip:
//!
//! ```text
//!   World::render(bank N) ──► FlipDriver::flip_async()
//!                                   │  (flip in flight)
//!   World::update() ◄───────────────┘  compute next state
//!                                   │
//!   FlipDriver::wait_for_flip() ◄───┘  sync to vsync, banks swap
//! ```
//!
//! **[`tree`]** — Arena-backed branch skeletons and the recursive
//! growth/aging automaton, under a fixed branch budget.
//!
//! **[`forest`]** — Fixed-capacity pool of concurrently alive trees with
//! the spawn/removal policy.
//!
//! **[`sky`]** — Cyclic time-of-day clock, sinusoidal sky color, sun/moon
//! ellipse positions, and the drifting cloud.
//!
//! **[`banks`]** — Per-region pending-redraw flags per physical bank (via
//! `understory_dirty`) plus per-bank last-rendered value records. This is
//! what lets [`World::render`](world::World::render) skip regions whose
//! bank-visible content cannot have changed.
//!
//! **[`world`]** — The orchestrator: [`update`](world::World::update)
//! advances the logical state by one tick, [`render`](world::World::render)
//! draws the stale regions of the target bank, and
//! [`run_frame`](world::run_frame) composes one full frame in the order
//! above.
//!
//! **[`surface`]** — The [`DrawSurface`](surface::DrawSurface) and
//! [`FlipDriver`](surface::FlipDriver) traits that display integrations
//! implement.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Randomness
//!
//! Growth, spawning, and cloud motion draw from an [`rand::Rng`] handle the
//! caller injects per call. Cross-run reproducibility is a non-goal (seed
//! from entropy in a real harness), but tests inject seeded generators.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables the `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod banks;
pub mod color;
pub mod config;
pub mod forest;
pub mod sky;
pub mod surface;
pub mod trace;
pub mod tree;
pub mod world;
