// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display contract for platform integrations.
//!
//! Coppice owns the world model and the decision of *what* to redraw; the
//! pixels live elsewhere. A display integration provides two pieces:
//!
//! - **Drawing surface** — Implements [`DrawSurface`] over whatever raster
//!   library the platform offers (a Pico-style graphics driver, a
//!   framebuffer, a test recorder). Draws always target the bank the
//!   hardware currently exposes for drawing; bank selection is implicit in
//!   the flip cycle, and the core mirrors it with its own bank cursor.
//!
//! - **Flip driver** — Implements [`FlipDriver`]. `flip_async` hands the
//!   just-drawn bank to the display hardware without blocking, so the
//!   world's `update` can run while the flip is in flight; `wait_for_flip`
//!   blocks until the handoff completes, keeping the loop synced to vsync.
//!
//! # Frame loop pseudocode
//!
//! A display integration wires the pieces together like this:
//!
//! ```rust,ignore
//! loop {
//!     world.render(&mut surface, &mut tracer);
//!     driver.flip_async();
//!     world.update(&mut rng, &mut tracer);
//!     driver.wait_for_flip();
//! }
//! ```
//!
//! which is exactly what [`run_frame`](crate::world::run_frame) does.
//!
//! Sprites are pre-defined assets loaded by the integration; the core only
//! places them by [`SpriteId`].

use core::fmt;

use kurbo::{Circle, Line, Point, Rect};

use crate::color::Rgb;

/// An opaque reference to a pre-loaded sprite asset.
///
/// Sprites are created and managed by the display integration; the core
/// requests placement only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u16);

impl fmt::Debug for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpriteId({})", self.0)
    }
}

/// Issues draw commands to the bank currently targeted for drawing.
///
/// All shapes are in screen pixels, origin top-left. Implementations are
/// free to clip; the core keeps coordinates in range but sun and moon
/// circles may straddle the screen edge while rising or setting.
pub trait DrawSurface {
    /// Selects the pen color for subsequent draws.
    fn set_color(&mut self, color: Rgb);

    /// Draws a one-pixel line.
    fn line(&mut self, line: Line);

    /// Draws a line with the given thickness.
    fn thick_line(&mut self, line: Line, width: f64);

    /// Fills a circle.
    fn fill_circle(&mut self, circle: Circle);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect);

    /// Places a pre-defined sprite with its top-left corner at `at`.
    fn sprite(&mut self, sprite: SpriteId, at: Point);
}

/// Hands finished banks to the display hardware.
pub trait FlipDriver {
    /// Requests an asynchronous buffer flip of the just-drawn bank.
    ///
    /// Must not block; the caller continues with logical updates while the
    /// flip is in flight.
    fn flip_async(&mut self);

    /// Blocks until the previously requested flip completes.
    fn wait_for_flip(&mut self);
}
