// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! HSV color model and conversion to the display's RGB pens.
//!
//! Sky and ground colors are specified in HSV because the day/night cycle
//! modulates brightness and hue independently; the drawing surface only ever
//! sees the quantized [`Rgb`] result, which is also what the per-bank
//! last-rendered records compare (equal pens ⇒ no repaint).

/// An 8-bit RGB pen color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a pen color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A color in HSV space.
///
/// `h` is in turns (`0.0..1.0`, wrapping); `s` and `v` are in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsv {
    /// Hue, in turns.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Value (brightness).
    pub v: f64,
}

impl Hsv {
    /// Creates an HSV color.
    #[must_use]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Converts to an 8-bit RGB pen, wrapping hue and clamping `s`/`v`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "hue is wrapped into [0, 1) so the sector index fits"
    )]
    pub fn to_rgb(self) -> Rgb {
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        // Wrap hue into [0, 1) without std float intrinsics.
        let mut h = self.h - (self.h as i64) as f64;
        if h < 0.0 {
            h += 1.0;
        }

        let h6 = h * 6.0;
        let sector = (h6 as u32) % 6;
        let f = h6 - (h6 as u32) as f64;

        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "input is clamped to [0, 1] before scaling"
)]
fn channel(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_round_trip() {
        assert_eq!(Hsv::new(0.0, 1.0, 1.0).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(
            Hsv::new(1.0 / 3.0, 1.0, 1.0).to_rgb(),
            Rgb::new(0, 255, 0)
        );
        assert_eq!(
            Hsv::new(2.0 / 3.0, 1.0, 1.0).to_rgb(),
            Rgb::new(0, 0, 255)
        );
    }

    #[test]
    fn zero_saturation_is_gray() {
        let rgb = Hsv::new(0.37, 0.0, 0.5).to_rgb();
        assert_eq!(rgb.r, rgb.g, "gray channels must match");
        assert_eq!(rgb.g, rgb.b, "gray channels must match");
    }

    #[test]
    fn zero_value_is_black() {
        assert_eq!(Hsv::new(0.8, 1.0, 0.0).to_rgb(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn hue_wraps() {
        let a = Hsv::new(0.25, 0.6, 0.9).to_rgb();
        let b = Hsv::new(1.25, 0.6, 0.9).to_rgb();
        let c = Hsv::new(-0.75, 0.6, 0.9).to_rgb();
        assert_eq!(a, b, "hue is modular");
        assert_eq!(a, c, "negative hue wraps up");
    }

    #[test]
    fn out_of_range_inputs_clamp() {
        assert_eq!(Hsv::new(0.0, 2.0, 2.0).to_rgb(), Rgb::new(255, 0, 0));
    }
}
