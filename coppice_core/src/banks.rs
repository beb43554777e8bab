// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-bank dirty tracking for the three screen regions.
//!
//! The display alternates between two physical banks, so what is on screen
//! always lags the logical world by one frame *per bank*: content drawn this
//! frame lands in the bank shown next frame, while the other bank still
//! holds the frame before. A single "needs redraw" bit per region is
//! therefore not enough — a tree that grew must be repainted into **both**
//! banks before its flag can rest.
//!
//! [`understory_dirty`] supplies the mechanism: each [`Bank`] maps to a
//! [`Channel`], each [`Region`] is a key in a [`DirtySet`], and a content
//! mutation marks its region on both channels. A render pass consults and
//! then clears only the channel of the bank it drew into.
//!
//! Pending flags are half of the redraw decision; the other half is the
//! per-bank last-rendered value records kept in [`Banked`] storage by the
//! world, compared against freshly computed values each render pass.

use understory_dirty::{Channel, DirtySet};

/// One of the two alternating physical display banks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bank {
    /// The first bank.
    A,
    /// The second bank.
    B,
}

impl Bank {
    /// Returns the other bank.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// The dirty channel carrying this bank's pending flags.
    const fn channel(self) -> Channel {
        match self {
            Self::A => Channel::new(0),
            Self::B => Channel::new(1),
        }
    }
}

/// A logical screen region with independent redraw tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// Everything above the horizon: backdrop, sun, moon, cloud.
    Sky,
    /// The ground band at the bottom of the screen.
    Ground,
    /// The trees, overlaid on sky and ground.
    Forest,
}

impl Region {
    /// All regions, in back-to-front paint order.
    pub const ALL: [Self; 3] = [Self::Sky, Self::Ground, Self::Forest];
}

/// Pending-redraw flags per region, per bank.
#[derive(Clone, Debug, Default)]
pub struct RegionTracker {
    pending: DirtySet<Region>,
}

impl RegionTracker {
    /// Creates a tracker with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: DirtySet::new(),
        }
    }

    /// Marks a region stale in **both** banks.
    ///
    /// Every content mutation goes through here: the change must eventually
    /// be repainted into each alternating buffer, regardless of which bank
    /// is rendered next.
    pub fn invalidate(&mut self, region: Region) {
        self.pending.mark(region, Bank::A.channel());
        self.pending.mark(region, Bank::B.channel());
    }

    /// Marks every region stale in both banks (e.g. after a tree is
    /// removed, which changes what must be painted underneath it).
    pub fn invalidate_all(&mut self) {
        for region in Region::ALL {
            self.invalidate(region);
        }
    }

    /// Whether a region is flagged for redraw in the given bank.
    #[must_use]
    pub fn is_pending(&self, region: Region, bank: Bank) -> bool {
        self.pending.is_dirty(region, bank.channel())
    }

    /// Clears all flags for one bank, leaving the other bank's untouched.
    ///
    /// Called at the end of a render pass: every region of that bank was
    /// either repainted or proven unchanged.
    pub fn clear_bank(&mut self, bank: Bank) {
        self.pending.clear(bank.channel());
    }
}

/// A pair of values, one per bank.
///
/// Used for the "last rendered into this bank" records that back the
/// value-comparison half of the redraw decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Banked<T> {
    a: T,
    b: T,
}

impl<T> Banked<T> {
    /// Creates banked storage with the same initial value in both banks.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            a: value.clone(),
            b: value,
        }
    }

    /// Returns the value for a bank.
    pub fn get(&self, bank: Bank) -> &T {
        match bank {
            Bank::A => &self.a,
            Bank::B => &self.b,
        }
    }

    /// Returns the value for a bank, mutably.
    pub fn get_mut(&mut self, bank: Bank) -> &mut T {
        match bank {
            Bank::A => &mut self.a,
            Bank::B => &mut self.b,
        }
    }
}
