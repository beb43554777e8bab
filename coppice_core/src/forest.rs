// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A fixed-capacity pool of tree slots with spawn, aging, and reap phases.

use rand::Rng;

use crate::config::{FOREST_CAPACITY, WorldConfig};
use crate::surface::DrawSurface;
use crate::tree::{GrowthReport, Tree, TreeTick};

/// What one forest lifecycle tick changed. Any nonzero field means the
/// forest must be repainted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForestChanges {
    /// A new tree sprouted this tick.
    pub spawned: bool,
    /// Trees whose growth pass split at least one leaf.
    pub grew: u32,
    /// Trees reaped after passing the death age.
    pub died: u32,
    /// Combined growth report across all surviving trees.
    pub growth: GrowthReport,
}

impl ForestChanges {
    /// Whether anything visible changed.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.spawned || self.grew > 0 || self.died > 0
    }
}

/// [`FOREST_CAPACITY`] tree slots, each empty or owning a live tree.
#[derive(Clone, Debug)]
pub struct Forest {
    slots: [Option<Tree>; FOREST_CAPACITY],
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    /// Creates a forest with every slot empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; FOREST_CAPACITY],
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether every slot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Live trees, in slot order.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.slots.iter().flatten()
    }

    /// One lifecycle tick: maybe spawn, age every tree, reap the dead.
    ///
    /// The spawn roll happens only when a slot is free; a full forest
    /// spends no randomness on it. A sprout lands in the first free slot
    /// and ages along with everything else this same tick.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, cfg: &WorldConfig) -> ForestChanges {
        let mut changes = ForestChanges::default();

        if cfg.forest.spawn_odds > 0
            && self.slots.iter().any(Option::is_none)
            && rng.gen_ratio(1, cfg.forest.spawn_odds)
        {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
                *slot = Some(Tree::sprout(rng, cfg));
                changes.spawned = true;
            }
        }

        for slot in &mut self.slots {
            let Some(tree) = slot else { continue };
            match tree.tick(rng, cfg) {
                TreeTick::Aged => {}
                TreeTick::Grew(report) => {
                    if report.splits > 0 {
                        changes.grew += 1;
                    }
                    changes.growth.splits += report.splits;
                    changes.growth.skipped += report.skipped;
                }
                TreeTick::Died => {
                    *slot = None;
                    changes.died += 1;
                }
            }
        }

        changes
    }

    /// Draws every tree, in slot order.
    pub fn render(&self, surface: &mut dyn DrawSurface, phase: f64) {
        for tree in self.trees() {
            tree.render(surface, phase);
        }
    }
}
