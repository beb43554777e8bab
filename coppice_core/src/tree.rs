// Copyright 2026 the Coppice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed branch skeletons and the growth/aging automaton.
//!
//! A tree's branches live in a contiguous per-tree arena addressed by
//! [`BranchId`] handles, with [`INVALID`] as the empty-slot sentinel. The
//! arena has a fixed branch budget; it is the system's memory budget, and
//! growth steps that would overflow it fail with
//! [`GrowthError::ResourceExhausted`] and are retried on the next eligible
//! tick. Branches are never freed individually — dropping the tree releases
//! the whole arena — so handles carry no generation counter.
//!
//! # Growth policy
//!
//! On an eligible lifecycle tick every *leaf* (a branch with zero children)
//! splits into exactly **two** children, displaced sideways and upward from
//! the parent's end-point by amounts that shrink with depth, which tapers
//! the crown. A branch that has children is never regrown; the walk only
//! recurses through it. Each branch has [`BRANCH_SLOTS`] (three) child
//! slots, but the policy deliberately fills only the first two — the third
//! slot is a kept extension point, mirroring an intentional asymmetry in
//! the original design, and must stay empty unless the policy itself
//! changes.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Circle, Line, Point};
use rand::Rng;

use crate::color::Rgb;
use crate::config::{BRANCH_SLOTS, WorldConfig};
use crate::surface::DrawSurface;

/// Sentinel for an empty child slot.
pub const INVALID: u32 = u32::MAX;

/// Bark pen color.
pub const BARK_COLOR: Rgb = Rgb::new(92, 64, 51);

/// A handle to a branch in a tree's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(pub(crate) u32);

impl BranchId {
    /// Returns the raw arena index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BranchId({})", self.0)
    }
}

/// Growth failure taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthError {
    /// The branch arena cannot fit another pair of children. The affected
    /// leaf stays a leaf for this tick and is retried on the next eligible
    /// growth tick.
    ResourceExhausted,
}

impl fmt::Display for GrowthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceExhausted => write!(f, "branch arena budget exhausted"),
        }
    }
}

impl core::error::Error for GrowthError {}

/// One branch: an end-point and up to [`BRANCH_SLOTS`] children.
#[derive(Clone, Copy, Debug)]
struct BranchNode {
    end: Point,
    children: [u32; BRANCH_SLOTS],
}

impl BranchNode {
    const fn leaf(end: Point) -> Self {
        Self {
            end,
            children: [INVALID; BRANCH_SLOTS],
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(|&c| c == INVALID)
    }
}

/// Contiguous branch storage with a fixed budget.
#[derive(Clone, Debug)]
struct BranchArena {
    nodes: Vec<BranchNode>,
    budget: usize,
}

impl BranchArena {
    /// Creates an arena holding only the root branch.
    fn with_root(end: Point, budget: usize) -> Self {
        let mut nodes = Vec::with_capacity(budget.min(16));
        nodes.push(BranchNode::leaf(end));
        Self { nodes, budget }
    }

    /// Whether a pair of children still fits the budget.
    fn can_split(&self) -> bool {
        self.nodes.len() + 2 <= self.budget
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the budget keeps arena indices far below u32::MAX"
    )]
    fn alloc(&mut self, end: Point) -> Result<u32, GrowthError> {
        if self.nodes.len() >= self.budget {
            return Err(GrowthError::ResourceExhausted);
        }
        let idx = self.nodes.len() as u32;
        self.nodes.push(BranchNode::leaf(end));
        Ok(idx)
    }
}

/// Which side a new child leans toward.
#[derive(Clone, Copy, Debug)]
enum ChildSide {
    Left,
    Right,
}

/// What a growth pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthReport {
    /// Leaves that gained a pair of children.
    pub splits: u32,
    /// Leaves skipped because the arena budget was exhausted.
    pub skipped: u32,
}

/// Outcome of one lifecycle tick for a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeTick {
    /// Aged without growing.
    Aged,
    /// Aged and ran a growth pass.
    Grew(GrowthReport),
    /// Age exceeded the death threshold; the owner must release the tree.
    Died,
}

/// One tree: origin, branch arena, recorded height, and age.
#[derive(Clone, Debug)]
pub struct Tree {
    origin: Point,
    arena: BranchArena,
    root: BranchId,
    height: u32,
    age: u32,
}

impl Tree {
    /// Sprouts a new tree: random origin inside the ground band, a single
    /// near-vertical trunk, `age = 1`.
    pub fn sprout<R: Rng>(rng: &mut R, cfg: &WorldConfig) -> Self {
        let origin = Point::new(
            rng.gen_range(1.0..cfg.width - 1.0),
            cfg.height - cfg.ground_height / 2.0 - rng.gen_range(0.0..cfg.ground_height),
        );
        let trunk_end = Point::new(
            origin.x,
            origin.y - cfg.height / 6.0 - rng.gen_range(0.0..cfg.height / 8.0),
        );
        Self {
            origin,
            arena: BranchArena::with_root(trunk_end, cfg.growth.branch_budget),
            root: BranchId(0),
            height: 1,
            age: 1,
        }
    }

    /// Ground contact point.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Recorded height: the maximum branch depth, root = 1.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Age in lifecycle ticks.
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Number of allocated branches.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.arena.nodes.len()
    }

    /// Walks the arena and measures the actual maximum depth (diagnostics;
    /// [`height`](Self::height) must always agree with this).
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        let mut deepest = 0;
        let mut stack = Vec::new();
        stack.push((self.root.0, 1_u32));
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for &child in &self.arena.nodes[idx as usize].children {
                if child != INVALID {
                    stack.push((child, depth + 1));
                }
            }
        }
        deepest
    }

    /// Advances one lifecycle tick: age, then (on eligible ticks) grow,
    /// then report death once the age passes the threshold.
    pub fn tick<R: Rng>(&mut self, rng: &mut R, cfg: &WorldConfig) -> TreeTick {
        self.age += 1;
        if self.age > cfg.growth.death_age {
            return TreeTick::Died;
        }
        if self.age < cfg.growth.cutoff && self.age % cfg.growth.interval == 0 {
            TreeTick::Grew(self.grow(rng, cfg))
        } else {
            TreeTick::Aged
        }
    }

    /// Growth pass: split every leaf into two children, skipping leaves the
    /// budget cannot fit, and keep `height` equal to the true max depth.
    fn grow<R: Rng>(&mut self, rng: &mut R, cfg: &WorldConfig) -> GrowthReport {
        // Collect leaves first; splitting mutates the arena mid-walk.
        let mut leaves = Vec::new();
        let mut stack = Vec::new();
        stack.push((self.root.0, 1_u32));
        while let Some((idx, depth)) = stack.pop() {
            if self.arena.nodes[idx as usize].is_leaf() {
                leaves.push((idx, depth));
            } else {
                for &child in &self.arena.nodes[idx as usize].children {
                    if child != INVALID {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }

        let mut report = GrowthReport::default();
        for (idx, depth) in leaves {
            match self.split_leaf(idx, depth, rng, cfg) {
                Ok(()) => {
                    report.splits += 1;
                    self.height = self.height.max(depth + 1);
                }
                Err(GrowthError::ResourceExhausted) => report.skipped += 1,
            }
        }
        report
    }

    fn split_leaf<R: Rng>(
        &mut self,
        idx: u32,
        depth: u32,
        rng: &mut R,
        cfg: &WorldConfig,
    ) -> Result<(), GrowthError> {
        // Allocate the pair atomically: a half-split leaf would otherwise
        // count as branched and never be retried.
        if !self.arena.can_split() {
            return Err(GrowthError::ResourceExhausted);
        }
        let parent_end = self.arena.nodes[idx as usize].end;
        let left = self
            .arena
            .alloc(child_end(rng, parent_end, depth, ChildSide::Left, cfg))?;
        let right = self
            .arena
            .alloc(child_end(rng, parent_end, depth, ChildSide::Right, cfg))?;
        let node = &mut self.arena.nodes[idx as usize];
        node.children[0] = left;
        node.children[1] = right;
        // Slot 2 stays empty: the growth policy is a two-way split.
        Ok(())
    }

    /// Draws the tree: bark lines thickened toward the trunk, leaf clusters
    /// from depth 2 up, with a midday green highlight driven by `phase`.
    ///
    /// Pure read; never mutates the tree.
    pub fn render(&self, surface: &mut dyn DrawSurface, phase: f64) {
        self.render_branch(surface, self.root.0, self.origin, 1, phase);
    }

    fn render_branch(
        &self,
        surface: &mut dyn DrawSurface,
        idx: u32,
        from: Point,
        depth: u32,
        phase: f64,
    ) {
        let node = &self.arena.nodes[idx as usize];
        let seg = Line::new(from, node.end);

        surface.set_color(BARK_COLOR);
        if self.height < 2 || depth + 1 > self.height {
            surface.line(seg);
        } else {
            surface.thick_line(seg, f64::from((self.height - depth) * 2));
        }

        if depth >= 2 {
            surface.set_color(leaf_color(depth, phase));
            surface.fill_circle(Circle::new(node.end, leaf_radius(depth)));
        }

        for &child in &node.children {
            if child != INVALID {
                self.render_branch(surface, child, node.end, depth + 1, phase);
            }
        }
    }
}

/// End-point for a new child: sideways displacement and upward lift both
/// shrink with depth, shortening and tightening branches up the tree.
fn child_end<R: Rng>(
    rng: &mut R,
    parent: Point,
    depth: u32,
    side: ChildSide,
    cfg: &WorldConfig,
) -> Point {
    let d = f64::from(depth);
    let jitter = rng.gen_range(0.0..(60.0 / d).max(1.0));
    let dx = match side {
        ChildSide::Left => jitter - 60.0 / d,
        ChildSide::Right => jitter + 30.0 / d,
    };
    let lift = cfg.height / 16.0 / d + rng.gen_range(0.0..cfg.height / 4.0 / d);
    Point::new(parent.x + dx, parent.y - lift)
}

/// Quantized shared term of the leaf tint at a phase.
///
/// Every leaf's green channel carries the same `20 * sin(phase)` daylight
/// term on top of a per-depth constant, so two phases with an equal rounded
/// term tint the whole canopy identically to within one green level. This
/// is the value record the redraw tracker compares for the forest region.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the sine term is bounded to [-20, 20]"
)]
pub fn leaf_tint(phase: f64) -> i8 {
    libm::round(libm::sin(phase) * 20.0) as i8
}

/// Leaf cluster color: green channel brightens with depth and peaks at
/// midday.
#[expect(
    clippy::cast_possible_truncation,
    reason = "green channel is clamped to [0, 255] before narrowing"
)]
fn leaf_color(depth: u32, phase: f64) -> Rgb {
    let g = 95.0 + f64::from(depth) * 3.0 + libm::sin(phase) * 20.0;
    Rgb::new(68, g.clamp(0.0, 255.0) as u8, 21)
}

/// Leaf cluster radius shrinks with depth.
fn leaf_radius(depth: u32) -> f64 {
    (20.0 - f64::from(depth) * 3.0).max(2.0)
}
