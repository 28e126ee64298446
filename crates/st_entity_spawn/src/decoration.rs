//! Surface decoration scattering.
//!
//! Produces placement requests only; instantiating the decoration entities is
//! left to the receiver of the requests.

use bevy::math::Vec2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use st_core::{GridTransform, TileCoord};
use st_noise::ColumnProfile;
use st_world::DecorationRule;

/// RNG stream for decoration draws; stream 0 belongs to ore placement.
const DECORATION_STREAM: u64 = 1;

/// Which placements a rule's `min_spacing` is measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpacingCursor {
    /// Each rule tracks its own last placed column.
    #[default]
    PerRule,
    /// One last placed column shared by every rule, so a placement by one
    /// rule can suppress the others.
    Shared,
}

/// A decoration the caller should instantiate.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorationPlacement {
    /// Index into the biome's decoration rules.
    pub rule: usize,
    pub column: i32,
    /// Bottom-center of the cell directly above the surface tile.
    pub position: Vec2,
}

/// Scatters decorations over a column profile.
pub struct DecorationPlacer<'a> {
    profile: &'a ColumnProfile,
    rules: &'a [DecorationRule],
    transform: GridTransform,
    spacing: SpacingCursor,
    seed: u32,
}

impl<'a> DecorationPlacer<'a> {
    pub fn new(profile: &'a ColumnProfile, rules: &'a [DecorationRule], seed: u32) -> Self {
        Self {
            profile,
            rules,
            transform: GridTransform::default(),
            spacing: SpacingCursor::default(),
            seed,
        }
    }

    pub fn with_transform(mut self, transform: GridTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_spacing(mut self, spacing: SpacingCursor) -> Self {
        self.spacing = spacing;
        self
    }

    /// Lazy placements, left to right, rules in order within a column.
    pub fn placements(&self) -> DecorationPlacements<'a> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed as u64);
        rng.set_stream(DECORATION_STREAM);

        let cursors = match self.spacing {
            SpacingCursor::PerRule => self.rules.len(),
            SpacingCursor::Shared => 1,
        };

        DecorationPlacements {
            profile: self.profile,
            rules: self.rules,
            transform: self.transform,
            spacing: self.spacing,
            rng,
            column: 0,
            rule: 0,
            last_placed: vec![None; cursors],
        }
    }
}

/// Iterator returned by [`DecorationPlacer::placements`].
pub struct DecorationPlacements<'a> {
    profile: &'a ColumnProfile,
    rules: &'a [DecorationRule],
    transform: GridTransform,
    spacing: SpacingCursor,
    rng: ChaCha8Rng,
    column: i32,
    rule: usize,
    last_placed: Vec<Option<i32>>,
}

impl DecorationPlacements<'_> {
    fn cursor(&self, rule: usize) -> usize {
        match self.spacing {
            SpacingCursor::PerRule => rule,
            SpacingCursor::Shared => 0,
        }
    }

    fn try_place(&mut self, x: i32, index: usize) -> Option<DecorationPlacement> {
        let rule = &self.rules[index];
        let cursor = self.cursor(index);

        if let Some(last) = self.last_placed[cursor] {
            if x - last < rule.min_spacing {
                return None;
            }
        }

        let surface = self.profile.surface_height(x);
        if !rule.accepts_height(surface - self.profile.base_height()) {
            return None;
        }

        let roll: f32 = self.rng.gen();
        // A zero rule never fires, even on a draw of exactly 0.0.
        if rule.spawn_probability <= 0.0 || roll > rule.spawn_probability {
            return None;
        }

        self.last_placed[cursor] = Some(x);
        let base = self.transform.cell_to_world(TileCoord::new(x, surface + 1));
        Some(DecorationPlacement {
            rule: index,
            column: x,
            position: base + Vec2::new(self.transform.cell_size * 0.5, 0.0),
        })
    }
}

impl Iterator for DecorationPlacements<'_> {
    type Item = DecorationPlacement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rules.is_empty() {
            return None;
        }

        while (self.column as usize) < self.profile.width() {
            if self.rule >= self.rules.len() {
                self.rule = 0;
                self.column += 1;
                continue;
            }

            let (x, index) = (self.column, self.rule);
            self.rule += 1;
            if let Some(placement) = self.try_place(x, index) {
                return Some(placement);
            }
        }

        None
    }
}
