use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Physical properties of a tile type.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TileFlags: u8 {
        const SOLID = 0b0000_0001;
        const LIQUID = 0b0000_0010;
        const ORE = 0b0000_0100;
    }
}

/// Compact tile type identifier, an index into a [`TileRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u16);

/// Authored description of one tile type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    /// Unique name that biome definitions reference.
    pub name: String,
    /// Hits needed to break a pristine tile.
    #[serde(default = "default_max_health")]
    pub max_health: u32,
    /// Appearance keys, one per damage tier. Tier 0 is the least damaged.
    /// An empty list declares a single tier.
    #[serde(default)]
    pub damage_tiers: Vec<String>,
    #[serde(default)]
    pub flags: TileFlags,
}

fn default_max_health() -> u32 {
    1
}

impl TileDef {
    /// A generic tile: one hit, one tier.
    pub fn new(name: impl Into<String>, flags: TileFlags) -> Self {
        Self {
            name: name.into(),
            max_health: 1,
            damage_tiers: Vec::new(),
            flags,
        }
    }

    /// A tile that shows one appearance per damage tier and breaks after
    /// `max_health` hits.
    pub fn tiered(
        name: impl Into<String>,
        flags: TileFlags,
        max_health: u32,
        damage_tiers: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            max_health: max_health.max(1),
            damage_tiers,
            flags,
        }
    }

    /// Number of visual damage tiers, never less than one.
    pub fn tier_count(&self) -> u32 {
        (self.damage_tiers.len() as u32).max(1)
    }
}

/// Lookup table from tile names to ids and definitions.
#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    defs: Vec<TileDef>,
    by_name: HashMap<String, TileId>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of definitions. Later duplicates
    /// replace earlier ones under the same id.
    pub fn from_defs(defs: impl IntoIterator<Item = TileDef>) -> Self {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def);
        }
        registry
    }

    /// Register a tile type, returning its id. Re-registering a name
    /// replaces the definition and keeps the id.
    pub fn register(&mut self, def: TileDef) -> TileId {
        if let Some(&id) = self.by_name.get(&def.name) {
            self.defs[id.0 as usize] = def;
            return id;
        }
        let id = TileId(self.defs.len() as u16);
        self.by_name.insert(def.name.clone(), id);
        self.defs.push(def);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.defs.get(id.0 as usize)
    }

    /// Declared max health, 1 for unknown ids.
    pub fn max_health(&self, id: TileId) -> u32 {
        self.get(id).map_or(1, |def| def.max_health.max(1))
    }

    /// Declared tier count, 1 for unknown ids.
    pub fn tier_count(&self, id: TileId) -> u32 {
        self.get(id).map_or(1, TileDef::tier_count)
    }

    pub fn flags(&self, id: TileId) -> TileFlags {
        self.get(id).map_or(TileFlags::empty(), |def| def.flags)
    }

    /// Appearance key for a damage tier, if the tile declares one.
    pub fn appearance(&self, id: TileId, tier: u32) -> Option<&str> {
        self.get(id)?
            .damage_tiers
            .get(tier as usize)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, &TileDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (TileId(i as u16), def))
    }

    /// The generic tile set used when no configuration file is loaded.
    pub fn builtin() -> Self {
        let tiers = |name: &str, count: usize| -> Vec<String> {
            (0..count).map(|i| format!("{name}_cracked_{i}")).collect()
        };

        Self::from_defs([
            TileDef::new("grass", TileFlags::SOLID),
            TileDef::tiered("dirt", TileFlags::SOLID, 2, tiers("dirt", 2)),
            TileDef::tiered("stone", TileFlags::SOLID, 3, tiers("stone", 3)),
            TileDef::tiered(
                "coal_ore",
                TileFlags::SOLID | TileFlags::ORE,
                3,
                tiers("coal_ore", 3),
            ),
            TileDef::tiered(
                "iron_ore",
                TileFlags::SOLID | TileFlags::ORE,
                4,
                tiers("iron_ore", 4),
            ),
            TileDef::new("water", TileFlags::LIQUID),
        ])
    }
}
