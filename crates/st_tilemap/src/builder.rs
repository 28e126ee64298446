//! Strata fill: surface, middle and deep layers per column, ore seams in the
//! deep layer, then liquid pooled into the remaining gaps.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use st_core::{TileCoord, TileId, TileRegistry};
use st_noise::{ColumnProfile, HeightmapGenerator};
use st_world::{BiomeDefinition, BiomeError};
use thiserror::Error;

use crate::grid::{GridBounds, TileGrid};

/// Widest world a single pass will build.
pub const MAX_WORLD_WIDTH: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error(transparent)]
    InvalidBiome(#[from] BiomeError),
    #[error("biome '{biome}' references unknown {role} tile '{name}'")]
    UnknownTile {
        biome: String,
        role: &'static str,
        name: String,
    },
    #[error("world width {0} is outside the supported range")]
    InvalidWorldWidth(usize),
}

/// Biome tile references resolved against a registry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStrata {
    pub surface: TileId,
    pub middle: TileId,
    pub deep: TileId,
    /// Ore tiles with their weights, in table order.
    pub ores: Vec<(TileId, f32)>,
    /// Liquid tile and the highest row it fills.
    pub liquid: Option<(TileId, i32)>,
}

impl ResolvedStrata {
    pub fn resolve(biome: &BiomeDefinition, tiles: &TileRegistry) -> Result<Self, BuildError> {
        let lookup = |role: &'static str, name: &str| {
            tiles.id_of(name).ok_or_else(|| BuildError::UnknownTile {
                biome: biome.name.clone(),
                role,
                name: name.to_string(),
            })
        };

        let ores = biome
            .special
            .ores
            .iter()
            .map(|ore| Ok((lookup("ore", &ore.tile)?, ore.weight)))
            .collect::<Result<Vec<_>, BuildError>>()?;

        let liquid = match &biome.special.liquid {
            Some(liquid) => Some((lookup("liquid", &liquid.tile)?, liquid.level)),
            None => None,
        };

        Ok(Self {
            surface: lookup("surface", &biome.strata.surface)?,
            middle: lookup("middle", &biome.strata.middle)?,
            deep: lookup("deep", &biome.strata.deep)?,
            ores,
            liquid,
        })
    }

    /// Cumulative-weight ore pick for a draw `r` in `[0, 1)`.
    pub fn pick_ore(&self, r: f32) -> Option<TileId> {
        let mut cumulative = 0.0;
        for &(tile, weight) in &self.ores {
            cumulative += weight;
            if cumulative >= r {
                return Some(tile);
            }
        }
        None
    }
}

/// Output of one full generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedTerrain {
    pub grid: TileGrid,
    pub profile: ColumnProfile,
}

/// Fills a [`TileGrid`] from a biome and a seed.
pub struct TerrainGridBuilder<'a> {
    tiles: &'a TileRegistry,
}

impl<'a> TerrainGridBuilder<'a> {
    pub fn new(tiles: &'a TileRegistry) -> Self {
        Self { tiles }
    }

    /// Validate and resolve everything a pass needs, without touching a grid.
    pub fn prepare(
        &self,
        biome: &BiomeDefinition,
        world_width: usize,
    ) -> Result<ResolvedStrata, BuildError> {
        if world_width == 0 || world_width > MAX_WORLD_WIDTH {
            return Err(BuildError::InvalidWorldWidth(world_width));
        }
        biome.validate()?;
        ResolvedStrata::resolve(biome, self.tiles)
    }

    /// Build a fresh grid.
    pub fn build(
        &self,
        biome: &BiomeDefinition,
        world_width: usize,
        seed: u32,
    ) -> Result<GeneratedTerrain, BuildError> {
        let mut grid = TileGrid::default();
        let profile = self.regenerate(&mut grid, biome, world_width, seed)?;
        Ok(GeneratedTerrain { grid, profile })
    }

    /// Clear `grid` and rebuild it in place. On error the grid is untouched.
    pub fn regenerate(
        &self,
        grid: &mut TileGrid,
        biome: &BiomeDefinition,
        world_width: usize,
        seed: u32,
    ) -> Result<ColumnProfile, BuildError> {
        let strata = self.prepare(biome, world_width)?;
        let gen = &biome.generation;
        let y_bottom = gen.y_bottom();

        let profile = HeightmapGenerator::new(seed, gen.heightmap()).generate(world_width);

        let width = world_width as i32;
        // Headroom above the highest surface for placed tiles.
        let y_high = (gen.base_height + gen.height_variation + gen.max_depth)
            .max(strata.liquid.map_or(i32::MIN, |(_, level)| level));
        // The surface can dip below the deep floor when variation exceeds depth.
        let y_low = y_bottom.min(gen.base_height - gen.height_variation);
        let bounds = GridBounds::oversized(width, gen.max_depth, y_low, y_high);

        // Clears the previous grid's cells too, whatever their bounds were.
        grid.reset(bounds);

        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        for x in 0..width {
            fill_column(grid, &strata, &profile, x, y_bottom, &mut rng);
        }

        if let Some((liquid, level)) = strata.liquid {
            if level >= y_bottom {
                for x in 0..width {
                    for y in y_bottom..=level {
                        grid.set_if_empty(TileCoord::new(x, y), liquid);
                    }
                }
            }
        }

        Ok(profile)
    }
}

fn fill_column(
    grid: &mut TileGrid,
    strata: &ResolvedStrata,
    profile: &ColumnProfile,
    x: i32,
    y_bottom: i32,
    rng: &mut ChaCha8Rng,
) {
    let y_max = profile.surface_height(x);
    let thickness = profile.middle_thickness(x);

    grid.set(TileCoord::new(x, y_max), strata.surface);

    let middle_floor = (y_max - thickness).max(y_bottom);
    for y in (middle_floor..y_max).rev() {
        grid.set(TileCoord::new(x, y), strata.middle);
    }

    for y in (y_bottom..middle_floor).rev() {
        let tile = if strata.ores.is_empty() {
            strata.deep
        } else {
            strata.pick_ore(rng.gen::<f32>()).unwrap_or(strata.deep)
        };
        grid.set(TileCoord::new(x, y), tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_core::{TileDef, TileFlags};
    use st_world::{LiquidConfig, OreVein, StrataTiles};

    fn registry() -> TileRegistry {
        TileRegistry::from_defs([
            TileDef::new("S", TileFlags::SOLID),
            TileDef::new("M", TileFlags::SOLID),
            TileDef::new("D", TileFlags::SOLID),
            TileDef::new("O", TileFlags::SOLID | TileFlags::ORE),
            TileDef::new("L", TileFlags::LIQUID),
        ])
    }

    fn scenario_biome() -> BiomeDefinition {
        let mut biome = BiomeDefinition::meadow();
        biome.strata = StrataTiles::new("S", "M", "D");
        biome.generation.base_height = 0;
        biome.generation.max_depth = 5;
        biome.generation.height_variation = 3;
        biome.special.ores.clear();
        biome.special.liquid = None;
        biome
    }

    #[test]
    fn scenario_a_strata_layout() {
        let tiles = registry();
        let biome = scenario_biome();
        let terrain = TerrainGridBuilder::new(&tiles).build(&biome, 10, 42).unwrap();
        let (s, m, d) = (
            tiles.id_of("S").unwrap(),
            tiles.id_of("M").unwrap(),
            tiles.id_of("D").unwrap(),
        );

        for x in 0..10 {
            let y_max = terrain.profile.surface_height(x);
            let thickness = terrain.profile.middle_thickness(x);
            let middle_floor = (y_max - thickness).max(-5);

            assert_eq!(terrain.grid.get(TileCoord::new(x, y_max)), Some(s));
            assert_eq!(terrain.grid.get(TileCoord::new(x, y_max + 1)), None);
            for y in middle_floor..y_max {
                assert_eq!(terrain.grid.get(TileCoord::new(x, y)), Some(m), "x={} y={}", x, y);
            }
            for y in -5..middle_floor {
                assert_eq!(terrain.grid.get(TileCoord::new(x, y)), Some(d), "x={} y={}", x, y);
            }
            assert_eq!(terrain.grid.get(TileCoord::new(x, -6)), None);
        }
    }

    #[test]
    fn surface_survives_variation_deeper_than_strata() {
        let tiles = registry();
        let mut biome = scenario_biome();
        biome.generation.max_depth = 1;
        biome.generation.height_variation = 8;
        assert!(biome.validate().is_ok());

        let terrain = TerrainGridBuilder::new(&tiles).build(&biome, 64, 42).unwrap();
        let s = tiles.id_of("S").unwrap();
        let missing: Vec<_> = terrain
            .profile
            .columns()
            .filter(|&(x, y)| terrain.grid.get(TileCoord::new(x, y)) != Some(s))
            .collect();
        assert!(missing.is_empty(), "surface tiles missing at {:?}", missing);
        assert!(terrain.grid.bounds().y_min <= -8);
    }

    #[test]
    fn build_is_deterministic() {
        let tiles = registry();
        let mut biome = scenario_biome();
        biome.special.ores = vec![OreVein::new("O", 0.2)];
        let builder = TerrainGridBuilder::new(&tiles);
        let a = builder.build(&biome, 32, 7).unwrap();
        let b = builder.build(&biome, 32, 7).unwrap();
        assert_eq!(a.profile, b.profile);
        assert_eq!(a.grid.len(), b.grid.len());
        for (coord, tile) in a.grid.iter() {
            assert_eq!(b.grid.get(coord), Some(tile));
        }
    }

    #[test]
    fn ore_only_replaces_deep_cells() {
        let tiles = registry();
        let mut biome = scenario_biome();
        biome.generation.max_depth = 30;
        biome.special.ores = vec![OreVein::new("O", 0.5)];
        let terrain = TerrainGridBuilder::new(&tiles).build(&biome, 20, 3).unwrap();
        let ore = tiles.id_of("O").unwrap();

        let mut ore_count = 0;
        for (coord, tile) in terrain.grid.iter() {
            if tile == ore {
                ore_count += 1;
                let y_max = terrain.profile.surface_height(coord.x);
                let floor = y_max - terrain.profile.middle_thickness(coord.x);
                assert!(coord.y < floor, "ore at {:?} above the deep layer", coord);
            }
        }
        assert!(ore_count > 0);
    }

    #[test]
    fn pick_ore_walks_cumulative_weights() {
        let strata = ResolvedStrata {
            surface: TileId(0),
            middle: TileId(1),
            deep: TileId(2),
            ores: vec![(TileId(3), 0.1), (TileId(4), 0.2)],
            liquid: None,
        };
        assert_eq!(strata.pick_ore(0.05), Some(TileId(3)));
        assert_eq!(strata.pick_ore(0.25), Some(TileId(4)));
        assert_eq!(strata.pick_ore(0.5), None);
    }

    #[test]
    fn liquid_fills_only_empty_cells() {
        let tiles = registry();
        let mut biome = scenario_biome();
        biome.generation.height_variation = 4;
        biome.special.liquid = Some(LiquidConfig {
            tile: "L".into(),
            level: 2,
        });
        let terrain = TerrainGridBuilder::new(&tiles).build(&biome, 40, 11).unwrap();
        let liquid = tiles.id_of("L").unwrap();

        for x in 0..40 {
            let y_max = terrain.profile.surface_height(x);
            assert_ne!(terrain.grid.get(TileCoord::new(x, y_max)), Some(liquid));
            for y in (y_max + 1)..=2 {
                assert_eq!(terrain.grid.get(TileCoord::new(x, y)), Some(liquid));
            }
            assert_eq!(terrain.grid.get(TileCoord::new(x, 3.max(y_max + 1))), None);
        }
    }

    #[test]
    fn liquid_below_bottom_is_skipped() {
        let tiles = registry();
        let mut biome = scenario_biome();
        biome.special.liquid = Some(LiquidConfig {
            tile: "L".into(),
            level: -50,
        });
        let terrain = TerrainGridBuilder::new(&tiles).build(&biome, 10, 1).unwrap();
        let liquid = tiles.id_of("L").unwrap();
        assert!(terrain.grid.iter().all(|(_, tile)| tile != liquid));
    }

    #[test]
    fn unknown_tile_leaves_grid_untouched() {
        let tiles = registry();
        let builder = TerrainGridBuilder::new(&tiles);
        let mut grid = builder.build(&scenario_biome(), 10, 1).unwrap().grid;
        let before = grid.len();

        let mut broken = scenario_biome();
        broken.strata.deep = "bedrock".into();
        let err = builder.regenerate(&mut grid, &broken, 10, 2).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownTile {
                biome: broken.name.clone(),
                role: "deep",
                name: "bedrock".into(),
            }
        );
        assert_eq!(grid.len(), before);
    }

    #[test]
    fn zero_width_is_rejected() {
        let tiles = registry();
        let result = TerrainGridBuilder::new(&tiles).build(&scenario_biome(), 0, 1);
        assert_eq!(result.unwrap_err(), BuildError::InvalidWorldWidth(0));
    }

    #[test]
    fn regenerate_clears_previous_biome() {
        let tiles = registry();
        let builder = TerrainGridBuilder::new(&tiles);
        let mut wide = scenario_biome();
        wide.generation.max_depth = 12;
        let mut grid = builder.build(&wide, 40, 5).unwrap().grid;
        grid.set(TileCoord::new(-30, 3), tiles.id_of("O").unwrap());

        let narrow = scenario_biome();
        builder.regenerate(&mut grid, &narrow, 10, 5).unwrap();
        assert!(grid.iter().all(|(coord, _)| (0..10).contains(&coord.x)));
        assert!(grid.iter().all(|(coord, _)| coord.y >= -5));
    }
}
