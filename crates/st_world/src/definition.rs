use serde::{Deserialize, Serialize};
use st_noise::HeightmapParams;
use thiserror::Error;

/// Structural problems in an authored biome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BiomeError {
    #[error("biome has an empty name")]
    EmptyName,
    #[error("biome '{biome}' has no {layer} tile")]
    MissingStrataTile { biome: String, layer: &'static str },
    #[error("biome '{biome}' has negative max depth {depth}")]
    NegativeDepth { biome: String, depth: i32 },
    #[error("biome '{biome}' has negative height variation {variation}")]
    NegativeVariation { biome: String, variation: i32 },
    #[error("biome '{biome}' middle thickness range {min}..={max} is invalid")]
    InvalidThickness { biome: String, min: i32, max: i32 },
    #[error("biome '{biome}' decoration #{index} has no entity")]
    EmptyDecorationEntity { biome: String, index: usize },
    #[error("biome '{biome}' decoration #{index} probability {probability} is outside [0, 1]")]
    DecorationProbability {
        biome: String,
        index: usize,
        probability: f32,
    },
    #[error("biome '{biome}' decoration #{index} height range {min}..={max} is inverted")]
    InvertedHeightRange {
        biome: String,
        index: usize,
        min: i32,
        max: i32,
    },
    #[error("biome '{biome}' decoration #{index} has negative spacing {spacing}")]
    NegativeSpacing {
        biome: String,
        index: usize,
        spacing: i32,
    },
    #[error("biome '{biome}' ore #{index} has no tile")]
    EmptyOreTile { biome: String, index: usize },
    #[error("biome '{biome}' ore #{index} weight {weight} is outside [0, 1]")]
    OreWeight {
        biome: String,
        index: usize,
        weight: f32,
    },
    #[error("biome '{biome}' liquid has no tile")]
    EmptyLiquidTile { biome: String },
    #[error("biome '{biome}' enables weather without any effect")]
    WeatherWithoutEffects { biome: String },
}

/// Static, externally authored description of one biome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeDefinition {
    /// Unique name, used to select the biome.
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub strata: StrataTiles,
    pub generation: GenerationParams,
    #[serde(default)]
    pub ambience: Ambience,
    /// Decoration rules, evaluated in order for every column.
    #[serde(default)]
    pub decorations: Vec<DecorationRule>,
    #[serde(default)]
    pub special: SpecialConfig,
}

impl Default for BiomeDefinition {
    fn default() -> Self {
        Self::meadow()
    }
}

impl BiomeDefinition {
    /// Rolling grassland with a shallow lake level and coal/iron seams.
    pub fn meadow() -> Self {
        Self {
            name: "Meadow".to_string(),
            description: "Rolling grassland over dirt and stone.".to_string(),
            strata: StrataTiles::new("grass", "dirt", "stone"),
            generation: GenerationParams::default(),
            ambience: Ambience::default(),
            decorations: vec![
                DecorationRule::new("tree", 0.3, (0, 6), 4),
                DecorationRule::new("bush", 0.5, (-2, 3), 2),
                DecorationRule::new("boulder", 0.1, (2, 6), 8),
            ],
            special: SpecialConfig {
                liquid: Some(LiquidConfig {
                    tile: "water".to_string(),
                    level: -3,
                }),
                ores: vec![OreVein::new("iron_ore", 0.03), OreVein::new("coal_ore", 0.08)],
                weather: WeatherConfig::default(),
            },
        }
    }

    /// Bottom row of the strata fill.
    pub fn y_bottom(&self) -> i32 {
        self.generation.y_bottom()
    }

    /// Check everything that can be checked without a tile registry.
    pub fn validate(&self) -> Result<(), BiomeError> {
        let biome = || self.name.clone();

        if self.name.trim().is_empty() {
            return Err(BiomeError::EmptyName);
        }

        for (layer, tile) in [
            ("surface", &self.strata.surface),
            ("middle", &self.strata.middle),
            ("deep", &self.strata.deep),
        ] {
            if tile.trim().is_empty() {
                return Err(BiomeError::MissingStrataTile {
                    biome: biome(),
                    layer,
                });
            }
        }

        let gen = &self.generation;
        if gen.max_depth < 0 {
            return Err(BiomeError::NegativeDepth {
                biome: biome(),
                depth: gen.max_depth,
            });
        }
        if gen.height_variation < 0 {
            return Err(BiomeError::NegativeVariation {
                biome: biome(),
                variation: gen.height_variation,
            });
        }
        if gen.min_middle_thickness < 0 || gen.min_middle_thickness > gen.max_middle_thickness {
            return Err(BiomeError::InvalidThickness {
                biome: biome(),
                min: gen.min_middle_thickness,
                max: gen.max_middle_thickness,
            });
        }

        for (index, rule) in self.decorations.iter().enumerate() {
            if rule.entity.trim().is_empty() {
                return Err(BiomeError::EmptyDecorationEntity {
                    biome: biome(),
                    index,
                });
            }
            if !(0.0..=1.0).contains(&rule.spawn_probability) {
                return Err(BiomeError::DecorationProbability {
                    biome: biome(),
                    index,
                    probability: rule.spawn_probability,
                });
            }
            let (min, max) = rule.height_range;
            if min > max {
                return Err(BiomeError::InvertedHeightRange {
                    biome: biome(),
                    index,
                    min,
                    max,
                });
            }
            if rule.min_spacing < 0 {
                return Err(BiomeError::NegativeSpacing {
                    biome: biome(),
                    index,
                    spacing: rule.min_spacing,
                });
            }
        }

        for (index, ore) in self.special.ores.iter().enumerate() {
            if ore.tile.trim().is_empty() {
                return Err(BiomeError::EmptyOreTile {
                    biome: biome(),
                    index,
                });
            }
            if !(0.0..=1.0).contains(&ore.weight) {
                return Err(BiomeError::OreWeight {
                    biome: biome(),
                    index,
                    weight: ore.weight,
                });
            }
        }

        if let Some(liquid) = &self.special.liquid {
            if liquid.tile.trim().is_empty() {
                return Err(BiomeError::EmptyLiquidTile { biome: biome() });
            }
        }

        let weather = &self.special.weather;
        if weather.enabled && weather.effects.is_empty() {
            return Err(BiomeError::WeatherWithoutEffects { biome: biome() });
        }

        Ok(())
    }
}

/// Tile names for the three strata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrataTiles {
    pub surface: String,
    pub middle: String,
    pub deep: String,
}

impl StrataTiles {
    pub fn new(surface: &str, middle: &str, deep: &str) -> Self {
        Self {
            surface: surface.to_string(),
            middle: middle.to_string(),
            deep: deep.to_string(),
        }
    }
}

/// Terrain shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub base_height: i32,
    /// Rows between `base_height` and the bottom of the fill.
    pub max_depth: i32,
    pub surface_noise_scale: f64,
    pub height_variation: i32,
    pub middle_noise_scale: f64,
    pub min_middle_thickness: i32,
    pub max_middle_thickness: i32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            base_height: 0,
            max_depth: 20,
            surface_noise_scale: 0.05,
            height_variation: 6,
            middle_noise_scale: 0.1,
            min_middle_thickness: 2,
            max_middle_thickness: 5,
        }
    }
}

impl GenerationParams {
    pub fn y_bottom(&self) -> i32 {
        self.base_height - self.max_depth
    }

    pub fn heightmap(&self) -> HeightmapParams {
        HeightmapParams {
            base_height: self.base_height,
            height_variation: self.height_variation,
            surface_noise_scale: self.surface_noise_scale,
            middle_noise_scale: self.middle_noise_scale,
            min_middle_thickness: self.min_middle_thickness,
            max_middle_thickness: self.max_middle_thickness,
        }
    }
}

/// Sky, light and backdrop applied when the biome becomes active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambience {
    /// Linear RGBA.
    pub sky_color: [f32; 4],
    /// Linear RGBA.
    pub ambient_light: [f32; 4],
    #[serde(default)]
    pub background: Option<String>,
}

impl Default for Ambience {
    fn default() -> Self {
        Self {
            sky_color: [0.53, 0.81, 0.92, 1.0],
            ambient_light: [1.0, 1.0, 1.0, 1.0],
            background: None,
        }
    }
}

/// One kind of surface decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationRule {
    /// Entity (prefab) the caller instantiates.
    pub entity: String,
    pub spawn_probability: f32,
    /// Inclusive range of `surface_height - base_height` this rule accepts.
    pub height_range: (i32, i32),
    /// Minimum column distance between two placements.
    pub min_spacing: i32,
}

impl DecorationRule {
    pub fn new(entity: &str, spawn_probability: f32, height_range: (i32, i32), min_spacing: i32) -> Self {
        Self {
            entity: entity.to_string(),
            spawn_probability,
            height_range,
            min_spacing,
        }
    }

    pub fn accepts_height(&self, height_above_base: i32) -> bool {
        let (min, max) = self.height_range;
        (min..=max).contains(&height_above_base)
    }
}

/// Liquid pooled into empty cells up to `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidConfig {
    pub tile: String,
    pub level: i32,
}

/// Alternate deep tile, chosen by cumulative weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreVein {
    pub tile: String,
    pub weight: f32,
}

impl OreVein {
    pub fn new(tile: &str, weight: f32) -> Self {
        Self {
            tile: tile.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub enabled: bool,
    #[serde(default)]
    pub effects: Vec<String>,
}

/// Biome-specific extras: liquid, ore table and weather.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialConfig {
    #[serde(default)]
    pub liquid: Option<LiquidConfig>,
    /// Ordered ore table.
    #[serde(default)]
    pub ores: Vec<OreVein>,
    #[serde(default)]
    pub weather: WeatherConfig,
}
