use bevy::prelude::*;

use crate::definition::BiomeDefinition;

/// All loaded biomes plus the one the world is currently built from.
#[derive(Resource, Debug, Clone)]
pub struct BiomeLibrary {
    biomes: Vec<BiomeDefinition>,
    active: Option<usize>,
}

impl Default for BiomeLibrary {
    fn default() -> Self {
        Self::new(vec![BiomeDefinition::meadow()])
    }
}

impl BiomeLibrary {
    /// Create a library; the first biome starts active.
    pub fn new(biomes: Vec<BiomeDefinition>) -> Self {
        let active = if biomes.is_empty() { None } else { Some(0) };
        Self { biomes, active }
    }

    /// Add a biome, replacing any biome with the same name.
    pub fn insert(&mut self, biome: BiomeDefinition) {
        match self.index_of(&biome.name) {
            Some(i) => self.biomes[i] = biome,
            None => {
                self.biomes.push(biome);
                if self.active.is_none() {
                    self.active = Some(self.biomes.len() - 1);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&BiomeDefinition> {
        self.index_of(name).map(|i| &self.biomes[i])
    }

    pub fn active(&self) -> Option<&BiomeDefinition> {
        self.active.map(|i| &self.biomes[i])
    }

    /// Make `name` the active biome. Returns false if it is unknown.
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.active = Some(i);
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.biomes.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.biomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biomes.is_empty()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.biomes.iter().position(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> BiomeDefinition {
        BiomeDefinition {
            name: name.to_string(),
            ..BiomeDefinition::meadow()
        }
    }

    #[test]
    fn first_biome_starts_active() {
        let library = BiomeLibrary::new(vec![named("Tundra"), named("Desert")]);
        assert_eq!(library.active().map(|b| b.name.as_str()), Some("Tundra"));
    }

    #[test]
    fn set_active_rejects_unknown() {
        let mut library = BiomeLibrary::new(vec![named("Tundra"), named("Desert")]);
        assert!(library.set_active("Desert"));
        assert!(!library.set_active("Swamp"));
        assert_eq!(library.active().map(|b| b.name.as_str()), Some("Desert"));
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut library = BiomeLibrary::new(Vec::new());
        assert!(library.active().is_none());
        library.insert(named("Tundra"));
        let mut deeper = named("Tundra");
        deeper.generation.max_depth = 40;
        library.insert(deeper);
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("Tundra").unwrap().generation.max_depth, 40);
        assert!(library.active().is_some());
    }
}
