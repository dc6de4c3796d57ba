//! Color definitions for species, terrain and agent condition

use serde::Serialize;

use crate::entity::species::SpeciesKind;
use crate::world::{TileKind, MAX_FOOD};

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Darken color by a factor (0.0 = black, 1.0 = unchanged)
    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }
}

pub const WATER: Color = Color::new(0.15, 0.35, 0.8, 1.0);
pub const ROCK: Color = Color::new(0.45, 0.45, 0.45, 1.0);
pub const GRASS: Color = Color::new(0.25, 0.75, 0.2, 1.0);

pub fn species_color(species: SpeciesKind) -> Color {
    match species {
        SpeciesKind::Herbivore => Color::new(0.95, 0.85, 0.3, 1.0), // Straw yellow
        SpeciesKind::Social => Color::new(0.85, 0.35, 0.9, 1.0),    // Magenta
    }
}

/// Terrain color; grass fades as its food runs out
pub fn tile_color(kind: TileKind, food: f64) -> Color {
    match kind {
        TileKind::Grass => {
            let fullness = (food / MAX_FOOD).clamp(0.0, 1.0) as f32;
            GRASS.darken(0.4 + fullness * 0.6)
        }
        TileKind::Water => WATER,
        TileKind::Rock => ROCK,
    }
}

/// Modulate color based on health in [0, 1] (lower health = more red tint)
pub fn health_tint(base: Color, health: f32) -> Color {
    let health_clamped = health.clamp(0.0, 1.0);
    Color {
        r: base.r + (1.0 - base.r) * (1.0 - health_clamped) * 0.5,
        g: base.g * health_clamped,
        b: base.b * health_clamped,
        a: base.a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_colors_unique() {
        let herbivore = species_color(SpeciesKind::Herbivore);
        let social = species_color(SpeciesKind::Social);
        assert_ne!(herbivore, social);
    }

    #[test]
    fn test_health_tint_full_health() {
        let base = Color::new(0.5, 0.5, 0.5, 1.0);
        let tinted = health_tint(base, 1.0);
        assert!((tinted.r - base.r).abs() < 0.01);
    }

    #[test]
    fn test_grazed_grass_is_darker() {
        let lush = tile_color(TileKind::Grass, MAX_FOOD);
        let bare = tile_color(TileKind::Grass, 0.0);
        assert!(bare.g < lush.g);
        assert!((bare.g - GRASS.g * 0.4).abs() < 1e-6);
    }
}
