//! Terrain tiles and their food stock

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound of a tile's food stock
pub const MAX_FOOD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Water,
    Rock,
}

impl TileKind {
    /// Food stock a freshly seeded tile of this kind holds
    pub fn initial_food(&self) -> f64 {
        match self {
            TileKind::Grass => MAX_FOOD,
            TileKind::Water => 5.0,
            TileKind::Rock => 0.0,
        }
    }

    /// Seeding distribution: 70% grass, 20% water, 10% rock
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.7 {
            TileKind::Grass
        } else if roll < 0.9 {
            TileKind::Water
        } else {
            TileKind::Rock
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    food_value: f64,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            food_value: kind.initial_food(),
        }
    }

    pub fn food_value(&self) -> f64 {
        self.food_value
    }

    pub fn is_grass(&self) -> bool {
        self.kind == TileKind::Grass
    }

    pub fn set_food(&mut self, value: f64) {
        self.food_value = value.clamp(0.0, MAX_FOOD);
    }

    /// Remove up to `amount` food, returning what was actually taken
    pub fn take(&mut self, amount: f64) -> f64 {
        let taken = self.food_value.min(amount.max(0.0));
        self.food_value -= taken;
        taken
    }

    pub fn grow(&mut self, amount: f64) {
        self.set_food(self.food_value + amount);
    }

    /// Lose a fraction of the current stock
    pub fn deplete_fraction(&mut self, fraction: f64) {
        self.set_food(self.food_value - self.food_value * fraction);
    }
}
