//! Vital statistics shared by every agent

use serde::{Deserialize, Serialize};

pub const STAT_MAX: f64 = 100.0;

/// Hunger gained every tick
pub const HUNGER_PER_TICK: f64 = 1.0;
/// Energy burned every tick
pub const ENERGY_PER_TICK: f64 = 0.5;

/// Health, energy and hunger are kept within [0, 100]; age only grows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    /// 0.0 = dead, 100.0 = unharmed
    pub health: f64,
    /// 0.0 = exhausted, 100.0 = fully rested
    pub energy: f64,
    /// 0.0 = fed, 100.0 = starved to death
    pub hunger: f64,
    /// Ticks lived
    pub age: f64,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            health: STAT_MAX,
            energy: 80.0,
            hunger: 20.0,
            age: 0.0,
        }
    }
}

impl AgentStats {
    pub fn new(health: f64, energy: f64, hunger: f64, age: f64) -> Self {
        Self {
            health: clamp_stat(health),
            energy: clamp_stat(energy),
            hunger: clamp_stat(hunger),
            age: age.max(0.0),
        }
    }

    /// Stats a newborn starts life with
    pub fn newborn() -> Self {
        Self::new(STAT_MAX, 50.0, 30.0, 0.0)
    }

    /// Aging and needs decay, once per tick
    pub fn advance(&mut self) {
        self.age += 1.0;
        self.hunger = (self.hunger + HUNGER_PER_TICK).min(STAT_MAX);
        self.energy = (self.energy - ENERGY_PER_TICK).max(0.0);
    }

    pub fn gain_energy(&mut self, amount: f64) {
        self.energy = clamp_stat(self.energy + amount);
    }

    pub fn drain_energy(&mut self, amount: f64) {
        self.energy = clamp_stat(self.energy - amount);
    }

    pub fn add_hunger(&mut self, amount: f64) {
        self.hunger = clamp_stat(self.hunger + amount);
    }

    pub fn relieve_hunger(&mut self, amount: f64) {
        self.hunger = clamp_stat(self.hunger - amount);
    }

    pub fn damage(&mut self, amount: f64) {
        self.health = clamp_stat(self.health - amount);
    }

    pub fn heal(&mut self, amount: f64) {
        self.health = clamp_stat(self.health + amount);
    }

    pub fn is_starved(&self) -> bool {
        self.hunger >= STAT_MAX
    }

    pub fn is_fatally_hurt(&self) -> bool {
        self.health <= 0.0
    }
}

fn clamp_stat(v: f64) -> f64 {
    v.clamp(0.0, STAT_MAX)
}
