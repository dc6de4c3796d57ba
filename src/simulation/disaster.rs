//! Disaster engine - random hazards that perturb the world
//!
//! While no disaster is running, each tick may bring a single-tick minor
//! challenge and, independently, may trigger a major disaster. A major
//! disaster lasts for a number of ticks and applies its effect on each of
//! them, starting with the tick after it was triggered.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::simulation::events::SimEvent;
use crate::world::World;

pub const MINOR_CHALLENGE_CHANCE: f64 = 0.005;
pub const MAJOR_DISASTER_CHANCE: f64 = 0.001;

/// Ticks between progress narrations of a running disaster
pub const UPDATE_INTERVAL: u32 = 5;

/// Drought dries the grass on every Nth elapsed tick
pub const DROUGHT_GRASS_INTERVAL: u32 = 5;

pub const MIN_DURATION: u32 = 20;
pub const MAX_EXTRA_DURATION: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DisasterKind {
    Earthquake,
    Drought,
    Disease,
    ColdSnap,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 4] = [
        DisasterKind::Earthquake,
        DisasterKind::Drought,
        DisasterKind::Disease,
        DisasterKind::ColdSnap,
    ];
}

impl std::fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Drought => "drought",
            DisasterKind::Disease => "disease",
            DisasterKind::ColdSnap => "cold snap",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MinorChallenge {
    /// Every grass tile loses 30% of its food
    FoodShortage,
    /// A fifth of the population loses 20 health
    Disease,
    /// Every agent above 10 energy loses 10, floored at 10
    HarshWeather,
}

impl MinorChallenge {
    pub const ALL: [MinorChallenge; 3] = [
        MinorChallenge::FoodShortage,
        MinorChallenge::Disease,
        MinorChallenge::HarshWeather,
    ];

    /// Apply the one-tick effect
    pub fn apply<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) {
        match self {
            MinorChallenge::FoodShortage => {
                for tile in world.grass_tiles_mut() {
                    tile.deplete_fraction(0.3);
                }
            }
            MinorChallenge::Disease => {
                let ids = world.animal_ids();
                let sick = ids.len() / 5;
                for id in ids.choose_multiple(rng, sick) {
                    if let Some(agent) = world.get_animal_mut(*id) {
                        agent.stats_mut().damage(20.0);
                    }
                }
            }
            MinorChallenge::HarshWeather => {
                for agent in world.animals_mut() {
                    let stats = agent.stats_mut();
                    if stats.energy > 10.0 {
                        stats.energy = (stats.energy - 10.0).max(10.0);
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for MinorChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            MinorChallenge::FoodShortage => "a food shortage withers the grasslands",
            MinorChallenge::Disease => "a minor illness spreads through the population",
            MinorChallenge::HarshWeather => "harsh weather saps everyone's energy",
        };
        f.write_str(text)
    }
}

/// A running major disaster
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveDisaster {
    pub kind: DisasterKind,
    pub duration_remaining: u32,
    /// Ticks of effect applied so far
    pub elapsed: u32,
    /// Severity in [0.5, 1.0]
    pub intensity: f64,
}

impl ActiveDisaster {
    fn apply<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) {
        let intensity = self.intensity;
        match self.kind {
            DisasterKind::Earthquake => {
                if rng.gen::<f64>() < 0.3 {
                    let grass = world.grass_positions();
                    for pos in grass.choose_multiple(rng, 5) {
                        if let Some(tile) = world.tile_mut(*pos) {
                            tile.deplete_fraction(intensity);
                        }
                    }
                }
                injure_some(world, intensity * 0.2, (20.0 * intensity).floor(), rng);
            }
            DisasterKind::Drought => {
                if self.elapsed % DROUGHT_GRASS_INTERVAL == 0 {
                    for tile in world.grass_tiles_mut() {
                        tile.deplete_fraction(0.1 * intensity);
                    }
                }
                for agent in world.animals_mut() {
                    agent.stats_mut().add_hunger(intensity * 2.0);
                }
            }
            DisasterKind::Disease => {
                injure_some(world, intensity * 0.15, (10.0 * intensity).floor(), rng);
            }
            DisasterKind::ColdSnap => {
                for agent in world.animals_mut() {
                    agent.stats_mut().drain_energy(intensity * 2.0);
                }
                injure_some(world, intensity * 0.1, (5.0 * intensity).floor(), rng);
            }
        }
    }
}

/// Each agent independently loses `damage` health with probability `chance`
fn injure_some<R: Rng + ?Sized>(world: &mut World, chance: f64, damage: f64, rng: &mut R) {
    for agent in world.animals_mut() {
        if rng.gen::<f64>() < chance {
            agent.stats_mut().damage(damage);
        }
    }
}

/// Inactive until a major disaster triggers, then active until it runs out
#[derive(Debug, Clone, Default)]
pub struct DisasterEngine {
    active: Option<ActiveDisaster>,
}

impl DisasterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveDisaster> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start a disaster directly, replacing any running one
    ///
    /// Effects begin on the next call to `tick`.
    pub fn start(&mut self, world: &mut World, kind: DisasterKind, duration: u32, intensity: f64) {
        let intensity = intensity.clamp(0.5, 1.0);
        tracing::info!(%kind, duration, intensity, "disaster started");
        self.active = Some(ActiveDisaster {
            kind,
            duration_remaining: duration,
            elapsed: 0,
            intensity,
        });
        world.emit(SimEvent::DisasterStarted { kind, duration, intensity });
    }

    /// Trigger-or-continue, once per tick after the world update
    pub fn tick<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) {
        match self.active {
            Some(disaster) => self.continue_disaster(disaster, world, rng),
            None => self.roll_hazards(world, rng),
        }
    }

    fn roll_hazards<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) {
        if rng.gen::<f64>() < MINOR_CHALLENGE_CHANCE {
            let challenge = MinorChallenge::ALL[rng.gen_range(0..MinorChallenge::ALL.len())];
            tracing::debug!(%challenge, "minor challenge");
            challenge.apply(world, rng);
            world.emit(SimEvent::MinorChallenge { challenge });
        }

        if rng.gen::<f64>() < MAJOR_DISASTER_CHANCE {
            let kind = DisasterKind::ALL[rng.gen_range(0..DisasterKind::ALL.len())];
            let duration = MIN_DURATION + rng.gen_range(0..=MAX_EXTRA_DURATION);
            let intensity = 0.5 + rng.gen::<f64>() * 0.5;
            self.start(world, kind, duration, intensity);
        }
    }

    fn continue_disaster<R: Rng + ?Sized>(
        &mut self,
        mut disaster: ActiveDisaster,
        world: &mut World,
        rng: &mut R,
    ) {
        disaster.elapsed += 1;
        disaster.apply(world, rng);
        disaster.duration_remaining = disaster.duration_remaining.saturating_sub(1);

        if disaster.duration_remaining == 0 {
            tracing::info!(kind = %disaster.kind, elapsed = disaster.elapsed, "disaster ended");
            world.emit(SimEvent::DisasterEnded { kind: disaster.kind });
            self.active = None;
            return;
        }

        if disaster.elapsed % UPDATE_INTERVAL == 0 {
            world.emit(SimEvent::DisasterUpdate {
                kind: disaster.kind,
                remaining: disaster.duration_remaining,
            });
        }
        self.active = Some(disaster);
    }
}
