//! Agent - one living creature, its lifecycle and its shared actions
//!
//! Lifecycle per tick, in order:
//! 1. age one tick, hunger rises, energy drains
//! 2. die when health is gone or hunger is full
//! 3. roll for old-age death once past 70% of the maximum age
//! 4. continue courtship if mating, otherwise let the species policy act
//!
//! Death is reported to the caller, which removes the agent from the world.

use rand::Rng;
use serde::Serialize;

use crate::core::types::{AgentId, Direction, GridPos};
use crate::entity::courtship::{self, Courtship};
use crate::entity::species::SpeciesKind;
use crate::entity::stats::{AgentStats, STAT_MAX};
use crate::genetics::{names, Genome};
use crate::simulation::events::{DeathCause, SimEvent};
use crate::simulation::{action_execute, action_select};
use crate::world::World;

/// Value used for any gene a genome does not carry
pub const GENE_FALLBACK: f64 = 0.5;
/// Friendship is the exception: a missing gene adds no restraint
pub const FRIENDSHIP_FALLBACK: f64 = 0.0;

/// Energy cost of a single step
pub const MOVE_COST: f64 = 1.0;

pub const ATTACK_MIN_ENERGY: f64 = 20.0;
pub const ATTACK_COST: f64 = 15.0;

pub const REPRODUCE_MIN_ENERGY: f64 = 50.0;
pub const REPRODUCE_SUCCESS_COST: f64 = 30.0;
pub const REPRODUCE_FAILURE_COST: f64 = 10.0;

/// Outcome of one lifecycle step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lifecycle {
    Alive,
    Died(DeathCause),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agent {
    id: AgentId,
    species: SpeciesKind,
    genome: Genome,
    position: GridPos,
    stats: AgentStats,
    courtship: Courtship,
    generation: u32,
    parents: Option<(AgentId, AgentId)>,
}

impl Agent {
    pub fn new(
        id: AgentId,
        species: SpeciesKind,
        genome: Genome,
        position: GridPos,
        stats: AgentStats,
    ) -> Self {
        Self {
            id,
            species,
            genome,
            position,
            stats,
            courtship: Courtship::Idle,
            generation: 0,
            parents: None,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn species(&self) -> SpeciesKind {
        self.species
    }

    /// Copy of the genome; the live genome is never handed out
    pub fn genome(&self) -> Genome {
        self.genome.clone()
    }

    pub fn position(&self) -> GridPos {
        self.position
    }

    pub fn stats(&self) -> AgentStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut AgentStats {
        &mut self.stats
    }

    pub fn courtship(&self) -> Courtship {
        self.courtship
    }

    pub(crate) fn set_courtship(&mut self, courtship: Courtship) {
        self.courtship = courtship;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn parents(&self) -> Option<(AgentId, AgentId)> {
        self.parents
    }

    /// Gene value with the documented fallback for missing genes
    pub fn trait_value(&self, name: &str) -> f64 {
        let fallback = if name == names::FRIENDSHIP {
            FRIENDSHIP_FALLBACK
        } else {
            GENE_FALLBACK
        };
        self.genome.value_or(name, fallback)
    }

    // === LIFECYCLE ===

    /// Age of onset for old-age mortality
    pub fn max_age(&self) -> f64 {
        100.0 + self.trait_value(names::LIFESPAN) * 50.0
    }

    pub fn maturity_age(&self) -> f64 {
        (25.0 + self.trait_value(names::MATURITY_AGE) * 20.0 - 10.0).max(15.0)
    }

    pub fn is_adult(&self) -> bool {
        self.stats.age >= self.maturity_age()
    }

    /// Manhattan range of food, prey and partner searches
    pub fn vision_range(&self) -> i32 {
        2 + (self.trait_value(names::VISION) * 4.0).floor() as i32
    }

    /// Run one tick of this agent's life
    ///
    /// The agent must not be registered in `world` while this runs.
    pub fn update<R: Rng + ?Sized>(&mut self, world: &mut World, rng: &mut R) -> Lifecycle {
        self.stats.advance();

        if self.stats.is_fatally_hurt() {
            return Lifecycle::Died(DeathCause::Injury);
        }
        if self.stats.is_starved() {
            return Lifecycle::Died(DeathCause::Starvation);
        }
        if self.rolls_old_age_death(rng) {
            return Lifecycle::Died(DeathCause::OldAge);
        }

        match self.courtship {
            Courtship::Mating { .. } => courtship::continue_courtship(self, world, rng),
            Courtship::Idle => {
                let action = action_select::select_action(self, world, rng);
                tracing::trace!(agent = %self.id, ?action, "selected action");
                action_execute::execute(self, action, world, rng);
            }
        }

        Lifecycle::Alive
    }

    fn rolls_old_age_death<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let max_age = self.max_age();
        let onset = 0.7 * max_age;
        if self.stats.age <= onset {
            return false;
        }
        let death_chance = (self.stats.age - onset) / (0.3 * max_age);
        rng.gen::<f64>() < death_chance * 0.1
    }

    /// Crowding stress applied by the world before each update
    pub fn apply_environmental_stress<R: Rng + ?Sized>(&mut self, pressure: u8, rng: &mut R) {
        if pressure > 7 {
            self.stats.add_hunger(0.5);
            self.stats.drain_energy(0.3);
            if rng.gen::<f64>() < 0.05 {
                self.stats.damage(1.0);
            }
        } else if pressure > 5 {
            self.stats.add_hunger(0.3);
            self.stats.drain_energy(0.1);
        }
    }

    // === ACTIONS ===

    /// Step one tile, clamped to the grid
    ///
    /// The step costs energy even when the clamp leaves the agent in place.
    pub fn move_in(&mut self, direction: Direction, world: &World) {
        self.position = world.step_clamped(self.position, direction);
        self.stats.drain_energy(MOVE_COST);
    }

    /// One step toward `target`; no-op when already there
    pub fn move_toward(&mut self, target: GridPos, world: &World) {
        if let Some(direction) = self.position.step_toward(&target) {
            self.move_in(direction, world);
        }
    }

    pub fn wander<R: Rng + ?Sized>(&mut self, world: &World, rng: &mut R) {
        let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        self.move_in(direction, world);
    }

    pub fn eat(&mut self, food: f64) {
        self.stats.relieve_hunger(food);
        self.stats.gain_energy(food / 2.0);
    }

    /// Stochastic predisposition to hunt instead of forage or socialize
    pub fn should_be_aggressive<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let threshold = self.trait_value(names::AGGRESSION) * 0.3
            + (1.0 - self.stats.energy / STAT_MAX) * 0.2
            + (self.stats.hunger / STAT_MAX) * 0.4
            - self.trait_value(names::FRIENDSHIP) * 0.3;
        rng.gen::<f64>() < threshold
    }

    /// Attack a registered agent
    ///
    /// Needs ATTACK_MIN_ENERGY; every attempt then costs ATTACK_COST. A
    /// successful attack kills the target and feeds the attacker.
    pub fn attack<R: Rng + ?Sized>(&mut self, target: AgentId, world: &mut World, rng: &mut R) -> bool {
        if self.stats.energy < ATTACK_MIN_ENERGY {
            return false;
        }
        let Some(target_speed) = world.get_animal(target).map(|t| t.trait_value(names::SPEED)) else {
            return false;
        };

        self.stats.drain_energy(ATTACK_COST);

        let speed_edge = (self.trait_value(names::SPEED) - target_speed).max(0.0);
        let success_chance = 0.3 + self.trait_value(names::AGGRESSION) * 0.4 + speed_edge * 0.3;
        let success = rng.gen::<f64>() < success_chance;

        world.emit(SimEvent::Attack {
            attacker: self.id,
            target,
            success,
        });

        if success {
            self.stats.gain_energy(30.0 + rng.gen_range(0.0..20.0));
            self.stats.relieve_hunger(40.0);
            if let Some(prey) = world.remove_animal(target) {
                world.emit(SimEvent::Death {
                    id: target,
                    species: prey.species,
                    cause: DeathCause::Killed { by: self.id },
                    age: prey.stats.age,
                });
            }
        }

        success
    }

    /// Attempt to produce offspring with a registered partner
    ///
    /// Both must be adult with REPRODUCE_MIN_ENERGY; otherwise nothing
    /// happens. Only the caller pays: REPRODUCE_FAILURE_COST on a failed
    /// roll, REPRODUCE_SUCCESS_COST on success even when the world has no
    /// room left for the newborn.
    pub fn reproduce<R: Rng + ?Sized>(
        &mut self,
        partner_id: AgentId,
        world: &mut World,
        rng: &mut R,
    ) -> Option<AgentId> {
        let partner = world.get_animal(partner_id)?;

        if !self.is_adult() || !partner.is_adult() {
            return None;
        }
        if self.stats.energy < REPRODUCE_MIN_ENERGY || partner.stats.energy < REPRODUCE_MIN_ENERGY {
            return None;
        }

        let pressure = world.get_population_pressure() as f64;
        let success_chance = (self.trait_value(names::REPRODUCTIVE_URGE) - pressure * 0.08).max(0.1);
        if rng.gen::<f64>() >= success_chance {
            self.stats.drain_energy(REPRODUCE_FAILURE_COST);
            return None;
        }

        let genome = Genome::combine(&self.genome, &partner.genome, rng).mutate(rng);
        let position = self.position.midpoint(&partner.position);
        let generation = self.generation.max(partner.generation) + 1;

        self.stats.drain_energy(REPRODUCE_SUCCESS_COST);

        let child_id = world.allocate_id();
        let child = Agent {
            id: child_id,
            species: self.species,
            genome,
            position,
            stats: AgentStats::newborn(),
            courtship: Courtship::Idle,
            generation,
            parents: Some((self.id, partner_id)),
        };
        if !world.add_animal(child) {
            tracing::trace!(parent = %self.id, "offspring rejected, world at capacity");
            return None;
        }

        world.emit(SimEvent::Birth {
            child: child_id,
            parents: (self.id, partner_id),
            species: self.species,
            position,
            generation,
        });
        Some(child_id)
    }
}
