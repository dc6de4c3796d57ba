//! Action selection - the species decision policy
//!
//! Every tick an idle agent rolls against its intelligence gene. A smart
//! roll walks a fixed priority list of needs; otherwise the agent picks from
//! a flat weighted set. The thresholds define the emergent population
//! dynamics and are not configurable.

use rand::Rng;
use serde::Serialize;

use crate::entity::agent::Agent;
use crate::genetics::names;
use crate::world::World;

pub const URGENT_HUNGER: f64 = 70.0;
pub const LOW_ENERGY: f64 = 30.0;
pub const MODERATE_HUNGER: f64 = 40.0;
pub const HUNT_ENERGY_CEILING: f64 = 60.0;
pub const MATING_URGE: f64 = 0.6;
pub const SOCIAL_DRIVE: f64 = 0.7;
pub const MATING_PRESSURE_LIMIT: u8 = 7;
pub const SOCIAL_PRESSURE_LIMIT: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Forage,
    Rest,
    Hunt,
    SeekMate,
    SeekCompany,
    Wander,
}

/// Context provided to the action selection algorithm
pub struct SelectionContext<'a> {
    pub agent: &'a Agent,
    pub population_pressure: u8,
}

impl<'a> SelectionContext<'a> {
    pub fn new(agent: &'a Agent, world: &World) -> Self {
        Self {
            agent,
            population_pressure: world.get_population_pressure(),
        }
    }

    fn predatory(&self) -> bool {
        self.agent.species().is_predatory()
    }
}

/// Pick this tick's action for an idle agent
pub fn select_action<R: Rng + ?Sized>(agent: &Agent, world: &World, rng: &mut R) -> Action {
    select_with_context(&SelectionContext::new(agent, world), rng)
}

pub fn select_with_context<R: Rng + ?Sized>(ctx: &SelectionContext, rng: &mut R) -> Action {
    let roll: f64 = rng.gen();
    if roll < ctx.agent.trait_value(names::INTELLIGENCE) {
        select_by_priority(ctx, rng)
    } else {
        select_by_impulse(ctx, rng)
    }
}

/// Deliberate choice: first matching need wins
fn select_by_priority<R: Rng + ?Sized>(ctx: &SelectionContext, rng: &mut R) -> Action {
    let agent = ctx.agent;
    let stats = agent.stats();

    if stats.hunger > URGENT_HUNGER {
        return forage_or_hunt(ctx, rng);
    }
    if stats.energy < LOW_ENERGY {
        return Action::Rest;
    }
    if stats.hunger > MODERATE_HUNGER {
        return forage_or_hunt(ctx, rng);
    }
    if agent.is_adult()
        && agent.trait_value(names::REPRODUCTIVE_URGE) > MATING_URGE
        && ctx.population_pressure < MATING_PRESSURE_LIMIT
    {
        return Action::SeekMate;
    }
    if agent.trait_value(names::SOCIAL_BEHAVIOR) > SOCIAL_DRIVE
        && ctx.population_pressure < SOCIAL_PRESSURE_LIMIT
    {
        return Action::SeekCompany;
    }
    if ctx.predatory() && agent.should_be_aggressive(rng) && stats.energy < HUNT_ENERGY_CEILING {
        return Action::Hunt;
    }
    Action::Wander
}

/// Impulsive choice from a flat weighted set
fn select_by_impulse<R: Rng + ?Sized>(ctx: &SelectionContext, rng: &mut R) -> Action {
    let roll: f64 = rng.gen();

    if ctx.predatory() {
        if roll < 0.4 {
            let hungry_hunter = ctx.agent.should_be_aggressive(rng)
                && ctx.agent.stats().energy < HUNT_ENERGY_CEILING;
            if hungry_hunter {
                Action::Hunt
            } else {
                Action::Forage
            }
        } else if roll < 0.8 {
            Action::Forage
        } else {
            Action::Rest
        }
    } else if roll < 0.4 {
        Action::Forage
    } else if roll < 0.6 {
        Action::Rest
    } else {
        Action::Wander
    }
}

fn forage_or_hunt<R: Rng + ?Sized>(ctx: &SelectionContext, rng: &mut R) -> Action {
    if ctx.predatory() && ctx.agent.should_be_aggressive(rng) {
        Action::Hunt
    } else {
        Action::Forage
    }
}
