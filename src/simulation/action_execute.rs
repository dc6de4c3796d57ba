//! Action execution - turns a selected action into movement and stat changes

use rand::Rng;

use crate::core::types::{AgentId, GridPos};
use crate::entity::agent::Agent;
use crate::entity::courtship;
use crate::genetics::names;
use crate::simulation::action_select::Action;
use crate::world::World;

/// Smallest stock worth grazing on
pub const MIN_EDIBLE: f64 = 1.0;

pub const REST_ENERGY: f64 = 8.0;
pub const REST_HEAL: f64 = 1.0;
/// Resting only heals an agent that is not hungry
pub const REST_HEAL_HUNGER_LIMIT: f64 = 50.0;
pub const COMPANY_ENERGY: f64 = 2.0;

pub fn execute<R: Rng + ?Sized>(agent: &mut Agent, action: Action, world: &mut World, rng: &mut R) {
    match action {
        Action::Forage => forage(agent, world, rng),
        Action::Rest => rest(agent),
        Action::Hunt => hunt(agent, world, rng),
        Action::SeekMate => seek_mate(agent, world, rng),
        Action::SeekCompany => seek_company(agent, world, rng),
        Action::Wander => agent.wander(world, rng),
    }
}

/// Amount of food an agent eats in one bite
pub fn bite_size(agent: &Agent) -> f64 {
    3.0 + agent.trait_value(names::SIZE) * 4.0
}

fn forage<R: Rng + ?Sized>(agent: &mut Agent, world: &mut World, rng: &mut R) {
    let here = agent.position();
    let food_here = world.get_tile(here).map_or(0.0, |tile| tile.food_value());

    if food_here >= MIN_EDIBLE {
        let eaten = world.consume_food(here, bite_size(agent));
        agent.eat(eaten);
        return;
    }

    match richest_tile_in_view(agent, world) {
        Some(target) => agent.move_toward(target, world),
        None => agent.wander(world, rng),
    }
}

/// Tile with the most food within vision range; first found wins ties
fn richest_tile_in_view(agent: &Agent, world: &World) -> Option<GridPos> {
    let here = agent.position();
    let range = agent.vision_range();
    let mut best: Option<(GridPos, f64)> = None;

    for dy in -range..=range {
        let reach = range - dy.abs();
        for dx in -reach..=reach {
            let pos = GridPos::new(here.x + dx, here.y + dy);
            let Some(tile) = world.get_tile(pos) else {
                continue;
            };
            let food = tile.food_value();
            if food >= MIN_EDIBLE && best.map_or(true, |(_, most)| food > most) {
                best = Some((pos, food));
            }
        }
    }

    best.map(|(pos, _)| pos)
}

fn rest(agent: &mut Agent) {
    let stats = agent.stats_mut();
    stats.gain_energy(REST_ENERGY);
    if stats.hunger < REST_HEAL_HUNGER_LIMIT {
        stats.heal(REST_HEAL);
    }
}

/// Nearest registered agent in vision range matching `filter`; lowest id breaks ties
fn nearest_in_view(
    agent: &Agent,
    world: &World,
    filter: impl Fn(&Agent) -> bool,
) -> Option<(AgentId, GridPos)> {
    let here = agent.position();
    world
        .get_animals_in_radius(here, agent.vision_range())
        .into_iter()
        .filter(|other| other.id() != agent.id() && filter(other))
        .min_by_key(|other| (other.position().manhattan(&here), other.id()))
        .map(|other| (other.id(), other.position()))
}

fn hunt<R: Rng + ?Sized>(agent: &mut Agent, world: &mut World, rng: &mut R) {
    let species = agent.species();
    let Some((prey, prey_pos)) = nearest_in_view(agent, world, |other| other.species() != species)
    else {
        forage(agent, world, rng);
        return;
    };

    if agent.position().manhattan(&prey_pos) <= 1 {
        agent.attack(prey, world, rng);
    } else {
        agent.move_toward(prey_pos, world);
    }
}

fn seek_mate<R: Rng + ?Sized>(agent: &mut Agent, world: &mut World, rng: &mut R) {
    if agent.species().uses_courtship() {
        if !courtship::seek_courtship(agent, world) {
            agent.wander(world, rng);
        }
        return;
    }

    let species = agent.species();
    let candidate = nearest_in_view(agent, world, |other| {
        other.species() == species && other.is_adult()
    });
    match candidate {
        Some((partner, pos)) if agent.position().manhattan(&pos) <= 1 => {
            agent.reproduce(partner, world, rng);
        }
        Some((_, pos)) => agent.move_toward(pos, world),
        None => agent.wander(world, rng),
    }
}

fn seek_company<R: Rng + ?Sized>(agent: &mut Agent, world: &mut World, rng: &mut R) {
    let species = agent.species();
    match nearest_in_view(agent, world, |other| other.species() == species) {
        Some((_, pos)) if agent.position().manhattan(&pos) > 1 => agent.move_toward(pos, world),
        Some(_) => agent.stats_mut().gain_energy(COMPANY_ENERGY),
        None => agent.wander(world, rng),
    }
}
