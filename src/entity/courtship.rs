//! Courtship - the multi-tick pairing that precedes mating
//!
//! Pairing is one-sided: the courting agent remembers its partner, the
//! partner is not told and may be doing anything else meanwhile.

use rand::Rng;
use serde::Serialize;

use crate::core::types::AgentId;
use crate::entity::agent::Agent;
use crate::simulation::events::SimEvent;
use crate::world::World;

/// Manhattan radius searched for a partner
pub const COURTSHIP_SEARCH_RADIUS: i32 = 2;

/// Ticks of courtship before the mating attempt
pub const COURTSHIP_TICKS: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Courtship {
    #[default]
    Idle,
    Mating { partner: AgentId, progress: u32 },
}

impl Courtship {
    pub fn partner(&self) -> Option<AgentId> {
        match self {
            Courtship::Idle => None,
            Courtship::Mating { partner, .. } => Some(*partner),
        }
    }
}

/// Look for an adult of the same species and start courting it
///
/// An adjacent candidate starts the courtship. A candidate two tiles away
/// draws the agent one step closer. Returns false when nobody is in range.
pub fn seek_courtship(agent: &mut Agent, world: &mut World) -> bool {
    let here = agent.position();
    let candidate = world
        .get_animals_in_radius(here, COURTSHIP_SEARCH_RADIUS)
        .into_iter()
        .filter(|other| {
            other.id() != agent.id() && other.species() == agent.species() && other.is_adult()
        })
        .min_by_key(|other| (other.position().manhattan(&here), other.id()))
        .map(|other| (other.id(), other.position()));

    let Some((partner, partner_pos)) = candidate else {
        return false;
    };

    if here.manhattan(&partner_pos) <= 1 {
        agent.set_courtship(Courtship::Mating { partner, progress: 0 });
        world.emit(SimEvent::CourtshipStarted { id: agent.id(), partner });
    } else {
        agent.move_toward(partner_pos, world);
    }
    true
}

/// One tick of an ongoing courtship
pub fn continue_courtship<R: Rng + ?Sized>(agent: &mut Agent, world: &mut World, rng: &mut R) {
    let Courtship::Mating { partner, progress } = agent.courtship() else {
        return;
    };

    let Some(partner_pos) = world.get_animal(partner).map(Agent::position) else {
        agent.set_courtship(Courtship::Idle);
        world.emit(SimEvent::CourtshipAbandoned { id: agent.id(), partner });
        return;
    };

    let progress = progress + 1;
    agent.set_courtship(Courtship::Mating { partner, progress });
    if agent.position().manhattan(&partner_pos) > 1 {
        agent.move_toward(partner_pos, world);
    }

    if progress >= COURTSHIP_TICKS {
        let offspring = agent.reproduce(partner, world, rng);
        agent.set_courtship(Courtship::Idle);
        world.emit(SimEvent::CourtshipCompleted {
            id: agent.id(),
            partner,
            offspring,
        });
    } else {
        world.emit(SimEvent::CourtshipProgress {
            id: agent.id(),
            partner,
            progress,
        });
    }
}
