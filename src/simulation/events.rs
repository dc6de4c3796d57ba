//! Narration events and the sinks that consume them
//!
//! Simulation code only appends events to the world's pending buffer. The
//! tick driver drains the buffer and hands each event to the registered
//! sinks, which cannot fail and cannot reach back into simulation state.

use std::collections::VecDeque;

use serde::Serialize;

use crate::core::types::{AgentId, GridPos, Tick};
use crate::entity::species::SpeciesKind;
use crate::simulation::disaster::{DisasterKind, MinorChallenge};

/// Why an agent left the registry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DeathCause {
    Starvation,
    Injury,
    OldAge,
    Killed { by: AgentId },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    Birth {
        child: AgentId,
        parents: (AgentId, AgentId),
        species: SpeciesKind,
        position: GridPos,
        generation: u32,
    },
    Death {
        id: AgentId,
        species: SpeciesKind,
        cause: DeathCause,
        age: f64,
    },
    Attack {
        attacker: AgentId,
        target: AgentId,
        success: bool,
    },
    CourtshipStarted {
        id: AgentId,
        partner: AgentId,
    },
    CourtshipProgress {
        id: AgentId,
        partner: AgentId,
        progress: u32,
    },
    CourtshipCompleted {
        id: AgentId,
        partner: AgentId,
        offspring: Option<AgentId>,
    },
    CourtshipAbandoned {
        id: AgentId,
        partner: AgentId,
    },
    DisasterStarted {
        kind: DisasterKind,
        duration: u32,
        intensity: f64,
    },
    DisasterUpdate {
        kind: DisasterKind,
        remaining: u32,
    },
    DisasterEnded {
        kind: DisasterKind,
    },
    MinorChallenge {
        challenge: MinorChallenge,
    },
    PopulationMilestone {
        population: usize,
        rising: bool,
    },
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeathCause::Starvation => f.write_str("starved"),
            DeathCause::Injury => f.write_str("succumbed to injuries"),
            DeathCause::OldAge => f.write_str("died of old age"),
            DeathCause::Killed { by } => write!(f, "was killed by {}", by),
        }
    }
}

impl std::fmt::Display for SimEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimEvent::Birth { child, parents, species, position, generation } => write!(
                f,
                "A {} {} was born to {} and {} at {} (generation {})",
                species, child, parents.0, parents.1, position, generation
            ),
            SimEvent::Death { id, species, cause, age } => {
                write!(f, "The {} {} {} at age {:.0}", species, id, cause, age)
            }
            SimEvent::Attack { attacker, target, success: true } => {
                write!(f, "{} hunted down {}", attacker, target)
            }
            SimEvent::Attack { attacker, target, success: false } => {
                write!(f, "{} attacked {} but it escaped", attacker, target)
            }
            SimEvent::CourtshipStarted { id, partner } => {
                write!(f, "{} began courting {}", id, partner)
            }
            SimEvent::CourtshipProgress { id, partner, progress } => {
                write!(f, "{} keeps courting {} ({}/{})", id, partner, progress, crate::entity::courtship::COURTSHIP_TICKS)
            }
            SimEvent::CourtshipCompleted { id, partner, offspring: Some(child) } => {
                write!(f, "{} and {} completed their courtship; {} was born", id, partner, child)
            }
            SimEvent::CourtshipCompleted { id, partner, offspring: None } => {
                write!(f, "{} and {} completed their courtship without offspring", id, partner)
            }
            SimEvent::CourtshipAbandoned { id, partner } => {
                write!(f, "{} gave up courting {}, who is gone", id, partner)
            }
            SimEvent::DisasterStarted { kind, duration, intensity } => write!(
                f,
                "DISASTER: a {} struck (intensity {:.2}, expected to last {} ticks)",
                kind, intensity, duration
            ),
            SimEvent::DisasterUpdate { kind, remaining } => {
                write!(f, "The {} continues, {} ticks remaining", kind, remaining)
            }
            SimEvent::DisasterEnded { kind } => write!(f, "The {} has ended", kind),
            SimEvent::MinorChallenge { challenge } => write!(f, "Hardship: {}", challenge),
            SimEvent::PopulationMilestone { population, rising: true } => {
                write!(f, "Population grew to {}", population)
            }
            SimEvent::PopulationMilestone { population, rising: false } => {
                write!(f, "Population fell to {}", population)
            }
        }
    }
}

/// Consumer of narration
///
/// Infallible by signature: a sink that cannot deliver drops the event.
pub trait EventSink {
    fn record(&mut self, tick: Tick, event: &SimEvent);
}

/// Forwards narration to `tracing`
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, tick: Tick, event: &SimEvent) {
        match event {
            SimEvent::DisasterStarted { .. }
            | SimEvent::DisasterEnded { .. }
            | SimEvent::PopulationMilestone { .. } => tracing::info!(tick, "{}", event),
            SimEvent::CourtshipProgress { .. } | SimEvent::DisasterUpdate { .. } => {
                tracing::trace!(tick, "{}", event)
            }
            _ => tracing::debug!(tick, "{}", event),
        }
    }
}

/// Bounded log of the most recent narration lines
#[derive(Debug, Clone)]
pub struct EventLog {
    lines: VecDeque<(Tick, String)>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &(Tick, String)> + '_ {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl EventSink for EventLog {
    fn record(&mut self, tick: Tick, event: &SimEvent) {
        if self.capacity == 0 {
            return;
        }
        // Progress chatter would crowd out everything else
        if matches!(event, SimEvent::CourtshipProgress { .. }) {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back((tick, event.to_string()));
    }
}
