pub mod agent;
pub mod courtship;
pub mod species;
pub mod stats;

pub use agent::{Agent, Lifecycle};
pub use courtship::Courtship;
pub use species::{SpeciesKind, SpeciesProfile};
pub use stats::AgentStats;
