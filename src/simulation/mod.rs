pub mod action_execute;
pub mod action_select;
pub mod census;
pub mod disaster;
pub mod events;
pub mod tick;

pub use action_select::{select_action, Action};
pub use census::Census;
pub use disaster::{ActiveDisaster, DisasterEngine, DisasterKind, MinorChallenge};
pub use events::{DeathCause, EventLog, EventSink, SimEvent, TracingSink};
pub use tick::Simulation;
