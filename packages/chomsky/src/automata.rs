mod builder;
mod finite_state;
mod types;

pub use builder::FiniteAutomatonBuilder;
pub use finite_state::{FiniteAutomaton, Transitions};
pub use types::{State, StateId};
