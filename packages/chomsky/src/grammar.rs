mod classification;
mod generation;
mod parse;
mod regular;
mod types;

pub use classification::{is_context_free, is_context_sensitive, is_right_linear, ChomskyType};
pub use generation::GenerationConfig;
pub(crate) use regular::{right_linear_shape, RightLinear};
pub use types::{Grammar, NonTerminal, ProductionSymbol, Productions, Terminal};
