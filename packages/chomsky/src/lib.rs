//! Formal grammars and finite automata: Chomsky classification, conversion
//! between right-linear grammars and automata, and subset construction.

pub mod automata;
mod conversion;
pub mod error;
pub mod grammar;
pub mod language;
