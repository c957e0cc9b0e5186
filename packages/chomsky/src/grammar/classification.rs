use derive_more::Display;
use log::debug;

use crate::grammar::{right_linear_shape, Grammar, NonTerminal, Productions, RightLinear};

/// Position of a grammar in the Chomsky hierarchy. Variants are ordered
/// from the most general class to the most restrictive one.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChomskyType {
    #[display("Type 0: Unrestricted Grammar")]
    Unrestricted = 0,
    #[display("Type 1: Context-Sensitive Grammar")]
    ContextSensitive = 1,
    #[display("Type 2: Context-Free Grammar")]
    ContextFree = 2,
    #[display("Type 3: Regular Grammar")]
    Regular = 3,
}

impl ChomskyType {
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Every rule is `A → a`, `A → aB`, or the erasing rule `S → ε` of the
/// start symbol.
pub fn is_right_linear(productions: &Productions, start_symbol: &NonTerminal) -> bool {
    productions.iter().all(|(lhs, alternatives)| {
        let Some(nt) = lhs.as_non_terminal() else {
            return false;
        };

        alternatives.iter().all(|rhs| match right_linear_shape(rhs) {
            Some(RightLinear::Empty) => nt == start_symbol,
            Some(_) => true,
            None => false,
        })
    })
}

/// Every left-hand side is a single non-terminal.
pub fn is_context_free(productions: &Productions) -> bool {
    productions
        .keys()
        .all(|lhs| lhs.as_non_terminal().is_some())
}

/// No rule shortens the sentential form, except `S → ε`.
pub fn is_context_sensitive(productions: &Productions, start_symbol: &NonTerminal) -> bool {
    productions.iter().all(|(lhs, alternatives)| {
        alternatives.iter().all(|rhs| {
            rhs.len() >= lhs.len()
                || (rhs.is_empty() && lhs.as_non_terminal() == Some(start_symbol))
        })
    })
}

impl Grammar {
    pub fn classify(&self) -> ChomskyType {
        let productions = &self.productions;
        let start_symbol = &self.start_symbol;

        let classification = if is_right_linear(productions, start_symbol) {
            ChomskyType::Regular
        } else if is_context_free(productions) {
            ChomskyType::ContextFree
        } else if is_context_sensitive(productions, start_symbol) {
            ChomskyType::ContextSensitive
        } else {
            ChomskyType::Unrestricted
        };

        debug!("classified grammar with start {start_symbol} as {classification}");

        classification
    }
}
