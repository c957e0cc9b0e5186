use std::collections::VecDeque;

use indexmap::IndexSet;
use log::trace;

use crate::{
    error::ConversionError,
    grammar::{ChomskyType, Grammar, NonTerminal, ProductionSymbol, Terminal},
    language::{input_end, next_symbols, Word},
};

/// The right-hand side shapes allowed in a right-linear grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RightLinear<'a> {
    Empty,
    Terminal(&'a Terminal),
    Step(&'a Terminal, &'a NonTerminal),
}

pub(crate) fn right_linear_shape(rhs: &Word<ProductionSymbol>) -> Option<RightLinear<'_>> {
    match rhs.0.as_slice() {
        [] => Some(RightLinear::Empty),
        [ProductionSymbol::Terminal(t)] => Some(RightLinear::Terminal(t)),
        [ProductionSymbol::Terminal(t), ProductionSymbol::NonTerminal(nt)] => {
            Some(RightLinear::Step(t, nt))
        }
        _ => None,
    }
}

impl Grammar {
    pub(crate) fn ensure_right_linear(&self) -> Result<(), ConversionError> {
        match self.classify() {
            ChomskyType::Regular => Ok(()),
            classification => Err(ConversionError::NotRightLinear { classification }),
        }
    }

    fn derives_empty(&self, nt: &NonTerminal) -> bool {
        self.alternatives(nt)
            .is_some_and(|alternatives| alternatives.iter().any(Word::is_empty))
    }

    /// Membership test for right-linear grammars.
    ///
    /// Every way of splitting `input` into terminals is tried. Input that
    /// cannot be split into terminals is not in the language.
    pub fn recognizes(&self, input: &str) -> Result<bool, ConversionError> {
        self.ensure_right_linear()?;

        let end = input_end(input);
        let start = (0, Some(&self.start_symbol));

        let mut seen = IndexSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some((offset, nt)) = queue.pop_front() {
            let Some(nt) = nt else {
                if offset == end {
                    return Ok(true);
                }
                continue;
            };

            if offset == end && self.derives_empty(nt) {
                return Ok(true);
            }

            let terminals = self.terminals.iter().map(|t| &t.0);
            for (symbol, next_offset) in next_symbols(input, offset, terminals) {
                for rhs in self.alternatives(nt).into_iter().flatten() {
                    let next = match right_linear_shape(rhs) {
                        Some(RightLinear::Terminal(t)) if &t.0 == symbol => None,
                        Some(RightLinear::Step(t, target)) if &t.0 == symbol => Some(target),
                        _ => continue,
                    };

                    if seen.insert((next_offset, next)) {
                        queue.push_back((next_offset, next));
                    }
                }
            }
        }

        trace!("no derivation produces {input:?}");
        Ok(false)
    }

    /// Tracks every non-terminal a derivation of the consumed prefix can
    /// end in; `None` marks a derivation that has already terminated.
    pub fn recognizes_word(&self, word: &[Terminal]) -> Result<bool, ConversionError> {
        self.ensure_right_linear()?;

        let mut live: IndexSet<Option<&NonTerminal>> = IndexSet::from([Some(&self.start_symbol)]);

        for terminal in word {
            let mut next = IndexSet::new();

            for nt in live.iter().flatten() {
                for rhs in self.alternatives(nt).into_iter().flatten() {
                    match right_linear_shape(rhs) {
                        Some(RightLinear::Terminal(t)) if t == terminal => {
                            next.insert(None);
                        }
                        Some(RightLinear::Step(t, target)) if t == terminal => {
                            next.insert(Some(target));
                        }
                        _ => {}
                    }
                }
            }

            trace!("after {terminal}: {} live derivations", next.len());

            if next.is_empty() {
                return Ok(false);
            }
            live = next;
        }

        Ok(live.iter().any(|state| match state {
            None => true,
            Some(nt) => self.derives_empty(nt),
        }))
    }
}
