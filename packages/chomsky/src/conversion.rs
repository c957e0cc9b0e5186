//! The bridge between right-linear grammars and finite automata.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::{
    automata::{FiniteAutomaton, State, StateId},
    error::ConversionError,
    grammar::{
        right_linear_shape, Grammar, NonTerminal, ProductionSymbol, Productions, RightLinear,
        Terminal,
    },
    language::{Symbol, Word},
};

/// Name of the state added for completed derivations.
const FINAL_STATE: &str = "F";

impl TryFrom<&Grammar> for FiniteAutomaton {
    type Error = ConversionError;

    /// Every non-terminal becomes a state and one fresh accepting state
    /// stands for a finished derivation: `A → aB` gives `δ(A, a) ∋ B` and
    /// `A → a` gives `δ(A, a) ∋ F`. `S → ε` makes the start state accepting.
    fn try_from(grammar: &Grammar) -> Result<Self, Self::Error> {
        grammar.ensure_right_linear()?;

        let start_symbol = grammar.start_symbol();
        let mut automaton = FiniteAutomaton::new(State::with_name(start_symbol.to_string()));

        let mut state_map = IndexMap::from([(start_symbol.clone(), automaton.start_state())]);
        for nt in grammar.non_terminals() {
            state_map
                .entry(nt.clone())
                .or_insert_with(|| automaton.new_state(nt.to_string()));
        }

        let mut final_name = FINAL_STATE.to_owned();
        while grammar
            .non_terminals()
            .iter()
            .any(|nt| nt.0.as_str() == final_name)
        {
            final_name.push('\'');
        }

        let final_state = automaton.new_state(final_name.clone());
        automaton.make_final(final_state);

        automaton.alphabet = grammar.terminals().iter().map(|t| t.0.clone()).collect();

        for (lhs, alternatives) in grammar.productions() {
            let from = match lhs.as_non_terminal() {
                Some(nt) => state_map[nt],
                None => {
                    return Err(ConversionError::NotRightLinear {
                        classification: grammar.classify(),
                    })
                }
            };

            for rhs in alternatives {
                match right_linear_shape(rhs) {
                    Some(RightLinear::Step(t, next)) => {
                        debug!("adding transition δ({lhs}, {t}) = {next}");
                        automaton.link(from, t.0.clone(), state_map[next]);
                    }
                    Some(RightLinear::Terminal(t)) => {
                        debug!("adding transition δ({lhs}, {t}) = {final_name}");
                        automaton.link(from, t.0.clone(), final_state);
                    }
                    Some(RightLinear::Empty) => {
                        debug!("{lhs} derives ε, marking it accepting");
                        automaton.make_final(from);
                    }
                    None => {
                        return Err(ConversionError::NotRightLinear {
                            classification: grammar.classify(),
                        })
                    }
                }
            }
        }

        Ok(automaton)
    }
}

impl From<&FiniteAutomaton> for Grammar {
    /// Every state becomes a non-terminal and `δ(p, a) ∋ q` becomes
    /// `p → aq`, plus `p → a` when `q` is accepting. The only erasing rule
    /// is `S → ε` for an accepting start state, so the result is always
    /// right-linear. State names clashing with a symbol are primed.
    fn from(automaton: &FiniteAutomaton) -> Self {
        let mut names: IndexMap<StateId, NonTerminal> = IndexMap::new();

        for state in automaton.states() {
            let mut name = state.name().to_owned();
            while automaton.alphabet().iter().any(|s| s.as_str() == name)
                || names.values().any(|nt| nt.0.as_str() == name)
            {
                name.push('\'');
            }

            names.insert(state.id(), NonTerminal(Symbol::new(name)));
        }

        let mut productions = Productions::new();

        for (from, state_transitions) in automaton.transitions() {
            let lhs = names[from].to_word();

            for (symbol, next_states) in state_transitions {
                let terminal = ProductionSymbol::Terminal(Terminal(symbol.clone()));

                for next_state in next_states {
                    let alternatives = productions.entry(lhs.clone()).or_insert_with(IndexSet::new);

                    alternatives.insert(Word(vec![
                        terminal.clone(),
                        ProductionSymbol::NonTerminal(names[next_state].clone()),
                    ]));
                    debug!("adding production {lhs} → {terminal}{}", names[next_state]);

                    if automaton.is_accepting(*next_state) {
                        alternatives.insert(Word(vec![terminal.clone()]));
                        debug!("adding production {lhs} → {terminal}");
                    }
                }
            }
        }

        let start_symbol = names[&automaton.start_state()].clone();
        if automaton.is_accepting(automaton.start_state()) {
            productions
                .entry(start_symbol.to_word())
                .or_insert_with(IndexSet::new)
                .insert(Word::empty());
        }

        Grammar {
            non_terminals: names.into_values().collect(),
            terminals: automaton.alphabet().iter().cloned().map(Terminal).collect(),
            productions,
            start_symbol,
        }
    }
}

impl Grammar {
    /// Fails with [`ConversionError::NotRightLinear`] unless the grammar is
    /// Type 3.
    pub fn to_automaton(&self) -> Result<FiniteAutomaton, ConversionError> {
        FiniteAutomaton::try_from(self)
    }
}

impl FiniteAutomaton {
    pub fn to_grammar(&self) -> Grammar {
        Grammar::from(self)
    }
}
