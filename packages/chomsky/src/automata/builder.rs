use indexmap::{IndexMap, IndexSet};

use crate::{
    automata::{finite_state::FiniteAutomaton, types::State},
    error::MalformedAutomaton,
    language::Symbol,
};

/// Collects states, symbols and transitions by name; everything is checked
/// at once in [`FiniteAutomatonBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct FiniteAutomatonBuilder {
    states: IndexSet<String>,
    alphabet: IndexSet<String>,
    start: Option<String>,
    accepting: IndexSet<String>,
    transitions: Vec<(String, String, String)>,
}

impl FiniteAutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&mut self, name: impl Into<String>) -> &mut Self {
        self.states.insert(name.into());
        self
    }

    pub fn symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.alphabet.insert(symbol.into());
        self
    }

    pub fn start(&mut self, name: impl Into<String>) -> &mut Self {
        self.start = Some(name.into());
        self
    }

    pub fn accepting(&mut self, name: impl Into<String>) -> &mut Self {
        self.accepting.insert(name.into());
        self
    }

    pub fn transition(
        &mut self,
        from: impl Into<String>,
        symbol: impl Into<String>,
        to: impl Into<String>,
    ) -> &mut Self {
        self.transitions
            .push((from.into(), symbol.into(), to.into()));
        self
    }

    fn check_state(&self, name: &str) -> Result<(), MalformedAutomaton> {
        if self.states.contains(name) {
            Ok(())
        } else {
            Err(MalformedAutomaton::UndeclaredState {
                state: name.to_owned(),
            })
        }
    }

    pub fn build(&self) -> Result<FiniteAutomaton, MalformedAutomaton> {
        if self
            .states
            .iter()
            .chain(&self.alphabet)
            .any(String::is_empty)
        {
            return Err(MalformedAutomaton::EmptyName);
        }

        let start = self
            .start
            .as_deref()
            .ok_or(MalformedAutomaton::MissingStartState)?;
        self.check_state(start)?;

        for state in &self.accepting {
            self.check_state(state)?;
        }

        for (from, symbol, to) in &self.transitions {
            self.check_state(from)?;
            self.check_state(to)?;

            if !self.alphabet.contains(symbol) {
                return Err(MalformedAutomaton::UndeclaredSymbol {
                    symbol: symbol.clone(),
                });
            }
        }

        let states = self
            .states
            .iter()
            .map(|name| State::with_name(name.as_str()))
            .map(|state| (state.id(), state))
            .collect::<IndexMap<_, _>>();
        let ids = states
            .iter()
            .map(|(&id, state)| (state.name().to_owned(), id))
            .collect::<IndexMap<_, _>>();

        let mut automaton = FiniteAutomaton {
            start_state: ids[start],
            final_states: self.accepting.iter().map(|name| ids[name.as_str()]).collect(),
            alphabet: self.alphabet.iter().map(Symbol::new).collect(),
            transitions: IndexMap::new(),
            states,
        };

        for (from, symbol, to) in &self.transitions {
            automaton.link(ids[from.as_str()], Symbol::new(symbol), ids[to.as_str()]);
        }

        Ok(automaton)
    }
}
