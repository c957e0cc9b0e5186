use std::collections::{BTreeSet, VecDeque};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::{debug, trace};
use tabled::{builder::Builder, settings::Style};

use crate::{
    automata::{
        builder::FiniteAutomatonBuilder,
        types::{State, StateId},
    },
    error::MalformedAutomaton,
    language::{input_end, next_symbols, Symbol},
};

pub type Transitions = IndexMap<StateId, IndexMap<Symbol, IndexSet<StateId>>>;

/// A finite automaton whose transition relation maps every `(state, symbol)`
/// pair to a set of destinations. A DFA is the case where every such set
/// holds a single state; a missing pair rejects.
#[derive(Debug, Clone)]
pub struct FiniteAutomaton {
    pub(crate) states: IndexMap<StateId, State>,
    pub(crate) alphabet: IndexSet<Symbol>,
    pub(crate) start_state: StateId,
    pub(crate) final_states: IndexSet<StateId>,
    pub(crate) transitions: Transitions,
}

impl FiniteAutomaton {
    pub(crate) fn new(start_state: State) -> Self {
        let start_state_id = start_state.id();

        FiniteAutomaton {
            start_state: start_state_id,
            states: IndexMap::from([(start_state_id, start_state)]),
            alphabet: IndexSet::new(),
            transitions: IndexMap::new(),
            final_states: IndexSet::new(),
        }
    }

    pub(crate) fn new_state(&mut self, name: impl Into<String>) -> StateId {
        let state = State::with_name(name);
        let id = state.id();

        self.states.insert(id, state);

        id
    }

    pub(crate) fn make_final(&mut self, state: StateId) {
        self.final_states.insert(state);
    }

    pub(crate) fn link(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.alphabet.insert(symbol.clone());
        self.transitions
            .entry(from)
            .or_insert_with(IndexMap::new)
            .entry(symbol)
            .or_insert_with(IndexSet::new)
            .insert(to);
    }

    /// Builds an automaton in one go; states, start and accepting states are
    /// given by name and every transition lists its destinations.
    pub fn from_definition(
        states: &[&str],
        alphabet: &[&str],
        start_state: &str,
        final_states: &[&str],
        transitions: &[(&str, &str, &[&str])],
    ) -> Result<Self, MalformedAutomaton> {
        let mut builder = FiniteAutomatonBuilder::new();

        for &state in states {
            builder.state(state);
        }
        for &symbol in alphabet {
            builder.symbol(symbol);
        }
        builder.start(start_state);
        for &state in final_states {
            builder.accepting(state);
        }
        for &(from, symbol, to) in transitions {
            for &to in to {
                builder.transition(from, symbol, to);
            }
        }

        builder.build()
    }

    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.states
            .values()
            .find(|state| state.name() == name)
            .map(State::id)
    }

    pub fn alphabet(&self) -> &IndexSet<Symbol> {
        &self.alphabet
    }

    pub fn start_state(&self) -> StateId {
        self.start_state
    }

    pub fn accepting_states(&self) -> &IndexSet<StateId> {
        &self.final_states
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    pub fn transitions(&self) -> &Transitions {
        &self.transitions
    }

    pub fn transitions_from(&self, state: StateId) -> Option<&IndexMap<Symbol, IndexSet<StateId>>> {
        self.transitions.get(&state)
    }

    pub fn destinations(&self, state: StateId, symbol: &Symbol) -> Option<&IndexSet<StateId>> {
        self.transitions_from(state)
            .and_then(|transitions| transitions.get(symbol))
    }

    fn name_of(&self, state: StateId) -> &str {
        self.states.get(&state).map_or("?", State::name)
    }

    /// No `(state, symbol)` pair branches. Missing pairs are allowed.
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .values()
            .flat_map(IndexMap::values)
            .all(|next_states| next_states.len() == 1)
    }

    /// Runs the automaton over every way `input` splits into alphabet
    /// symbols, so multi-character symbols never need a separator. Input
    /// that is not made of alphabet symbols is rejected.
    pub fn accepts(&self, input: &str) -> bool {
        let end = input_end(input);
        let start = (0, self.start_state);

        let mut seen = IndexSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some((offset, state)) = queue.pop_front() {
            if offset == end && self.is_accepting(state) {
                return true;
            }

            for (symbol, next_offset) in next_symbols(input, offset, &self.alphabet) {
                for &next in self.destinations(state, symbol).into_iter().flatten() {
                    if seen.insert((next_offset, next)) {
                        trace!("δ({}, {symbol}) = {}", self.name_of(state), self.name_of(next));
                        queue.push_back((next_offset, next));
                    }
                }
            }
        }

        trace!("no run over {input:?} ends in an accepting state");
        false
    }

    pub fn accepts_word(&self, word: &[Symbol]) -> bool {
        if self.is_deterministic() {
            self.walk(word)
        } else {
            self.simulate(word)
        }
    }

    fn walk(&self, word: &[Symbol]) -> bool {
        let mut current = self.start_state;
        trace!("starting at {}", self.name_of(current));

        for symbol in word {
            let Some(&next) = self
                .destinations(current, symbol)
                .and_then(IndexSet::first)
            else {
                trace!("no transition δ({}, {symbol}), rejecting", self.name_of(current));
                return false;
            };

            trace!("δ({}, {symbol}) = {}", self.name_of(current), self.name_of(next));
            current = next;
        }

        self.is_accepting(current)
    }

    fn simulate(&self, word: &[Symbol]) -> bool {
        let mut current = IndexSet::from([self.start_state]);

        for symbol in word {
            current = current
                .iter()
                .filter_map(|&state| self.destinations(state, symbol))
                .flatten()
                .copied()
                .collect();

            trace!(
                "after {symbol}: {{{}}}",
                current.iter().map(|&state| self.name_of(state)).join(", ")
            );

            if current.is_empty() {
                return false;
            }
        }

        current.iter().any(|&state| self.is_accepting(state))
    }

    /// Subset construction over the reachable subsets only. Each DFA state is
    /// named after its subset, e.g. `{q1, q2}`, with members in declaration
    /// order. Empty subsets are not materialized.
    pub fn to_dfa(&self) -> FiniteAutomaton {
        let subset_name = |subset: &BTreeSet<usize>| {
            format!(
                "{{{}}}",
                subset
                    .iter()
                    .filter_map(|&index| self.states.get_index(index))
                    .map(|(_, state)| state.name())
                    .join(", ")
            )
        };

        let start_set = self
            .states
            .get_index_of(&self.start_state)
            .into_iter()
            .collect::<BTreeSet<_>>();

        let mut dfa = FiniteAutomaton::new(State::with_name(subset_name(&start_set)));
        dfa.alphabet = self.alphabet.clone();

        let mut state_map = IndexMap::from([(start_set.clone(), dfa.start_state)]);
        let mut queue = VecDeque::from([start_set]);

        while let Some(current_set) = queue.pop_front() {
            let dfa_state = state_map[&current_set];

            let members = current_set
                .iter()
                .filter_map(|&index| self.states.get_index(index))
                .map(|(&id, _)| id)
                .collect::<Vec<_>>();

            if members.iter().any(|&state| self.is_accepting(state)) {
                dfa.make_final(dfa_state);
            }

            for symbol in &self.alphabet {
                let next_set = members
                    .iter()
                    .filter_map(|&state| self.destinations(state, symbol))
                    .flatten()
                    .filter_map(|next| self.states.get_index_of(next))
                    .collect::<BTreeSet<_>>();

                if next_set.is_empty() {
                    continue;
                }

                let next_state = *state_map.entry(next_set.clone()).or_insert_with(|| {
                    queue.push_back(next_set.clone());
                    dfa.new_state(subset_name(&next_set))
                });

                debug!(
                    "δ({}, {symbol}) = {}",
                    subset_name(&current_set),
                    subset_name(&next_set)
                );

                dfa.link(dfa_state, symbol.clone(), next_state);
            }
        }

        dfa
    }

    fn format_states(&self, states: &IndexSet<StateId>) -> String {
        match states.len() {
            1 => self.name_of(states[0]).to_owned(),
            _ => format!(
                "{{{}}}",
                states.iter().map(|&state| self.name_of(state)).join(", ")
            ),
        }
    }

    /// Markdown transition table; `→` marks the start state and `*` the
    /// accepting ones.
    pub fn transition_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(
            std::iter::once("δ".to_owned()).chain(self.alphabet.iter().map(ToString::to_string)),
        );

        for (&id, state) in &self.states {
            let prefix = if id == self.start_state { "→" } else { "" };
            let suffix = if self.is_accepting(id) { "*" } else { "" };

            builder.push_record(
                std::iter::once(format!("{}{}{}", prefix, state.name(), suffix)).chain(
                    self.alphabet.iter().map(|symbol| {
                        self.destinations(id, symbol)
                            .map(|next_states| self.format_states(next_states))
                            .unwrap_or_default()
                    }),
                ),
            );
        }

        let mut table = builder.build();
        table.with(Style::markdown());

        table.to_string()
    }

    pub fn definition(&self) -> String {
        let mut definition = "#states\n".to_owned();

        for state in self.states.values() {
            definition.push_str(&format!("{}\n", state.name()));
        }

        definition.push_str(&format!("#initial\n{}\n", self.name_of(self.start_state)));

        definition.push_str("#accepting\n");
        for &state in &self.final_states {
            definition.push_str(&format!("{}\n", self.name_of(state)));
        }

        definition.push_str("#alphabet\n");
        for symbol in &self.alphabet {
            definition.push_str(&format!("{}\n", symbol));
        }

        definition.push_str("#transitions\n");
        for (&state, state_transitions) in &self.transitions {
            for (symbol, next_states) in state_transitions {
                definition.push_str(&format!(
                    "{}:{}>{}\n",
                    self.name_of(state),
                    symbol,
                    next_states
                        .iter()
                        .map(|&next_state| self.name_of(next_state))
                        .join(",")
                ));
            }
        }

        definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::words_up_to;

    fn lab_automaton() -> FiniteAutomaton {
        FiniteAutomaton::from_definition(
            &["q0", "q1", "q2", "q3"],
            &["a", "b", "c"],
            "q0",
            &["q3"],
            &[
                ("q0", "a", &["q1"]),
                ("q1", "b", &["q2"]),
                ("q2", "c", &["q0"]),
                ("q1", "a", &["q3"]),
                ("q0", "b", &["q2"]),
                ("q2", "c", &["q3"]),
            ],
        )
        .unwrap()
    }

    fn ends_in_ab() -> FiniteAutomaton {
        FiniteAutomaton::from_definition(
            &["q0", "q1", "q2"],
            &["a", "b"],
            "q0",
            &["q2"],
            &[
                ("q0", "a", &["q0", "q1"]),
                ("q0", "b", &["q0"]),
                ("q1", "b", &["q2"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lab_automaton_branches_on_q2_c() {
        let automaton = lab_automaton();
        let q2 = automaton.state_by_name("q2").unwrap();

        assert!(!automaton.is_deterministic());
        assert_eq!(
            automaton
                .destinations(q2, &Symbol::new("c"))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn automaton_without_branching_is_deterministic() {
        let automaton = FiniteAutomaton::from_definition(
            &["q0", "q1", "q2", "q3"],
            &["a", "b", "c"],
            "q0",
            &["q3"],
            &[
                ("q0", "a", &["q1"]),
                ("q1", "b", &["q2"]),
                ("q1", "a", &["q3"]),
                ("q0", "b", &["q2"]),
                ("q2", "c", &["q3"]),
            ],
        )
        .unwrap();

        assert!(automaton.is_deterministic());
        assert!(automaton.accepts("aa"));
        assert!(automaton.accepts("bc"));
        assert!(!automaton.accepts("ab"));
        assert!(!automaton.accepts("c"));
    }

    #[test]
    fn lab_automaton_acceptance() {
        let automaton = lab_automaton();

        assert!(automaton.accepts("aa"));
        assert!(!automaton.accepts("ab"));
        assert!(automaton.accepts("abc"));
        assert!(automaton.accepts("abcaa"));
        assert!(!automaton.accepts(""));
    }

    #[test]
    fn rejects_symbols_outside_the_alphabet() {
        let automaton = lab_automaton();

        assert!(!automaton.accepts("ax"));
    }

    #[test]
    fn accepts_multi_character_symbols_without_separators() {
        let automaton = FiniteAutomaton::from_definition(
            &["q0", "q1", "q2"],
            &["a", "ab", "bc"],
            "q0",
            &["q2"],
            &[("q0", "a", &["q1"]), ("q1", "bc", &["q2"])],
        )
        .unwrap();

        let word = [Symbol::new("a"), Symbol::new("bc")];
        assert!(automaton.accepts_word(&word));
        assert!(automaton.accepts("abc"));
        assert!(automaton.accepts("a bc"));
        assert!(!automaton.accepts("ab"));
        assert!(!automaton.accepts("abcbc"));
    }

    #[test]
    fn accepts_agrees_with_accepts_word() {
        let nfa = ends_in_ab();

        for word in words_up_to(nfa.alphabet(), 6) {
            let text = word.iter().map(Symbol::as_str).collect::<String>();
            assert_eq!(nfa.accepts(&text), nfa.accepts_word(&word), "{text:?}");
        }
    }

    #[test]
    fn nfa_acceptance_explores_every_branch() {
        let nfa = ends_in_ab();

        assert!(!nfa.is_deterministic());
        assert!(nfa.accepts("ab"));
        assert!(nfa.accepts("aab"));
        assert!(nfa.accepts("babab"));
        assert!(!nfa.accepts("aba"));
        assert!(!nfa.accepts("b"));
    }

    #[test]
    fn subset_construction_merges_branching_destinations() {
        let nfa = FiniteAutomaton::from_definition(
            &["q0", "q1", "q2"],
            &["a"],
            "q0",
            &["q2"],
            &[("q0", "a", &["q1", "q2"])],
        )
        .unwrap();

        assert!(!nfa.is_deterministic());

        let dfa = nfa.to_dfa();
        let start = dfa.start_state();
        let merged = dfa.state_by_name("{q1, q2}").unwrap();

        assert!(dfa.is_deterministic());
        assert_eq!(dfa.state(start).unwrap().name(), "{q0}");
        assert_eq!(
            dfa.destinations(start, &Symbol::new("a")),
            Some(&IndexSet::from([merged]))
        );
        assert!(dfa.is_accepting(merged));
        assert!(!dfa.is_accepting(start));
        assert_eq!(dfa.states().count(), 2);
    }

    #[test]
    fn subset_construction_preserves_language() {
        for nfa in [ends_in_ab(), lab_automaton()] {
            let dfa = nfa.to_dfa();

            assert!(dfa.is_deterministic());
            for word in words_up_to(nfa.alphabet(), 7) {
                assert_eq!(nfa.accepts_word(&word), dfa.accepts_word(&word), "{word:?}");
            }
        }
    }

    #[test]
    fn subset_construction_only_materializes_reachable_subsets() {
        let dfa = ends_in_ab().to_dfa();

        let names = dfa.states().map(State::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["{q0}", "{q0, q1}", "{q0, q2}"]);
    }

    #[test]
    fn transition_table_marks_start_and_accepting_states() {
        let table = ends_in_ab().transition_table();

        assert!(table.contains("→q0"));
        assert!(table.contains("q2*"));
        assert!(table.contains("{q0, q1}"));
    }

    #[test]
    fn definition_lists_transitions() {
        let definition = ends_in_ab().definition();

        assert!(definition.starts_with("#states\nq0\nq1\nq2\n#initial\nq0\n#accepting\nq2\n"));
        assert!(definition.contains("q0:a>q0,q1\n"));
    }
}
