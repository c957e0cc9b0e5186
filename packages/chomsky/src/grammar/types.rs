use derive_more::Display;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::{
    error::MalformedGrammar,
    grammar::parse::split_production,
    language::{tokenize, Symbol, Tokens, Word, EPSILON},
};

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum ProductionSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl ProductionSymbol {
    pub fn is_non_terminal(&self) -> bool {
        matches!(self, ProductionSymbol::NonTerminal(_))
    }
}

impl NonTerminal {
    pub fn to_word(&self) -> Word<ProductionSymbol> {
        Word(vec![ProductionSymbol::NonTerminal(self.clone())])
    }
}

impl Word<ProductionSymbol> {
    /// The non-terminal this word consists of, if it is exactly one.
    pub fn as_non_terminal(&self) -> Option<&NonTerminal> {
        match self.0.as_slice() {
            [ProductionSymbol::NonTerminal(nt)] => Some(nt),
            _ => None,
        }
    }
}

pub type Productions = IndexMap<Word<ProductionSymbol>, IndexSet<Word<ProductionSymbol>>>;

/// A formal grammar `G = (VN, VT, P, S)`.
///
/// Left-hand sides are words so that context-sensitive and unrestricted
/// rules can be expressed; an empty right-hand side is an erasing rule.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub(crate) non_terminals: IndexSet<NonTerminal>,
    pub(crate) terminals: IndexSet<Terminal>,
    pub(crate) productions: Productions,
    pub(crate) start_symbol: NonTerminal,
}

impl Grammar {
    pub fn new(
        non_terminals: impl IntoIterator<Item = NonTerminal>,
        terminals: impl IntoIterator<Item = Terminal>,
        productions: Productions,
        start_symbol: NonTerminal,
    ) -> Result<Self, MalformedGrammar> {
        let non_terminals = non_terminals.into_iter().collect::<IndexSet<_>>();
        let terminals = terminals.into_iter().collect::<IndexSet<_>>();

        if !non_terminals.contains(&start_symbol) {
            return Err(MalformedGrammar::UndeclaredStartSymbol {
                start_symbol: start_symbol.to_string(),
            });
        }

        if let Some(shared) = terminals
            .iter()
            .find(|t| non_terminals.contains(&NonTerminal(t.0.clone())))
        {
            return Err(MalformedGrammar::OverlappingAlphabets {
                symbol: shared.to_string(),
            });
        }

        for (lhs, alternatives) in &productions {
            if !lhs.iter().any(ProductionSymbol::is_non_terminal) {
                return Err(MalformedGrammar::LhsWithoutNonTerminal {
                    lhs: lhs.to_string(),
                });
            }

            let undeclared = lhs
                .iter()
                .chain(alternatives.iter().flat_map(|rhs| rhs.iter()))
                .find(|symbol| match symbol {
                    ProductionSymbol::Terminal(t) => !terminals.contains(t),
                    ProductionSymbol::NonTerminal(nt) => !non_terminals.contains(nt),
                });

            if let Some(symbol) = undeclared {
                return Err(MalformedGrammar::UndeclaredSymbol {
                    lhs: lhs.to_string(),
                    symbol: symbol.to_string(),
                });
            }
        }

        Ok(Self {
            non_terminals,
            terminals,
            productions,
            start_symbol,
        })
    }

    /// Builds a grammar from textual rules such as `"A → bS | aB"`.
    ///
    /// Both sides must split into the declared symbols in exactly one way.
    /// A lone `ε` stands for the empty word and rules sharing a left-hand
    /// side are merged.
    pub fn from_productions(
        non_terminals: &[&str],
        terminals: &[&str],
        start_symbol: &str,
        productions: &[impl AsRef<str>],
    ) -> Result<Self, MalformedGrammar> {
        if start_symbol.is_empty() || non_terminals.iter().chain(terminals).any(|s| s.is_empty()) {
            return Err(MalformedGrammar::EmptySymbol);
        }

        let non_terminals = non_terminals
            .iter()
            .map(|s| NonTerminal(Symbol::new(*s)))
            .collect::<IndexSet<_>>();
        let terminals = terminals
            .iter()
            .map(|s| Terminal(Symbol::new(*s)))
            .collect::<IndexSet<_>>();

        let parsed = {
            // a symbol declared on both sides is reported by `new`, not as ambiguous
            let symbols = non_terminals
                .iter()
                .map(|nt| &nt.0)
                .chain(terminals.iter().map(|t| &t.0))
                .collect::<IndexSet<_>>();

            let to_word = |text: &str| -> Result<Word<ProductionSymbol>, MalformedGrammar> {
                if text == EPSILON {
                    return Ok(Word::empty());
                }

                let symbols = match tokenize(text, symbols.iter().copied()) {
                    Tokens::Unique(symbols) => symbols,
                    Tokens::Invalid => {
                        return Err(MalformedGrammar::UnknownSymbols {
                            text: text.to_owned(),
                        })
                    }
                    Tokens::Ambiguous => {
                        return Err(MalformedGrammar::AmbiguousSymbols {
                            text: text.to_owned(),
                        })
                    }
                };

                Ok(Word::new(symbols.into_iter().map(|symbol| {
                    let nt = NonTerminal(symbol);
                    if non_terminals.contains(&nt) {
                        ProductionSymbol::NonTerminal(nt)
                    } else {
                        ProductionSymbol::Terminal(Terminal(nt.0))
                    }
                })))
            };

            let mut parsed = Productions::new();
            for line in productions {
                let (lhs, alternatives) = split_production(line.as_ref())?;

                let entry = parsed.entry(to_word(lhs)?).or_insert_with(IndexSet::new);
                for rhs in alternatives {
                    entry.insert(to_word(rhs)?);
                }
            }

            parsed
        };

        Self::new(
            non_terminals,
            terminals,
            parsed,
            NonTerminal(Symbol::new(start_symbol)),
        )
    }

    pub fn start_symbol(&self) -> &NonTerminal {
        &self.start_symbol
    }

    pub fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &IndexSet<Terminal> {
        &self.terminals
    }

    pub fn productions(&self) -> &Productions {
        &self.productions
    }

    /// Right-hand sides of the rules whose left-hand side is exactly `nt`.
    pub fn alternatives(&self, nt: &NonTerminal) -> Option<&IndexSet<Word<ProductionSymbol>>> {
        self.productions.get(&nt.to_word())
    }

    pub fn definition(&self) -> String {
        let mut definition = format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\n",
            self.non_terminals.iter().join(", "),
            self.terminals.iter().join(", "),
            self.start_symbol
        );

        definition += "P = {\n";

        for (lhs, alternatives) in &self.productions {
            definition += &format!("  {} → {}\n", lhs, alternatives.iter().join(" | "));
        }

        definition += "}\n";

        definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_alternatives_and_epsilon() {
        let grammar =
            Grammar::from_productions(&["S", "A"], &["a", "b"], "S", &["S → aA | ε", "A → b"])
                .unwrap();

        let s = NonTerminal(Symbol::new("S"));
        let alternatives = grammar.alternatives(&s).unwrap();

        assert_eq!(alternatives.len(), 2);
        assert!(alternatives.contains(&Word::empty()));
        assert_eq!(alternatives[0].to_string(), "aA");
        assert_eq!(
            alternatives[0].0[1],
            ProductionSymbol::NonTerminal(NonTerminal(Symbol::new("A")))
        );
    }

    #[test]
    fn merges_rules_with_the_same_lhs() {
        let grammar =
            Grammar::from_productions(&["S"], &["a", "b"], "S", &["S → a", "S → b | a"]).unwrap();

        assert_eq!(grammar.productions().len(), 1);
        assert_eq!(grammar.productions()[0].len(), 2);
    }

    #[test]
    fn parses_multi_character_symbols() {
        let grammar =
            Grammar::from_productions(&["q0", "q1"], &["a"], "q0", &["q0 → a q1", "q1 → a"])
                .unwrap();

        let q0 = NonTerminal(Symbol::new("q0"));
        assert_eq!(grammar.alternatives(&q0).unwrap()[0].len(), 2);
    }

    #[test]
    fn rejects_undeclared_start_symbol() {
        let error = Grammar::from_productions(&["S"], &["a"], "X", &["S → a"]).unwrap_err();

        assert_eq!(
            error,
            MalformedGrammar::UndeclaredStartSymbol {
                start_symbol: "X".to_owned()
            }
        );
    }

    #[test]
    fn rejects_unknown_symbols_in_text() {
        let error = Grammar::from_productions(&["S"], &["a"], "S", &["S → ab"]).unwrap_err();

        assert_eq!(
            error,
            MalformedGrammar::UnknownSymbols {
                text: "ab".to_owned()
            }
        );
    }

    #[test]
    fn splits_rules_that_a_longest_match_would_miss() {
        let grammar =
            Grammar::from_productions(&["S"], &["a", "ab", "bc"], "S", &["S → abc"]).unwrap();

        let s = NonTerminal(Symbol::new("S"));
        let rhs = &grammar.alternatives(&s).unwrap()[0];
        assert_eq!(
            rhs.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["a", "bc"]
        );
    }

    #[test]
    fn rejects_ambiguous_rule_text() {
        let error =
            Grammar::from_productions(&["S"], &["a", "b", "ab"], "S", &["S → ab"]).unwrap_err();

        assert_eq!(
            error,
            MalformedGrammar::AmbiguousSymbols {
                text: "ab".to_owned()
            }
        );
    }

    #[test]
    fn rejects_overlapping_alphabets() {
        let error = Grammar::from_productions(&["S", "a"], &["a"], "S", &["S → a"]).unwrap_err();

        assert!(matches!(error, MalformedGrammar::OverlappingAlphabets { .. }));
    }

    #[test]
    fn rejects_lhs_without_non_terminal() {
        let error = Grammar::from_productions(&["S"], &["a"], "S", &["a → S"]).unwrap_err();

        assert_eq!(
            error,
            MalformedGrammar::LhsWithoutNonTerminal {
                lhs: "a".to_owned()
            }
        );
    }

    #[test]
    fn rejects_undeclared_symbol_in_productions() {
        let s = NonTerminal(Symbol::new("S"));
        let b = Terminal(Symbol::new("b"));
        let productions = Productions::from([(
            s.to_word(),
            IndexSet::from([Word(vec![ProductionSymbol::Terminal(b)])]),
        )]);

        let error = Grammar::new([s.clone()], [Terminal(Symbol::new("a"))], productions, s)
            .unwrap_err();

        assert_eq!(
            error,
            MalformedGrammar::UndeclaredSymbol {
                lhs: "S".to_owned(),
                symbol: "b".to_owned()
            }
        );
    }

    #[test]
    fn rejects_malformed_rule_text() {
        let error = Grammar::from_productions(&["S"], &["a"], "S", &["S a"]).unwrap_err();

        assert!(matches!(error, MalformedGrammar::InvalidProduction { .. }));
    }

    #[test]
    fn definition_lists_all_components() {
        let grammar =
            Grammar::from_productions(&["S", "A"], &["a", "b"], "S", &["S → aA", "A → b | ε"])
                .unwrap();

        assert_eq!(
            grammar.definition(),
            "G = ({S, A}, {a, b}, P, S)\n\nP = {\n  S → aA\n  A → b | ε\n}\n"
        );
    }
}
