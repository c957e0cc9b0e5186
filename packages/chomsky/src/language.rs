use std::fmt;

use derive_more::Display;

/// Textual marker for the empty word.
pub const EPSILON: &str = "ε";

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// # Panics
    ///
    /// Panics if `s` is empty.
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        assert!(!s.is_empty());
        Symbol(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word<T>(pub Vec<T>);

impl<T> Word<T> {
    pub fn new(symbols: impl IntoIterator<Item = T>) -> Self {
        Word(symbols.into_iter().collect())
    }

    pub fn empty() -> Self {
        Word(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Word<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(EPSILON);
        }

        for symbol in &self.0 {
            write!(f, "{symbol}")?;
        }

        Ok(())
    }
}

/// Byte offset where the meaningful part of `input` ends.
pub(crate) fn input_end(input: &str) -> usize {
    input.trim_end().len()
}

/// Every symbol that `input` continues with at byte `offset`, paired with
/// the offset right after it. Whitespace in front of the symbol is skipped.
pub(crate) fn next_symbols<'a>(
    input: &str,
    offset: usize,
    symbols: impl IntoIterator<Item = &'a Symbol>,
) -> Vec<(&'a Symbol, usize)> {
    let rest = &input[offset..];
    let start = offset + (rest.len() - rest.trim_start().len());

    symbols
        .into_iter()
        .filter(|symbol| input[start..].starts_with(symbol.as_str()))
        .map(|symbol| (symbol, start + symbol.as_str().len()))
        .collect()
}

/// The outcome of splitting a string into declared symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokens {
    /// No split exists.
    Invalid,
    Unique(Vec<Symbol>),
    /// At least two different splits exist.
    Ambiguous,
}

/// Splits `input` into `symbols`, considering every possible split.
///
/// Whitespace between symbols is skipped.
pub fn tokenize<'a>(input: &str, symbols: impl IntoIterator<Item = &'a Symbol>) -> Tokens {
    let symbols = symbols.into_iter().collect::<Vec<_>>();
    let end = input_end(input);

    // splits[i]: how many ways `input[i..]` splits, saturating at 2
    let mut splits = vec![0usize; end + 1];
    splits[end] = 1;
    for offset in (0..end).rev().filter(|&offset| input.is_char_boundary(offset)) {
        let count = next_symbols(input, offset, symbols.iter().copied())
            .into_iter()
            .map(|(_, next)| splits.get(next).copied().unwrap_or(0))
            .sum::<usize>();
        splits[offset] = count.min(2);
    }

    match splits[0] {
        0 => Tokens::Invalid,
        1 => {
            let mut word = Vec::new();
            let mut offset = 0;

            while offset < end {
                let Some((symbol, next)) = next_symbols(input, offset, symbols.iter().copied())
                    .into_iter()
                    .find(|&(_, next)| splits.get(next) == Some(&1))
                else {
                    return Tokens::Invalid;
                };

                word.push(symbol.clone());
                offset = next;
            }

            Tokens::Unique(word)
        }
        _ => Tokens::Ambiguous,
    }
}

/// Every word over `alphabet` of length at most `max_len`, shortest first.
#[cfg(test)]
pub(crate) fn words_up_to<'a>(
    alphabet: impl IntoIterator<Item = &'a Symbol>,
    max_len: usize,
) -> Vec<Vec<Symbol>> {
    use itertools::{repeat_n, Itertools};

    let alphabet = alphabet.into_iter().cloned().collect::<Vec<_>>();

    (0..=max_len)
        .flat_map(|len| {
            repeat_n(alphabet.iter().cloned(), len)
                .multi_cartesian_product()
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|name| Symbol::new(*name)).collect()
    }

    #[test]
    fn tokenize_finds_the_only_split() {
        let alphabet = symbols(&["q", "q1", "a"]);

        assert_eq!(
            tokenize("aq1q", &alphabet),
            Tokens::Unique(symbols(&["a", "q1", "q"]))
        );
    }

    #[test]
    fn tokenize_backtracks_past_dead_end_prefixes() {
        let alphabet = symbols(&["a", "ab", "bc"]);

        assert_eq!(
            tokenize("abc", &alphabet),
            Tokens::Unique(symbols(&["a", "bc"]))
        );
    }

    #[test]
    fn tokenize_skips_whitespace_between_symbols() {
        let alphabet = symbols(&["a", "b"]);

        assert_eq!(
            tokenize(" a b  a ", &alphabet),
            Tokens::Unique(symbols(&["a", "b", "a"]))
        );
        assert_eq!(tokenize("", &alphabet), Tokens::Unique(Vec::new()));
    }

    #[test]
    fn tokenize_rejects_unknown_input() {
        let alphabet = symbols(&["a", "b"]);

        assert_eq!(tokenize("abc", &alphabet), Tokens::Invalid);
    }

    #[test]
    fn tokenize_reports_ambiguous_input() {
        let alphabet = symbols(&["a", "b", "ab"]);

        assert_eq!(tokenize("ab", &alphabet), Tokens::Ambiguous);
        assert_eq!(tokenize("ba", &alphabet), Tokens::Unique(symbols(&["b", "a"])));
    }

    #[test]
    fn next_symbols_lists_every_prefix() {
        let alphabet = symbols(&["a", "ab", "bc"]);

        let next = next_symbols(" abc", 0, &alphabet)
            .into_iter()
            .map(|(symbol, offset)| (symbol.as_str(), offset))
            .collect::<Vec<_>>();

        assert_eq!(next, vec![("a", 2), ("ab", 3)]);
    }

    #[test]
    fn empty_word_displays_as_epsilon() {
        assert_eq!(Word::<Symbol>::empty().to_string(), EPSILON);
        assert_eq!(Word::new(symbols(&["a", "B"])).to_string(), "aB");
    }
}
