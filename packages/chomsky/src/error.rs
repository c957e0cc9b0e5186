use derive_more::{Display, Error};

use crate::grammar::ChomskyType;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum MalformedGrammar {
    #[display("symbols must not be empty")]
    EmptySymbol,
    #[display("start symbol `{start_symbol}` is not a declared non-terminal")]
    UndeclaredStartSymbol { start_symbol: String },
    #[display("`{symbol}` is declared both as a terminal and as a non-terminal")]
    OverlappingAlphabets { symbol: String },
    #[display("left-hand side `{lhs}` contains no non-terminal")]
    LhsWithoutNonTerminal { lhs: String },
    #[display("production for `{lhs}` uses undeclared symbol `{symbol}`")]
    UndeclaredSymbol { lhs: String, symbol: String },
    #[display("`{text}` cannot be split into declared symbols")]
    UnknownSymbols { text: String },
    #[display("`{text}` splits into declared symbols in more than one way")]
    AmbiguousSymbols { text: String },
    #[display("invalid production `{line}`, expected `lhs → rhs | ...`")]
    InvalidProduction { line: String },
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum MalformedAutomaton {
    #[display("state and symbol names must not be empty")]
    EmptyName,
    #[display("no start state was set")]
    MissingStartState,
    #[display("state `{state}` is not declared")]
    UndeclaredState { state: String },
    #[display("symbol `{symbol}` is not in the alphabet")]
    UndeclaredSymbol { symbol: String },
}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    #[display("grammar is not right-linear ({classification})")]
    NotRightLinear { classification: ChomskyType },
}
