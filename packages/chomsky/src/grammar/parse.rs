use winnow::{
    ascii::space0,
    combinator::{delimited, separated, separated_pair},
    token::take_till,
    ModalResult, Parser,
};

use crate::error::MalformedGrammar;

fn side<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    delimited(space0, take_till(1.., |c: char| c == '|' || c == '→'), space0)
        .map(str::trim)
        .parse_next(input)
}

fn production<'s>(input: &mut &'s str) -> ModalResult<(&'s str, Vec<&'s str>)> {
    separated_pair(side, "→", separated(1.., side, '|')).parse_next(input)
}

/// Splits `lhs → rhs1 | rhs2 | ...` into its trimmed parts.
pub(crate) fn split_production(line: &str) -> Result<(&str, Vec<&str>), MalformedGrammar> {
    production
        .parse(line)
        .map_err(|_| MalformedGrammar::InvalidProduction {
            line: line.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lhs_and_alternatives() {
        assert_eq!(
            split_production("A → bS | aB").unwrap(),
            ("A", vec!["bS", "aB"])
        );
        assert_eq!(split_production("S→ε").unwrap(), ("S", vec!["ε"]));
    }

    #[test]
    fn rejects_missing_arrow_and_empty_alternatives() {
        assert!(split_production("A bS").is_err());
        assert!(split_production("A → bS |").is_err());
        assert!(split_production("→ a").is_err());
    }
}
