use log::{trace, warn};
use rand::Rng;

use crate::{
    grammar::{Grammar, NonTerminal, ProductionSymbol, Terminal},
    language::Word,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Number of nested non-terminal expansions before a branch is cut off.
    pub max_depth: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

impl Grammar {
    /// Derives one word from the start symbol, see [`Grammar::generate_from`].
    pub fn generate<R: Rng>(&self, rng: &mut R, config: GenerationConfig) -> Word<Terminal> {
        self.generate_from(&self.start_symbol, rng, config.max_depth)
    }

    /// Derives one word from `symbol`, picking uniformly among the
    /// alternatives of every non-terminal it meets.
    ///
    /// Only rules whose left-hand side is a single non-terminal take part.
    /// A non-terminal without such rules, or one met deeper than
    /// `max_depth`, contributes nothing to the word.
    pub fn generate_from<R: Rng>(
        &self,
        symbol: &NonTerminal,
        rng: &mut R,
        max_depth: usize,
    ) -> Word<Terminal> {
        let mut output = Vec::new();
        self.expand(symbol, rng, max_depth, &mut output);
        Word(output)
    }

    /// Generates `count` words independently.
    pub fn sample<R: Rng>(
        &self,
        rng: &mut R,
        config: GenerationConfig,
        count: usize,
    ) -> Vec<Word<Terminal>> {
        (0..count).map(|_| self.generate(&mut *rng, config)).collect()
    }

    fn expand<R: Rng>(
        &self,
        nt: &NonTerminal,
        rng: &mut R,
        depth_left: usize,
        output: &mut Vec<Terminal>,
    ) {
        if depth_left == 0 {
            trace!("depth bound reached at {nt}, truncating");
            return;
        }

        let Some(alternatives) = self.alternatives(nt).filter(|a| !a.is_empty()) else {
            warn!("no productions for {nt}, expanding to the empty word");
            return;
        };

        let rhs = &alternatives[rng.gen_range(0..alternatives.len())];
        trace!("applying {nt} → {rhs}");

        for symbol in rhs.iter() {
            match symbol {
                ProductionSymbol::Terminal(t) => output.push(t.clone()),
                ProductionSymbol::NonTerminal(next) => {
                    self.expand(next, rng, depth_left - 1, output)
                }
            }
        }
    }
}
