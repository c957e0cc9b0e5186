use anyhow::Result;
use chomsky::{
    automata::{FiniteAutomaton, FiniteAutomatonBuilder},
    grammar::{GenerationConfig, Grammar},
};
use clap::Parser;
use itertools::Itertools;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(version, about = "Replays the regular grammar and finite automaton labs")]
struct Args {
    /// Seed for string generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum nesting of non-terminal expansions
    #[arg(long, default_value_t = GenerationConfig::default().max_depth)]
    max_depth: usize,

    /// Number of strings to generate
    #[arg(long, default_value_t = 5)]
    count: usize,

    /// Words to test against the automata (repeatable)
    #[arg(long = "word")]
    words: Vec<String>,
}

fn regular_grammar(args: &Args, rng: &mut StdRng) -> Result<()> {
    let grammar = Grammar::from_productions(
        &["S", "A", "B", "C"],
        &["a", "b"],
        "S",
        &["S → aA", "A → bS | aB", "B → bC | aB", "C → aA | b"],
    )?;
    println!("Grammar:\n{}", grammar.definition());
    println!("Classification: {}", grammar.classify());

    let config = GenerationConfig {
        max_depth: args.max_depth,
    };
    println!("Generated strings:");
    for (i, word) in grammar.sample(rng, config, args.count).iter().enumerate() {
        println!("  {}: {}", i + 1, word.iter().join(""));
    }

    let automaton = grammar.to_automaton()?;
    println!("\nFinite automaton:\n{}", automaton.transition_table());

    let words = if args.words.is_empty() {
        vec!["ab", "abc", "aabb", "baba"]
    } else {
        args.words.iter().map(String::as_str).collect()
    };
    for word in words {
        let verdict = if automaton.accepts(word) {
            "belongs"
        } else {
            "does not belong"
        };
        println!("  {word:?} {verdict} to the language");
    }

    Ok(())
}

fn automaton_lab(args: &Args) -> Result<()> {
    let mut builder = FiniteAutomatonBuilder::new();
    for state in ["q0", "q1", "q2", "q3"] {
        builder.state(state);
    }
    for symbol in ["a", "b", "c"] {
        builder.symbol(symbol);
    }
    builder
        .start("q0")
        .accepting("q3")
        .transition("q0", "a", "q1")
        .transition("q1", "b", "q2")
        .transition("q2", "c", "q0")
        .transition("q1", "a", "q3")
        .transition("q0", "b", "q2")
        .transition("q2", "c", "q3");
    let automaton = builder.build()?;

    println!("\nAutomaton:\n{}", automaton.transition_table());

    let grammar = automaton.to_grammar();
    println!("Regular grammar:\n{}", grammar.definition());
    println!("Classification: {}", grammar.classify());

    let deterministic = automaton.is_deterministic();
    println!(
        "Finite automaton is {}",
        if deterministic {
            "deterministic"
        } else {
            "non-deterministic"
        }
    );

    let dfa = if deterministic {
        automaton
    } else {
        let dfa = automaton.to_dfa();
        println!("Converted NFA to DFA:\n{}", dfa.transition_table());
        println!("{}", dfa.definition());
        dfa
    };

    for word in &args.words {
        println!("  {word:?} accepted: {}", dfa.accepts(word));
    }

    Ok(())
}

fn compare(nfa: &FiniteAutomaton, dfa: &FiniteAutomaton, words: &[&str]) {
    for word in words {
        info!(
            "{word:?}: nfa {} / dfa {}",
            nfa.accepts(word),
            dfa.accepts(word)
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    regular_grammar(&args, &mut rng)?;
    automaton_lab(&args)?;

    let nfa = FiniteAutomaton::from_definition(
        &["q0", "q1", "q2"],
        &["a", "b"],
        "q0",
        &["q2"],
        &[
            ("q0", "a", &["q0", "q1"]),
            ("q0", "b", &["q0"]),
            ("q1", "b", &["q2"]),
        ],
    )?;
    compare(&nfa, &nfa.to_dfa(), &["ab", "aab", "aba", "babab"]);

    Ok(())
}
