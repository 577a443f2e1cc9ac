//! Times matching of ever longer sums against the ambiguous grammar `s = s '+' s | '1'`.
//!
//! Run with `cargo run --release --example profile`, optionally with `RUST_LOG=info`.

use derp::{grammar, Language};
use std::time::{Duration, Instant};

const RUNS: usize = 10;
const BEST: usize = 3;

fn sums() -> Language<char> {
    grammar! {
        s = s '+' s | '1';
    }
}

/// Average of the `BEST` fastest out of `RUNS` matches, each on a fresh grammar so
/// that no derivatives are cached between runs.
fn profile(terms: usize) -> Result<Duration, derp::GrammarError> {
    let input = format!("1{}", "+1".repeat(terms - 1));
    let mut times = Vec::with_capacity(RUNS);
    let mut nodes = 0;

    for _ in 0..RUNS {
        let mut language = sums();
        let start = Instant::now();
        let accepted = language.accepts("s", input.chars())?;
        times.push(start.elapsed());
        assert!(accepted);
        nodes = language.node_count();
    }

    times.sort();
    let best = times.iter().take(BEST).sum::<Duration>() / BEST as u32;
    log::info!("{terms} terms: {nodes} nodes");
    Ok(best)
}

fn main() -> Result<(), derp::GrammarError> {
    env_logger::init();

    for terms in [1, 10, 50, 100, 151] {
        let time = profile(terms)?;
        println!("{terms:>4} terms: {time:?}");
    }

    Ok(())
}
