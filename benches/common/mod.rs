use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use sentcomplete::SourceLine;

const WORDS: [&str; 24] = [
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "sentence", "project",
    "autocomplete", "search", "index", "window", "prefix", "typo", "corpus", "river", "mountain",
    "question", "answer", "library", "engine", "matching",
];

/// Deterministic pseudo-random corpus; no fixture files needed.
pub fn synthetic_lines(count: usize) -> Vec<SourceLine> {
    let mut rng = StdRng::seed_from_u64(0x9e37_79b9_7f4a_7c15);
    (0..count)
        .map(|i| {
            let len = rng.random_range(4..12);
            let text: Vec<&str> = (0..len)
                .filter_map(|_| WORDS.choose(&mut rng).copied())
                .collect();
            SourceLine::new(text.join(" "), format!("file{}.txt", i / 1000), i % 1000 + 1)
        })
        .collect()
}
