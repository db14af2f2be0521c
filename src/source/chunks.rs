//! Pre-computed mock assistant output.
//!
//! All text is built before streaming starts so that ticks only hand out
//! ready strings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default length of a generated response, in words.
pub const DEFAULT_TARGET_WORDS: usize = 10_000;

/// A code block is inserted before every word index divisible by this.
const CODE_BLOCK_EVERY: usize = 50;
/// An "important point" paragraph starts before every word index divisible by this.
const PARAGRAPH_EVERY: usize = 20;
/// A chunk is cut after every word index divisible by this.
const CHUNK_EVERY: usize = 7;

const PARAGRAPH_PREFIX: &str = "\n\n**Important point:** ";

const CODE_SAMPLES: [&str; 3] = [
    "let response = client.get(\"/api/data\").send().await?;\nlet body = response.json::<Data>().await?;\n\n",
    "fn debounce(wait: Duration, last: &mut Instant) -> bool {\n    let ready = last.elapsed() >= wait;\n    if ready {\n        *last = Instant::now();\n    }\n    ready\n}\n\n",
    "struct User {\n    id: u64,\n    name: String,\n    email: String,\n}\n\n",
];

const LOREM_WORDS: [&str; 24] = [
    "Lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "Ut",
    "enim",
    "ad",
    "minim",
    "veniam",
];

/// Build the chunk sequence for a response of `target_words` words.
///
/// Deterministic for a given `seed`. Concatenating the chunks yields the
/// whole response; no chunk is empty.
///
/// # Examples
///
/// ```
/// # use vchat::source::chunks::prepare_chunks;
/// let chunks = prepare_chunks(8, 42);
/// // words 0..=7 form the first chunk, nothing is left over
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].split_whitespace().count(), 8);
/// ```
pub fn prepare_chunks(target_words: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut chunks = Vec::with_capacity(target_words / CHUNK_EVERY + 1);
    let mut pending = String::new();

    for i in 0..target_words {
        if i > 0 && i % CODE_BLOCK_EVERY == 0 {
            let sample = CODE_SAMPLES[rng.random_range(0..CODE_SAMPLES.len())];
            pending.push_str("\n\n```rust\n");
            pending.push_str(sample);
            pending.push_str("```\n\n");
        }

        if i > 0 && i % PARAGRAPH_EVERY == 0 {
            pending.push_str(PARAGRAPH_PREFIX);
        }

        pending.push_str(LOREM_WORDS[rng.random_range(0..LOREM_WORDS.len())]);
        pending.push(' ');

        if i > 0 && i % CHUNK_EVERY == 0 {
            chunks.push(std::mem::take(&mut pending));
        }
    }

    if !pending.is_empty() {
        chunks.push(pending);
    }
    chunks
}
