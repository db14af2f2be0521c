//! End-to-end chunk delivery through the generator's public interface.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};
use vchat::source::{prepare_chunks, Callbacks, ChunkGenerator, GeneratorState, DEFAULT_TICK};

fn ten_chunks() -> Vec<String> {
    (0..10).map(|i| format!("chunk-{i} ")).collect()
}

#[test]
fn ten_chunks_complete_after_150ms() {
    let accumulated = RefCell::new(String::new());
    let completions = Cell::new(0);
    let t0 = Instant::now();

    let mut generator = ChunkGenerator::new(
        ten_chunks(),
        DEFAULT_TICK,
        Callbacks::new(
            |chunk: &str| accumulated.borrow_mut().push_str(chunk),
            || completions.set(completions.get() + 1),
        ),
    );
    assert!(generator.start(t0));

    // one poll per 15ms tick, as the UI loop would
    for k in 1..=9u32 {
        assert_eq!(generator.poll(t0 + DEFAULT_TICK * k), 1);
        assert_eq!(completions.get(), 0, "completed early at tick {k}");
    }
    assert_eq!(generator.poll(t0 + Duration::from_millis(150)), 1);

    assert_eq!(completions.get(), 1);
    assert_eq!(generator.state(), GeneratorState::Completed);
    drop(generator);
    assert_eq!(accumulated.into_inner(), ten_chunks().concat());
}

#[test]
fn late_poll_catches_up_in_order() {
    let received = RefCell::new(Vec::new());
    let completions = Cell::new(0);
    let t0 = Instant::now();
    let mut generator = ChunkGenerator::new(
        ten_chunks(),
        DEFAULT_TICK,
        Callbacks::new(
            |chunk: &str| received.borrow_mut().push(chunk.to_string()),
            || completions.set(completions.get() + 1),
        ),
    );
    generator.start(t0);

    // 200ms with jitter: a single late poll still delivers everything once
    assert_eq!(generator.poll(t0 + Duration::from_millis(200)), 10);
    assert_eq!(generator.poll(t0 + Duration::from_millis(400)), 0);
    drop(generator);
    assert_eq!(received.into_inner(), ten_chunks());
    assert_eq!(completions.get(), 1);
}

#[test]
fn stop_twice_is_same_as_once() {
    let delivered = Cell::new(0);
    let completions = Cell::new(0);
    let t0 = Instant::now();
    let mut generator = ChunkGenerator::new(
        ten_chunks(),
        DEFAULT_TICK,
        Callbacks::new(
            |_: &str| delivered.set(delivered.get() + 1),
            || completions.set(completions.get() + 1),
        ),
    );
    generator.start(t0);
    generator.poll(t0 + DEFAULT_TICK * 3);

    assert!(generator.stop());
    assert!(!generator.stop());
    assert_eq!(generator.state(), GeneratorState::Stopped);
    assert_eq!(generator.poll(t0 + Duration::from_secs(1)), 0);
    assert_eq!(generator.next_due(), None);
    drop(generator);

    assert_eq!(delivered.get(), 3);
    assert_eq!(completions.get(), 0, "stop never reports completion");
}

#[test]
fn stop_before_start_is_safe() {
    let mut generator = ChunkGenerator::new(
        ten_chunks(),
        DEFAULT_TICK,
        Callbacks::new(|_: &str| {}, || {}),
    );
    generator.stop();
    generator.stop();
    assert!(!generator.start(Instant::now()), "a stopped generator stays stopped");
}

#[test]
fn prepared_chunks_concatenate_to_the_response() {
    let chunks = prepare_chunks(300, 11);
    let text = chunks.concat();
    assert!(chunks.len() > 10);
    assert!(text.contains("```rust"));
    assert!(text.contains("**Important point:**"));
}
