// Shared fixtures for threadscore integration tests
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use threadscore::Comment;

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()
}

/// `base_time()` plus `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    base_time() + Duration::minutes(minutes)
}

/// A body of exactly `n` prose words.
pub fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}

/// Consecutive conversation comments by `author`, one minute apart.
pub fn run_of(author: &str, word_counts: &[usize]) -> Vec<Comment> {
    word_counts
        .iter()
        .enumerate()
        .map(|(i, &n)| Comment::new(format!("c{}", i + 1), author, words(n), at(i as i64)))
        .collect()
}
