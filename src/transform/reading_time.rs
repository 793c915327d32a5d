// ABOUTME: Reading time estimation for HTML content
// ABOUTME: Counts whitespace-separated words against a words-per-minute rate

use super::html::plain_text;

/// Default reading rate in words per minute.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 225;

/// Estimate reading time in whole minutes, rounded up and never below 1.
/// A rate of zero falls back to the default rate.
pub fn reading_time(content: &str, words_per_minute: u32) -> u32 {
    let rate = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    let words = plain_text(content).split_whitespace().count() as u32;
    words.div_ceil(rate).max(1)
}
