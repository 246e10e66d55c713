use log::debug;

use crate::config::SpamConfig;
use crate::types::{DetectionType, MatchOutcome};

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lowercased words, each paired with whether only whitespace separates it
/// from the previous word
fn words_with_gaps(text: &str) -> Vec<(String, bool)> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut gap_is_whitespace = false;

    for c in text.chars() {
        if is_word_char(c) {
            current.extend(c.to_lowercase());
            continue;
        }

        if !current.is_empty() {
            words.push((std::mem::take(&mut current), gap_is_whitespace));
            gap_is_whitespace = true;
        }
        if !c.is_whitespace() {
            gap_is_whitespace = false;
        }
    }

    if !current.is_empty() {
        words.push((current, gap_is_whitespace));
    }

    words
}

/// Number of times a word immediately repeats the one before it
pub fn count_repeated_words(text: &str) -> usize {
    words_with_gaps(text)
        .windows(2)
        .filter(|pair| pair[1].1 && pair[0].0 == pair[1].0)
        .count()
}

/// Length of the longest run of one character. Line breaks are not counted
/// and end the current run.
pub fn longest_char_run(text: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    let mut prev_char = None;

    for ch in text.chars() {
        if ch == '\n' {
            prev_char = None;
            continue;
        }

        run = if prev_char == Some(ch) { run + 1 } else { 1 };
        longest = longest.max(run);
        prev_char = Some(ch);
    }

    longest
}

/// Repetition and capitalization checks on raw text
#[derive(Debug, Clone, Default)]
pub struct SpamDetector {
    config: SpamConfig,
}

impl SpamDetector {
    pub fn new(config: SpamConfig) -> Self {
        Self { config }
    }

    pub fn match_text(&self, text: &str) -> Option<MatchOutcome> {
        let repeats = count_repeated_words(text);
        if repeats > self.config.max_repeated_words {
            debug!("{} repeated words", repeats);
            return Some(MatchOutcome::new(DetectionType::RepeatedWords));
        }

        let run = longest_char_run(text);
        if run >= self.config.repeated_char_run {
            debug!("Character repeated {} times in a row", run);
            return Some(MatchOutcome::new(DetectionType::RepeatedChars));
        }

        None
    }

    /// Share of uppercase letters over all characters, for texts above the minimum length
    pub fn has_excessive_caps(&self, text: &str) -> bool {
        let total_chars = text.chars().count();
        if total_chars <= self.config.caps_min_length {
            return false;
        }

        let caps_count = text.chars().filter(|c| c.is_ascii_uppercase()).count();
        caps_count as f64 / total_chars as f64 > self.config.caps_ratio
    }
}
