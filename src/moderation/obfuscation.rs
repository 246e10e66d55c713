use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

use crate::config::MatchingConfig;
use crate::moderation::lexicon::Lexicon;
use crate::types::{DetectionType, MatchOutcome, ModerationError};

/// Known obfuscation shapes, checked top to bottom against raw text.
/// `[^a-zA-Z0-9\s]` is punctuation used as a separator inside one word.
const OBFUSCATION_PATTERNS: &[&str] = &[
    // Punctuation-separated, with optional vowel ("f*ck", "s.h.i.t")
    r"f[^a-zA-Z0-9\s]*u?[^a-zA-Z0-9\s]*c[^a-zA-Z0-9\s]*k",
    r"\bs[^a-zA-Z0-9\s]*h[^a-zA-Z0-9\s]*i[^a-zA-Z0-9\s]*t",
    r"b[^a-zA-Z0-9\s]*i[^a-zA-Z0-9\s]*t[^a-zA-Z0-9\s]*c[^a-zA-Z0-9\s]*h",
    r"a[^a-zA-Z0-9\s]*s[^a-zA-Z0-9\s]*s[^a-zA-Z0-9\s]*h[^a-zA-Z0-9\s]*o[^a-zA-Z0-9\s]*l[^a-zA-Z0-9\s]*e",
    // Leet speak
    r"f[u@4]*ck",
    r"sh[i1!]t",
    r"[a@4]ss[h#]ole",
    // Spaced out letters
    r"f[\s.\-_]{0,3}u?[\s.\-_]{0,3}c[\s.\-_]{0,3}k",
    r"\bs[\s.\-_]{0,3}h[\s.\-_]{0,3}i[\s.\-_]{0,3}t",
    r"\bb[\s.\-_]{1,3}i[\s.\-_]{1,3}t[\s.\-_]{1,3}c[\s.\-_]{1,3}h\b",
    r"\ba[\s.\-_]{1,3}s[\s.\-_]{1,3}s[\s.\-_]{1,3}h[\s.\-_]{1,3}o[\s.\-_]{1,3}l[\s.\-_]{1,3}e\b",
    // Word boundary breaking
    r"\bf[\s\w]{0,3}ab[\s\w]{0,3}itch",
    r"\bb[\s.\-_]{1,3}itch",
    r"\bf[\s.\-_]{1,3}uck",
    r"\bfck\s*u\b",
    r"\bf\s*ck\b",
    // Reversed
    r"kcuf",
    r"tihs",
    r"hctib",
];

/// Explicit broken compounds ("f ab itch", "sh it")
const BOUNDARY_PATTERNS: &[&str] = &[
    r"\bf\s+ab\s+itch",
    r"\bf\s*\w{0,2}\s*ab\s*\w{0,2}\s*itch",
    r"\bb\s+itch",
    r"\bf\s+uck",
    r"\bsh\s+it\b",
    r"\bfck\s+u\b",
];

#[derive(Debug, Clone)]
struct ObfuscationPattern {
    regex: Regex,
    detection: DetectionType,
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Detects deliberately disguised profanity in unnormalized text
#[derive(Debug, Clone)]
pub struct ObfuscationMatcher {
    patterns: Vec<ObfuscationPattern>,
    lexicon: Arc<Lexicon>,
    compressed_slack: usize,
}

impl ObfuscationMatcher {
    pub fn new(lexicon: Arc<Lexicon>, config: &MatchingConfig) -> Result<Self, ModerationError> {
        let mut patterns = Vec::new();

        for pattern in OBFUSCATION_PATTERNS {
            patterns.push(Self::builtin(pattern, DetectionType::ObfuscatedMatch)?);
        }

        for pattern in &config.extra_obfuscation_patterns {
            match compile(pattern) {
                Ok(regex) => patterns.push(ObfuscationPattern {
                    regex,
                    detection: DetectionType::ObfuscatedMatch,
                }),
                Err(e) => {
                    warn!("Invalid obfuscation pattern '{}': {}", pattern, e);
                    continue;
                }
            }
        }

        for pattern in BOUNDARY_PATTERNS {
            patterns.push(Self::builtin(pattern, DetectionType::BoundaryBreaking)?);
        }

        Ok(Self {
            patterns,
            lexicon,
            compressed_slack: config.compressed_slack,
        })
    }

    fn builtin(pattern: &str, detection: DetectionType) -> Result<ObfuscationPattern, ModerationError> {
        let regex = compile(pattern).map_err(|source| ModerationError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(ObfuscationPattern { regex, detection })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Check raw text against every pattern, then the whitespace-compressed form
    pub fn match_text(&self, text: &str) -> Option<MatchOutcome> {
        for pattern in &self.patterns {
            if let Some(found) = pattern.regex.find(text) {
                debug!("{} via /{}/ on '{}'", pattern.detection, pattern.regex.as_str(), found.as_str());
                return Some(MatchOutcome::new(pattern.detection));
            }
        }

        self.compressed_match(text)
    }

    /// Text that collapses to a lexicon word once spaces are removed ("s l u t").
    /// The length guard keeps long prose that merely contains a word from matching.
    fn compressed_match(&self, text: &str) -> Option<MatchOutcome> {
        let compressed: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        let compressed_len = compressed.chars().count();

        self.lexicon
            .words()
            .filter(|word| !word.is_empty())
            .find(|word| {
                compressed.contains(word) && compressed_len <= word.chars().count() + self.compressed_slack
            })
            .map(|word| {
                debug!("Compressed text '{}' contains '{}'", compressed, word);
                MatchOutcome::with_word(DetectionType::CompressedMatch, word)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> ObfuscationMatcher {
        ObfuscationMatcher::new(Arc::new(Lexicon::builtin()), &MatchingConfig::default()).unwrap()
    }

    fn detect(text: &str) -> Option<DetectionType> {
        matcher().match_text(text).map(|m| m.detection)
    }

    #[test]
    fn test_builtin_patterns_compile() {
        let m = matcher();
        assert_eq!(m.pattern_count(), OBFUSCATION_PATTERNS.len() + BOUNDARY_PATTERNS.len());
    }

    #[test]
    fn test_separated_letters() {
        for text in ["f.u.c.k this", "F*CK", "s h i t happens", "what a b-i-t-c-h", "b i t c h", "f u c k"] {
            assert_eq!(detect(text), Some(DetectionType::ObfuscatedMatch), "{}", text);
        }
    }

    #[test]
    fn test_spaced_letters_inside_a_sentence() {
        for text in ["you are a s s h o l e", "what an a.s.s.h.o.l.e he is", "a - s - s - h - o - l - e"] {
            assert_eq!(detect(text), Some(DetectionType::ObfuscatedMatch), "{}", text);
        }
    }

    #[test]
    fn test_leetspeak_and_reversed() {
        for text in ["f4ck off", "sh1t", "@sshole", "kcuf", "HCTIB"] {
            assert_eq!(detect(text), Some(DetectionType::ObfuscatedMatch), "{}", text);
        }
    }

    #[test]
    fn test_boundary_breaking() {
        assert_eq!(detect("f  xy  ab  itch"), Some(DetectionType::BoundaryBreaking));
        assert_eq!(detect("sh\n\n\n\nit"), Some(DetectionType::BoundaryBreaking));
        // shorter gaps are already caught as obfuscation
        assert_eq!(detect("f ab itch"), Some(DetectionType::ObfuscatedMatch));
    }

    #[test]
    fn test_compressed_match_respects_length_guard() {
        let outcome = matcher().match_text("s l u t").unwrap();
        assert_eq!(outcome.detection, DetectionType::CompressedMatch);
        assert_eq!(outcome.word.as_deref(), Some("slut"));

        assert_eq!(detect("Scunthorpe"), None);
        assert_eq!(detect("We met in Scunthorpe for the conference"), None);
    }

    #[test]
    fn test_ordinary_prose_is_clean() {
        let texts = [
            "It was a bit challenging but I learned a lot",
            "The lab was hit by budget cuts this year",
            "This hit me hard, of course, but the chief cook was great",
            "Her feedback on my thesis was thorough and kind",
        ];
        for text in texts {
            assert_eq!(detect(text), None, "{}", text);
        }
    }

    #[test]
    fn test_invalid_extra_pattern_is_skipped() {
        let config = MatchingConfig {
            extra_obfuscation_patterns: vec!["(unclosed".to_string(), r"d[\W_]*1[\W_]*c[\W_]*k".to_string()],
            ..MatchingConfig::default()
        };
        let m = ObfuscationMatcher::new(Arc::new(Lexicon::builtin()), &config).unwrap();

        assert_eq!(m.pattern_count(), OBFUSCATION_PATTERNS.len() + BOUNDARY_PATTERNS.len() + 1);
        assert_eq!(m.match_text("d-1-c-k").map(|o| o.detection), Some(DetectionType::ObfuscatedMatch));
    }
}
