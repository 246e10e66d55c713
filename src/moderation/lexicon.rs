use log::{debug, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::config::MatchingConfig;
use crate::moderation::normalizer::normalize_text;
use crate::types::{DetectionType, MatchOutcome, ModerationError};

/// Word list used when no external lexicon can be loaded
pub const BUILTIN_WORDS: &[&str] = &[
    "fuck", "shit", "bitch", "asshole", "dick", "pussy", "cock", "cunt",
    "faggot", "nigger", "nigga", "whore", "slut", "bastard", "motherfucker",
];

/// Common leetspeak substitutes for single letters
const CHAR_SUBSTITUTIONS: &[(char, &[char])] = &[
    ('a', &['@', '4']),
    ('e', &['3']),
    ('i', &['1', '!', '|']),
    ('o', &['0']),
    ('s', &['5', '$']),
    ('t', &['7', '+']),
    ('l', &['|', '1']),
    // common typo
    ('u', &['v']),
];

fn substitutes_for(c: char) -> &'static [char] {
    CHAR_SUBSTITUTIONS
        .iter()
        .find(|(letter, _)| *letter == c)
        .map(|(_, subs)| *subs)
        .unwrap_or(&[])
}

#[inline]
fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Letters that can go missing without changing how a word reads:
/// a non-initial vowel, the `c` of `ck` or the `t` of `tch`.
fn is_droppable(word: &[char], i: usize) -> bool {
    if i == 0 {
        return false;
    }

    let next = word.get(i + 1).copied();
    is_vowel(word[i])
        || (word[i] == 'c' && next == Some('k'))
        || (word[i] == 't' && next == Some('c') && word.get(i + 2) == Some(&'h'))
}

/// `word` with a short suffix ("sluts") or one of its letters doubled ("shiit")
fn is_extension(token: &[char], word: &[char], max_suffix: usize) -> bool {
    if token.len() <= word.len() {
        return false;
    }

    if token.starts_with(word) && token.len() - word.len() <= max_suffix {
        return true;
    }

    token.len() == word.len() + 1
        && (1..token.len()).any(|i| {
            token[i] == token[i - 1] && token[..i] == word[..i] && token[i + 1..] == word[i..]
        })
}

/// Where a lexicon's words came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconSource {
    Builtin,
    File(PathBuf),
    Custom,
}

impl fmt::Display for LexiconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexiconSource::Builtin => write!(f, "built-in list"),
            LexiconSource::File(path) => write!(f, "{}", path.display()),
            LexiconSource::Custom => write!(f, "custom list"),
        }
    }
}

/// A lexicon word with its precomputed single-edit variants
#[derive(Debug, Clone)]
pub struct LexiconEntry {
    pub word: String,
    variants: HashSet<String>,
}

impl LexiconEntry {
    fn new(word: String) -> Self {
        let variants = generate_variants(&word);
        Self { word, variants }
    }

    pub fn variants(&self) -> &HashSet<String> {
        &self.variants
    }
}

/// One leetspeak substitution or one adjacent transposition per variant
fn generate_variants(word: &str) -> HashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut variants = HashSet::new();

    for (i, &c) in chars.iter().enumerate() {
        for &sub in substitutes_for(c) {
            let mut variant = chars.clone();
            variant[i] = sub;
            variants.insert(variant.into_iter().collect::<String>());
        }
    }

    for i in 0..chars.len().saturating_sub(1) {
        let mut variant = chars.clone();
        variant.swap(i, i + 1);
        variants.insert(variant.into_iter().collect::<String>());
    }

    variants.remove(word);
    variants
}

/// Immutable profanity lexicon
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    members: HashSet<String>,
    source: LexiconSource,
}

impl Lexicon {
    fn build<I, S>(words: I, source: LexiconSource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut members = HashSet::new();

        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if members.insert(word.clone()) {
                entries.push(LexiconEntry::new(word));
            }
        }

        Self {
            entries,
            members,
            source,
        }
    }

    /// The embedded fallback list
    pub fn builtin() -> Self {
        Self::build(BUILTIN_WORDS.iter(), LexiconSource::Builtin)
    }

    /// Build a lexicon from caller-supplied words. Entries are trimmed and
    /// lowercased but otherwise taken as given.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(words, LexiconSource::Custom)
    }

    /// Load a word list: a JSON array for `.json` files, otherwise one word
    /// per line with `#` comments.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModerationError> {
        let path = path.as_ref();
        let load_error = |reason: String| ModerationError::LexiconLoad {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let words: Vec<String> = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?
        } else {
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string)
                .collect()
        };

        let words: Vec<String> = words.into_iter().filter(|w| !w.trim().is_empty()).collect();
        if words.is_empty() {
            return Err(load_error("word list is empty".to_string()));
        }

        let lexicon = Self::build(words, LexiconSource::File(path.to_path_buf()));
        info!("Loaded {} lexicon words from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    /// Load the configured word list, substituting the built-in list on any failure
    pub async fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };

        match Self::load(path).await {
            Ok(lexicon) => lexicon,
            Err(e) => {
                warn!("{}, using built-in lexicon", e);
                Self::builtin()
            }
        }
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn contains(&self, word: &str) -> bool {
        self.members.contains(word)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.word.as_str())
    }

    pub fn source(&self) -> &LexiconSource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count position-wise differences, giving up once `limit` is exceeded or
/// the lengths differ by more than `max_len_diff`.
pub fn bounded_distance(a: &str, b: &str, limit: usize, max_len_diff: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max_len_diff {
        return None;
    }

    let mut differences = 0;
    for i in 0..a.len().max(b.len()) {
        if a.get(i) != b.get(i) {
            differences += 1;
            if differences > limit {
                return None;
            }
        }
    }

    Some(differences)
}

/// Exact, variant, fuzzy and deletion matching of normalized tokens
#[derive(Debug, Clone)]
pub struct LexiconMatcher {
    lexicon: Arc<Lexicon>,
    config: MatchingConfig,
}

impl LexiconMatcher {
    pub fn new(lexicon: Arc<Lexicon>, config: MatchingConfig) -> Self {
        Self { lexicon, config }
    }

    /// Find the first lexicon word matched by any token of the normalized text
    pub fn match_text(&self, text: &str) -> Result<Option<MatchOutcome>, ModerationError> {
        let normalized = normalize_text(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();

        for (index, entry) in self.lexicon.entries().iter().enumerate() {
            if entry.word.is_empty() {
                return Err(ModerationError::MalformedLexicon { index });
            }

            for token in &tokens {
                if let Some(detection) = self.match_token(token, entry) {
                    debug!("Lexicon {} for '{}': token '{}'", detection, entry.word, token);
                    return Ok(Some(MatchOutcome::with_word(detection, entry.word.clone())));
                }
            }
        }

        Ok(None)
    }

    fn match_token(&self, token: &str, entry: &LexiconEntry) -> Option<DetectionType> {
        if token == entry.word {
            return Some(DetectionType::DirectMatch);
        }

        if entry.variants.contains(token) {
            return Some(DetectionType::VariationMatch);
        }

        if self.is_fuzzy_match(token, &entry.word) {
            return Some(DetectionType::FuzzyMatch);
        }

        if self.is_deletion_match(token, &entry.word) {
            return Some(DetectionType::DeletionMatch);
        }

        None
    }

    fn is_fuzzy_match(&self, token: &str, word: &str) -> bool {
        let token_chars: Vec<char> = token.chars().collect();
        let word_chars: Vec<char> = word.chars().collect();

        if token_chars.len() < self.config.fuzzy_min_token_len {
            return false;
        }

        if self.config.fuzzy_anchor_first_char && token_chars.first() != word_chars.first() {
            return false;
        }

        if word_chars.len() < self.config.fuzzy_min_word_len {
            return self.config.fuzzy_allow_extensions
                && is_extension(&token_chars, &word_chars, self.config.fuzzy_max_len_diff);
        }

        bounded_distance(
            token,
            word,
            self.config.fuzzy_max_distance,
            self.config.fuzzy_max_len_diff,
        )
        .is_some()
    }

    /// Does dropping one letter of `word` give exactly `token`?
    fn is_deletion_match(&self, token: &str, word: &str) -> bool {
        let token_chars: Vec<char> = token.chars().collect();
        let word_chars: Vec<char> = word.chars().collect();

        if token_chars.len() < self.config.deletion_min_token_len
            || word_chars.len() != token_chars.len() + 1
        {
            return false;
        }

        (0..word_chars.len()).any(|i| {
            if self.config.deletion_restricted && !is_droppable(&word_chars, i) {
                return false;
            }
            word_chars[..i] == token_chars[..i] && word_chars[i + 1..] == token_chars[i..]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn matcher(words: &[&str]) -> LexiconMatcher {
        LexiconMatcher::new(Arc::new(Lexicon::from_words(words)), MatchingConfig::default())
    }

    fn detect(matcher: &LexiconMatcher, text: &str) -> Option<DetectionType> {
        matcher.match_text(text).unwrap().map(|m| m.detection)
    }

    #[test]
    fn test_variants_are_single_edits() {
        let variants = generate_variants("shit");

        assert!(variants.contains("5hit"));
        assert!(variants.contains("sh1t"));
        assert!(variants.contains("shi7"));
        assert!(variants.contains("hsit"));
        assert!(variants.contains("shti"));
        assert!(!variants.contains("5h1t"));
        assert!(!variants.contains("shit"));
    }

    #[test]
    fn test_direct_and_variation_matches() {
        let m = matcher(BUILTIN_WORDS);

        assert_eq!(detect(&m, "what a BITCH move"), Some(DetectionType::DirectMatch));
        assert_eq!(detect(&m, "he is a fvck"), Some(DetectionType::VariationMatch));
        assert_eq!(detect(&m, "total sh1t"), Some(DetectionType::VariationMatch));
        assert_eq!(detect(&m, "what a dikc"), Some(DetectionType::VariationMatch));
    }

    #[test]
    fn test_accents_do_not_hide_words() {
        let m = matcher(BUILTIN_WORDS);
        let outcome = m.match_text("sl\u{00fc}t").unwrap().unwrap();
        assert_eq!(outcome.detection, DetectionType::DirectMatch);
        assert_eq!(outcome.word.as_deref(), Some("slut"));
    }

    #[test]
    fn test_deletion_match_drops_vowels() {
        let m = matcher(BUILTIN_WORDS);

        assert_eq!(detect(&m, "My supervisor was a total fck"), Some(DetectionType::DeletionMatch));
        assert_eq!(detect(&m, "btch"), Some(DetectionType::DeletionMatch));
        // dropping consonants would flag everyday words
        assert_eq!(detect(&m, "please sit down"), None);
        assert_eq!(detect(&m, "a deep cut"), None);
    }

    #[test]
    fn test_silent_consonant_deletion() {
        let m = matcher(BUILTIN_WORDS);

        assert_eq!(detect(&m, "you are a fuk"), Some(DetectionType::DeletionMatch));
        assert_eq!(detect(&m, "such a bich"), Some(DetectionType::DeletionMatch));
        assert_eq!(detect(&m, "what a dik"), Some(DetectionType::DeletionMatch));
    }

    #[test]
    fn test_short_words_match_suffixes_and_doubled_letters() {
        let m = matcher(BUILTIN_WORDS);

        for (text, word) in [
            ("what a bunch of sluts", "slut"),
            ("those whores", "whore"),
            ("he is a real dicks", "dick"),
            ("total shiit", "shit"),
            ("fuuck this lab", "fuck"),
        ] {
            let outcome = m.match_text(text).unwrap().expect(text);
            assert_eq!(outcome.detection, DetectionType::FuzzyMatch, "{}", text);
            assert_eq!(outcome.word.as_deref(), Some(word), "{}", text);
        }
    }

    #[test]
    fn test_extensions_are_bounded() {
        assert!(is_extension(&['s', 'l', 'u', 't', 's'], &['s', 'l', 'u', 't'], 2));
        assert!(is_extension(&['s', 'h', 'i', 'i', 't'], &['s', 'h', 'i', 't'], 2));
        // three extra letters
        assert!(!is_extension(&['d', 'i', 'c', 'k', 's', 'o', 'n'], &['d', 'i', 'c', 'k'], 2));
        // a different letter inserted, not a doubled one
        assert!(!is_extension(&['s', 'h', 'a', 'i', 't'], &['s', 'h', 'i', 't'], 2));

        let m = matcher(BUILTIN_WORDS);
        assert_eq!(detect(&m, "We read Dickson and Cockburn in the seminar"), None);
    }

    #[test]
    fn test_extensions_can_be_disabled() {
        let config = MatchingConfig {
            fuzzy_allow_extensions: false,
            ..MatchingConfig::default()
        };
        let m = LexiconMatcher::new(Arc::new(Lexicon::builtin()), config);
        assert_eq!(detect(&m, "those whores"), None);
    }

    #[test]
    fn test_fuzzy_match_long_words() {
        let m = matcher(BUILTIN_WORDS);

        assert_eq!(detect(&m, "motherfuckr"), Some(DetectionType::FuzzyMatch));
        assert_eq!(detect(&m, "motherfuckers"), Some(DetectionType::FuzzyMatch));
        assert_eq!(detect(&m, "motherhood"), None);
    }

    #[test]
    fn test_common_words_are_clean_by_default() {
        let m = matcher(BUILTIN_WORDS);
        let text = "This research was so much work but the lab felt like a rock for us. Thanks a bunch, good luck!";
        assert_eq!(detect(&m, text), None);
    }

    #[test]
    fn test_permissive_thresholds_flag_short_words() {
        let m = LexiconMatcher::new(
            Arc::new(Lexicon::from_words(["shit"])),
            MatchingConfig::permissive(),
        );
        // "this" differs from "shit" in two positions
        assert_eq!(detect(&m, "this"), Some(DetectionType::FuzzyMatch));
    }

    #[test]
    fn test_every_builtin_word_matches_itself() {
        let m = matcher(BUILTIN_WORDS);
        for word in BUILTIN_WORDS {
            let outcome = m.match_text(word).unwrap().expect("lexicon word should match");
            assert!(outcome.detection.is_lexicon());
        }
    }

    #[test]
    fn test_empty_entry_is_malformed() {
        let m = matcher(&["fuck", "  "]);
        let err = m.match_text("hello there").unwrap_err();
        assert!(matches!(err, ModerationError::MalformedLexicon { index: 1 }));
    }

    #[test]
    fn test_bounded_distance() {
        assert_eq!(bounded_distance("fuck", "fuck", 2, 2), Some(0));
        assert_eq!(bounded_distance("fuk", "fuck", 2, 2), Some(2));
        assert_eq!(bounded_distance("fck", "fuck", 2, 2), None);
        assert_eq!(bounded_distance("ab", "abcdef", 2, 2), None);
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let lexicon = Lexicon::from_words(["Shit", "shit ", "SHIT"]);
        assert_eq!(lexicon.len(), 1);
        assert!(lexicon.contains("shit"));
    }

    #[tokio::test]
    async fn test_load_text_word_list() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("words.txt");
        fs::write(&path, "# comment\nfoo\n\n  Bar  \n").await.unwrap();

        let lexicon = Lexicon::load(&path).await.unwrap();
        assert_eq!(lexicon.words().collect::<Vec<_>>(), vec!["foo", "bar"]);
        assert_eq!(lexicon.source(), &LexiconSource::File(path));
    }

    #[tokio::test]
    async fn test_load_json_word_list() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("en.json");
        fs::write(&path, r#"["alpha", "beta", ""]"#).await.unwrap();

        let lexicon = Lexicon::load(&path).await.unwrap();
        assert_eq!(lexicon.len(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn test_unavailable_source_falls_back_to_builtin() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        assert!(Lexicon::load(&missing).await.is_err());

        let lexicon = Lexicon::load_or_builtin(Some(&missing)).await;
        assert_eq!(lexicon.source(), &LexiconSource::Builtin);
        assert_eq!(lexicon.len(), BUILTIN_WORDS.len());

        let empty = temp_dir.path().join("empty.txt");
        fs::write(&empty, "# nothing here\n").await.unwrap();
        let lexicon = Lexicon::load_or_builtin(Some(&empty)).await;
        assert_eq!(lexicon.source(), &LexiconSource::Builtin);
    }
}
