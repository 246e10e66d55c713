use log::{debug, error};
use std::sync::Arc;

use crate::config::ModerationConfig;
use crate::types::{
    DetectionType, MatchOutcome, ModerationError, ModerationVerdict, Severity, REASON_CAPS,
    REASON_DISGUISED, REASON_LANGUAGE, REASON_SPAM,
};

pub mod academic;
pub mod lexicon;
pub mod normalizer;
pub mod obfuscation;
pub mod screening;
pub mod spam;

use academic::AcademicContextDetector;
use lexicon::{Lexicon, LexiconMatcher};
use obfuscation::ObfuscationMatcher;
use spam::SpamDetector;

/// Runs every check in order and turns the first hit into a verdict.
///
/// All tables are built once in the constructor and never change, so a single
/// engine can be shared between threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct ModerationEngine {
    lexicon: Arc<Lexicon>,
    lexicon_matcher: LexiconMatcher,
    obfuscation_matcher: ObfuscationMatcher,
    spam_detector: SpamDetector,
    academic_detector: AcademicContextDetector,
}

impl ModerationEngine {
    pub fn new(lexicon: Arc<Lexicon>, config: &ModerationConfig) -> Result<Self, ModerationError> {
        Ok(Self {
            lexicon_matcher: LexiconMatcher::new(Arc::clone(&lexicon), config.matching.clone()),
            obfuscation_matcher: ObfuscationMatcher::new(Arc::clone(&lexicon), &config.matching)?,
            spam_detector: SpamDetector::new(config.spam.clone()),
            academic_detector: AcademicContextDetector::new(&config.academic),
            lexicon,
        })
    }

    /// Engine over the built-in word list with default thresholds
    pub fn with_builtin_lexicon() -> Result<Self, ModerationError> {
        Self::new(Arc::new(Lexicon::builtin()), &ModerationConfig::default())
    }

    /// Load the configured lexicon (or the built-in one) and build an engine
    pub async fn from_config(config: &ModerationConfig) -> Result<Self, ModerationError> {
        let lexicon = Lexicon::load_or_builtin(config.lexicon.path.as_deref()).await;
        Self::new(Arc::new(lexicon), config)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Classify text. Never fails: internal faults degrade to [`Self::fallback_check`].
    pub fn moderate(&self, text: &str) -> ModerationVerdict {
        match self.run_pipeline(text) {
            Ok(verdict) => {
                debug!("Moderation verdict: {:?}", verdict);
                verdict
            }
            Err(e) => {
                error!("Moderation pipeline failed, falling back to basic check: {}", e);
                self.fallback_check(text)
            }
        }
    }

    fn run_pipeline(&self, text: &str) -> Result<ModerationVerdict, ModerationError> {
        if let Some(outcome) = self.lexicon_matcher.match_text(text)? {
            return Ok(ModerationVerdict::flagged(Severity::Hard, REASON_LANGUAGE, outcome));
        }

        if let Some(outcome) = self.obfuscation_matcher.match_text(text) {
            return Ok(ModerationVerdict::flagged(Severity::Hard, REASON_DISGUISED, outcome));
        }

        if let Some(outcome) = self.spam_detector.match_text(text) {
            return Ok(ModerationVerdict::flagged(Severity::Soft, REASON_SPAM, outcome));
        }

        if self.spam_detector.has_excessive_caps(text) {
            return Ok(ModerationVerdict::flagged(
                Severity::Soft,
                REASON_CAPS,
                MatchOutcome::new(DetectionType::ExcessiveCaps),
            ));
        }

        Ok(ModerationVerdict::clean())
    }

    /// Minimal check used when the full pipeline cannot run: empty text is
    /// rejected, otherwise only whole lexicon words are caught.
    pub fn fallback_check(&self, text: &str) -> ModerationVerdict {
        if text.is_empty() {
            return ModerationVerdict::empty_text();
        }

        let lower = text.to_lowercase();
        match lower.split_whitespace().find(|word| self.lexicon.contains(word)) {
            Some(word) => ModerationVerdict::flagged(
                Severity::Hard,
                REASON_LANGUAGE,
                MatchOutcome::with_word(DetectionType::BasicFallback, word),
            ),
            None => ModerationVerdict::clean(),
        }
    }

    pub fn is_academic_context(&self, text: &str) -> bool {
        self.academic_detector.is_academic_context(text)
    }
}
