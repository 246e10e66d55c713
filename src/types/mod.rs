// src/types/mod.rs - Verdicts, detection labels and screening records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How serious a violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Clean,
    /// Minor problems (spam, caps) that academic text may be excused for
    Soft,
    /// Always blocks publication
    Hard,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Clean => "clean",
            Severity::Soft => "soft",
            Severity::Hard => "hard",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionType {
    DirectMatch,
    VariationMatch,
    FuzzyMatch,
    DeletionMatch,
    ObfuscatedMatch,
    BoundaryBreaking,
    CompressedMatch,
    RepeatedWords,
    RepeatedChars,
    ExcessiveCaps,
    BasicFallback,
}

impl DetectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionType::DirectMatch => "direct_match",
            DetectionType::VariationMatch => "variation_match",
            DetectionType::FuzzyMatch => "fuzzy_match",
            DetectionType::DeletionMatch => "deletion_match",
            DetectionType::ObfuscatedMatch => "obfuscated_match",
            DetectionType::BoundaryBreaking => "boundary_breaking",
            DetectionType::CompressedMatch => "compressed_match",
            DetectionType::RepeatedWords => "repeated_words",
            DetectionType::RepeatedChars => "repeated_chars",
            DetectionType::ExcessiveCaps => "excessive_caps",
            DetectionType::BasicFallback => "basic_fallback",
        }
    }

    /// Detections produced by the lexicon matcher
    pub fn is_lexicon(&self) -> bool {
        matches!(
            self,
            DetectionType::DirectMatch
                | DetectionType::VariationMatch
                | DetectionType::FuzzyMatch
                | DetectionType::DeletionMatch
        )
    }
}

impl fmt::Display for DetectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single matcher stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub detection: DetectionType,
    /// Lexicon word responsible, when the stage knows it
    pub word: Option<String>,
}

impl MatchOutcome {
    pub fn new(detection: DetectionType) -> Self {
        Self { detection, word: None }
    }

    pub fn with_word(detection: DetectionType, word: impl Into<String>) -> Self {
        Self {
            detection,
            word: Some(word.into()),
        }
    }
}

pub const REASON_LANGUAGE: &str = "Contains inappropriate language";
pub const REASON_DISGUISED: &str = "Contains disguised inappropriate language";
pub const REASON_SPAM: &str = "Contains repetitive spam patterns";
pub const REASON_CAPS: &str = "Excessive capitalization detected";
pub const REASON_EMPTY: &str = "Empty text";

/// Classification of one piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationVerdict {
    pub is_clean: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_type: Option<DetectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_word: Option<String>,
}

impl ModerationVerdict {
    pub fn clean() -> Self {
        Self {
            is_clean: true,
            reason: None,
            severity: Severity::Clean,
            detection_type: None,
            detected_word: None,
        }
    }

    /// Build a failing verdict from a matcher outcome
    pub fn flagged(severity: Severity, reason: &str, outcome: MatchOutcome) -> Self {
        Self {
            is_clean: false,
            reason: Some(reason.to_string()),
            severity,
            detection_type: Some(outcome.detection),
            detected_word: outcome.word,
        }
    }

    pub fn empty_text() -> Self {
        Self {
            is_clean: false,
            reason: Some(REASON_EMPTY.to_string()),
            severity: Severity::Hard,
            detection_type: None,
            detected_word: None,
        }
    }

    /// Soft violations are the only ones an academic override can excuse
    pub fn is_overridable(&self) -> bool {
        !self.is_clean && self.severity == Severity::Soft
    }
}

/// Errors raised inside the moderation pipeline
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("lexicon entry #{index} is empty")]
    MalformedLexicon { index: usize },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load lexicon from {path}: {reason}")]
    LexiconLoad { path: PathBuf, reason: String },
}

/// Final answer given to a review submitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScreeningStatus {
    Accepted,
    Rejected,
    Error,
}

/// Logged moderation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accepted,
    RejectedHard,
    RejectedSoft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionMethod {
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub decision: Decision,
    pub reason: String,
    pub method: DecisionMethod,
    pub text_length: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl DecisionRecord {
    pub fn auto(decision: Decision, reason: impl Into<String>, text_length: usize) -> Self {
        Self {
            decision,
            reason: reason.into(),
            method: DecisionMethod::Auto,
            text_length,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Outcome of screening a review submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningOutcome {
    pub status: ScreeningStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub override_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<ModerationVerdict>,
    pub decisions: Vec<DecisionRecord>,
}

impl ScreeningOutcome {
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: ScreeningStatus::Error,
            reason: Some(reason.into()),
            override_applied: false,
            verdict: None,
            decisions: Vec::new(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == ScreeningStatus::Accepted
    }
}
