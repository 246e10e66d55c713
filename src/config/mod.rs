// src/config/mod.rs - Moderation configuration loading and validation

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "REVIEWGUARD_CONFIG";

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/moderation.yaml";

/// Top-level moderation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub lexicon: LexiconConfig,
    pub matching: MatchingConfig,
    pub spam: SpamConfig,
    pub academic: AcademicConfig,
    pub submission: SubmissionConfig,
}

/// Where the profanity word list comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Word list file; the built-in list is used when absent or unreadable
    pub path: Option<PathBuf>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("config/lexicon.txt")),
        }
    }
}

/// Lexicon and obfuscation matching thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Position-wise mismatches tolerated by the fuzzy check
    pub fuzzy_max_distance: usize,
    pub fuzzy_min_token_len: usize,
    pub fuzzy_max_len_diff: usize,
    /// Lexicon words shorter than this only fuzzy-match through extensions
    pub fuzzy_min_word_len: usize,
    /// Let short lexicon words match with a short suffix ("sluts") or one
    /// doubled letter ("shiit")
    pub fuzzy_allow_extensions: bool,
    /// Require the token and lexicon word to share their first letter
    pub fuzzy_anchor_first_char: bool,
    pub deletion_min_token_len: usize,
    /// Only a non-initial vowel or the silent letter of a `ck`/`tch` cluster
    /// may be dropped for a deletion match
    pub deletion_restricted: bool,
    /// Allowed length surplus of whitespace-compressed text over a lexicon word
    pub compressed_slack: usize,
    /// Additional obfuscation regexes checked after the built-in set
    pub extra_obfuscation_patterns: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_max_distance: 2,
            fuzzy_min_token_len: 3,
            fuzzy_max_len_diff: 2,
            fuzzy_min_word_len: 8,
            fuzzy_allow_extensions: true,
            fuzzy_anchor_first_char: true,
            deletion_min_token_len: 3,
            deletion_restricted: true,
            compressed_slack: 3,
            extra_obfuscation_patterns: Vec::new(),
        }
    }
}

impl MatchingConfig {
    /// Plain distance thresholds with every precision guard switched off.
    /// Flags many common short words.
    pub fn permissive() -> Self {
        Self {
            fuzzy_min_word_len: 0,
            fuzzy_anchor_first_char: false,
            deletion_restricted: false,
            ..Self::default()
        }
    }
}

/// Spam and formatting thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamConfig {
    /// Spam when adjacent repeated words exceed this count
    pub max_repeated_words: usize,
    /// Run length at which a repeated character counts as spam
    pub repeated_char_run: usize,
    pub caps_ratio: f64,
    /// Caps check only applies to texts longer than this
    pub caps_min_length: usize,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            max_repeated_words: 3,
            repeated_char_run: 5,
            caps_ratio: 0.6,
            caps_min_length: 20,
        }
    }
}

/// Scholarly vocabulary used to excuse soft violations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicConfig {
    pub terms: Vec<String>,
    pub min_terms: usize,
}

impl Default for AcademicConfig {
    fn default() -> Self {
        let terms = [
            "research", "analysis", "methodology", "data", "study", "experiment",
            "publication", "paper", "thesis", "dissertation", "laboratory", "project",
            "collaboration", "supervision", "mentoring", "academic", "scientific",
        ];

        Self {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            min_terms: 2,
        }
    }
}

/// Rules layered on top of moderation when a review is submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub min_length: usize,
    pub max_length: usize,
    pub academic_override: bool,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 2000,
            academic_override: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            other => Err(anyhow::anyhow!(
                "Unsupported config format {:?} for {}",
                other,
                path.display()
            )),
        }
    }
}

impl ModerationConfig {
    /// Load configuration from a YAML, TOML or JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = Self::parse(&content, format)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;

        debug!("Loaded moderation configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing or broken
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path).await {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Serialize configuration as YAML, e.g. to write a starter file
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Reject configurations that would make the heuristics meaningless
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.spam.caps_ratio) {
            return Err(anyhow::anyhow!("Caps ratio must be between 0.0 and 1.0"));
        }

        if self.spam.repeated_char_run < 2 {
            return Err(anyhow::anyhow!("Repeated character run must be at least 2"));
        }

        if self.academic.min_terms == 0 {
            return Err(anyhow::anyhow!("Academic min_terms must be at least 1"));
        }

        if self.academic.terms.iter().any(|t| t.trim().is_empty()) {
            return Err(anyhow::anyhow!("Academic terms cannot be empty"));
        }

        if self.submission.min_length > self.submission.max_length {
            return Err(anyhow::anyhow!(
                "Submission min_length ({}) exceeds max_length ({})",
                self.submission.min_length,
                self.submission.max_length
            ));
        }

        Ok(())
    }
}

/// Resolve the config path from an explicit argument, the environment, or the default
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
