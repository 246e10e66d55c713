//! # Review Text Moderation
//!
//! Screens free-text reviews of academic supervisors before they are stored,
//! rejecting profanity (including disguised spellings) and low-quality spam
//! while tolerating soft issues in clearly scholarly writing.
//!
//! ## Features
//!
//! - **Lexicon Matching**: Exact, leetspeak, fuzzy and dropped-vowel matches on normalized text
//! - **Obfuscation Detection**: Separated letters, reversed words and broken compounds
//! - **Spam Heuristics**: Repeated words, repeated characters and excessive capitals
//! - **Academic Override**: Soft violations pass when the text is scholarly
//! - **Graceful Degradation**: Internal faults fall back to a basic word check
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reviewguard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ModerationConfig::load_or_default("config/moderation.yaml").await;
//!     let engine = Arc::new(ModerationEngine::from_config(&config).await?);
//!
//!     let verdict = engine.moderate("My supervisor was great to work with");
//!     assert!(verdict.is_clean);
//!
//!     let screener = ReviewScreener::new(engine, config.submission);
//!     let outcome = screener.screen("Helpful feedback on every draft of my thesis");
//!     println!("{:?}", outcome.status);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod moderation;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::config::{ModerationConfig, SubmissionConfig};
    pub use crate::moderation::{
        lexicon::{Lexicon, LexiconSource},
        screening::ReviewScreener,
        ModerationEngine,
    };
    pub use crate::types::{
        DetectionType, ModerationError, ModerationVerdict, ScreeningOutcome, ScreeningStatus,
        Severity,
    };
    pub use anyhow::Result;
    pub use std::sync::Arc;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
