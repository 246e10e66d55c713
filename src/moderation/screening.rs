use log::info;
use std::sync::Arc;

use crate::config::SubmissionConfig;
use crate::moderation::ModerationEngine;
use crate::types::{Decision, DecisionRecord, ScreeningOutcome, ScreeningStatus, Severity};

pub const REASON_INVALID_INPUT: &str = "Invalid input text";
pub const REASON_OVERRIDE: &str = "Academic context override for soft violation";
pub const REASON_TOO_SHORT: &str = "Review is too short";
pub const REASON_PASSED: &str = "Passed all moderation checks";

/// Decides whether a submitted review is accepted, keeping an audit trail
/// of every automatic decision taken along the way.
pub struct ReviewScreener {
    engine: Arc<ModerationEngine>,
    config: SubmissionConfig,
}

impl ReviewScreener {
    pub fn new(engine: Arc<ModerationEngine>, config: SubmissionConfig) -> Self {
        Self { engine, config }
    }

    pub fn screen(&self, text: &str) -> ScreeningOutcome {
        let mut outcome = ScreeningOutcome {
            status: ScreeningStatus::Rejected,
            reason: None,
            override_applied: false,
            verdict: None,
            decisions: Vec::new(),
        };

        if text.is_empty() {
            outcome.reason = Some(REASON_INVALID_INPUT.to_string());
            return outcome;
        }

        let text_length = text.chars().count();
        let verdict = self.engine.moderate(text);
        let is_academic = self.engine.is_academic_context(text);

        if !verdict.is_clean {
            let reason = verdict.reason.clone().unwrap_or_default();
            let decision = match verdict.severity {
                Severity::Soft => Decision::RejectedSoft,
                _ => Decision::RejectedHard,
            };
            record(&mut outcome, DecisionRecord::auto(decision, reason.clone(), text_length));

            if verdict.is_overridable() && is_academic && self.config.academic_override {
                record(
                    &mut outcome,
                    DecisionRecord::auto(Decision::Accepted, REASON_OVERRIDE, text_length),
                );
                outcome.override_applied = true;
            } else {
                outcome.reason = Some(reason);
                outcome.verdict = Some(verdict);
                return outcome;
            }
        }
        outcome.verdict = Some(verdict);

        if text_length < self.config.min_length {
            outcome.reason = Some(REASON_TOO_SHORT.to_string());
            return outcome;
        }

        if text_length > self.config.max_length {
            outcome.reason = Some(format!(
                "Review is too long (max {} characters)",
                self.config.max_length
            ));
            return outcome;
        }

        record(
            &mut outcome,
            DecisionRecord::auto(Decision::Accepted, REASON_PASSED, text_length),
        );
        outcome.status = ScreeningStatus::Accepted;
        outcome
    }
}

fn record(outcome: &mut ScreeningOutcome, entry: DecisionRecord) {
    info!(
        "Moderation decision {:?} ({:?}) for {} characters: {}",
        entry.decision, entry.method, entry.text_length, entry.reason
    );
    outcome.decisions.push(entry);
}
