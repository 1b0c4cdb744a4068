//! Structured outcomes reported by the draft session.
//!
//! The session never talks to a UI; callers inject an [`OutcomeReporter`]
//! and decide how to surface each outcome.
use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Saved { title: String },
    SaveFailed { reason: String },
    TemplateSaved { name: String },
    TemplateLoaded { name: String },
    Rejected { reason: String },
    Reset,
}

pub trait OutcomeReporter: Send + Sync {
    fn report(&self, outcome: Outcome);
}

/// Reports outcomes as log lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl OutcomeReporter for TracingReporter {
    fn report(&self, outcome: Outcome) {
        match &outcome {
            Outcome::SaveFailed { reason } => tracing::error!("prompt save failed: {}", reason),
            Outcome::Rejected { reason } => tracing::warn!("rejected: {}", reason),
            other => tracing::info!(?other, "draft outcome"),
        }
    }
}

/// Keeps every outcome in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    outcomes: Mutex<Vec<Outcome>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.outcomes
            .lock()
            .map(|o| o.clone())
            .unwrap_or_default()
    }
}

impl OutcomeReporter for MemoryReporter {
    fn report(&self, outcome: Outcome) {
        if let Ok(mut outcomes) = self.outcomes.lock() {
            outcomes.push(outcome);
        }
    }
}
