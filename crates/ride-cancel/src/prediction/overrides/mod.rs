mod config;
mod rules;

pub use config::OverrideConfig;
pub use rules::OverrideRule;

use super::domain::{RideInput, RideOutcome};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A rule result that replaces the classifier's estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub rule: OverrideRule,
    pub outcome: RideOutcome,
    pub reason: String,
}

/// Stateless evaluator for the override rules. First match wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideEngine {
    config: OverrideConfig,
}

impl OverrideEngine {
    pub fn new(config: OverrideConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OverrideConfig {
        &self.config
    }

    pub fn evaluate(&self, input: &RideInput) -> Option<Override> {
        let rule = OverrideRule::ordered()
            .into_iter()
            .find(|rule| rule.matches(input, &self.config))?;

        let reason = rule.reason(&self.config);
        info!(?rule, %reason, "rule-based override triggered");

        Some(Override {
            rule,
            outcome: RideOutcome::Cancelled,
            reason,
        })
    }
}
