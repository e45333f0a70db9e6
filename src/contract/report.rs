use serde::Serialize;

use super::{suite::ContractViolation, ContractMode};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed { reason: String },
    Skipped { reason: String },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub name: &'static str,
    #[serde(flatten)]
    pub status: CheckStatus,
}

#[derive(Serialize, Debug, Clone)]
pub struct ContractReport {
    pub mode: ContractMode,
    pub outcomes: Vec<CheckOutcome>,
}

impl ContractReport {
    pub fn new(mode: ContractMode) -> Self {
        Self {
            mode,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, name: &'static str, result: Result<(), ContractViolation>) {
        let status = match result {
            Ok(()) => {
                log::info!("✓ {}", name);
                CheckStatus::Passed
            }
            Err(violation) => {
                log::warn!("✗ {}: {}", name, violation);
                CheckStatus::Failed {
                    reason: violation.to_string(),
                }
            }
        };
        self.outcomes.push(CheckOutcome { name, status });
    }

    pub fn skip(&mut self, name: &'static str, reason: &str) {
        log::info!("- {} (skipped: {})", name, reason);
        self.outcomes.push(CheckOutcome {
            name,
            status: CheckStatus::Skipped {
                reason: reason.to_string(),
            },
        });
    }

    pub fn passed(&self) -> usize {
        self.count(|status| matches!(status, CheckStatus::Passed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, CheckStatus::Skipped { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, CheckStatus::Failed { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }

    fn count(&self, predicate: impl Fn(&CheckStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}
