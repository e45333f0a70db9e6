//! Behavioral contract for PaymentMethod clients.

pub mod fixtures;
pub mod report;
pub mod suite;

use serde::Serialize;

pub use report::{CheckOutcome, CheckStatus, ContractReport};
pub use suite::{ContractViolation, PaymentMethodContract};

/// Whether the suite talks to the real remote service or to a stand-in.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractMode {
    Mock,
    Live,
}
