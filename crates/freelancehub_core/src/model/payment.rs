//! Payment domain model.
//!
//! # Responsibility
//! - Define the payment record tied to a project.
//!
//! # Invariants
//! - `amount` is whole currency units and fits the store's signed integer column.
//! - `project_id` refers to a project but payments do not own projects.
//! - `date` is `None` only for legacy rows recorded without one.

use crate::model::project::ProjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a payment.
pub type PaymentId = Uuid;

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
        }
    }
}

/// A recorded monetary transaction against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub project_id: ProjectId,
    pub amount: u64,
    pub status: PaymentStatus,
    pub date: Option<NaiveDate>,
}

/// Validation failures for payment writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    AmountOutOfRange(u64),
}

impl Display for PaymentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmountOutOfRange(amount) => {
                write!(f, "payment amount {amount} exceeds the storable maximum")
            }
        }
    }
}

impl Error for PaymentValidationError {}

impl Payment {
    /// Creates an `Unpaid` payment with a generated id.
    pub fn new(project_id: ProjectId, amount: u64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            amount,
            status: PaymentStatus::Unpaid,
            date: Some(date),
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    /// Checks write-side invariants and returns the amount as SQLite stores it.
    pub fn validate(&self) -> Result<i64, PaymentValidationError> {
        i64::try_from(self.amount)
            .map_err(|_| PaymentValidationError::AmountOutOfRange(self.amount))
    }
}
