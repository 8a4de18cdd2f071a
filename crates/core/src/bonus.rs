//! Bonus schedules applied to completed jobs.
//!
//! Each video carries zero or more schedules. Every schedule is evaluated
//! once per completed job and produces exactly one award, even when the
//! rate is zero, so the payment ledger keeps a full audit trail.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::video::{validate_money, validate_rate};

/// `bonus_schedules.kind` value for per-object schedules.
pub const KIND_PER_OBJECT: &str = "per_object";
/// `bonus_schedules.kind` value for completion schedules.
pub const KIND_COMPLETION: &str = "completion";

/// All valid schedule kinds.
pub const VALID_KINDS: &[&str] = &[KIND_PER_OBJECT, KIND_COMPLETION];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusSchedule {
    /// Pays `rate` for every annotated object (path) on the job.
    PerObject { rate: Decimal },
    /// Pays `rate` once for a complete annotation.
    Completion { rate: Decimal },
}

/// Amount and worker-facing reason of one bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Award {
    pub amount: Decimal,
    pub reason: String,
}

impl Award {
    /// Check the amount fits the ledger's money column before anything is paid.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_money("bonus amount", self.amount)
    }
}

impl BonusSchedule {
    /// Rebuild a schedule from its stored `(kind, rate)` columns.
    pub fn from_parts(kind: &str, rate: Decimal) -> Result<Self, CoreError> {
        validate_rate(rate)?;
        match kind {
            KIND_PER_OBJECT => Ok(Self::PerObject { rate }),
            KIND_COMPLETION => Ok(Self::Completion { rate }),
            other => Err(CoreError::Validation(format!(
                "Unknown bonus kind: '{other}'. Valid kinds: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PerObject { .. } => KIND_PER_OBJECT,
            Self::Completion { .. } => KIND_COMPLETION,
        }
    }

    pub fn rate(&self) -> Decimal {
        match *self {
            Self::PerObject { rate } | Self::Completion { rate } => rate,
        }
    }

    /// Short description shown to workers before they accept the job.
    pub fn description(&self) -> (Decimal, &'static str) {
        match *self {
            Self::PerObject { rate } => (rate, "per object"),
            Self::Completion { rate } => (rate, "if complete"),
        }
    }

    /// Compute the award for a completed job with `path_count` paths.
    pub fn award(&self, path_count: usize) -> Award {
        match *self {
            Self::PerObject { rate } => Award {
                amount: rate * Decimal::from(path_count),
                reason: format!("For {path_count} objects"),
            },
            Self::Completion { rate } => Award {
                amount: rate,
                reason: "For complete annotation.".to_string(),
            },
        }
    }
}
