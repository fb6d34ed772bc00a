//! Limits registry: withdrawal ceiling and capacity cap
//!
//! Both limits are strictly positive at all times: zero is rejected at
//! construction and at every setter. Authorization is checked by the caller
//! before a setter runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use types::numeric::Amount;

use crate::errors::CustodyError;
use crate::events::LimitChanged;

/// Which operational limit a value or change refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitKind {
    /// Maximum admissible single withdrawal
    WithdrawalLimit,
    /// Maximum admissible aggregate accounted total
    CapacityCap,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::WithdrawalLimit => write!(f, "withdrawal limit"),
            LimitKind::CapacityCap => write!(f, "capacity cap"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsRegistry {
    withdrawal_limit: Amount,
    capacity_cap: Amount,
}

impl LimitsRegistry {
    pub fn new(withdrawal_limit: Amount, capacity_cap: Amount) -> Result<Self, CustodyError> {
        Ok(Self {
            withdrawal_limit: positive(LimitKind::WithdrawalLimit, withdrawal_limit)?,
            capacity_cap: positive(LimitKind::CapacityCap, capacity_cap)?,
        })
    }

    pub fn withdrawal_limit(&self) -> Amount {
        self.withdrawal_limit
    }

    pub fn capacity_cap(&self) -> Amount {
        self.capacity_cap
    }

    /// Replace the withdrawal ceiling. Returns the change record.
    pub fn set_withdrawal_limit(&mut self, new: Amount) -> Result<LimitChanged, CustodyError> {
        self.set(LimitKind::WithdrawalLimit, new)
    }

    /// Replace the capacity cap. Returns the change record.
    ///
    /// Lowering the cap below the current aggregate is allowed; it only
    /// blocks further admissions until withdrawals bring the total down.
    pub fn set_capacity_cap(&mut self, new: Amount) -> Result<LimitChanged, CustodyError> {
        self.set(LimitKind::CapacityCap, new)
    }

    /// Room left under the cap for the given aggregate.
    pub fn headroom(&self, aggregate_total: Amount) -> Amount {
        self.capacity_cap.saturating_sub(aggregate_total)
    }

    /// Replace the given limit. Zero is rejected and leaves it unchanged.
    pub fn set(&mut self, limit: LimitKind, new: Amount) -> Result<LimitChanged, CustodyError> {
        let new = positive(limit, new)?;
        let slot = match limit {
            LimitKind::WithdrawalLimit => &mut self.withdrawal_limit,
            LimitKind::CapacityCap => &mut self.capacity_cap,
        };
        let old = std::mem::replace(slot, new);
        Ok(LimitChanged { limit, old, new })
    }
}

fn positive(limit: LimitKind, value: Amount) -> Result<Amount, CustodyError> {
    if value == 0 {
        return Err(CustodyError::InvalidLimitValue { limit });
    }
    Ok(value)
}
