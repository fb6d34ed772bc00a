//! Custody error types
//!
//! `CustodyError` is the taxonomy callers see. Each variant carries the
//! structured payload a client needs to decide whether to adjust and retry.

use thiserror::Error;
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

use crate::limits::LimitKind;
use crate::security::Role;

/// Errors surfaced by the admission and withdrawal pipelines and the
/// privileged setters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Asset {asset} must be deposited through the native entry point")]
    WrongEntryPoint { asset: AssetId },

    #[error("No direct conversion path from {asset} to the accounting currency")]
    NoDirectConversionPath { asset: AssetId },

    #[error("Capacity exceeded: attempted {attempted}, available {available}")]
    CapacityExceeded { attempted: Amount, available: Amount },

    #[error("Withdrawal limit exceeded: attempted {attempted}, limit {limit}")]
    WithdrawalLimitExceeded { attempted: Amount, limit: Amount },

    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("Invalid value for {limit}: must be greater than zero")]
    InvalidLimitValue { limit: LimitKind },

    #[error("Invalid collaborator address: {collaborator}")]
    InvalidCollaboratorAddress { collaborator: String },

    #[error("Reentrant call rejected")]
    ReentrantCall,

    #[error("Unauthorized: {caller} lacks role {role}")]
    Unauthorized { caller: AccountId, role: Role },

    #[error("System is paused")]
    SystemPaused,

    #[error("Conversion failed: {reason}")]
    ConversionFailed { reason: String },

    #[error("Asset transfer failed: {reason}")]
    TransferFailed { reason: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Ledger imbalance: recorded total {recorded}, sum of balances {computed}")]
    LedgerImbalance { recorded: Amount, computed: Amount },
}

impl CustodyError {
    /// Whether the same request may succeed later, after the caller or the
    /// environment adjusts (smaller amount, raised limit, unpause).
    ///
    /// Zero amounts, wrong entry points, missing conversion paths, and
    /// configuration errors are permanent for the request as submitted.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CustodyError::CapacityExceeded { .. }
                | CustodyError::WithdrawalLimitExceeded { .. }
                | CustodyError::InsufficientBalance { .. }
                | CustodyError::ReentrantCall
                | CustodyError::SystemPaused
                | CustodyError::ConversionFailed { .. }
                | CustodyError::TransferFailed { .. }
        )
    }
}

/// Ledger primitive errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Amount, requested: Amount },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Ledger imbalance: recorded total {recorded}, sum of balances {computed}")]
    Imbalance { recorded: Amount, computed: Amount },
}

impl From<LedgerError> for CustodyError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance {
                available,
                requested,
            } => CustodyError::InsufficientBalance {
                available,
                requested,
            },
            LedgerError::Overflow => CustodyError::Overflow,
            LedgerError::Imbalance { recorded, computed } => {
                CustodyError::LedgerImbalance { recorded, computed }
            }
        }
    }
}

/// Failure reported by the quoting collaborator.
///
/// All variants are reported to callers as
/// [`CustodyError::NoDirectConversionPath`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("No conversion path")]
    NoPath,

    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Quote unavailable: {0}")]
    Unavailable(String),
}

/// Failure reported by the exchange or asset-transfer collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },

    #[error("Deadline expired")]
    DeadlineExpired,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error reading configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Amount for {field} is not representable in accounting units: {value}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Custody(#[from] CustodyError),
}
