//! Custody configuration
//!
//! Limits are written in whole accounting units as decimal strings
//! (`"5000.00"`) and converted to minor units once, at validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::ids::{AccountId, AssetId};
use types::numeric::{self, Amount};

use crate::errors::{ConfigError, CustodyError};
use crate::limits::{LimitKind, LimitsRegistry};

fn default_conversion_deadline_secs() -> i64 {
    300
}

/// Deployment configuration, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyConfig {
    /// Account holding escrowed and converted assets
    pub custody_account: AccountId,
    /// Asset every balance is denominated in
    pub accounting_asset: AssetId,
    /// Wrapper asset standing in for native value during conversion
    pub native_wrapper: AssetId,
    /// Maximum single withdrawal, whole units
    pub withdrawal_limit: Decimal,
    /// Maximum aggregate accounted total, whole units
    pub capacity_cap: Decimal,
    /// Seconds a conversion order stays valid
    #[serde(default = "default_conversion_deadline_secs")]
    pub conversion_deadline_secs: i64,
}

/// Validated settings owned by a custody instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustodySettings {
    pub custody_account: AccountId,
    pub accounting_asset: AssetId,
    pub native_wrapper: AssetId,
    pub conversion_deadline: chrono::Duration,
}

impl CustodyConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Check identities and limits, producing the settings and the initial
    /// limits registry.
    pub fn validate(&self) -> Result<(CustodySettings, LimitsRegistry), ConfigError> {
        if self.custody_account.is_nil() {
            return Err(invalid_address("custody_account"));
        }
        if self.accounting_asset.is_empty() || self.accounting_asset.is_native() {
            return Err(invalid_address("accounting_asset"));
        }
        if self.native_wrapper.is_empty() || self.native_wrapper == self.accounting_asset {
            return Err(invalid_address("native_wrapper"));
        }
        if self.conversion_deadline_secs <= 0 {
            return Err(ConfigError::InvalidAmount {
                field: "conversion_deadline_secs",
                value: self.conversion_deadline_secs.to_string(),
            });
        }

        let withdrawal_limit = to_amount(LimitKind::WithdrawalLimit, self.withdrawal_limit)?;
        let capacity_cap = to_amount(LimitKind::CapacityCap, self.capacity_cap)?;
        let limits = LimitsRegistry::new(withdrawal_limit, capacity_cap)?;

        let settings = CustodySettings {
            custody_account: self.custody_account,
            accounting_asset: self.accounting_asset.clone(),
            native_wrapper: self.native_wrapper.clone(),
            conversion_deadline: chrono::Duration::seconds(self.conversion_deadline_secs),
        };
        Ok((settings, limits))
    }
}

fn invalid_address(field: &str) -> ConfigError {
    ConfigError::Custody(CustodyError::InvalidCollaboratorAddress {
        collaborator: field.to_string(),
    })
}

fn to_amount(limit: LimitKind, value: Decimal) -> Result<Amount, ConfigError> {
    numeric::from_decimal(value).ok_or_else(|| ConfigError::InvalidAmount {
        field: limit.field_name(),
        value: value.to_string(),
    })
}

impl LimitKind {
    /// Config field name for this limit.
    pub fn field_name(&self) -> &'static str {
        match self {
            LimitKind::WithdrawalLimit => "withdrawal_limit",
            LimitKind::CapacityCap => "capacity_cap",
        }
    }
}
