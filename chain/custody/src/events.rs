//! Custody notifications for external observers
//!
//! Events are immutable records appended by committed operations. Failed
//! operations never leave an event behind.

use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

use crate::limits::LimitKind;
use crate::security::Role;

/// A deposit was admitted and credited.
///
/// `asset` is the asset as presented by the depositor, or
/// [`AssetId::native`] for the native-value entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecorded {
    pub depositor: AccountId,
    pub asset: AssetId,
    pub amount_in: Amount,
    pub accounting_amount: Amount,
}

/// A withdrawal was debited and released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecorded {
    pub depositor: AccountId,
    pub accounting_amount: Amount,
}

/// An operational limit was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitChanged {
    pub limit: LimitKind,
    pub old: Amount,
    pub new: Amount,
}

/// A role was granted through the custody instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGranted {
    pub grantor: AccountId,
    pub grantee: AccountId,
    pub role: Role,
}

/// Enum wrapper for all custody events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustodyEvent {
    DepositRecorded(DepositRecorded),
    WithdrawalRecorded(WithdrawalRecorded),
    LimitChanged(LimitChanged),
    RoleGranted(RoleGranted),
}
