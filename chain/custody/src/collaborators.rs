//! External collaborator interfaces
//!
//! The custody core consumes these; it does not implement price discovery,
//! conversion, token movement, role storage, or pause semantics. All calls are
//! synchronous and either return a result or fail outright. An implementation
//! may call back into the custody instance, which is why the pipelines hold
//! their reentrancy lock across every collaborator call.

use chrono::{DateTime, Utc};
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

use crate::errors::{CollaboratorError, QuoteError};
use crate::security::Role;

/// Non-binding price source.
///
/// A quote may differ from the later realized conversion, and may fail for
/// reasons other than a missing pair (e.g. zero liquidity).
pub trait QuoteSource {
    fn quote(
        &self,
        amount_in: Amount,
        asset_in: &AssetId,
        asset_out: &AssetId,
    ) -> Result<Amount, QuoteError>;
}

/// How the input side of a conversion is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Funding {
    /// Native value carried alongside the call; nothing was escrowed.
    Native,
    /// Generic asset already escrowed in the custody account. Any allowance
    /// the exchange needs is arranged by the integration, not the core.
    Escrowed,
}

/// A binding conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOrder {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in: Amount,
    /// Account that receives the output (the custody account).
    pub recipient: AccountId,
    pub deadline: DateTime<Utc>,
    pub funding: Funding,
}

/// Executes binding conversions into the accounting currency.
pub trait Exchange {
    /// Perform the conversion and return the realized output amount.
    fn convert(&self, order: &ConversionOrder) -> Result<Amount, CollaboratorError>;
}

/// Moves generic assets and reports holdings.
pub trait AssetTransfer {
    fn transfer(
        &self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), CollaboratorError>;

    /// The asset's own record of what `holder` owns.
    fn balance_of(&self, asset: &AssetId, holder: &AccountId) -> Amount;
}

/// A denied capability check: who asked and which role was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDenied {
    pub caller: AccountId,
    pub missing: Role,
}

/// Capability checks for privileged operations.
pub trait Authorizer {
    fn authorize(&self, caller: &AccountId, role: Role) -> Result<(), AuthorizationDenied>;

    fn grant(
        &self,
        grantor: &AccountId,
        grantee: AccountId,
        role: Role,
    ) -> Result<(), AuthorizationDenied>;
}

/// Global pause gate for the deposit and withdrawal entry points.
pub trait PauseState {
    fn is_paused(&self) -> bool;
}
