//! Identifier types for custody participants and assets
//!
//! Accounts use UUID v7 so that identities created in sequence sort
//! chronologically. The nil UUID plays the role of the "zero address" and is
//! never a valid collaborator or custody identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a depositor, operator, or custody account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new AccountId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The zero identity. Rejected wherever a real account is required.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asset identifier (token symbol or contract reference)
///
/// e.g. "USDC", "WETH", "DAI"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Symbol reserved for the platform's intrinsic value unit.
    pub const NATIVE_SYMBOL: &'static str = "NATIVE";

    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Sentinel identity recorded for deposits made through the native-value
    /// entry point.
    pub fn native() -> Self {
        Self(Self::NATIVE_SYMBOL.to_string())
    }

    pub fn is_native(&self) -> bool {
        self.0 == Self::NATIVE_SYMBOL
    }

    /// An empty symbol is the asset equivalent of the zero address.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_creation() {
        let id1 = AccountId::new();
        let id2 = AccountId::new();
        assert_ne!(id1, id2, "AccountIds should be unique");
        assert!(!id1.is_nil());
    }

    #[test]
    fn test_account_id_nil() {
        assert!(AccountId::nil().is_nil());
        assert_eq!(AccountId::nil().to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_account_id_serialization() {
        let id = AccountId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_account_ids_sort_by_creation() {
        let first = AccountId::new();
        let second = AccountId::new();
        assert!(first <= second);
    }

    #[test]
    fn test_asset_id_native_sentinel() {
        let native = AssetId::native();
        assert!(native.is_native());
        assert!(!AssetId::from("WETH").is_native());
    }

    #[test]
    fn test_asset_id_empty() {
        assert!(AssetId::new("").is_empty());
        assert!(AssetId::new("   ").is_empty());
        assert!(!AssetId::new("USDC").is_empty());
    }

    #[test]
    fn test_asset_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&AssetId::from("USDC")).unwrap();
        assert_eq!(json, "\"USDC\"");
    }
}
