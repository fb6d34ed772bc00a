//! Custody snapshot: read-only state for external inspection
//!
//! A snapshot captures balances, totals, limits, and counters at one point
//! in time. `digest` hashes its canonical JSON encoding (balances are kept in
//! a `BTreeMap`, so equal states always produce equal digests).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodySnapshot {
    pub accounting_asset: AssetId,
    /// Non-zero balances, ordered by depositor
    pub balances: BTreeMap<AccountId, Amount>,
    pub aggregate_total: Amount,
    pub withdrawal_limit: Amount,
    pub capacity_cap: Amount,
    pub deposits_count: u64,
    pub withdrawals_count: u64,
}

impl CustodySnapshot {
    /// SHA-256 over the canonical JSON encoding.
    pub fn digest(&self) -> Result<[u8; 32], serde_json::Error> {
        let encoded = serde_json::to_vec(self)?;
        Ok(compute_hash(&encoded))
    }

    /// Sum of the captured balances, or `None` on overflow.
    pub fn balance_sum(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(0 as Amount, |acc, b| acc.checked_add(*b))
    }
}

/// Compute SHA-256 hash of arbitrary data.
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(balances: BTreeMap<AccountId, Amount>) -> CustodySnapshot {
        let aggregate_total = balances.values().sum();
        CustodySnapshot {
            accounting_asset: AssetId::from("USDC"),
            balances,
            aggregate_total,
            withdrawal_limit: 1_000_000_000,
            capacity_cap: 5_000_000_000,
            deposits_count: 2,
            withdrawals_count: 0,
        }
    }

    #[test]
    fn test_compute_hash_deterministic() {
        assert_eq!(compute_hash(b"custody"), compute_hash(b"custody"));
        assert_ne!(compute_hash(b"custody"), compute_hash(b"custodY"));
    }

    #[test]
    fn test_digest_independent_of_insertion_order() {
        let a = AccountId::new();
        let b = AccountId::new();

        let mut first = BTreeMap::new();
        first.insert(a, 100);
        first.insert(b, 200);

        let mut second = BTreeMap::new();
        second.insert(b, 200);
        second.insert(a, 100);

        assert_eq!(sample(first).digest().unwrap(), sample(second).digest().unwrap());
    }

    #[test]
    fn test_digest_changes_with_balance() {
        let a = AccountId::new();
        let mut balances = BTreeMap::new();
        balances.insert(a, 100);
        let before = sample(balances.clone()).digest().unwrap();

        balances.insert(a, 101);
        let after = sample(balances).digest().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_balance_sum() {
        let mut balances = BTreeMap::new();
        balances.insert(AccountId::new(), 1_000);
        balances.insert(AccountId::new(), 2_500);
        let snapshot = sample(balances);
        assert_eq!(snapshot.balance_sum(), Some(snapshot.aggregate_total));
    }
}
