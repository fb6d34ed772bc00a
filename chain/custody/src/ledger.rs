//! Ledger: per-depositor balances and the aggregate accounted total
//!
//! Absent depositors read as zero; there is no separate existence tracking.
//! `credit` and `debit` move a balance and the aggregate together, so the
//! aggregate always equals the sum of balances. `reconcile` re-derives the
//! sum for callers that want the invariant checked rather than assumed.

use std::collections::{BTreeMap, HashMap};
use types::ids::AccountId;
use types::numeric::Amount;

use crate::errors::LedgerError;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<AccountId, Amount>,
    aggregate_total: Amount,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, depositor: &AccountId) -> Amount {
        self.balances.get(depositor).copied().unwrap_or(0)
    }

    pub fn aggregate_total(&self) -> Amount {
        self.aggregate_total
    }

    /// Add `amount` to the depositor and the aggregate.
    ///
    /// Both sums are computed before either is written, so an overflow
    /// leaves the ledger untouched.
    pub fn credit(&mut self, depositor: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let balance = self
            .balance_of(&depositor)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let total = self
            .aggregate_total
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert(depositor, balance);
        self.aggregate_total = total;
        Ok(())
    }

    /// Subtract `amount` from the depositor and the aggregate.
    ///
    /// Underflow is a hard failure, never saturating.
    pub fn debit(&mut self, depositor: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(depositor);
        let balance = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            })?;
        let total = self
            .aggregate_total
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert(*depositor, balance);
        self.aggregate_total = total;
        Ok(())
    }

    /// Recompute the balance sum and compare it with the recorded aggregate.
    pub fn reconcile(&self) -> Result<(), LedgerError> {
        let computed = self
            .balances
            .values()
            .try_fold(0 as Amount, |acc, b| acc.checked_add(*b))
            .ok_or(LedgerError::Overflow)?;
        if computed != self.aggregate_total {
            return Err(LedgerError::Imbalance {
                recorded: self.aggregate_total,
                computed,
            });
        }
        Ok(())
    }

    /// Non-zero balances, ordered by depositor.
    pub fn balances(&self) -> BTreeMap<AccountId, Amount> {
        self.balances
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(id, amount)| (*id, *amount))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_depositor_reads_zero() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance_of(&AccountId::new()), 0);
        assert_eq!(ledger.aggregate_total(), 0);
    }

    #[test]
    fn test_credit_moves_balance_and_total() {
        let mut ledger = Ledger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();

        ledger.credit(alice, 1_000).unwrap();
        ledger.credit(bob, 250).unwrap();
        ledger.credit(alice, 500).unwrap();

        assert_eq!(ledger.balance_of(&alice), 1_500);
        assert_eq!(ledger.balance_of(&bob), 250);
        assert_eq!(ledger.aggregate_total(), 1_750);
        ledger.reconcile().unwrap();
    }

    #[test]
    fn test_debit_underflow_rejected() {
        let mut ledger = Ledger::new();
        let alice = AccountId::new();
        ledger.credit(alice, 100).unwrap();

        let result = ledger.debit(&alice, 101);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                available: 100,
                requested: 101
            })
        );
        assert_eq!(ledger.balance_of(&alice), 100);
        assert_eq!(ledger.aggregate_total(), 100);
    }

    #[test]
    fn test_debit_unknown_depositor() {
        let mut ledger = Ledger::new();
        let result = ledger.debit(&AccountId::new(), 1);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                available: 0,
                requested: 1
            })
        );
    }

    #[test]
    fn test_debit_to_zero_keeps_entry_consistent() {
        let mut ledger = Ledger::new();
        let alice = AccountId::new();
        ledger.credit(alice, 100).unwrap();
        ledger.debit(&alice, 100).unwrap();

        assert_eq!(ledger.balance_of(&alice), 0);
        assert_eq!(ledger.aggregate_total(), 0);
        assert!(ledger.balances().is_empty());
        ledger.reconcile().unwrap();
    }

    #[test]
    fn test_credit_overflow_leaves_ledger_untouched() {
        let mut ledger = Ledger::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        ledger.credit(alice, Amount::MAX).unwrap();

        assert_eq!(ledger.credit(bob, 1), Err(LedgerError::Overflow));
        assert_eq!(ledger.balance_of(&bob), 0);
        assert_eq!(ledger.aggregate_total(), Amount::MAX);
    }
}
