//! Withdrawal pipeline
//!
//! The ledger is debited before the accounting asset is released, so a
//! callback fired by the release sees the reduced balance. If the release
//! itself fails the debit is reverted.
//!
//! `WithdrawalRecorded` is deferred until the release has succeeded, so a
//! failed release never produces an event that has to be taken back.

use tracing::{info, warn};
use types::ids::AccountId;
use types::numeric::{format_units, Amount};

use crate::custody::Custody;
use crate::errors::CustodyError;
use crate::events::{CustodyEvent, WithdrawalRecorded};

impl Custody {
    /// Withdraw `amount` of the accounting currency to `depositor`.
    ///
    /// # Errors
    ///
    /// `SystemPaused`, `ReentrantCall`, `ZeroAmount`,
    /// `WithdrawalLimitExceeded`, `InsufficientBalance`, `TransferFailed`,
    /// `Overflow`.
    pub fn withdraw(&self, depositor: AccountId, amount: Amount) -> Result<(), CustodyError> {
        self.enter()
            .and_then(|_scope| self.withdraw_locked(depositor, amount))
            .inspect_err(|err| warn!(%depositor, amount, %err, "withdrawal rejected"))
    }

    fn withdraw_locked(&self, depositor: AccountId, amount: Amount) -> Result<(), CustodyError> {
        if amount == 0 {
            return Err(CustodyError::ZeroAmount);
        }

        let limit = self.withdrawal_limit();
        if amount > limit {
            return Err(CustodyError::WithdrawalLimitExceeded {
                attempted: amount,
                limit,
            });
        }

        let available = self.balance_of(&depositor);
        if amount > available {
            return Err(CustodyError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let previous_count = self.withdrawals_count.get();
        let withdrawals = previous_count
            .checked_add(1)
            .ok_or(CustodyError::Overflow)?;
        self.ledger.borrow_mut().debit(&depositor, amount)?;
        self.withdrawals_count.set(withdrawals);

        let released = self.assets.transfer(
            &self.settings.accounting_asset,
            &self.settings.custody_account,
            &depositor,
            amount,
        );
        if let Err(err) = released {
            self.ledger.borrow_mut().credit(depositor, amount)?;
            self.withdrawals_count.set(previous_count);
            return Err(CustodyError::TransferFailed {
                reason: err.to_string(),
            });
        }

        info!(
            %depositor,
            amount = %format_units(amount),
            aggregate = %format_units(self.aggregate_total()),
            "withdrawal recorded"
        );
        self.emit(CustodyEvent::WithdrawalRecorded(WithdrawalRecorded {
            depositor,
            accounting_amount: amount,
        }));
        Ok(())
    }
}
