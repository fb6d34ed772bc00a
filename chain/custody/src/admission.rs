//! Admission pipeline: deposit validation, quoting, capacity, conversion
//!
//! Order of a deposit:
//! 1. zero amount rejected
//! 2. native wrapper (or native sentinel) on the generic path rejected
//! 3. accounting-currency deposits convert at identity; anything else is
//!    quoted, and any quote failure is `NoDirectConversionPath`
//! 4. generic assets are escrowed into the custody account
//! 5. the estimate is checked against the remaining capacity
//! 6. the binding conversion runs and its realized amount is checked again
//! 7. the realized amount is credited and the deposit counter advances
//! 8. a `DepositRecorded` event is appended
//!
//! Steps 1–3 move nothing, so a rejected or unquotable deposit leaves the
//! depositor's asset where it was. Steps 1–6 never touch the ledger. The
//! conversion is only attempted for a deposit that fits under the cap at its
//! quoted value.

use chrono::Utc;
use tracing::{debug, info, warn};
use types::ids::{AccountId, AssetId};
use types::numeric::{format_units, Amount};

use crate::collaborators::{ConversionOrder, Funding};
use crate::custody::Custody;
use crate::errors::CustodyError;
use crate::events::{CustodyEvent, DepositRecorded};

/// A deposit that passed entry validation.
struct Admission {
    depositor: AccountId,
    /// Asset handed to the quote source and the exchange
    asset_in: AssetId,
    /// Asset reported in the deposit event
    reported_asset: AssetId,
    amount_in: Amount,
    funding: Funding,
}

impl Custody {
    /// Deposit a generic asset. Once quoted, the amount is escrowed from
    /// `depositor` into the custody account, converted to the accounting currency, and
    /// credited. Returns the credited amount.
    ///
    /// # Errors
    ///
    /// `SystemPaused`, `ReentrantCall`, `ZeroAmount`, `WrongEntryPoint`,
    /// `NoDirectConversionPath`, `TransferFailed` (escrow),
    /// `CapacityExceeded`, `ConversionFailed`, `Overflow`.
    ///
    /// Nothing moves before the quote succeeds. Later failures leave
    /// value in the custody account without a ledger credit, and recovering
    /// it is the integration's job:
    /// - `CapacityExceeded` on the estimate, or `ConversionFailed`, after
    ///   escrow: the source asset stays escrowed.
    /// - `CapacityExceeded` on the realized amount (favourable slippage): the
    ///   source asset is consumed and the realized accounting currency sits
    ///   in custody.
    pub fn deposit(
        &self,
        depositor: AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<Amount, CustodyError> {
        self.enter()
            .and_then(|_scope| self.deposit_locked(depositor, asset, amount))
            .inspect_err(|err| warn!(%depositor, %asset, amount, %err, "deposit rejected"))
    }

    /// Deposit native value. The value travels with the call, so nothing is
    /// escrowed; the wrapper asset is quoted and converted instead. As with
    /// `deposit`, a realized amount rejected by the capacity re-check stays
    /// in custody uncredited.
    pub fn deposit_native(&self, depositor: AccountId, value: Amount) -> Result<Amount, CustodyError> {
        self.enter()
            .and_then(|_scope| {
                if value == 0 {
                    return Err(CustodyError::ZeroAmount);
                }
                self.admit(Admission {
                    depositor,
                    asset_in: self.settings.native_wrapper.clone(),
                    reported_asset: AssetId::native(),
                    amount_in: value,
                    funding: Funding::Native,
                })
            })
            .inspect_err(|err| warn!(%depositor, value, %err, "native deposit rejected"))
    }

    fn deposit_locked(
        &self,
        depositor: AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<Amount, CustodyError> {
        if amount == 0 {
            return Err(CustodyError::ZeroAmount);
        }
        if *asset == self.settings.native_wrapper || asset.is_native() {
            return Err(CustodyError::WrongEntryPoint {
                asset: asset.clone(),
            });
        }

        self.admit(Admission {
            depositor,
            asset_in: asset.clone(),
            reported_asset: asset.clone(),
            amount_in: amount,
            funding: Funding::Escrowed,
        })
    }

    fn admit(&self, admission: Admission) -> Result<Amount, CustodyError> {
        let identity = admission.asset_in == self.settings.accounting_asset;

        let estimate = if identity {
            admission.amount_in
        } else {
            self.quote(&admission)?
        };
        if admission.funding == Funding::Escrowed {
            self.escrow(&admission)?;
        }
        self.ensure_capacity(estimate)?;

        let realized = if identity {
            admission.amount_in
        } else {
            let realized = self.convert(&admission)?;
            // Favourable slippage can push the realized amount past the cap.
            self.ensure_capacity(realized)?;
            realized
        };

        let deposits = self
            .deposits_count
            .get()
            .checked_add(1)
            .ok_or(CustodyError::Overflow)?;
        self.ledger.borrow_mut().credit(admission.depositor, realized)?;
        self.deposits_count.set(deposits);

        info!(
            depositor = %admission.depositor,
            asset = %admission.reported_asset,
            amount_in = admission.amount_in,
            credited = %format_units(realized),
            aggregate = %format_units(self.aggregate_total()),
            "deposit recorded"
        );
        self.emit(CustodyEvent::DepositRecorded(DepositRecorded {
            depositor: admission.depositor,
            asset: admission.reported_asset,
            amount_in: admission.amount_in,
            accounting_amount: realized,
        }));
        Ok(realized)
    }

    /// Estimate in accounting units. Every failure mode of the quote source,
    /// including a zero quote, is reported as `NoDirectConversionPath`.
    fn quote(&self, admission: &Admission) -> Result<Amount, CustodyError> {
        let no_path = || CustodyError::NoDirectConversionPath {
            asset: admission.asset_in.clone(),
        };
        match self.quotes.quote(
            admission.amount_in,
            &admission.asset_in,
            &self.settings.accounting_asset,
        ) {
            Ok(0) => {
                debug!(asset = %admission.asset_in, "zero quote");
                Err(no_path())
            }
            Ok(estimate) => {
                debug!(
                    asset = %admission.asset_in,
                    amount_in = admission.amount_in,
                    estimate = %format_units(estimate),
                    "quote received"
                );
                Ok(estimate)
            }
            Err(err) => {
                debug!(asset = %admission.asset_in, %err, "quote failed");
                Err(no_path())
            }
        }
    }

    /// Pull the source asset from the depositor into the custody account.
    fn escrow(&self, admission: &Admission) -> Result<(), CustodyError> {
        self.assets
            .transfer(
                &admission.asset_in,
                &admission.depositor,
                &self.settings.custody_account,
                admission.amount_in,
            )
            .map_err(|err| CustodyError::TransferFailed {
                reason: err.to_string(),
            })
    }

    fn convert(&self, admission: &Admission) -> Result<Amount, CustodyError> {
        let order = ConversionOrder {
            asset_in: admission.asset_in.clone(),
            asset_out: self.settings.accounting_asset.clone(),
            amount_in: admission.amount_in,
            recipient: self.settings.custody_account,
            deadline: Utc::now() + self.settings.conversion_deadline,
            funding: admission.funding,
        };
        let realized = self
            .exchange
            .convert(&order)
            .map_err(|err| CustodyError::ConversionFailed {
                reason: err.to_string(),
            })?;
        if realized == 0 {
            return Err(CustodyError::ConversionFailed {
                reason: "conversion produced no output".to_string(),
            });
        }
        Ok(realized)
    }

    fn ensure_capacity(&self, amount: Amount) -> Result<(), CustodyError> {
        let available = self.limits.borrow().headroom(self.aggregate_total());
        if amount > available {
            return Err(CustodyError::CapacityExceeded {
                attempted: amount,
                available,
            });
        }
        Ok(())
    }
}
