//! In-memory collaborators for simulation and tests
//!
//! - `AssetBook`: per-(holder, asset) balances implementing [`AssetTransfer`],
//!   with a blocklist for holders that refuse transfers.
//! - `PriceTable`: constant-rate pools implementing [`QuoteSource`] and
//!   [`Exchange`], settling through an `AssetBook` with configurable
//!   slippage.
//!
//! Native value is not tracked by the book; a `Funding::Native` conversion
//! only pays out the output side.

use chrono::Utc;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use types::ids::{AccountId, AssetId};
use types::numeric::Amount;

use crate::collaborators::{AssetTransfer, ConversionOrder, Exchange, Funding, QuoteSource};
use crate::errors::{CollaboratorError, QuoteError};

/// Basis points in one whole.
const BPS: i64 = 10_000;

#[derive(Debug, Default)]
pub struct AssetBook {
    balances: RefCell<HashMap<(AccountId, AssetId), Amount>>,
    blocked: RefCell<HashSet<AccountId>>,
}

impl AssetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `asset` out of thin air for `holder`.
    pub fn mint(&self, holder: AccountId, asset: &AssetId, amount: Amount) -> Result<(), CollaboratorError> {
        let mut balances = self.balances.borrow_mut();
        let entry = balances.entry((holder, asset.clone())).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| CollaboratorError::Rejected("balance overflow".to_string()))?;
        Ok(())
    }

    /// Refuse every transfer to or from `holder`.
    pub fn block(&self, holder: AccountId) {
        self.blocked.borrow_mut().insert(holder);
    }

    pub fn unblock(&self, holder: &AccountId) {
        self.blocked.borrow_mut().remove(holder);
    }

    fn balance(&self, holder: &AccountId, asset: &AssetId) -> Amount {
        self.balances
            .borrow()
            .get(&(*holder, asset.clone()))
            .copied()
            .unwrap_or(0)
    }
}

impl AssetTransfer for AssetBook {
    fn transfer(
        &self,
        asset: &AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), CollaboratorError> {
        {
            let blocked = self.blocked.borrow();
            if blocked.contains(from) || blocked.contains(to) {
                return Err(CollaboratorError::Rejected(format!("{asset}: holder blocked")));
            }
        }

        let available = self.balance(from, asset);
        let remaining = available
            .checked_sub(amount)
            .ok_or(CollaboratorError::InsufficientFunds {
                required: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(to, asset)
            .checked_add(amount)
            .ok_or_else(|| CollaboratorError::Rejected("balance overflow".to_string()))?;

        let mut balances = self.balances.borrow_mut();
        balances.insert((*from, asset.clone()), remaining);
        balances.insert((*to, asset.clone()), credited);
        Ok(())
    }

    fn balance_of(&self, asset: &AssetId, holder: &AccountId) -> Amount {
        self.balance(holder, asset)
    }
}

/// Constant-rate conversion into a single output asset.
///
/// A rate is output minor units per input minor unit. Liquidity is whatever
/// output asset the table's own account holds in the book.
#[derive(Debug)]
pub struct PriceTable {
    book: Rc<AssetBook>,
    account: AccountId,
    asset_out: AssetId,
    rates: RefCell<HashMap<AssetId, Decimal>>,
    /// Positive values pay out less than quoted, negative values more.
    slippage_bps: Cell<i64>,
}

impl PriceTable {
    pub fn new(book: Rc<AssetBook>, account: AccountId, asset_out: AssetId) -> Self {
        Self {
            book,
            account,
            asset_out,
            rates: RefCell::new(HashMap::new()),
            slippage_bps: Cell::new(0),
        }
    }

    pub fn set_rate(&self, asset_in: impl Into<AssetId>, rate: Decimal) {
        self.rates.borrow_mut().insert(asset_in.into(), rate);
    }

    pub fn remove_rate(&self, asset_in: &AssetId) {
        self.rates.borrow_mut().remove(asset_in);
    }

    pub fn set_slippage_bps(&self, bps: i64) {
        self.slippage_bps.set(bps);
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    fn price(&self, amount_in: Amount, asset_in: &AssetId, asset_out: &AssetId) -> Result<Amount, QuoteError> {
        if *asset_out != self.asset_out {
            return Err(QuoteError::NoPath);
        }
        let rate = self
            .rates
            .borrow()
            .get(asset_in)
            .copied()
            .ok_or(QuoteError::NoPath)?;
        Decimal::from_u128(amount_in)
            .and_then(|amount| amount.checked_mul(rate))
            .and_then(|out| out.floor().to_u128())
            .ok_or_else(|| QuoteError::Unavailable(format!("{amount_in} {asset_in} out of range")))
    }

    fn apply_slippage(&self, quoted: Amount) -> Amount {
        let bps = self.slippage_bps.get().clamp(-BPS, BPS);
        let delta = quoted / BPS as u128 * bps.unsigned_abs() as u128
            + quoted % BPS as u128 * bps.unsigned_abs() as u128 / BPS as u128;
        if bps >= 0 {
            quoted - delta
        } else {
            quoted.saturating_add(delta)
        }
    }

    fn liquidity(&self) -> Amount {
        self.book.balance_of(&self.asset_out, &self.account)
    }
}

impl QuoteSource for PriceTable {
    fn quote(&self, amount_in: Amount, asset_in: &AssetId, asset_out: &AssetId) -> Result<Amount, QuoteError> {
        let out = self.price(amount_in, asset_in, asset_out)?;
        if out > self.liquidity() {
            return Err(QuoteError::InsufficientLiquidity);
        }
        Ok(out)
    }
}

impl Exchange for PriceTable {
    fn convert(&self, order: &ConversionOrder) -> Result<Amount, CollaboratorError> {
        if Utc::now() > order.deadline {
            return Err(CollaboratorError::DeadlineExpired);
        }
        let quoted = self
            .price(order.amount_in, &order.asset_in, &order.asset_out)
            .map_err(|err| CollaboratorError::Rejected(err.to_string()))?;
        let realized = self.apply_slippage(quoted);
        let liquidity = self.liquidity();
        if realized > liquidity {
            return Err(CollaboratorError::InsufficientFunds {
                required: realized,
                available: liquidity,
            });
        }

        if order.funding == Funding::Escrowed {
            self.book
                .transfer(&order.asset_in, &order.recipient, &self.account, order.amount_in)?;
        }
        self.book
            .transfer(&order.asset_out, &self.account, &order.recipient, realized)?;
        Ok(realized)
    }
}
