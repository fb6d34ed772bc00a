//! Shared fixture for custody integration tests.
#![allow(dead_code)]

use custody::config::CustodyConfig;
use custody::memory::{AssetBook, PriceTable};
use custody::security::{AccessControl, PauseGuard};
use custody::{Custody, CustodyBuilder};
use rust_decimal::Decimal;
use std::rc::Rc;
use std::str::FromStr;
use types::prelude::*;

pub const WITHDRAWAL_LIMIT: Amount = 1_000 * UNIT;
pub const CAPACITY_CAP: Amount = 5_000 * UNIT;

/// Output-side inventory held by the price table's pool account.
pub const POOL_LIQUIDITY: Amount = 1_000_000_000 * UNIT;

/// One whole unit of an 18-decimal asset.
pub const ONE_TOKEN: Amount = 1_000_000_000_000_000_000;

pub fn usdc() -> AssetId {
    AssetId::from("USDC")
}

pub fn weth() -> AssetId {
    AssetId::from("WETH")
}

pub fn dai() -> AssetId {
    AssetId::from("DAI")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub struct Fixture {
    pub config: CustodyConfig,
    pub book: Rc<AssetBook>,
    pub prices: Rc<PriceTable>,
    pub access: Rc<AccessControl>,
    pub pause: Rc<PauseGuard>,
    pub admin: AccountId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_limits(WITHDRAWAL_LIMIT, CAPACITY_CAP)
    }

    pub fn with_limits(withdrawal_limit: Amount, capacity_cap: Amount) -> Self {
        init_tracing();

        let book = Rc::new(AssetBook::new());
        let pool = AccountId::new();
        book.mint(pool, &usdc(), POOL_LIQUIDITY).unwrap();

        let prices = Rc::new(PriceTable::new(book.clone(), pool, usdc()));
        // 1 WETH = 2,500 USDC; 1 DAI = 1 USDC
        prices.set_rate(weth(), Decimal::from_str("0.0000000025").unwrap());
        prices.set_rate(dai(), Decimal::from_str("0.000000000001").unwrap());

        let admin = AccountId::new();
        let config = CustodyConfig {
            custody_account: AccountId::new(),
            accounting_asset: usdc(),
            native_wrapper: weth(),
            withdrawal_limit: to_decimal(withdrawal_limit).unwrap(),
            capacity_cap: to_decimal(capacity_cap).unwrap(),
            conversion_deadline_secs: 300,
        };

        Self {
            config,
            book,
            prices,
            access: Rc::new(AccessControl::new(admin)),
            pause: Rc::new(PauseGuard::new()),
            admin,
        }
    }

    /// Builder with every collaborator wired to the in-memory defaults.
    pub fn builder(&self) -> CustodyBuilder {
        Custody::builder()
            .quotes(self.prices.clone())
            .exchange(self.prices.clone())
            .assets(self.book.clone())
            .authorizer(self.access.clone())
            .pause(self.pause.clone())
    }

    pub fn build(&self) -> Rc<Custody> {
        Rc::new(self.builder().build(&self.config).unwrap())
    }

    pub fn custody_account(&self) -> AccountId {
        self.config.custody_account
    }

    /// Give `holder` some of `asset` to deposit.
    pub fn fund(&self, holder: AccountId, asset: &AssetId, amount: Amount) {
        self.book.mint(holder, asset, amount).unwrap();
    }

    /// Fund and deposit accounting currency in one step.
    pub fn deposit_usdc(&self, custody: &Custody, depositor: AccountId, amount: Amount) {
        self.fund(depositor, &usdc(), amount);
        custody.deposit(depositor, &usdc(), amount).unwrap();
    }
}
