//! Custody instance: owns the ledger, the limits, and the collaborators
//!
//! The admission and withdrawal pipelines are implemented on [`Custody`] in
//! their own modules. This module holds construction, the read accessors,
//! the operator-gated limit setters, role grants, and reserve health.
//!
//! State lives behind `RefCell`/`Cell` so that a collaborator holding a
//! shared reference can call back in. No borrow of ledger or limits is ever
//! held across a collaborator call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{info, warn};
use types::ids::{AccountId, AssetId};
use types::numeric::{format_units, Amount};

use crate::collaborators::{AssetTransfer, AuthorizationDenied, Authorizer, Exchange, PauseState, QuoteSource};
use crate::config::{CustodyConfig, CustodySettings};
use crate::errors::{ConfigError, CustodyError};
use crate::events::{CustodyEvent, RoleGranted};
use crate::ledger::Ledger;
use crate::limits::{LimitKind, LimitsRegistry};
use crate::security::{EntryScope, ReentrancyGuard, Role};
use crate::snapshot::CustodySnapshot;

/// Unified-custody ledger.
///
/// Entry points that move value (`deposit`, `deposit_native`, `withdraw`)
/// check the pause gate, then take the reentrancy lock for their whole run.
pub struct Custody {
    pub(crate) settings: CustodySettings,
    pub(crate) ledger: RefCell<Ledger>,
    pub(crate) limits: RefCell<LimitsRegistry>,
    pub(crate) deposits_count: Cell<u64>,
    pub(crate) withdrawals_count: Cell<u64>,
    guard: ReentrancyGuard,
    events: RefCell<Vec<CustodyEvent>>,
    pub(crate) quotes: Rc<dyn QuoteSource>,
    pub(crate) exchange: Rc<dyn Exchange>,
    pub(crate) assets: Rc<dyn AssetTransfer>,
    authorizer: Rc<dyn Authorizer>,
    pause: Rc<dyn PauseState>,
}

/// Collects collaborators before construction. A missing collaborator is
/// the equivalent of a zero address and is rejected by [`build`](Self::build).
#[derive(Default)]
pub struct CustodyBuilder {
    quotes: Option<Rc<dyn QuoteSource>>,
    exchange: Option<Rc<dyn Exchange>>,
    assets: Option<Rc<dyn AssetTransfer>>,
    authorizer: Option<Rc<dyn Authorizer>>,
    pause: Option<Rc<dyn PauseState>>,
}

impl CustodyBuilder {
    pub fn quotes(mut self, quotes: Rc<dyn QuoteSource>) -> Self {
        self.quotes = Some(quotes);
        self
    }

    pub fn exchange(mut self, exchange: Rc<dyn Exchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    pub fn assets(mut self, assets: Rc<dyn AssetTransfer>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn authorizer(mut self, authorizer: Rc<dyn Authorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn pause(mut self, pause: Rc<dyn PauseState>) -> Self {
        self.pause = Some(pause);
        self
    }

    /// Validate the configuration and assemble the custody instance.
    pub fn build(self, config: &CustodyConfig) -> Result<Custody, ConfigError> {
        let (settings, limits) = config.validate()?;
        let custody = Custody {
            settings,
            ledger: RefCell::new(Ledger::new()),
            limits: RefCell::new(limits),
            deposits_count: Cell::new(0),
            withdrawals_count: Cell::new(0),
            guard: ReentrancyGuard::new(),
            events: RefCell::new(Vec::new()),
            quotes: required("quotes", self.quotes)?,
            exchange: required("exchange", self.exchange)?,
            assets: required("assets", self.assets)?,
            authorizer: required("authorizer", self.authorizer)?,
            pause: required("pause", self.pause)?,
        };
        info!(
            custody_account = %custody.settings.custody_account,
            accounting_asset = %custody.settings.accounting_asset,
            withdrawal_limit = %format_units(custody.withdrawal_limit()),
            capacity_cap = %format_units(custody.capacity_cap()),
            "custody initialised"
        );
        Ok(custody)
    }
}

fn required<T: ?Sized>(name: &str, slot: Option<Rc<T>>) -> Result<Rc<T>, ConfigError> {
    slot.ok_or_else(|| {
        ConfigError::Custody(CustodyError::InvalidCollaboratorAddress {
            collaborator: name.to_string(),
        })
    })
}

/// Comparison of the accounted total with what the accounting asset's own
/// bookkeeping says the custody account holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveReport {
    pub accounted: Amount,
    pub reserve: Amount,
}

impl ReserveReport {
    /// Reserve held beyond the accounted total (conversion residue,
    /// unsolicited transfers).
    pub fn surplus(&self) -> Amount {
        self.reserve.saturating_sub(self.accounted)
    }

    /// Accounted value not backed by reserve.
    pub fn deficit(&self) -> Amount {
        self.accounted.saturating_sub(self.reserve)
    }

    pub fn is_backed(&self) -> bool {
        self.reserve >= self.accounted
    }
}

impl Custody {
    pub fn builder() -> CustodyBuilder {
        CustodyBuilder::default()
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn balance_of(&self, depositor: &AccountId) -> Amount {
        self.ledger.borrow().balance_of(depositor)
    }

    pub fn aggregate_total(&self) -> Amount {
        self.ledger.borrow().aggregate_total()
    }

    pub fn withdrawal_limit(&self) -> Amount {
        self.limits.borrow().withdrawal_limit()
    }

    pub fn capacity_cap(&self) -> Amount {
        self.limits.borrow().capacity_cap()
    }

    pub fn deposits_count(&self) -> u64 {
        self.deposits_count.get()
    }

    pub fn withdrawals_count(&self) -> u64 {
        self.withdrawals_count.get()
    }

    pub fn accounting_asset(&self) -> &AssetId {
        &self.settings.accounting_asset
    }

    pub fn native_wrapper(&self) -> &AssetId {
        &self.settings.native_wrapper
    }

    pub fn custody_account(&self) -> AccountId {
        self.settings.custody_account
    }

    /// Accounting-asset quantity actually held, per the asset's own records.
    pub fn reserve_balance(&self) -> Amount {
        self.assets
            .balance_of(&self.settings.accounting_asset, &self.settings.custody_account)
    }

    pub fn reserve_report(&self) -> ReserveReport {
        let report = ReserveReport {
            accounted: self.aggregate_total(),
            reserve: self.reserve_balance(),
        };
        if !report.is_backed() {
            warn!(
                accounted = %format_units(report.accounted),
                reserve = %format_units(report.reserve),
                deficit = %format_units(report.deficit()),
                "reserve below accounted total"
            );
        }
        report
    }

    /// Whether a value-moving operation is currently in progress.
    pub fn is_locked(&self) -> bool {
        self.guard.is_locked()
    }

    pub fn snapshot(&self) -> CustodySnapshot {
        let limits = self.limits.borrow();
        let ledger = self.ledger.borrow();
        CustodySnapshot {
            accounting_asset: self.settings.accounting_asset.clone(),
            balances: ledger.balances(),
            aggregate_total: ledger.aggregate_total(),
            withdrawal_limit: limits.withdrawal_limit(),
            capacity_cap: limits.capacity_cap(),
            deposits_count: self.deposits_count.get(),
            withdrawals_count: self.withdrawals_count.get(),
        }
    }

    /// Recompute the balance sum and compare with the aggregate total.
    pub fn reconcile(&self) -> Result<(), CustodyError> {
        Ok(self.ledger.borrow().reconcile()?)
    }

    // ───────────────────────── Limits ─────────────────────────

    /// Replace the withdrawal ceiling. Operator-only.
    pub fn set_withdrawal_limit(&self, caller: &AccountId, new: Amount) -> Result<(), CustodyError> {
        self.set_limit(caller, LimitKind::WithdrawalLimit, new)
    }

    /// Replace the capacity cap. Operator-only.
    pub fn set_capacity_cap(&self, caller: &AccountId, new: Amount) -> Result<(), CustodyError> {
        self.set_limit(caller, LimitKind::CapacityCap, new)
    }

    fn set_limit(&self, caller: &AccountId, limit: LimitKind, new: Amount) -> Result<(), CustodyError> {
        self.authorizer
            .authorize(caller, Role::Operator)
            .map_err(unauthorized)?;

        let change = self
            .limits
            .borrow_mut()
            .set(limit, new)
            .inspect_err(|err| warn!(%caller, %limit, %err, "limit change rejected"))?;

        info!(
            %caller,
            %limit,
            old = %format_units(change.old),
            new = %format_units(change.new),
            "limit changed"
        );
        self.emit(CustodyEvent::LimitChanged(change));
        Ok(())
    }

    // ───────────────────────── Roles ─────────────────────────

    /// Grant a role through the authorizer and record the grant.
    pub fn grant_role(&self, grantor: &AccountId, grantee: AccountId, role: Role) -> Result<(), CustodyError> {
        self.authorizer
            .grant(grantor, grantee, role)
            .map_err(unauthorized)?;

        info!(%grantor, %grantee, %role, "role granted");
        self.emit(CustodyEvent::RoleGranted(RoleGranted {
            grantor: *grantor,
            grantee,
            role,
        }));
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    pub fn events(&self) -> Vec<CustodyEvent> {
        self.events.borrow().clone()
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&self) -> Vec<CustodyEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub(crate) fn emit(&self, event: CustodyEvent) {
        self.events.borrow_mut().push(event);
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    /// Pause gate, then reentrancy lock. The returned scope must be held for
    /// the rest of the operation.
    pub(crate) fn enter(&self) -> Result<EntryScope<'_>, CustodyError> {
        if self.pause.is_paused() {
            return Err(CustodyError::SystemPaused);
        }
        self.guard.enter().ok_or(CustodyError::ReentrantCall)
    }
}

fn unauthorized(denied: AuthorizationDenied) -> CustodyError {
    warn!(caller = %denied.caller, role = %denied.missing, "unauthorized");
    CustodyError::Unauthorized {
        caller: denied.caller,
        role: denied.missing,
    }
}
