//! Unified-Custody Ledger
//!
//! Accepts value in several assets, converts each deposit into a single
//! accounting currency through external quote and exchange collaborators,
//! and tracks per-depositor and aggregate balances against a per-withdrawal
//! ceiling and a global capacity cap.
//!
//! # Modules
//! - `admission`: Deposit pipeline (validate, escrow, quote, capacity, convert, commit)
//! - `withdrawal`: Withdrawal pipeline (validate, debit, release)
//! - `ledger`: Per-depositor balances and the aggregate total
//! - `limits`: Withdrawal limit and capacity cap
//! - `custody`: The system instance, its builder, queries, and privileged setters
//! - `collaborators`: Quote, exchange, transfer, authorization, and pause interfaces
//! - `security`: Reentrancy guard, access control, pause switch
//! - `config`: JSON configuration and validation
//! - `events`: Notifications for external observers
//! - `errors`: Error taxonomy
//! - `snapshot`: Inspectable state with a SHA-256 digest
//! - `memory`: In-memory collaborators for simulation and tests

pub mod admission;
pub mod collaborators;
pub mod config;
pub mod custody;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod limits;
pub mod memory;
pub mod security;
pub mod snapshot;
pub mod withdrawal;

pub use custody::{Custody, CustodyBuilder, ReserveReport};
pub use errors::CustodyError;

/// Custody interface version, bumped on breaking changes to events or errors
pub const CUSTODY_ABI_VERSION: &str = "1.0.0";
