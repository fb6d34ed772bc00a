//! Types library for the unified custody ledger
//!
//! Value types shared by the custody core and its collaborators.
//!
//! # Modules
//! - `ids`: Identifiers (AccountId, AssetId)
//! - `numeric`: Fixed-point accounting amounts (6 fractional digits)

pub mod ids;
pub mod numeric;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
