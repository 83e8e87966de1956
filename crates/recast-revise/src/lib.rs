//! # Recast Revise
//!
//! The revision algebra: composable, order-sensitive transformations from
//! one ordered parameter list to another. Each revision is pure — it
//! consumes a descriptor list and returns a new one, deferring structural
//! validation to [`Signature`](recast_kernel::Signature) construction.
//!
//! ```text
//! Selector             ← Name / name-set / predicate matching
//!     │
//! Revision             ← Synthesize, Delete, Insert, Modify, Replace,
//!     │                  Translocate, Copy, Manage, Sort, Compose
//! Vec<Param> → Vec<Param>
//! ```

pub mod error;
pub mod revision;
pub mod selector;

pub use error::RevisionError;
pub use revision::{CopyFilter, MatchPolicy, MissPolicy, Position, Revision};
pub use selector::Selector;
