//! # Recast Runtime
//!
//! The call path: bind a public call, resolve defaults, convert,
//! validate, and project the bound values into the underlying callable's
//! own convention.
//!
//! Everything expensive happens once, at wrap time. The structural mapper
//! proves that the public signature can always satisfy the callable; the
//! per-call pipeline is a fixed sequence of stages over an immutable
//! plan.
//!
//! ## Architecture
//!
//! ```text
//! CallArguments        ← A call about to happen
//!     │
//! bind / unbind        ← Native five-kind binding semantics
//!     │
//! map_parameters       ← Wrap-time feasibility proof → Correspondence
//!     │
//! Transform            ← CallArguments → CallArguments projection
//!     │
//! Mapper               ← bind → defaults → convert → validate → project
//!     │
//! Wrapped              ← A callable routed through a Mapper
//! ```

pub mod args;
pub mod bind;
pub mod callable;
pub mod config;
pub mod error;
pub mod map;
pub mod mapper;
pub mod sort;
pub mod transform;

pub use args::CallArguments;
pub use bind::{apply_defaults, bind, bind_partial, unbind, BindError, BoundFrame};
pub use callable::{sign, RawCallable, Wrapped};
pub use config::{
    run_validators, set_run_validators, set_run_validators_value, ConfigTypeError,
    ValidatorPolicy,
};
pub use error::{CallError, WrapError};
pub use map::{map_parameters, Correspondence, MapError};
pub use mapper::Mapper;
pub use sort::{call_with, sort_arguments, SortError};
pub use transform::Transform;
