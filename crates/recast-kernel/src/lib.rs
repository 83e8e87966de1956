//! # Recast Kernel
//!
//! The data model for signature rewriting: a public calling convention is
//! an ordered list of parameter descriptors, each carrying the name a
//! caller uses, the name the underlying callable expects, a default
//! source, and the hooks that run against its value on every call.
//!
//! This crate is **callable-agnostic**: it does not prescribe how a
//! callable is invoked or inspected. It only prescribes what a parameter
//! list must look like to be a valid calling convention, and exposes the
//! [`Reflect`] trait the higher layers consume.
//!
//! ## Architecture
//!
//! ```text
//! ParamKind            ← The five-kind model, totally ordered
//!     │
//! Param                ← One formal parameter: names, default, hooks
//!     │
//! Signature            ← Ordered descriptor list + structural invariants
//!     │
//! Reflect              ← What a callable must expose to be rewritten
//! ```

pub mod default;
pub mod error;
pub mod hook;
pub mod kind;
pub mod param;
pub mod reflect;
pub mod render;
pub mod signature;

pub use default::{Factory, ParamDefault};
pub use error::{ParamError, SequenceError};
pub use hook::{converter, validator, Converter, HookError, Validator};
pub use kind::ParamKind;
pub use param::{arg, args, ctx, kwargs, kwo, pos, vkw, vpo, Overrides, Param, Patch};
pub use reflect::Reflect;
pub use render::{stringify_callable, stringify_params};
pub use signature::Signature;
