//! Converter and validator hooks.
//!
//! Hooks are the only place values change shape or get rejected: the engine
//! itself never coerces. Each hook receives the call's context value (the
//! bound value of a contextual parameter, if the signature declares one),
//! the public parameter name, and the value in flight. Hook errors cross
//! the pipeline verbatim — no wrapping text is added.

use serde_json::Value;
use std::sync::Arc;

/// Error type surfaced by user-supplied hooks. Carried through the
/// invocation pipeline unchanged; downcast to recover the original type.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Transforms an argument value. Multiple converters on one parameter
/// apply left to right, each consuming the prior's output.
pub type Converter =
    Arc<dyn Fn(Option<&Value>, &str, Value) -> Result<Value, HookError> + Send + Sync>;

/// Inspects a final argument value; an error aborts the call before it
/// reaches the underlying callable.
pub type Validator =
    Arc<dyn Fn(Option<&Value>, &str, &Value) -> Result<(), HookError> + Send + Sync>;

/// Wrap a closure as a [`Converter`].
pub fn converter<F>(f: F) -> Converter
where
    F: Fn(Option<&Value>, &str, Value) -> Result<Value, HookError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`Validator`].
pub fn validator<F>(f: F) -> Validator
where
    F: Fn(Option<&Value>, &str, &Value) -> Result<(), HookError> + Send + Sync + 'static,
{
    Arc::new(f)
}
