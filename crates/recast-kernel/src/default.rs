//! Parameter default sources.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A lazily-invoked default. The factory runs once per call that needs it;
/// results are never cached, so each call observes a fresh value.
#[derive(Clone)]
pub struct Factory(Arc<dyn Fn() -> Value + Send + Sync>);

impl Factory {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the factory for a fresh default value.
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<factory>")
    }
}

impl PartialEq for Factory {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Where a parameter's default comes from, if anywhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ParamDefault {
    /// No default; the parameter must be supplied (or be variadic).
    #[default]
    Absent,

    /// A concrete value, cloned into each call that needs it.
    Value(Value),

    /// A factory invoked fresh at each call that needs it.
    Factory(Factory),
}

impl ParamDefault {
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamDefault::Absent)
    }

    /// Produce the default value for one call, if a default exists.
    pub fn resolve(&self) -> Option<Value> {
        match self {
            ParamDefault::Absent => None,
            ParamDefault::Value(v) => Some(v.clone()),
            ParamDefault::Factory(f) => Some(f.produce()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn factory_runs_fresh_each_resolve() {
        static CALLS: AtomicU64 = AtomicU64::new(0);
        let default = ParamDefault::Factory(Factory::new(|| {
            json!(CALLS.fetch_add(1, Ordering::Relaxed))
        }));
        assert_eq!(default.resolve(), Some(json!(0)));
        assert_eq!(default.resolve(), Some(json!(1)));
    }

    #[test]
    fn absent_resolves_to_nothing() {
        assert_eq!(ParamDefault::Absent.resolve(), None);
        assert_eq!(ParamDefault::Value(json!(null)).resolve(), Some(json!(null)));
    }
}
