//! The validator toggle.
//!
//! Validators default to enabled. The process-wide toggle is a relaxed
//! atomic with no further synchronization: flipping it concurrently with
//! in-flight calls is last-write-wins, immediately visible to subsequent
//! reads. Pipelines that must not depend on process state take a
//! [`ValidatorPolicy`] instead.

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

static RUN_VALIDATORS: AtomicBool = AtomicBool::new(true);

/// Whether validators run, process-wide.
pub fn run_validators() -> bool {
    RUN_VALIDATORS.load(Ordering::Relaxed)
}

/// Set whether validators run, process-wide.
pub fn set_run_validators(run: bool) {
    RUN_VALIDATORS.store(run, Ordering::Relaxed);
}

/// Non-boolean input for the validator toggle.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("'run' must be bool.")]
pub struct ConfigTypeError;

/// Set the toggle from a dynamic value, rejecting anything non-boolean.
pub fn set_run_validators_value(run: &Value) -> Result<(), ConfigTypeError> {
    match run {
        Value::Bool(b) => {
            set_run_validators(*b);
            Ok(())
        }
        _ => Err(ConfigTypeError),
    }
}

/// How one mapper decides whether to run validators: follow the
/// process-wide toggle, or pin the decision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidatorPolicy {
    /// Read the process-wide toggle on every call.
    #[default]
    Global,

    /// Always run validators, regardless of the toggle.
    Enabled,

    /// Never run validators.
    Disabled,
}

impl ValidatorPolicy {
    pub fn enabled(self) -> bool {
        match self {
            ValidatorPolicy::Global => run_validators(),
            ValidatorPolicy::Enabled => true,
            ValidatorPolicy::Disabled => false,
        }
    }
}
