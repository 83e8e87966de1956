//! Error types for the call path and for wrapping.

use recast_kernel::{HookError, SequenceError};
use recast_revise::RevisionError;

use crate::map::MapError;

/// A concrete invocation that could not be completed. Binding failures
/// render as `{callable}() {message}`, mirroring what the callable itself
/// would raise for the same malformed arguments; hook errors cross
/// verbatim.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("{callable}() {message}")]
    Bind { callable: String, message: String },

    /// An error raised by a user-supplied converter or validator,
    /// propagated unchanged. Downcast to recover the original type.
    #[error("{0}")]
    Hook(HookError),
}

impl CallError {
    /// The user hook error, when that is what aborted the call.
    pub fn into_hook_error(self) -> Option<HookError> {
        match self {
            CallError::Hook(err) => Some(err),
            CallError::Bind { .. } => None,
        }
    }
}

/// A wrap that could not be established: the revision failed, its output
/// was not a valid signature, or the mapping is unsatisfiable.
#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    #[error(transparent)]
    Revision(#[from] RevisionError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Map(#[from] MapError),
}
