//! Error types for revision application.

use recast_kernel::ParamError;

/// A revision that could not be applied to the sequence it received.
#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    /// A required selector matched nothing.
    #[error("selector {selector} matched no parameter")]
    SelectorNotFound { selector: String },

    /// A field override produced an invalid descriptor.
    #[error(transparent)]
    Param(#[from] ParamError),
}
