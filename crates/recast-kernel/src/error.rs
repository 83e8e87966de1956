//! Error types for descriptor construction and sequence validation.

use crate::kind::ParamKind;

/// Descriptor construction misuse. Raised at the offending constructor or
/// evolution call; never recoverable at runtime.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A parameter may carry a concrete default or a factory, never both.
    #[error("expected either \"default\" or \"factory\", received both")]
    DefaultAndFactory,

    /// Bound parameters are supplied internally, so they must be able to
    /// produce a value on their own.
    #[error("bound parameters must have a default value")]
    BoundWithoutDefault,
}

/// A parameter sequence violating its structural invariants. The message
/// names the offending descriptor(s) and, for ordering, both the current
/// and preceding descriptor plus their kinds.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("received unnamed parameter: '{param}'")]
    Unnamed { param: String },

    #[error("only the first parameter can be contextual")]
    ContextualNotFirst,

    #[error("received multiple parameters with name '{name}'")]
    DuplicateName { name: String },

    #[error("received multiple parameters with interface name '{name}'")]
    DuplicateInterfaceName { name: String },

    #[error("'{current}' of kind {current_kind} follows '{last}' of kind {last_kind}")]
    KindOrder {
        current: String,
        current_kind: ParamKind,
        last: String,
        last_kind: ParamKind,
    },

    #[error("received multiple variable-positional parameters")]
    MultipleVarPositional,

    #[error("received multiple variable-keyword parameters")]
    MultipleVarKeyword,

    #[error("non-default parameter '{current}' follows default parameter '{last}'")]
    NonDefaultAfterDefault { current: String, last: String },
}
