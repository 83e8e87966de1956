//! The five-kind parameter model.
//!
//! Kinds are totally ordered; a valid signature lists its parameters in
//! non-decreasing kind order. The `Display` renderings are the canonical
//! spellings used in diagnostics.

use serde::{Deserialize, Serialize};

/// How a parameter accepts its argument.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// Fills from position only; the name is not addressable by callers.
    PositionalOnly,

    /// Fills from position or by name.
    PositionalOrKeyword,

    /// Collects the unbounded positional tail.
    VarPositional,

    /// Fills by name only.
    KeywordOnly,

    /// Collects leftover keyword arguments.
    VarKeyword,
}

impl ParamKind {
    /// Whether this kind collects a variable number of arguments.
    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }

    /// Whether this kind can receive a positionally-passed argument.
    pub fn is_positional(self) -> bool {
        matches!(
            self,
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword | ParamKind::VarPositional
        )
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ParamKind::PositionalOnly => "positional-only",
            ParamKind::PositionalOrKeyword => "positional-or-keyword",
            ParamKind::VarPositional => "variable-positional",
            ParamKind::KeywordOnly => "keyword-only",
            ParamKind::VarKeyword => "variable-keyword",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_totally_ordered() {
        let ordered = [
            ParamKind::PositionalOnly,
            ParamKind::PositionalOrKeyword,
            ParamKind::VarPositional,
            ParamKind::KeywordOnly,
            ParamKind::VarKeyword,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn canonical_renderings() {
        assert_eq!(ParamKind::VarPositional.to_string(), "variable-positional");
        assert_eq!(
            ParamKind::PositionalOrKeyword.to_string(),
            "positional-or-keyword"
        );
    }
}
