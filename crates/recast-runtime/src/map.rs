//! Wrap-time structural mapping between two signatures.
//!
//! [`map_parameters`] proves, before any call is made, that every
//! destination parameter can be satisfied from the source signature and
//! that every source parameter has somewhere to go. The output is an
//! immutable [`Correspondence`] plan; failures carry the exact parameter
//! and kind so a misconfigured wrap is diagnosable without a call.

use recast_kernel::{Param, ParamKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// A destination signature that cannot be satisfied, or a source
/// parameter with nowhere to go. Raised once, at wrap time.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("missing requisite mapping to non-default {kind} parameter '{name}'")]
    UnsatisfiedTarget { kind: ParamKind, name: String },

    #[error("missing requisite mapping from variable-positional parameter '{name}'")]
    OrphanVarPositional { name: String },

    #[error("missing requisite mapping from variable-keyword parameter '{name}'")]
    OrphanVarKeyword { name: String },

    #[error("missing requisite mapping from parameters ({names})")]
    OrphanParameters { names: String },
}

/// The resolved plan: which source parameter supplies each destination
/// slot, how the variadic collectors carry through, and which leftover
/// source parameters fold into the destination's variable-keyword
/// collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Correspondence {
    /// Destination fixed-slot name → source parameter name.
    pub supplies: BTreeMap<String, String>,

    /// (source, destination) variable-positional pair, when the source
    /// declares one.
    pub var_positional: Option<(String, String)>,

    /// (source, destination) variable-keyword pair, when the source
    /// declares one.
    pub var_keyword: Option<(String, String)>,

    /// Source parameters with no fixed destination, folded one by one
    /// into the destination's variable-keyword collector.
    pub carried: Vec<String>,

    /// The destination's variable-keyword collector, when it has one.
    pub var_keyword_sink: Option<String>,
}

/// Compute the correspondence from a source signature to a destination
/// signature. `hints` overrides the automatic match for individual source
/// parameters (source name → destination name); everything else matches
/// by the source's interface name.
///
/// Matching walks destination parameters in declaration order, so error
/// messages are deterministic when several could fail.
pub fn map_parameters(
    from: &[Param],
    to: &[Param],
    hints: &BTreeMap<String, String>,
) -> Result<Correspondence, MapError> {
    let match_key = |param: &Param| -> Option<String> {
        param
            .name()
            .and_then(|name| hints.get(name))
            .cloned()
            .or_else(|| param.interface_name().map(str::to_string))
    };

    let from_var_positional = from.iter().find(|p| p.kind() == ParamKind::VarPositional);
    let from_var_keyword = from.iter().find(|p| p.kind() == ParamKind::VarKeyword);
    let mut pool: Vec<&Param> = from
        .iter()
        .filter(|p| !p.kind().is_variadic())
        .collect();

    let to_var_positional = to.iter().find(|p| p.kind() == ParamKind::VarPositional);
    let to_var_keyword = to.iter().find(|p| p.kind() == ParamKind::VarKeyword);

    let mut supplies = BTreeMap::new();
    for dest in to.iter().filter(|p| !p.kind().is_variadic()) {
        let dest_name = dest.name().unwrap_or_default();
        match pool
            .iter()
            .position(|s| match_key(s).as_deref() == Some(dest_name))
        {
            Some(i) => {
                let source = pool.remove(i);
                supplies.insert(
                    dest_name.to_string(),
                    source.name().unwrap_or_default().to_string(),
                );
            }
            None if dest.has_default() => {
                // masked mapping: the destination falls back to its own
                // default at call time
            }
            None => {
                return Err(MapError::UnsatisfiedTarget {
                    kind: dest.kind(),
                    name: dest_name.to_string(),
                });
            }
        }
    }

    let mut var_positional = None;
    if let Some(source) = from_var_positional {
        let name = source.name().unwrap_or_default().to_string();
        let Some(dest) = to_var_positional else {
            // a variable-positional tail cannot be redistributed to
            // fixed slots
            return Err(MapError::OrphanVarPositional { name });
        };
        var_positional = Some((name, dest.name().unwrap_or_default().to_string()));
    }

    let mut var_keyword = None;
    if let Some(source) = from_var_keyword {
        let name = source.name().unwrap_or_default().to_string();
        let Some(dest) = to_var_keyword else {
            return Err(MapError::OrphanVarKeyword { name });
        };
        var_keyword = Some((name, dest.name().unwrap_or_default().to_string()));
    }

    let mut carried = Vec::new();
    if !pool.is_empty() {
        if to_var_keyword.is_none() {
            let names: Vec<&str> = pool.iter().map(|p| p.name().unwrap_or_default()).collect();
            return Err(MapError::OrphanParameters {
                names: names.join(", "),
            });
        }
        carried = pool
            .iter()
            .map(|p| p.name().unwrap_or_default().to_string())
            .collect();
    }

    Ok(Correspondence {
        supplies,
        var_positional,
        var_keyword,
        carried,
        var_keyword_sink: to_var_keyword.and_then(|p| p.name()).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_kernel::{arg, kwo, pos, vkw, vpo};
    use serde_json::json;

    fn no_hints() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    #[test]
    fn identical_names_map_straight_across() {
        let plan = map_parameters(&[arg("a"), arg("b")], &[arg("a"), arg("b")], &no_hints())
            .unwrap();
        assert_eq!(plan.supplies.get("a"), Some(&"a".to_string()));
        assert_eq!(plan.supplies.get("b"), Some(&"b".to_string()));
        assert!(plan.carried.is_empty());
    }

    #[test]
    fn interface_names_drive_the_match() {
        let from = vec![arg("public").with_interface_name("inner")];
        let plan = map_parameters(&from, &[arg("inner")], &no_hints()).unwrap();
        assert_eq!(plan.supplies.get("inner"), Some(&"public".to_string()));
    }

    #[test]
    fn hints_override_the_automatic_match() {
        let mut hints = BTreeMap::new();
        hints.insert("x".to_string(), "y".to_string());
        let plan = map_parameters(&[arg("x")], &[arg("y")], &hints).unwrap();
        assert_eq!(plan.supplies.get("y"), Some(&"x".to_string()));
    }

    #[test]
    fn defaulted_destination_is_simply_omitted() {
        let to = vec![arg("a"), arg("b").with_default(json!(1)).unwrap()];
        let plan = map_parameters(&[arg("a")], &to, &no_hints()).unwrap();
        assert_eq!(plan.supplies.len(), 1);
        assert!(!plan.supplies.contains_key("b"));
    }

    #[test]
    fn unsatisfied_destination_names_itself_and_its_kind() {
        let err = map_parameters(&[], &[kwo("a")], &no_hints()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing requisite mapping to non-default keyword-only parameter 'a'"
        );
        let err = map_parameters(&[], &[pos("a")], &no_hints()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing requisite mapping to non-default positional-only parameter 'a'"
        );
    }

    #[test]
    fn source_var_positional_requires_a_destination_one() {
        let err = map_parameters(&[vpo("args")], &[arg("a").with_default(json!(0)).unwrap()], &no_hints())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing requisite mapping from variable-positional parameter 'args'"
        );
        let plan = map_parameters(&[vpo("args")], &[vpo("rest")], &no_hints()).unwrap();
        assert_eq!(
            plan.var_positional,
            Some(("args".to_string(), "rest".to_string()))
        );
    }

    #[test]
    fn source_var_keyword_requires_a_destination_one() {
        let err = map_parameters(&[vkw("kwargs")], &[], &no_hints()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing requisite mapping from variable-keyword parameter 'kwargs'"
        );
    }

    #[test]
    fn orphaned_sources_are_enumerated() {
        let err = map_parameters(&[arg("a"), arg("b")], &[arg("x").with_default(json!(0)).unwrap()], &no_hints())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing requisite mapping from parameters (a, b)"
        );
    }

    #[test]
    fn leftovers_carry_into_the_keyword_collector() {
        let plan = map_parameters(&[arg("a"), arg("b")], &[arg("a"), vkw("extra")], &no_hints())
            .unwrap();
        assert_eq!(plan.carried, vec!["b".to_string()]);
        assert_eq!(plan.var_keyword_sink, Some("extra".to_string()));
        assert_eq!(plan.var_keyword, None);
    }
}
