//! The call-argument binding engine.
//!
//! Reproduces native five-kind binding semantics: positional values fill
//! positional slots in declaration order, a variable-positional parameter
//! collects the unbounded tail, keyword values fill by name, and a
//! variable-keyword parameter collects the leftovers. Failure messages
//! mirror the native ones verbatim so a wrapped call fails the way a
//! direct call would.
//!
//! A bound call lives in a [`BoundFrame`]: parameter name → value, with
//! absence meaning "unsupplied". Variable-positional values are arrays,
//! variable-keyword values are objects.

use crate::args::{object_from, CallArguments};
use recast_kernel::{Param, ParamKind};
use serde_json::Value;
use std::collections::BTreeMap;

/// A concrete call bound against one signature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundFrame {
    values: BTreeMap<String, Value>,
}

impl BoundFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A concrete call that does not satisfy a signature's arity or kind
/// rules. The rendering matches what native binding raises for the same
/// malformed arguments.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("missing a required argument: '{name}'")]
    MissingRequired { name: String },

    #[error("too many positional arguments")]
    TooManyPositional,

    #[error("multiple values for argument '{name}'")]
    MultipleValues { name: String },

    #[error("got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { name: String },

    #[error("'{name}' parameter is positional only, but was passed as a keyword")]
    PositionalOnlyAsKeyword { name: String },
}

/// Bind a call against a signature. With `partial`, unsupplied
/// non-default parameters are tolerated instead of raised.
pub fn bind(
    params: &[Param],
    call: &CallArguments,
    partial: bool,
) -> Result<BoundFrame, BindError> {
    let mut frame = BoundFrame::new();
    let mut keywords: BTreeMap<String, Value> = call.keyword.clone();

    let mut positions = call.positional.iter();
    let mut remaining = params.iter();
    let mut pending: Option<&Param> = None;

    // Positional phase: walk values and parameters in lockstep.
    loop {
        let Some(value) = positions.next() else {
            // Out of positional values; decide what the next parameter
            // wants before handing the rest to the keyword phase.
            let Some(param) = remaining.next() else {
                break;
            };
            let name = param.name().unwrap_or_default();
            match param.kind() {
                ParamKind::VarPositional => break,
                _ if keywords.contains_key(name) => {
                    if param.kind() == ParamKind::PositionalOnly {
                        return Err(BindError::PositionalOnlyAsKeyword {
                            name: name.to_string(),
                        });
                    }
                    pending = Some(param);
                    break;
                }
                ParamKind::VarKeyword => {
                    pending = Some(param);
                    break;
                }
                _ if param.has_default() || partial => {
                    pending = Some(param);
                    break;
                }
                _ => {
                    return Err(BindError::MissingRequired {
                        name: name.to_string(),
                    });
                }
            }
        };

        let Some(param) = remaining.next() else {
            return Err(BindError::TooManyPositional);
        };
        match param.kind() {
            ParamKind::KeywordOnly | ParamKind::VarKeyword => {
                return Err(BindError::TooManyPositional);
            }
            ParamKind::VarPositional => {
                let mut collected = vec![value.clone()];
                collected.extend(positions.by_ref().cloned());
                frame.insert(
                    param.name().unwrap_or_default(),
                    Value::Array(collected),
                );
                break;
            }
            _ => {
                let name = param.name().unwrap_or_default();
                if keywords.contains_key(name) && param.kind() != ParamKind::PositionalOnly {
                    return Err(BindError::MultipleValues {
                        name: name.to_string(),
                    });
                }
                frame.insert(name, value.clone());
            }
        }
    }

    // Keyword phase: the parameter that broke the positional walk, then
    // everything after it.
    let mut var_keyword: Option<&Param> = None;
    for param in pending.into_iter().chain(remaining) {
        match param.kind() {
            ParamKind::VarKeyword => {
                var_keyword = Some(param);
                continue;
            }
            ParamKind::VarPositional => continue,
            _ => {}
        }
        let name = param.name().unwrap_or_default();
        match keywords.remove(name) {
            Some(value) => {
                if param.kind() == ParamKind::PositionalOnly {
                    return Err(BindError::PositionalOnlyAsKeyword {
                        name: name.to_string(),
                    });
                }
                frame.insert(name, value);
            }
            None => {
                if !partial && !param.has_default() {
                    return Err(BindError::MissingRequired {
                        name: name.to_string(),
                    });
                }
            }
        }
    }

    if !keywords.is_empty() {
        match var_keyword {
            Some(param) => {
                frame.insert(param.name().unwrap_or_default(), object_from(&keywords));
            }
            None => {
                // BTreeMap iteration makes the reported name deterministic.
                let name = keywords.keys().next().cloned().unwrap_or_default();
                return Err(BindError::UnexpectedKeyword { name });
            }
        }
    }

    Ok(frame)
}

/// Bind, tolerating unsupplied non-default parameters.
pub fn bind_partial(params: &[Param], call: &CallArguments) -> Result<BoundFrame, BindError> {
    bind(params, call, true)
}

/// Fill every unsupplied slot: static defaults are cloned, factories run
/// fresh, variadic collectors seed empty.
pub fn apply_defaults(params: &[Param], frame: &mut BoundFrame) {
    for param in params {
        let Some(name) = param.name() else { continue };
        if frame.contains(name) {
            continue;
        }
        match param.kind() {
            ParamKind::VarPositional => frame.insert(name, Value::Array(Vec::new())),
            ParamKind::VarKeyword => frame.insert(name, Value::Object(Default::default())),
            _ => {
                if let Some(value) = param.default().resolve() {
                    frame.insert(name, value);
                }
            }
        }
    }
}

/// Re-emit a bound frame as call arguments: positional values in
/// declaration order up to the first keyword-only slot or gap, everything
/// else by keyword, variadic collections expanded in place.
pub fn unbind(params: &[Param], frame: &BoundFrame) -> CallArguments {
    let mut out = CallArguments::new();
    let mut index = 0;

    while index < params.len() {
        let param = &params[index];
        if matches!(param.kind(), ParamKind::KeywordOnly | ParamKind::VarKeyword) {
            break;
        }
        let Some(value) = param.name().and_then(|n| frame.get(n)) else {
            break;
        };
        if param.kind() == ParamKind::VarPositional {
            if let Value::Array(items) = value {
                out.positional.extend(items.iter().cloned());
            }
        } else {
            out.positional.push(value.clone());
        }
        index += 1;
    }

    for param in &params[index..] {
        if param.kind() == ParamKind::VarPositional {
            continue;
        }
        let Some(name) = param.name() else { continue };
        let Some(value) = frame.get(name) else {
            continue;
        };
        if param.kind() == ParamKind::VarKeyword {
            if let Value::Object(map) = value {
                out.keyword
                    .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        } else {
            out.keyword.insert(name.to_string(), value.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_kernel::{arg, kwo, pos, vkw, vpo};
    use serde_json::json;

    fn full_ladder() -> Vec<Param> {
        vec![
            pos("a"),
            arg("b").with_default(json!(0)).unwrap(),
            vpo("rest"),
            kwo("c"),
            kwo("d").with_default(json!(9)).unwrap(),
            vkw("extra"),
        ]
    }

    #[test]
    fn binds_across_every_kind() {
        let call = CallArguments::positional([json!(1), json!(2), json!(3), json!(4)])
            .with_keyword("c", json!(5))
            .with_keyword("e", json!(6));
        let frame = bind(&full_ladder(), &call, false).unwrap();
        assert_eq!(frame.get("a"), Some(&json!(1)));
        assert_eq!(frame.get("b"), Some(&json!(2)));
        assert_eq!(frame.get("rest"), Some(&json!([3, 4])));
        assert_eq!(frame.get("c"), Some(&json!(5)));
        assert_eq!(frame.get("extra"), Some(&json!({"e": 6})));
        assert!(!frame.contains("d"));
    }

    #[test]
    fn missing_required_argument() {
        let err = bind(&[arg("x")], &CallArguments::new(), false).unwrap_err();
        assert_eq!(err.to_string(), "missing a required argument: 'x'");
    }

    #[test]
    fn missing_required_keyword_only() {
        let params = vec![arg("a"), kwo("c")];
        let call = CallArguments::positional([json!(1)]);
        let err = bind(&params, &call, false).unwrap_err();
        assert_eq!(err, BindError::MissingRequired { name: "c".into() });
    }

    #[test]
    fn too_many_positional_arguments() {
        let call = CallArguments::positional([json!(1), json!(2)]);
        let err = bind(&[arg("x")], &call, false).unwrap_err();
        assert_eq!(err.to_string(), "too many positional arguments");
    }

    #[test]
    fn keyword_only_slot_rejects_positional_overflow() {
        let params = vec![arg("a"), kwo("c")];
        let call = CallArguments::positional([json!(1), json!(2)]);
        assert_eq!(
            bind(&params, &call, false).unwrap_err(),
            BindError::TooManyPositional
        );
    }

    #[test]
    fn unexpected_keyword_argument() {
        let call = CallArguments::new().with_keyword("z", json!(1));
        let err = bind(&[arg("x").with_default(json!(0)).unwrap()], &call, false).unwrap_err();
        assert_eq!(err.to_string(), "got an unexpected keyword argument 'z'");
    }

    #[test]
    fn multiple_values_for_argument() {
        let call = CallArguments::positional([json!(1)]).with_keyword("x", json!(2));
        let err = bind(&[arg("x")], &call, false).unwrap_err();
        assert_eq!(err.to_string(), "multiple values for argument 'x'");
    }

    #[test]
    fn positional_only_rejects_keyword_passing() {
        let call = CallArguments::new().with_keyword("a", json!(1));
        let err = bind(&[pos("a")], &call, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'a' parameter is positional only, but was passed as a keyword"
        );
    }

    #[test]
    fn positional_only_with_default_masks_its_keyword() {
        // the keyword can't reach the positional-only slot, and without a
        // collector it has nowhere else to go
        let params = vec![pos("a").with_default(json!(0)).unwrap()];
        let call = CallArguments::new().with_keyword("a", json!(1));
        let err = bind(&params, &call, false).unwrap_err();
        assert_eq!(err, BindError::PositionalOnlyAsKeyword { name: "a".into() });
    }

    #[test]
    fn positional_only_keyword_is_rejected_despite_collector() {
        // the name matches a positional-only parameter, so it never
        // reaches the keyword collector
        let params = vec![pos("a").with_default(json!(0)).unwrap(), vkw("extra")];
        let call = CallArguments::new().with_keyword("a", json!(1));
        let err = bind(&params, &call, false).unwrap_err();
        assert_eq!(err, BindError::PositionalOnlyAsKeyword { name: "a".into() });
    }

    #[test]
    fn partial_tolerates_missing_values() {
        let frame = bind_partial(&[arg("x"), arg("y")], &CallArguments::new()).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn defaults_fill_gaps_and_seed_collectors() {
        let mut frame = BoundFrame::new();
        apply_defaults(&full_ladder(), &mut frame);
        assert_eq!(frame.get("b"), Some(&json!(0)));
        assert_eq!(frame.get("d"), Some(&json!(9)));
        assert_eq!(frame.get("rest"), Some(&json!([])));
        assert_eq!(frame.get("extra"), Some(&json!({})));
        assert!(!frame.contains("a"));
        assert!(!frame.contains("c"));
    }

    #[test]
    fn factory_defaults_run_per_application() {
        use std::sync::atomic::{AtomicU64, Ordering};
        static CALLS: AtomicU64 = AtomicU64::new(0);
        let params = vec![arg("t")
            .with_factory(|| json!(CALLS.fetch_add(1, Ordering::Relaxed)))
            .unwrap()];
        let mut first = BoundFrame::new();
        apply_defaults(&params, &mut first);
        let mut second = BoundFrame::new();
        apply_defaults(&params, &mut second);
        assert_ne!(first.get("t"), second.get("t"));
    }

    #[test]
    fn unbind_round_trips_a_full_call() {
        let params = full_ladder();
        let call = CallArguments::positional([json!(1), json!(2), json!(3)])
            .with_keyword("c", json!(5))
            .with_keyword("e", json!(6));
        let mut frame = bind(&params, &call, false).unwrap();
        apply_defaults(&params, &mut frame);
        let out = unbind(&params, &frame);
        assert_eq!(out.positional, vec![json!(1), json!(2), json!(3)]);
        assert_eq!(out.keyword.get("c"), Some(&json!(5)));
        assert_eq!(out.keyword.get("d"), Some(&json!(9)));
        assert_eq!(out.keyword.get("e"), Some(&json!(6)));
    }

    #[test]
    fn unbind_emits_declaration_order() {
        let params = vec![arg("a"), arg("b")];
        let mut frame = BoundFrame::new();
        frame.insert("b", json!(2));
        frame.insert("a", json!(1));
        let out = unbind(&params, &frame);
        assert_eq!(out.positional, vec![json!(1), json!(2)]);
    }
}
