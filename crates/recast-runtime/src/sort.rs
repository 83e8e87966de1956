//! Argument sorting: route a flat name→value map plus variadic
//! collections into a target's calling convention, without wrapping it.

use crate::args::CallArguments;
use crate::bind::{apply_defaults, unbind, BoundFrame};
use crate::callable::RawCallable;
use recast_kernel::{Param, ParamKind};
use serde_json::Value;
use std::collections::BTreeMap;

/// Arguments that cannot be routed into the target convention.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("non-default parameter '{name}' has no argument value")]
    MissingArgument { name: String },

    #[error("cannot sort arguments ({names})")]
    Unroutable { names: String },

    #[error("cannot sort variable-positional arguments")]
    NoVarPositional,
}

/// Sort a flat argument map (plus optional variadic collections) into
/// call arguments for the given convention. Parameters with defaults may
/// be omitted; leftovers need a variable-keyword collector.
pub fn sort_arguments(
    params: &[Param],
    arguments: BTreeMap<String, Value>,
    var_positional: Option<Vec<Value>>,
    var_keyword: Option<BTreeMap<String, Value>>,
) -> Result<CallArguments, SortError> {
    // explicit arguments override same-named keyword-collection entries
    let mut merged = var_keyword.unwrap_or_default();
    merged.extend(arguments);

    let mut frame = BoundFrame::new();
    apply_defaults(params, &mut frame);

    let vkw_param = params.iter().find(|p| p.kind() == ParamKind::VarKeyword);
    let vpo_param = params
        .iter()
        .find(|p| p.kind() == ParamKind::VarPositional);

    for param in params.iter().filter(|p| !p.kind().is_variadic()) {
        let Some(name) = param.name() else { continue };
        match merged.remove(name) {
            Some(value) => frame.insert(name, value),
            None => {
                if !param.has_default() {
                    return Err(SortError::MissingArgument {
                        name: name.to_string(),
                    });
                }
            }
        }
    }

    if !merged.is_empty() {
        let Some(collector) = vkw_param.and_then(|p| p.name()) else {
            let names: Vec<&str> = merged.keys().map(String::as_str).collect();
            return Err(SortError::Unroutable {
                names: names.join(", "),
            });
        };
        let mut collected = match frame.remove(collector) {
            Some(Value::Object(map)) => map,
            _ => Default::default(),
        };
        collected.extend(merged);
        frame.insert(collector, Value::Object(collected));
    }

    if let Some(values) = var_positional.filter(|v| !v.is_empty()) {
        let Some(collector) = vpo_param.and_then(|p| p.name()) else {
            return Err(SortError::NoVarPositional);
        };
        frame.insert(collector, Value::Array(values));
    }

    Ok(unbind(params, &frame))
}

/// Sort arguments for a callable's own convention and invoke it.
pub fn call_with<R>(
    target: &RawCallable<R>,
    arguments: BTreeMap<String, Value>,
    var_positional: Option<Vec<Value>>,
    var_keyword: Option<BTreeMap<String, Value>>,
) -> Result<R, SortError> {
    use recast_kernel::Reflect;

    let params = target.parameters();
    let call = sort_arguments(&params, arguments, var_positional, var_keyword)?;
    Ok(target.invoke(call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_kernel::{arg, kwo, vkw, vpo};
    use serde_json::json;

    fn convention() -> Vec<Param> {
        vec![
            arg("a"),
            arg("b").with_default(json!(0)).unwrap(),
            vpo("args"),
            kwo("c"),
            kwo("d").with_default(json!(0)).unwrap(),
            vkw("kwargs"),
        ]
    }

    fn map(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn sorts_across_every_kind() {
        let out = sort_arguments(
            &convention(),
            map(&[
                ("a", json!(1)),
                ("b", json!(2)),
                ("c", json!(4)),
                ("d", json!(5)),
            ]),
            Some(vec![json!(3)]),
            Some(map(&[("e", json!(6))])),
        )
        .unwrap();
        assert_eq!(out.positional, vec![json!(1), json!(2), json!(3)]);
        assert_eq!(out.keyword.get("c"), Some(&json!(4)));
        assert_eq!(out.keyword.get("d"), Some(&json!(5)));
        assert_eq!(out.keyword.get("e"), Some(&json!(6)));
    }

    #[test]
    fn defaults_cover_omissions() {
        let out = sort_arguments(
            &convention(),
            map(&[("a", json!(1)), ("c", json!(2))]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(out.positional, vec![json!(1), json!(0)]);
        assert_eq!(out.keyword.get("d"), Some(&json!(0)));
    }

    #[test]
    fn missing_required_argument_is_named() {
        let err = sort_arguments(&convention(), map(&[("a", json!(1))]), None, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "non-default parameter 'c' has no argument value"
        );
    }

    #[test]
    fn leftovers_without_a_collector_fail() {
        let err = sort_arguments(
            &[arg("a")],
            map(&[("a", json!(1)), ("z", json!(2))]),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "cannot sort arguments (z)");
    }

    #[test]
    fn positional_tail_without_a_collector_fails() {
        let err = sort_arguments(
            &[arg("a")],
            map(&[("a", json!(1))]),
            Some(vec![json!(2)]),
            None,
        )
        .unwrap_err();
        assert_eq!(err, SortError::NoVarPositional);
    }

    #[test]
    fn call_with_invokes_the_body() {
        let target = RawCallable::new("sum2", vec![arg("a"), arg("b")], |call| {
            json!(call.positional[0].as_i64().unwrap() + call.positional[1].as_i64().unwrap())
        });
        let out = call_with(
            &target,
            map(&[("a", json!(2)), ("b", json!(3))]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(out, json!(5));
    }
}
