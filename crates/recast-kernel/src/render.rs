//! Canonical textual renderings for diagnostics and documentation.
//!
//! A descriptor renders as `name->interface_name:tag=default`, with the
//! arrow omitted when the two names agree, and `*`/`**` prefixes on
//! variadic parameters. A sequence rendering inserts the `/` marker after
//! trailing positional-only parameters and the `*` marker ahead of
//! keyword-only parameters that no variable-positional separates.

use crate::default::ParamDefault;
use crate::kind::ParamKind;
use crate::param::Param;
use crate::reflect::Reflect;
use std::fmt;

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind() {
            ParamKind::VarPositional => "*",
            ParamKind::VarKeyword => "**",
            _ => "",
        };
        let name = self.name().unwrap_or("<missing>");
        match self.interface_name() {
            Some(interface_name) if Some(interface_name) != self.name() => {
                write!(f, "{prefix}{name}->{prefix}{interface_name}")?;
            }
            _ => write!(f, "{prefix}{name}")?,
        }
        if let Some(tag) = self.tag() {
            write!(f, ":{tag}")?;
        }
        match self.default() {
            ParamDefault::Absent => {}
            ParamDefault::Value(value) => {
                let rendered =
                    serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string());
                write!(f, "={rendered}")?;
            }
            ParamDefault::Factory(_) => write!(f, "=<factory>")?,
        }
        Ok(())
    }
}

/// Render a parameter list with `/` and `*` kind markers, comma-separated.
pub fn stringify_params(params: &[Param]) -> String {
    if params.is_empty() {
        return String::new();
    }

    let has_positional_only = params[0].kind() == ParamKind::PositionalOnly;
    let has_var_positional = params
        .iter()
        .any(|p| p.kind() == ParamKind::VarPositional);

    let mut components = Vec::new();
    for (i, param) in params.iter().enumerate() {
        let last = i.checked_sub(1).map(|j| &params[j]);
        let next = params.get(i + 1);

        if !has_var_positional
            && param.kind() == ParamKind::KeywordOnly
            && last.is_none_or(|p| p.kind() != ParamKind::KeywordOnly)
        {
            components.push("*".to_string());
        }
        components.push(param.to_string());
        if has_positional_only
            && param.kind() == ParamKind::PositionalOnly
            && next.is_none_or(|p| p.kind() != ParamKind::PositionalOnly)
        {
            components.push("/".to_string());
        }
    }
    components.join(", ")
}

/// Render a callable as `name(params) -> tag`.
pub fn stringify_callable(callable: &dyn Reflect) -> String {
    let params = callable.parameters();
    let rtype = callable
        .return_tag()
        .map(|tag| format!(" -> {tag}"))
        .unwrap_or_default();
    format!(
        "{}({}){}",
        callable.callable_name(),
        stringify_params(&params),
        rtype
    )
}
