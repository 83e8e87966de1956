//! The in-flight representation of a call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Positional values plus keyword values: a call about to happen.
/// Keyword insertion order is irrelevant; keys are unique by construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CallArguments {
    pub positional: Vec<Value>,
    pub keyword: BTreeMap<String, Value>,
}

impl CallArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keyword: BTreeMap::new(),
        }
    }

    pub fn with_positional(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    pub fn with_keyword(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keyword.insert(name.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

impl fmt::Display for CallArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .positional
            .iter()
            .map(|v| v.to_string())
            .chain(self.keyword.iter().map(|(k, v)| format!("{k}={v}")))
            .collect();
        write!(f, "({})", rendered.join(", "))
    }
}

/// Build a JSON object value from a keyword map.
pub(crate) fn object_from(map: &BTreeMap<String, Value>) -> Value {
    Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_like_a_call() {
        let call = CallArguments::positional([json!(1), json!(2)]).with_keyword("c", json!(4));
        assert_eq!(call.to_string(), "(1, 2, c=4)");
    }
}
