//! Parameter selectors.
//!
//! A selector picks descriptors out of a sequence: by exact name, by
//! membership in a name set, or by arbitrary predicate. Revisions share
//! this one matching surface.

use recast_kernel::Param;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// What a revision matches against.
#[derive(Clone)]
pub enum Selector {
    /// The descriptor with exactly this public name.
    Name(String),

    /// Any descriptor whose public name is in the set.
    Names(BTreeSet<String>),

    /// Any descriptor the predicate accepts.
    Predicate(Arc<dyn Fn(&Param) -> bool + Send + Sync>),
}

impl Selector {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Param) -> bool + Send + Sync + 'static,
    {
        Selector::Predicate(Arc::new(f))
    }

    pub fn matches(&self, param: &Param) -> bool {
        match self {
            Selector::Name(name) => param.name() == Some(name.as_str()),
            Selector::Names(names) => param.name().is_some_and(|n| names.contains(n)),
            Selector::Predicate(f) => f(param),
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Selector::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<String>> for Selector {
    fn from(names: Vec<String>) -> Self {
        Selector::Names(names.into_iter().collect())
    }
}

impl From<BTreeSet<String>> for Selector {
    fn from(names: BTreeSet<String>) -> Self {
        Selector::Names(names)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "'{name}'"),
            Selector::Names(names) => {
                let rendered: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
                write!(f, "({})", rendered.join(", "))
            }
            Selector::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Selector {self}>")
    }
}
