//! The revision algebra.
//!
//! A [`Revision`] is a pure transformation from one ordered descriptor
//! list to another. Revisions compose top-to-bottom and never validate
//! their output — structural invariants are checked when the result
//! becomes a [`Signature`](recast_kernel::Signature).
//!
//! The set is closed: synthesize, delete, insert, modify, replace,
//! translocate, copy, manage, sort, compose, and the identity. Position
//! arguments (index / before / after) are a [`Position`] value, so the
//! exactly-one-of rule holds by construction.

use crate::error::RevisionError;
use crate::selector::Selector;
use recast_kernel::{Overrides, Param, ParamError, Reflect};
use std::cmp::Ordering;
use std::sync::Arc;

/// Where an inserted or relocated descriptor lands.
#[derive(Clone, Debug)]
pub enum Position {
    /// An explicit index; past-the-end clamps to append.
    Index(usize),

    /// Immediately before the first descriptor the selector matches.
    Before(Selector),

    /// Immediately after the first descriptor the selector matches.
    After(Selector),
}

/// Whether a selector-driven edit acts on the first hit or on every hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPolicy {
    First,
    All,
}

/// What a selector-driven edit does when nothing matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissPolicy {
    Raise,
    Ignore,
}

type ManageFn = Arc<dyn Fn(Vec<Param>) -> Vec<Param> + Send + Sync>;
type CompareFn = Arc<dyn Fn(&Param, &Param) -> Ordering + Send + Sync>;

/// Which descriptors a copy keeps.
#[derive(Clone)]
pub enum CopyFilter {
    All,
    Include(Selector),
    Exclude(Selector),
}

impl CopyFilter {
    fn keeps(&self, param: &Param) -> bool {
        match self {
            CopyFilter::All => true,
            CopyFilter::Include(sel) => sel.matches(param),
            CopyFilter::Exclude(sel) => !sel.matches(param),
        }
    }
}

/// One step of the revision algebra.
#[derive(Clone)]
pub enum Revision {
    /// Return the input unchanged.
    Identity,

    /// Replace the list outright with the configured descriptors.
    Synthesize { params: Vec<Param> },

    /// Remove every descriptor the selector matches.
    Delete {
        selector: Selector,
        allow_missing: bool,
    },

    /// Add descriptors at the configured position.
    Insert {
        params: Vec<Param>,
        position: Position,
    },

    /// Apply field overrides to matched descriptors.
    Modify {
        selector: Selector,
        overrides: Overrides,
        policy: MatchPolicy,
        on_miss: MissPolicy,
    },

    /// Swap matched descriptors for the configured one.
    Replace { selector: Selector, param: Param },

    /// Move the first matched descriptor to the configured position.
    Translocate {
        selector: Selector,
        position: Position,
    },

    /// Replace the list with descriptors copied from another callable.
    Copy {
        params: Vec<Param>,
        filter: CopyFilter,
    },

    /// Delegate to a user-supplied transformation.
    Manage { f: ManageFn },

    /// Stable sort; `None` uses the canonical key
    /// (kind, has-default, name).
    Sort { compare: Option<CompareFn> },

    /// Apply sub-revisions top-to-bottom.
    Compose { revisions: Vec<Revision> },
}

impl Revision {
    pub fn identity() -> Self {
        Revision::Identity
    }

    /// Replace the sequence with the given descriptors, in the given
    /// order.
    pub fn synthesize(params: Vec<Param>) -> Self {
        Revision::Synthesize { params }
    }

    /// Replace the sequence with positional descriptors (kept in the
    /// given order) followed by named descriptors ordered by their
    /// creation stamp, each adopting its key as the public name and, when
    /// unset, the interface name.
    pub fn synthesize_with_named(
        params: Vec<Param>,
        named: Vec<(String, Param)>,
    ) -> Result<Self, ParamError> {
        let mut named = named;
        named.sort_by_key(|(_, param)| param.creation_order());

        let mut all = params;
        for (key, param) in named {
            let mut overrides = Overrides::new().name(key.clone());
            if param.interface_name().is_none() {
                overrides = overrides.interface_name(key);
            }
            all.push(param.replace(overrides)?);
        }
        Ok(Revision::Synthesize { params: all })
    }

    /// Remove matched descriptors; applying to a sequence with no match
    /// is an error.
    pub fn delete(selector: impl Into<Selector>) -> Self {
        Revision::Delete {
            selector: selector.into(),
            allow_missing: false,
        }
    }

    /// Remove matched descriptors, tolerating a no-op when nothing
    /// matches.
    pub fn delete_lenient(selector: impl Into<Selector>) -> Self {
        Revision::Delete {
            selector: selector.into(),
            allow_missing: true,
        }
    }

    pub fn insert(param: Param, position: Position) -> Self {
        Revision::Insert {
            params: vec![param],
            position,
        }
    }

    pub fn insert_all(params: Vec<Param>, position: Position) -> Self {
        Revision::Insert { params, position }
    }

    pub fn modify(
        selector: impl Into<Selector>,
        overrides: Overrides,
        policy: MatchPolicy,
        on_miss: MissPolicy,
    ) -> Self {
        Revision::Modify {
            selector: selector.into(),
            overrides,
            policy,
            on_miss,
        }
    }

    pub fn replace(selector: impl Into<Selector>, param: Param) -> Self {
        Revision::Replace {
            selector: selector.into(),
            param,
        }
    }

    pub fn translocate(selector: impl Into<Selector>, position: Position) -> Self {
        Revision::Translocate {
            selector: selector.into(),
            position,
        }
    }

    /// Copy the current parameter list of another callable.
    pub fn copy_from(source: &dyn Reflect) -> Self {
        Revision::Copy {
            params: source.parameters(),
            filter: CopyFilter::All,
        }
    }

    /// Copy with an include or exclude filter. The two are mutually
    /// exclusive by construction of [`CopyFilter`].
    pub fn copy_filtered(source: &dyn Reflect, filter: CopyFilter) -> Self {
        Revision::Copy {
            params: source.parameters(),
            filter,
        }
    }

    pub fn manage<F>(f: F) -> Self
    where
        F: Fn(Vec<Param>) -> Vec<Param> + Send + Sync + 'static,
    {
        Revision::Manage { f: Arc::new(f) }
    }

    /// Stable sort by the canonical key: kind first, then descriptors
    /// without defaults ahead of those with, then name.
    pub fn sort() -> Self {
        Revision::Sort { compare: None }
    }

    pub fn sort_by<F>(compare: F) -> Self
    where
        F: Fn(&Param, &Param) -> Ordering + Send + Sync + 'static,
    {
        Revision::Sort {
            compare: Some(Arc::new(compare)),
        }
    }

    /// Apply the given revisions top-to-bottom; zero revisions is the
    /// identity.
    pub fn compose(revisions: Vec<Revision>) -> Self {
        Revision::Compose { revisions }
    }

    /// Transform an ordered descriptor list. Pure: the input is consumed,
    /// a new list is returned, and nothing is validated here.
    pub fn apply(&self, previous: Vec<Param>) -> Result<Vec<Param>, RevisionError> {
        match self {
            Revision::Identity => Ok(previous),

            Revision::Synthesize { params } => Ok(params.clone()),

            Revision::Copy { params, filter } => {
                Ok(params.iter().filter(|p| filter.keeps(p)).cloned().collect())
            }

            Revision::Delete {
                selector,
                allow_missing,
            } => {
                let before = previous.len();
                let next: Vec<Param> = previous
                    .into_iter()
                    .filter(|p| !selector.matches(p))
                    .collect();
                if next.len() == before && !allow_missing {
                    return Err(RevisionError::SelectorNotFound {
                        selector: selector.to_string(),
                    });
                }
                Ok(next)
            }

            Revision::Insert { params, position } => {
                let mut next = previous;
                let index = resolve_position(position, &next)?;
                next.splice(index..index, params.iter().cloned());
                Ok(next)
            }

            Revision::Modify {
                selector,
                overrides,
                policy,
                on_miss,
            } => {
                let mut next = Vec::with_capacity(previous.len());
                let mut hits = 0usize;
                for param in previous {
                    let act = selector.matches(&param)
                        && (*policy == MatchPolicy::All || hits == 0);
                    if act {
                        hits += 1;
                        next.push(param.replace(overrides.clone())?);
                    } else {
                        next.push(param);
                    }
                }
                if hits == 0 && *on_miss == MissPolicy::Raise {
                    return Err(RevisionError::SelectorNotFound {
                        selector: selector.to_string(),
                    });
                }
                Ok(next)
            }

            Revision::Replace { selector, param } => {
                let mut hit = false;
                let next: Vec<Param> = previous
                    .into_iter()
                    .map(|p| {
                        if selector.matches(&p) {
                            hit = true;
                            param.clone()
                        } else {
                            p
                        }
                    })
                    .collect();
                if !hit {
                    return Err(RevisionError::SelectorNotFound {
                        selector: selector.to_string(),
                    });
                }
                Ok(next)
            }

            Revision::Translocate { selector, position } => {
                let mut next = previous;
                let Some(found) = next.iter().position(|p| selector.matches(p)) else {
                    return Err(RevisionError::SelectorNotFound {
                        selector: selector.to_string(),
                    });
                };
                let selected = next.remove(found);
                let index = resolve_position(position, &next)?;
                next.insert(index, selected);
                Ok(next)
            }

            Revision::Manage { f } => Ok(f(previous)),

            Revision::Sort { compare } => {
                let mut next = previous;
                match compare {
                    Some(f) => next.sort_by(|a, b| f(a, b)),
                    None => next.sort_by(|a, b| canonical_order(a, b)),
                }
                Ok(next)
            }

            Revision::Compose { revisions } => {
                let mut current = previous;
                for revision in revisions {
                    current = revision.apply(current)?;
                }
                Ok(current)
            }
        }
    }
}

/// Resolve a position against the list an element will be inserted into.
fn resolve_position(position: &Position, params: &[Param]) -> Result<usize, RevisionError> {
    match position {
        Position::Index(index) => Ok((*index).min(params.len())),
        Position::Before(selector) => params
            .iter()
            .position(|p| selector.matches(p))
            .ok_or_else(|| RevisionError::SelectorNotFound {
                selector: selector.to_string(),
            }),
        Position::After(selector) => params
            .iter()
            .position(|p| selector.matches(p))
            .map(|i| i + 1)
            .ok_or_else(|| RevisionError::SelectorNotFound {
                selector: selector.to_string(),
            }),
    }
}

/// The canonical sort key: kind, then has-default, then name.
fn canonical_order(a: &Param, b: &Param) -> Ordering {
    a.kind()
        .cmp(&b.kind())
        .then(a.has_default().cmp(&b.has_default()))
        .then_with(|| a.name().unwrap_or_default().cmp(b.name().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_kernel::{arg, kwo, vpo, Param, ParamKind};
    use serde_json::json;

    fn names(params: &[Param]) -> Vec<&str> {
        params.iter().map(|p| p.name().unwrap_or_default()).collect()
    }

    fn abc() -> Vec<Param> {
        vec![arg("a"), arg("b"), arg("c")]
    }

    #[test]
    fn identity_returns_its_input() {
        let out = Revision::identity().apply(abc()).unwrap();
        assert_eq!(out, abc());
    }

    #[test]
    fn compose_of_nothing_is_identity() {
        let out = Revision::compose(vec![]).apply(abc()).unwrap();
        assert_eq!(out, abc());
    }

    #[test]
    fn synthesize_discards_previous() {
        let out = Revision::synthesize(vec![arg("x")]).apply(abc()).unwrap();
        assert_eq!(names(&out), ["x"]);
    }

    #[test]
    fn synthesize_orders_named_by_creation_stamp() {
        // b constructed before a; creation order wins over supplied order
        let b = Param::of_kind(ParamKind::PositionalOrKeyword);
        let a = Param::of_kind(ParamKind::PositionalOrKeyword);
        let rev = Revision::synthesize_with_named(
            vec![],
            vec![("a".to_string(), a), ("b".to_string(), b)],
        )
        .unwrap();
        let out = rev.apply(vec![]).unwrap();
        assert_eq!(names(&out), ["b", "a"]);
    }

    #[test]
    fn synthesize_named_adopts_key_as_interface_name() {
        let param = Param::of_kind(ParamKind::PositionalOrKeyword);
        let rev =
            Revision::synthesize_with_named(vec![], vec![("x".to_string(), param)]).unwrap();
        let out = rev.apply(vec![]).unwrap();
        assert_eq!(out[0].name(), Some("x"));
        assert_eq!(out[0].interface_name(), Some("x"));
    }

    #[test]
    fn synthesize_named_keeps_an_explicit_interface_name() {
        let param = arg("inner");
        let rev =
            Revision::synthesize_with_named(vec![], vec![("outer".to_string(), param)]).unwrap();
        let out = rev.apply(vec![]).unwrap();
        assert_eq!(out[0].name(), Some("outer"));
        assert_eq!(out[0].interface_name(), Some("inner"));
    }

    #[test]
    fn delete_removes_all_matches() {
        let out = Revision::delete("b").apply(abc()).unwrap();
        assert_eq!(names(&out), ["a", "c"]);
    }

    #[test]
    fn delete_names_the_missing_selector() {
        let err = Revision::delete("z").apply(abc()).unwrap_err();
        assert_eq!(err.to_string(), "selector 'z' matched no parameter");
    }

    #[test]
    fn delete_lenient_tolerates_a_miss() {
        let out = Revision::delete_lenient("z").apply(abc()).unwrap();
        assert_eq!(names(&out), ["a", "b", "c"]);
    }

    #[test]
    fn insert_at_index_before_and_after() {
        let out = Revision::insert(arg("x"), Position::Index(1))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["a", "x", "b", "c"]);

        let out = Revision::insert(arg("x"), Position::Before(Selector::from("b")))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["a", "x", "b", "c"]);

        let out = Revision::insert(arg("x"), Position::After(Selector::from("b")))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["a", "b", "x", "c"]);
    }

    #[test]
    fn insert_many_keeps_order() {
        let out = Revision::insert_all(vec![arg("x"), arg("y")], Position::Index(0))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["x", "y", "a", "b", "c"]);
    }

    #[test]
    fn insert_before_a_missing_anchor_fails() {
        let err = Revision::insert(arg("x"), Position::Before(Selector::from("z")))
            .apply(abc())
            .unwrap_err();
        assert!(matches!(err, RevisionError::SelectorNotFound { .. }));
    }

    #[test]
    fn insert_index_clamps() {
        let out = Revision::insert(arg("x"), Position::Index(99))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["a", "b", "c", "x"]);
    }

    #[test]
    fn modify_first_match_only() {
        let rev = Revision::modify(
            Selector::predicate(|_| true),
            Overrides::new().name("hit"),
            MatchPolicy::First,
            MissPolicy::Raise,
        );
        let out = rev.apply(abc()).unwrap();
        assert_eq!(names(&out), ["hit", "b", "c"]);
    }

    #[test]
    fn modify_all_matches() {
        let rev = Revision::modify(
            ["a", "c"],
            Overrides::new().default_value(json!(0)),
            MatchPolicy::All,
            MissPolicy::Raise,
        );
        let out = rev.apply(abc()).unwrap();
        assert!(out[0].has_default());
        assert!(!out[1].has_default());
        assert!(out[2].has_default());
    }

    #[test]
    fn modify_miss_policy() {
        let raise = Revision::modify(
            "z",
            Overrides::new().name("w"),
            MatchPolicy::First,
            MissPolicy::Raise,
        );
        assert!(raise.apply(abc()).is_err());

        let ignore = Revision::modify(
            "z",
            Overrides::new().name("w"),
            MatchPolicy::First,
            MissPolicy::Ignore,
        );
        assert_eq!(names(&ignore.apply(abc()).unwrap()), ["a", "b", "c"]);
    }

    #[test]
    fn replace_swaps_and_requires_a_match() {
        let out = Revision::replace("b", kwo("k")).apply(abc()).unwrap();
        assert_eq!(names(&out), ["a", "k", "c"]);
        assert!(Revision::replace("z", kwo("k")).apply(abc()).is_err());
    }

    #[test]
    fn translocate_by_index_and_anchor() {
        let out = Revision::translocate("c", Position::Index(0))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["c", "a", "b"]);

        let out = Revision::translocate("a", Position::After(Selector::from("b")))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["b", "a", "c"]);

        let out = Revision::translocate("c", Position::Before(Selector::from("a")))
            .apply(abc())
            .unwrap();
        assert_eq!(names(&out), ["c", "a", "b"]);
    }

    #[test]
    fn translocate_reports_whichever_selector_missed() {
        let err = Revision::translocate("z", Position::Index(0))
            .apply(abc())
            .unwrap_err();
        assert_eq!(err.to_string(), "selector 'z' matched no parameter");

        let err = Revision::translocate("a", Position::Before(Selector::from("z")))
            .apply(abc())
            .unwrap_err();
        assert_eq!(err.to_string(), "selector 'z' matched no parameter");
    }

    #[test]
    fn manage_delegates_entirely() {
        let rev = Revision::manage(|mut params: Vec<Param>| {
            params.reverse();
            params
        });
        let out = rev.apply(abc()).unwrap();
        assert_eq!(names(&out), ["c", "b", "a"]);
    }

    #[test]
    fn sort_uses_kind_then_default_then_name() {
        let params = vec![
            kwo("z"),
            arg("m").with_default(json!(1)).unwrap(),
            vpo("rest"),
            arg("b"),
            arg("a"),
        ];
        let out = Revision::sort().apply(params).unwrap();
        assert_eq!(names(&out), ["a", "b", "m", "rest", "z"]);
    }

    #[test]
    fn sort_is_stable() {
        let params = vec![arg("b"), arg("b2"), arg("a")];
        let out = Revision::sort_by(|_, _| Ordering::Equal).apply(params).unwrap();
        assert_eq!(names(&out), ["b", "b2", "a"]);
    }

    #[test]
    fn compose_feeds_each_output_forward() {
        let rev = Revision::compose(vec![
            Revision::delete("b"),
            Revision::insert(arg("x"), Position::After(Selector::from("a"))),
        ]);
        let out = rev.apply(abc()).unwrap();
        assert_eq!(names(&out), ["a", "x", "c"]);
    }
}
