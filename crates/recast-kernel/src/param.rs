//! Parameter descriptors.
//!
//! A [`Param`] describes one formal parameter of a public calling
//! convention: its kind, its caller-facing name, the name the underlying
//! callable expects, its default source, an opaque annotation tag, and the
//! hooks that run against its value on every call. Descriptors are
//! immutable; [`Param::replace`] evolves a copy.
//!
//! Every descriptor carries a creation-order stamp from a process-wide
//! counter. Synthesis of named descriptor sets sorts by this stamp so the
//! resulting order never depends on the ordering guarantees of whatever
//! mechanism delivered the descriptors.

use crate::default::{Factory, ParamDefault};
use crate::error::ParamError;
use crate::hook::{Converter, HookError, Validator};
use crate::kind::ParamKind;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static CREATION_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_creation_order() -> u64 {
    CREATION_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A field update for [`Param::replace`]: keep the current value or set a
/// new one. `Keep` is the default, so an `Overrides` literal only spells
/// the fields it changes.
#[derive(Clone, Debug)]
pub enum Patch<T> {
    Keep,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    fn apply(self, current: T) -> T {
        match self {
            Patch::Keep => current,
            Patch::Set(value) => value,
        }
    }
}

/// Field overrides for [`Param::replace`]. Construct with
/// [`Overrides::new`] and the chaining setters.
#[derive(Clone, Default)]
pub struct Overrides {
    pub kind: Patch<ParamKind>,
    pub name: Patch<Option<String>>,
    pub interface_name: Patch<Option<String>>,
    pub default: Patch<ParamDefault>,
    pub tag: Patch<Option<String>>,
    pub converters: Patch<Vec<Converter>>,
    pub validators: Patch<Vec<Validator>>,
    pub bound: Patch<bool>,
    pub contextual: Patch<bool>,
    pub metadata: Patch<BTreeMap<String, Value>>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: ParamKind) -> Self {
        self.kind = Patch::Set(kind);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(Some(name.into()));
        self
    }

    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Patch::Set(Some(name.into()));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Patch::Set(ParamDefault::Value(value));
        self
    }

    pub fn factory<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Patch::Set(ParamDefault::Factory(Factory::new(f)));
        self
    }

    pub fn no_default(mut self) -> Self {
        self.default = Patch::Set(ParamDefault::Absent);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Patch::Set(Some(tag.into()));
        self
    }

    pub fn converters(mut self, converters: Vec<Converter>) -> Self {
        self.converters = Patch::Set(converters);
        self
    }

    pub fn validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators = Patch::Set(validators);
        self
    }

    pub fn bound(mut self, bound: bool) -> Self {
        self.bound = Patch::Set(bound);
        self
    }

    pub fn contextual(mut self, contextual: bool) -> Self {
        self.contextual = Patch::Set(contextual);
        self
    }

    pub fn metadata(mut self, metadata: BTreeMap<String, Value>) -> Self {
        self.metadata = Patch::Set(metadata);
        self
    }
}

/// An immutable description of one formal parameter.
#[derive(Clone)]
pub struct Param {
    kind: ParamKind,
    name: Option<String>,
    interface_name: Option<String>,
    default: ParamDefault,
    tag: Option<String>,
    converters: Vec<Converter>,
    validators: Vec<Validator>,
    bound: bool,
    contextual: bool,
    metadata: BTreeMap<String, Value>,
    creation_order: u64,
}

impl Param {
    /// Base constructor. The interface name resolves to `name` when not
    /// given explicitly; the resolution is fixed at construction, so a
    /// later rename leaves the interface name pointing at the underlying
    /// callable.
    pub fn new(kind: ParamKind, name: Option<&str>, interface_name: Option<&str>) -> Self {
        let name = name.or(interface_name).map(str::to_string);
        let interface_name = interface_name.map(str::to_string).or_else(|| name.clone());
        Self {
            kind,
            name,
            interface_name,
            default: ParamDefault::Absent,
            tag: None,
            converters: Vec::new(),
            validators: Vec::new(),
            bound: false,
            contextual: false,
            metadata: BTreeMap::new(),
            creation_order: next_creation_order(),
        }
    }

    /// An unnamed descriptor of the given kind. Only legal as a transient
    /// intermediate; sequence validation rejects it.
    pub fn of_kind(kind: ParamKind) -> Self {
        Self::new(kind, None, None)
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn interface_name(&self) -> Option<&str> {
        self.interface_name.as_deref()
    }

    pub fn default(&self) -> &ParamDefault {
        &self.default
    }

    pub fn has_default(&self) -> bool {
        !self.default.is_absent()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn converters(&self) -> &[Converter] {
        &self.converters
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn bound(&self) -> bool {
        self.bound
    }

    pub fn contextual(&self) -> bool {
        self.contextual
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// The process-wide construction stamp; strictly increases across
    /// descriptor constructions.
    pub fn creation_order(&self) -> u64 {
        self.creation_order
    }

    /// Attach a concrete default value.
    pub fn with_default(mut self, value: Value) -> Result<Self, ParamError> {
        if matches!(self.default, ParamDefault::Factory(_)) {
            return Err(ParamError::DefaultAndFactory);
        }
        self.default = ParamDefault::Value(value);
        Ok(self)
    }

    /// Attach a default factory, invoked fresh on every call that needs it.
    pub fn with_factory<F>(mut self, f: F) -> Result<Self, ParamError>
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        if matches!(self.default, ParamDefault::Value(_)) {
            return Err(ParamError::DefaultAndFactory);
        }
        self.default = ParamDefault::Factory(Factory::new(f));
        Ok(self)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }

    /// Append a converter; converters run in attachment order.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converters.push(converter);
        self
    }

    /// Append a validator; validators run in attachment order.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Mark the parameter as supplied internally: excluded from the public
    /// call surface, but still defaulted, converted, validated, and
    /// projected to the underlying callable. Requires a default or factory.
    pub fn as_bound(mut self) -> Result<Self, ParamError> {
        if self.default.is_absent() {
            return Err(ParamError::BoundWithoutDefault);
        }
        self.bound = true;
        Ok(self)
    }

    /// Evolve a copy with the given field overrides. Re-checks the
    /// bound-requires-default invariant on the result.
    pub fn replace(&self, overrides: Overrides) -> Result<Self, ParamError> {
        let next = Self {
            kind: overrides.kind.apply(self.kind),
            name: overrides.name.apply(self.name.clone()),
            interface_name: overrides.interface_name.apply(self.interface_name.clone()),
            default: overrides.default.apply(self.default.clone()),
            tag: overrides.tag.apply(self.tag.clone()),
            converters: overrides.converters.apply(self.converters.clone()),
            validators: overrides.validators.apply(self.validators.clone()),
            bound: overrides.bound.apply(self.bound),
            contextual: overrides.contextual.apply(self.contextual),
            metadata: overrides.metadata.apply(self.metadata.clone()),
            creation_order: self.creation_order,
        };
        if next.bound && next.default.is_absent() {
            return Err(ParamError::BoundWithoutDefault);
        }
        Ok(next)
    }

    /// The supplied value, or this parameter's default for the call.
    pub fn apply_default(&self, value: Option<Value>) -> Option<Value> {
        value.or_else(|| self.default.resolve())
    }

    /// Run the converter chain left to right.
    pub fn convert(&self, ctx: Option<&Value>, value: Value) -> Result<Value, HookError> {
        let name = self.name().unwrap_or_default();
        let mut current = value;
        for converter in &self.converters {
            current = converter(ctx, name, current)?;
        }
        Ok(current)
    }

    /// Run every validator against the final value.
    pub fn validate(&self, ctx: Option<&Value>, value: &Value) -> Result<(), HookError> {
        let name = self.name().unwrap_or_default();
        for validator in &self.validators {
            validator(ctx, name, value)?;
        }
        Ok(())
    }
}

impl PartialEq for Param {
    /// Structural equality over the data fields; hooks compare by pointer
    /// identity (a cloned descriptor shares its hooks and compares equal).
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.interface_name == other.interface_name
            && self.default == other.default
            && self.tag == other.tag
            && self.bound == other.bound
            && self.contextual == other.contextual
            && self.metadata == other.metadata
            && self.converters.len() == other.converters.len()
            && self
                .converters
                .iter()
                .zip(&other.converters)
                .all(|(a, b)| std::sync::Arc::ptr_eq(a, b))
            && self.validators.len() == other.validators.len()
            && self
                .validators
                .iter()
                .zip(&other.validators)
                .all(|(a, b)| std::sync::Arc::ptr_eq(a, b))
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Param \"{self}\">")
    }
}

/// A positional-only parameter.
pub fn pos(name: &str) -> Param {
    Param::new(ParamKind::PositionalOnly, Some(name), None)
}

/// A positional-or-keyword parameter, the everyday kind.
pub fn arg(name: &str) -> Param {
    Param::new(ParamKind::PositionalOrKeyword, Some(name), None)
}

/// A keyword-only parameter.
pub fn kwo(name: &str) -> Param {
    Param::new(ParamKind::KeywordOnly, Some(name), None)
}

/// A contextual receiver parameter: its bound value is handed to every
/// converter and validator for the call. At most one per signature, first
/// position only.
pub fn ctx(name: &str) -> Param {
    let mut param = Param::new(ParamKind::PositionalOrKeyword, Some(name), None);
    param.contextual = true;
    param
}

/// A variable-positional parameter.
pub fn vpo(name: &str) -> Param {
    Param::new(ParamKind::VarPositional, Some(name), None)
}

/// A variable-keyword parameter.
pub fn vkw(name: &str) -> Param {
    Param::new(ParamKind::VarKeyword, Some(name), None)
}

/// The conventional variable-positional parameter, named `args`.
pub fn args() -> Param {
    vpo("args")
}

/// The conventional variable-keyword parameter, named `kwargs`.
pub fn kwargs() -> Param {
    vkw("kwargs")
}
