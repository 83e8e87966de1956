//! The per-callable invocation pipeline.
//!
//! A [`Mapper`] is built once per wrapped callable from its public
//! signature and the callable's own parameter list. Every call then runs
//! the same fixed stages: bind the public arguments, resolve defaults
//! (bound descriptors enter here), extract the context value, convert,
//! validate, project public names to interface names, project interface
//! names into the callable's convention.
//!
//! Feasibility is proven at construction: both projections come from
//! [`map_parameters`](crate::map::map_parameters), so a wrap that cannot
//! always be satisfied never produces a mapper.

use crate::args::CallArguments;
use crate::bind::{bind, unbind};
use crate::config::ValidatorPolicy;
use crate::error::CallError;
use crate::map::{Correspondence, MapError};
use crate::transform::Transform;
use recast_kernel::{Overrides, Param, ParamKind, Reflect, Signature};
use serde_json::Value;
use std::collections::BTreeMap;

/// The compiled recipe for rewriting calls against one wrapped callable.
#[derive(Clone, Debug)]
pub struct Mapper {
    target_name: String,
    fsig: Signature,
    public_binding: Vec<Param>,
    full_public: Vec<Param>,
    to_interface: Transform,
    to_private: Transform,
    policy: ValidatorPolicy,
}

impl Mapper {
    /// Build the pipeline for `fsig` over `target`. Runs the structural
    /// mapper twice — public names onto interface names, interface names
    /// onto the target's parameters — and fails here, before any call,
    /// if either projection is unsatisfiable.
    pub fn new(fsig: Signature, target: &dyn Reflect) -> Result<Self, MapError> {
        let no_hints = BTreeMap::new();

        let public_binding: Vec<Param> = fsig
            .iter()
            .filter(|p| !p.bound())
            .cloned()
            .collect();
        let full_public: Vec<Param> = fsig.params().to_vec();

        // The interface view keeps the public shape but speaks the
        // underlying callable's names.
        let interface: Vec<Param> = fsig
            .iter()
            .map(|p| {
                let interface_name = p.interface_name().unwrap_or_default().to_string();
                p.replace(
                    Overrides::new()
                        .name(interface_name.clone())
                        .interface_name(interface_name),
                )
                .unwrap_or_else(|_| p.clone())
            })
            .collect();

        let to_interface = Transform::new(full_public.clone(), interface.clone(), &no_hints)?;
        let to_private = Transform::new(interface, target.parameters(), &no_hints)?;

        Ok(Self {
            target_name: target.callable_name().to_string(),
            fsig,
            public_binding,
            full_public,
            to_interface,
            to_private,
            policy: ValidatorPolicy::default(),
        })
    }

    /// Pin or unpin the validator decision for this mapper.
    pub fn with_policy(mut self, policy: ValidatorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ValidatorPolicy {
        self.policy
    }

    /// The public signature this mapper binds calls against (bound
    /// descriptors excluded).
    pub fn public_params(&self) -> &[Param] {
        &self.public_binding
    }

    /// The full descriptor set, bound descriptors included.
    pub fn fsignature(&self) -> &Signature {
        &self.fsig
    }

    /// The interface→private plan, the feasibility proof for this wrap.
    pub fn correspondence(&self) -> &Correspondence {
        self.to_private.plan()
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Rewrite one public call into the underlying callable's convention.
    pub fn map(&self, incoming: CallArguments) -> Result<CallArguments, CallError> {
        let mut frame = bind(&self.public_binding, &incoming, false).map_err(|e| {
            CallError::Bind {
                callable: self.target_name.clone(),
                message: e.to_string(),
            }
        })?;

        // Defaults for every descriptor, bound ones included; factories
        // run fresh on each call.
        for param in self.fsig.iter() {
            let Some(name) = param.name() else { continue };
            if frame.contains(name) {
                continue;
            }
            match param.kind() {
                ParamKind::VarPositional => frame.insert(name, Value::Array(Vec::new())),
                ParamKind::VarKeyword => {
                    frame.insert(name, Value::Object(Default::default()))
                }
                _ => {
                    if let Some(value) = param.default().resolve() {
                        frame.insert(name, value);
                    }
                }
            }
        }

        // Context is the bound value of the contextual descriptor,
        // post-default and pre-convert.
        let ctx: Option<Value> = self
            .fsig
            .context()
            .and_then(|p| p.name())
            .and_then(|name| frame.get(name))
            .cloned();

        for param in self.fsig.iter() {
            if param.converters().is_empty() {
                continue;
            }
            let Some(name) = param.name() else { continue };
            if let Some(value) = frame.remove(name) {
                let converted = param
                    .convert(ctx.as_ref(), value)
                    .map_err(CallError::Hook)?;
                frame.insert(name, converted);
            }
        }

        if self.policy.enabled() {
            for param in self.fsig.iter() {
                if param.validators().is_empty() {
                    continue;
                }
                let Some(name) = param.name() else { continue };
                if let Some(value) = frame.get(name) {
                    param
                        .validate(ctx.as_ref(), value)
                        .map_err(CallError::Hook)?;
                }
            }
        }

        let staged = unbind(&self.full_public, &frame);
        let staged = self.to_interface.apply(staged).map_err(|e| self.internal(e))?;
        self.to_private.apply(staged).map_err(|e| self.internal(e))
    }

    /// A projection failure after a successful public bind. The plans are
    /// total, so this only fires if a hook reshaped a variadic collection
    /// into something unbindable.
    fn internal(&self, err: crate::bind::BindError) -> CallError {
        CallError::Bind {
            callable: self.target_name.clone(),
            message: err.to_string(),
        }
    }
}
