//! The wrapping collaborator.
//!
//! A [`RawCallable`] pairs a body with the parameter list it actually
//! binds — the private convention. Signing it under a revision produces a
//! [`Wrapped`]: every call binds against the revised public signature,
//! runs the pipeline, and delegates to the body with rewritten arguments.
//!
//! The body's return type is generic and returned unchanged. A body that
//! returns a future keeps its asynchronous nature: the pipeline work
//! happens synchronously and the deferred result goes back to the caller
//! to await, cancel, or schedule.
//!
//! `Wrapped` itself is the already-wrapped marker: re-signing replaces
//! the mapper in place rather than nesting another layer.

use crate::args::CallArguments;
use crate::config::ValidatorPolicy;
use crate::error::{CallError, WrapError};
use crate::mapper::Mapper;
use recast_kernel::{Param, Reflect, Signature};
use recast_revise::Revision;

/// A callable body plus the calling convention it expects.
pub struct RawCallable<R> {
    name: String,
    params: Vec<Param>,
    return_tag: Option<String>,
    body: Box<dyn Fn(CallArguments) -> R + Send + Sync>,
}

impl<R> RawCallable<R> {
    pub fn new<F>(name: impl Into<String>, params: Vec<Param>, body: F) -> Self
    where
        F: Fn(CallArguments) -> R + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            return_tag: None,
            body: Box::new(body),
        }
    }

    pub fn with_return_tag(mut self, tag: impl Into<String>) -> Self {
        self.return_tag = Some(tag.into());
        self
    }

    /// Write back a computed return annotation.
    pub fn set_return_tag(&mut self, tag: Option<String>) {
        self.return_tag = tag;
    }

    /// Invoke the body directly with arguments already in its own
    /// convention.
    pub fn invoke(&self, args: CallArguments) -> R {
        (self.body)(args)
    }
}

impl<R> Reflect for RawCallable<R> {
    fn callable_name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Vec<Param> {
        self.params.clone()
    }

    fn return_tag(&self) -> Option<String> {
        self.return_tag.clone()
    }
}

/// A callable routed through a [`Mapper`]. The public call surface is the
/// revised signature; the body still sees its own convention.
pub struct Wrapped<R> {
    target: RawCallable<R>,
    mapper: Mapper,
    return_tag: Option<String>,
}

impl<R> Wrapped<R> {
    /// Rewrite and delegate one call. Pipeline failures surface before
    /// the body runs; the body's result is returned unchanged.
    pub fn call(&self, args: CallArguments) -> Result<R, CallError> {
        let projected = self.mapper.map(args)?;
        Ok(self.target.invoke(projected))
    }

    /// The public signature callers bind against.
    pub fn public_signature(&self) -> Signature {
        Signature::new_unchecked(self.mapper.public_params().to_vec())
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn target(&self) -> &RawCallable<R> {
        &self.target
    }

    /// Write back a computed return annotation on the wrapper.
    pub fn set_return_tag(&mut self, tag: Option<String>) {
        self.return_tag = tag;
    }

    /// Pin or unpin the validator decision for this wrapper.
    pub fn set_validator_policy(&mut self, policy: ValidatorPolicy) {
        self.mapper = self.mapper.clone().with_policy(policy);
    }

    /// Revise the current public signature and replace the mapper in
    /// place. No second wrapping layer is created; the validator policy
    /// carries over.
    pub fn resign(&mut self, revision: &Revision) -> Result<(), WrapError> {
        let policy = self.mapper.policy();
        let previous = self.mapper.fsignature().params().to_vec();
        let next = revision.apply(previous)?;
        let fsig = Signature::new(next)?;
        self.mapper = Mapper::new(fsig, &self.target)?.with_policy(policy);
        Ok(())
    }
}

impl<R> Reflect for Wrapped<R> {
    fn callable_name(&self) -> &str {
        self.target.callable_name()
    }

    /// The wrapper reflects its public surface, not the body's.
    fn parameters(&self) -> Vec<Param> {
        self.mapper.public_params().to_vec()
    }

    fn return_tag(&self) -> Option<String> {
        self.return_tag
            .clone()
            .or_else(|| self.target.return_tag())
    }
}

/// Apply a revision to a callable's own signature and wrap it so every
/// call is rewritten through the resulting mapper.
pub fn sign<R>(revision: &Revision, target: RawCallable<R>) -> Result<Wrapped<R>, WrapError> {
    let previous = target.parameters();
    let next = revision.apply(previous)?;
    let fsig = Signature::new(next)?;
    let mapper = Mapper::new(fsig, &target)?;
    Ok(Wrapped {
        target,
        mapper,
        return_tag: None,
    })
}
