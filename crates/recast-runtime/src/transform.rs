//! Projection of a concrete call from one signature onto another.
//!
//! A [`Transform`] is built once from two signatures and their
//! [`Correspondence`]; applying it relocates bound values from source
//! slots to destination slots, moves variadic collections across
//! wholesale, and folds unconsumed source values into the destination's
//! variable-keyword collector.

use crate::args::CallArguments;
use crate::bind::{apply_defaults, bind, unbind, BindError, BoundFrame};
use crate::map::{map_parameters, Correspondence, MapError};
use recast_kernel::Param;
use serde_json::Value;
use std::collections::BTreeMap;

/// A reusable call projection between two fixed signatures.
#[derive(Clone, Debug)]
pub struct Transform {
    from: Vec<Param>,
    to: Vec<Param>,
    plan: Correspondence,
}

impl Transform {
    /// Prove feasibility and build the projection. `hints` as in
    /// [`map_parameters`].
    pub fn new(
        from: Vec<Param>,
        to: Vec<Param>,
        hints: &BTreeMap<String, String>,
    ) -> Result<Self, MapError> {
        let plan = map_parameters(&from, &to, hints)?;
        Ok(Self { from, to, plan })
    }

    pub fn plan(&self) -> &Correspondence {
        &self.plan
    }

    /// Project one concrete call. Binds the incoming arguments against
    /// the source signature (applying source defaults), then emits a call
    /// shaped for the destination signature, positional values in
    /// destination declaration order.
    pub fn apply(&self, incoming: CallArguments) -> Result<CallArguments, BindError> {
        let mut source = bind(&self.from, &incoming, false)?;
        apply_defaults(&self.from, &mut source);

        let mut dest = BoundFrame::new();
        apply_defaults(&self.to, &mut dest);

        for (dest_name, source_name) in &self.plan.supplies {
            if let Some(value) = source.remove(source_name) {
                dest.insert(dest_name.clone(), value);
            }
        }

        if let Some((source_name, dest_name)) = &self.plan.var_positional {
            if let Some(tail) = source.remove(source_name) {
                dest.insert(dest_name.clone(), tail);
            }
        }

        if let Some(sink) = &self.plan.var_keyword_sink {
            let mut collected = match dest.remove(sink) {
                Some(Value::Object(map)) => map,
                _ => Default::default(),
            };
            if let Some((source_name, _)) = &self.plan.var_keyword {
                if let Some(Value::Object(map)) = source.remove(source_name) {
                    collected.extend(map);
                }
            }
            for name in &self.plan.carried {
                if let Some(value) = source.remove(name) {
                    collected.insert(name.clone(), value);
                }
            }
            dest.insert(sink.clone(), Value::Object(collected));
        }

        Ok(unbind(&self.to, &dest))
    }
}
