//! Validated parameter sequences.
//!
//! A [`Signature`] is an ordered list of descriptors that forms one calling
//! convention. Construction validates the structural invariants; revision
//! machinery that knows it will validate once at the end of a chain can opt
//! out explicitly with [`Signature::new_unchecked`].

use crate::error::SequenceError;
use crate::kind::ParamKind;
use crate::param::Param;
use crate::reflect::Reflect;
use std::collections::BTreeSet;
use std::fmt;

/// An ordered, validated parameter sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Validate and adopt an ordered descriptor list.
    pub fn new(params: Vec<Param>) -> Result<Self, SequenceError> {
        Self::validate(&params)?;
        Ok(Self { params })
    }

    /// Adopt a descriptor list without validating. Explicit opt-in for
    /// intermediate revision states; anything handed to the mapping layers
    /// must have been validated.
    pub fn new_unchecked(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// The empty signature.
    pub fn empty() -> Self {
        Self { params: Vec::new() }
    }

    /// A signature mirroring a callable's current parameter list.
    pub fn from_reflect(source: &dyn Reflect) -> Result<Self, SequenceError> {
        Self::new(source.parameters())
    }

    /// Check every structural invariant over an ordered descriptor list:
    /// non-decreasing kinds, at most one variable-positional and one
    /// variable-keyword, contextual only in first position, no non-default
    /// positional descriptor after a defaulted one (keyword-only exempt),
    /// and name/interface-name uniqueness.
    pub fn validate(params: &[Param]) -> Result<(), SequenceError> {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        let mut interface_names: BTreeSet<&str> = BTreeSet::new();

        for (i, current) in params.iter().enumerate() {
            let (Some(name), Some(interface_name)) = (current.name(), current.interface_name())
            else {
                return Err(SequenceError::Unnamed {
                    param: current.to_string(),
                });
            };
            if current.contextual() && i > 0 {
                return Err(SequenceError::ContextualNotFirst);
            }
            if !names.insert(name) {
                return Err(SequenceError::DuplicateName {
                    name: name.to_string(),
                });
            }
            if !interface_names.insert(interface_name) {
                return Err(SequenceError::DuplicateInterfaceName {
                    name: interface_name.to_string(),
                });
            }

            let Some(last) = i.checked_sub(1).map(|j| &params[j]) else {
                continue;
            };
            if current.kind() < last.kind() {
                return Err(SequenceError::KindOrder {
                    current: current.to_string(),
                    current_kind: current.kind(),
                    last: last.to_string(),
                    last_kind: last.kind(),
                });
            }
            if current.kind() == last.kind() {
                match current.kind() {
                    ParamKind::VarPositional => {
                        return Err(SequenceError::MultipleVarPositional);
                    }
                    ParamKind::VarKeyword => {
                        return Err(SequenceError::MultipleVarKeyword);
                    }
                    ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
                        if last.has_default() && !current.has_default() =>
                    {
                        return Err(SequenceError::NonDefaultAfterDefault {
                            current: name.to_string(),
                            last: last.name().unwrap_or_default().to_string(),
                        });
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Param> {
        self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Look a descriptor up by public name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name() == Some(name))
    }

    pub fn get_at(&self, index: usize) -> Option<&Param> {
        self.params.get(index)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The contextual receiver, when the first descriptor declares one.
    pub fn context(&self) -> Option<&Param> {
        self.params.first().filter(|p| p.contextual())
    }

    /// The variable-positional collector, if declared.
    pub fn var_positional(&self) -> Option<&Param> {
        self.params
            .iter()
            .find(|p| p.kind() == ParamKind::VarPositional)
    }

    /// The variable-keyword collector, if declared.
    pub fn var_keyword(&self) -> Option<&Param> {
        self.params
            .iter()
            .find(|p| p.kind() == ParamKind::VarKeyword)
    }

    /// A new signature with `param` inserted at `index` (clamped to the
    /// tail), re-validated.
    pub fn inserted(&self, index: usize, param: Param) -> Result<Self, SequenceError> {
        let mut params = self.params.clone();
        params.insert(index.min(params.len()), param);
        Self::new(params)
    }

    /// A new signature with the descriptor at `index` swapped out,
    /// re-validated.
    pub fn with_param_at(&self, index: usize, param: Param) -> Result<Self, SequenceError> {
        let mut params = self.params.clone();
        params[index] = param;
        Self::new(params)
    }

    /// A new signature with the descriptor at `index` removed,
    /// re-validated.
    pub fn removed(&self, index: usize) -> Result<Self, SequenceError> {
        let mut params = self.params.clone();
        params.remove(index);
        Self::new(params)
    }

    /// A new signature with the descriptor list replaced outright,
    /// re-validated.
    pub fn replaced(&self, params: Vec<Param>) -> Result<Self, SequenceError> {
        Self::new(params)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", crate::render::stringify_params(&self.params))
    }
}

impl std::ops::Index<usize> for Signature {
    type Output = Param;

    fn index(&self, index: usize) -> &Param {
        &self.params[index]
    }
}

impl<'a> IntoIterator for &'a Signature {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
