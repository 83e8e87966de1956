//! The reflection surface callables expose to the mapping layers.
//!
//! The engine never inspects a callable itself; it consumes this trait.
//! Anything that can report a name, an ordered parameter list, and a
//! return tag can be wrapped, copied from, or mapped against.

use crate::param::Param;

/// Read access to a callable's current calling convention.
pub trait Reflect {
    /// The callable's name, used to scope per-call diagnostics.
    fn callable_name(&self) -> &str;

    /// The callable's ordered parameter list.
    fn parameters(&self) -> Vec<Param>;

    /// The return annotation tag, if one is declared.
    fn return_tag(&self) -> Option<String> {
        None
    }
}
