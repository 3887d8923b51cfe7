//! Attrix Core Runtime
//!
//! This crate provides bulk attribute population for dynamic objects:
//! - Tagged value representation (`Value`)
//! - Dynamic objects with name-keyed field tables and setter registries
//! - Import policies (invalid-key handling, setter preference, overwrite rules)
//! - The import engine itself, usable at construction time or on live objects
//!
//! An import walks an ordered sequence of attribute sources and projects each
//! key/value pair onto the target's fields. When the target has a registered
//! setter for a field and policy allows it, the setter runs in place of a
//! direct assignment, so the target's own handling of that field is preserved.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod value;
pub mod key;
pub mod policy;
pub mod object;
pub mod import;

pub use value::Value;
pub use policy::{ImportPolicy, InvalidKeyAction, PolicyUpdate};
pub use object::{DynObject, FieldTable, SetterFn};
pub use import::{AttrMap, Source};

/// Attribute import errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// The supplied key cannot be turned into a valid field name under the
    /// active policy. Carries the original key, before any normalization or
    /// sanitization, for diagnostics.
    #[error("invalid field name: `{key}`")]
    InvalidName {
        /// The offending key as the caller supplied it
        key: String,
    },

    /// The field is already set and the active policy forbids replacement
    #[error("forbidden by rule: overwrite of `{name}` by import")]
    ForbiddenOverwrite {
        /// The resolved field name that would have been replaced
        name: String,
    },
}

/// Attribute import result
pub type ImportResult<T> = Result<T, ImportError>;
