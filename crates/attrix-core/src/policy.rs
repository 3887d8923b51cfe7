//! Import policy
//!
//! A policy is the resolved set of toggles governing one import call: what to
//! do with invalid keys, whether registered setters are preferred over direct
//! assignment, whether existing fields may be replaced, and what value a bare
//! key receives. Policies live on the target object once resolved, so a
//! toggle supplied on one call keeps governing later calls until replaced.

use crate::value::Value;

/// What the import engine does with a key that is not a valid field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidKeyAction {
    /// Fail the import immediately, identifying the offending key
    #[default]
    Reject,

    /// Drop the pair and continue with the next one
    Skip,

    /// Rewrite the key once via [`sanitize`](crate::key::sanitize); if the
    /// result is still invalid, fall back to rejecting that pair
    Sanitize,
}

/// Resolved controls for an import call
///
/// The defaults match the behavior a caller gets with no configuration at
/// all: invalid keys are rejected, fields are assigned directly, and imports
/// may replace existing values.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPolicy {
    /// Handling of keys that fail validation
    pub on_invalid_key: InvalidKeyAction,

    /// Prefer a registered setter over direct field assignment
    pub use_setters: bool,

    /// Whether an existing field may be replaced by an import
    pub allow_overwrite: bool,

    /// Value assigned to a key supplied without one; `None` means
    /// [`Value::Null`]
    pub bare_key_default: Option<Value>,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            on_invalid_key: InvalidKeyAction::Reject,
            use_setters: false,
            allow_overwrite: true,
            bare_key_default: None,
        }
    }
}

/// A partial policy: overrides to fold into a previously resolved policy
///
/// Every field is optional; whatever is omitted keeps the value the target
/// already has. Updates arrive from two places, the explicit argument of
/// [`import_with_policy`](crate::DynObject::import_with_policy) and
/// [`Source::Config`](crate::Source) elements in the source sequence, and
/// merge in that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyUpdate {
    /// Replacement for [`ImportPolicy::on_invalid_key`], if any
    pub on_invalid_key: Option<InvalidKeyAction>,

    /// Replacement for [`ImportPolicy::use_setters`], if any
    pub use_setters: Option<bool>,

    /// Replacement for [`ImportPolicy::allow_overwrite`], if any
    pub allow_overwrite: Option<bool>,

    /// Replacement for [`ImportPolicy::bare_key_default`], if any
    pub bare_key_default: Option<Value>,
}

impl PolicyUpdate {
    /// Create an empty update (merging it changes nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the invalid-key action
    pub fn on_invalid_key(mut self, action: InvalidKeyAction) -> Self {
        self.on_invalid_key = Some(action);
        self
    }

    /// Set whether setters are preferred over direct assignment
    pub fn use_setters(mut self, yes: bool) -> Self {
        self.use_setters = Some(yes);
        self
    }

    /// Set whether existing fields may be replaced
    pub fn allow_overwrite(mut self, yes: bool) -> Self {
        self.allow_overwrite = Some(yes);
        self
    }

    /// Set the value bare keys receive
    pub fn bare_key_default(mut self, value: impl Into<Value>) -> Self {
        self.bare_key_default = Some(value.into());
        self
    }

    /// Check whether this update carries any overrides
    pub fn is_empty(&self) -> bool {
        self.on_invalid_key.is_none()
            && self.use_setters.is_none()
            && self.allow_overwrite.is_none()
            && self.bare_key_default.is_none()
    }

    /// Fold this update into `policy`, field by field
    pub fn apply_to(&self, policy: &mut ImportPolicy) {
        if let Some(action) = self.on_invalid_key {
            policy.on_invalid_key = action;
        }
        if let Some(yes) = self.use_setters {
            policy.use_setters = yes;
        }
        if let Some(yes) = self.allow_overwrite {
            policy.allow_overwrite = yes;
        }
        if let Some(value) = &self.bare_key_default {
            policy.bare_key_default = Some(value.clone());
        }
    }
}
