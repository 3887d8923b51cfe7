//! The attribute import engine
//!
//! An import call walks an ordered sequence of [`Source`]s and projects every
//! key/value pair onto a [`DynObject`]. Configuration records in the sequence
//! are folded into the target's policy before any pair is processed, so one
//! resolved policy governs the whole call.
//!
//! Per pair the engine runs four steps: normalize the key, validate it,
//! check the overwrite rule, then assign: through a registered setter when
//! the policy prefers setters and one exists, directly otherwise. A failing
//! pair stops the call; pairs already applied stay applied.
//!
//! # Example
//!
//! ```
//! use attrix_core::{AttrMap, DynObject, Source};
//!
//! let attrs = AttrMap::new().with("name", "lathe").with("@slots", 4);
//! let obj = DynObject::construct([Source::from(attrs)]).unwrap();
//! assert_eq!(obj.field("name").unwrap().as_str(), Some("lathe"));
//! assert_eq!(obj.field("slots").unwrap().as_int(), Some(4));
//! ```

use crate::key;
use crate::object::DynObject;
use crate::policy::{ImportPolicy, InvalidKeyAction, PolicyUpdate};
use crate::value::Value;
use crate::{ImportError, ImportResult};

/// An insertion-ordered collection of attribute pairs
///
/// Duplicate keys are allowed and kept in order: the engine processes pairs
/// first to last, so a later occurrence overwrites an earlier one within the
/// same call (subject to the overwrite rule).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrMap {
    pairs: Vec<(String, Value)>,
}

impl AttrMap {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check whether the collection holds no pairs
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Append a pair
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append a pair, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    /// Iterate pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Vec<(String, Value)>> for AttrMap {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for AttrMap {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// One element of an import argument sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Plain attribute pairs
    Attrs(AttrMap),

    /// A configuration record: folded into the target's policy for this call
    /// (and kept on the target afterwards) instead of being imported
    Config(PolicyUpdate),

    /// A key supplied without a value; it receives the policy's bare-key
    /// default, or [`Value::Null`] when none is configured
    Bare(String),
}

impl Source {
    /// Shorthand for a [`Source::Bare`] key
    pub fn bare(key: impl Into<String>) -> Self {
        Source::Bare(key.into())
    }
}

impl From<AttrMap> for Source {
    fn from(attrs: AttrMap) -> Self {
        Source::Attrs(attrs)
    }
}

impl From<PolicyUpdate> for Source {
    fn from(update: PolicyUpdate) -> Self {
        Source::Config(update)
    }
}

impl DynObject {
    /// Import attribute sources onto this object under its stored policy
    ///
    /// Equivalent to [`import_with_policy`](Self::import_with_policy) with an
    /// empty update. Returns `&mut self` so calls chain with `?`.
    pub fn import<I>(&mut self, sources: I) -> ImportResult<&mut Self>
    where
        I: IntoIterator<Item = Source>,
    {
        self.import_with_policy(PolicyUpdate::new(), sources)
    }

    /// Import attribute sources with explicit policy overrides
    ///
    /// The policy for the call is resolved once, up front: the object's
    /// stored policy (or defaults), then `update`, then every
    /// [`Source::Config`] in `sources` in order. The resolved policy is
    /// stored back on the object and held fixed while the pairs are
    /// processed.
    pub fn import_with_policy<I>(&mut self, update: PolicyUpdate, sources: I) -> ImportResult<&mut Self>
    where
        I: IntoIterator<Item = Source>,
    {
        let sources: Vec<Source> = sources.into_iter().collect();
        let policy = self.resolve_policy(&update, &sources);

        for source in sources {
            match source {
                Source::Config(_) => {}
                Source::Attrs(attrs) => {
                    for (raw_key, value) in attrs {
                        apply_pair(self, &policy, &raw_key, value)?;
                    }
                }
                Source::Bare(raw_key) => {
                    let value = bare_value(&policy);
                    apply_pair(self, &policy, &raw_key, value)?;
                }
            }
        }
        Ok(self)
    }

    /// Import attribute sources through a caller-supplied handler
    ///
    /// The handler is invoked with `(object, key, value)` for every pair in
    /// place of the built-in validation and assignment steps. It assumes
    /// full responsibility for both, and the policy engine does not see the
    /// pairs at all. Keys reach the handler verbatim. [`Source::Config`]
    /// elements still fold into the stored policy, and bare keys are
    /// resolved to the bare-key default before the handler runs. A handler
    /// error stops the call.
    pub fn import_with<I, F>(&mut self, sources: I, mut handler: F) -> ImportResult<&mut Self>
    where
        I: IntoIterator<Item = Source>,
        F: FnMut(&mut DynObject, &str, Value) -> ImportResult<()>,
    {
        let sources: Vec<Source> = sources.into_iter().collect();
        let policy = self.resolve_policy(&PolicyUpdate::new(), &sources);

        for source in sources {
            match source {
                Source::Config(_) => {}
                Source::Attrs(attrs) => {
                    for (raw_key, value) in attrs {
                        handler(self, &raw_key, value)?;
                    }
                }
                Source::Bare(raw_key) => {
                    let value = bare_value(&policy);
                    handler(self, &raw_key, value)?;
                }
            }
        }
        Ok(self)
    }

    /// Construct a new object from attribute sources
    ///
    /// Creates an empty object, establishes default policy, and delegates to
    /// [`import`](Self::import). Configuration records anywhere in `sources`
    /// become the new object's policy before any pair is processed.
    pub fn construct<I>(sources: I) -> ImportResult<Self>
    where
        I: IntoIterator<Item = Source>,
    {
        Self::construct_with_policy(PolicyUpdate::new(), sources)
    }

    /// Construct a new object with explicit policy overrides
    pub fn construct_with_policy<I>(update: PolicyUpdate, sources: I) -> ImportResult<Self>
    where
        I: IntoIterator<Item = Source>,
    {
        let mut obj = Self::new();
        obj.import_with_policy(update, sources)?;
        Ok(obj)
    }

    /// Resolve the policy for one call and store it on the object.
    fn resolve_policy(&mut self, update: &PolicyUpdate, sources: &[Source]) -> ImportPolicy {
        let mut policy = self.effective_policy();
        update.apply_to(&mut policy);
        for source in sources {
            if let Source::Config(config) = source {
                config.apply_to(&mut policy);
            }
        }
        self.set_policy(policy.clone());
        policy
    }
}

/// The value a bare key receives under `policy`.
fn bare_value(policy: &ImportPolicy) -> Value {
    policy.bare_key_default.clone().unwrap_or(Value::Null)
}

/// Run one key/value pair through the engine.
fn apply_pair(
    target: &mut DynObject,
    policy: &ImportPolicy,
    raw_key: &str,
    value: Value,
) -> ImportResult<()> {
    let normalized = key::normalize(raw_key);

    let name = if key::is_valid(normalized) {
        normalized.to_string()
    } else {
        match policy.on_invalid_key {
            InvalidKeyAction::Reject => {
                return Err(ImportError::InvalidName {
                    key: raw_key.to_string(),
                })
            }
            InvalidKeyAction::Skip => return Ok(()),
            InvalidKeyAction::Sanitize => {
                // One bounded repair attempt; still-invalid names fail the
                // pair the same way Reject would.
                let cleaned = key::sanitize(normalized);
                if key::is_valid(&cleaned) {
                    cleaned
                } else {
                    return Err(ImportError::InvalidName {
                        key: raw_key.to_string(),
                    });
                }
            }
        }
    };

    if !policy.allow_overwrite && target.has_field(&name) {
        return Err(ImportError::ForbiddenOverwrite { name });
    }

    if policy.use_setters && target.has_setter(&name) {
        target.invoke_setter(&name, value);
        return Ok(());
    }
    target.set_field(name, value);
    Ok(())
}
