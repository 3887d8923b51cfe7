//! Dynamic object model
//!
//! A [`DynObject`] is a bag of named fields plus the two registries the
//! import engine consults: setter functions keyed by field name, and the
//! policy resolved by earlier import calls. Field names are stored in
//! insertion order: the table keeps a names vector alongside a hash index,
//! so "does this field exist" is a map lookup while iteration reproduces the
//! order fields first appeared.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::policy::ImportPolicy;
use crate::value::Value;

/// A registered setter: receives the field table and the incoming value and
/// performs the assignment itself.
///
/// Setters exist so a field with its own handling (clamping, derived state,
/// side effects) keeps that handling when the field arrives through a bulk
/// import. What a setter does with the table is its own business; the import
/// engine only decides whether to call it.
pub type SetterFn = Arc<dyn Fn(&mut FieldTable, Value) + Send + Sync>;

/// Insertion-ordered mapping from field names to values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    /// Field names in first-insertion order
    names: Vec<String>,
    /// Field values, parallel to `names`
    values: Vec<Value>,
    /// Field name to slot mapping
    index: FxHashMap<String, usize>,
}

impl FieldTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the table has no fields
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check whether a field exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get a field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&slot| &self.values[slot])
    }

    /// Set a field value by name
    ///
    /// A new field is appended; an existing field keeps its original slot, so
    /// replacement does not disturb iteration order.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&slot) => self.values[slot] = value,
            None => {
                self.index.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.values.push(value);
            }
        }
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Iterate (name, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// A dynamic object: ordered fields, setter registry, attached import policy
///
/// The object itself is inert; it performs no validation and no I/O. All
/// interpretation of keys and conflict rules happens in the import engine
/// (see [`import`](crate::import)); the accessors here assign verbatim.
pub struct DynObject {
    fields: FieldTable,
    setters: FxHashMap<String, SetterFn>,
    policy: Option<ImportPolicy>,
}

impl DynObject {
    /// Create an empty object with no setters and no resolved policy
    pub fn new() -> Self {
        Self {
            fields: FieldTable::new(),
            setters: FxHashMap::default(),
            policy: None,
        }
    }

    /// Get a field value by name
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field directly, bypassing any registered setter
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.set(name, value);
    }

    /// Check whether a field exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Number of fields
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Borrow the field table
    pub fn fields(&self) -> &FieldTable {
        &self.fields
    }

    /// Borrow the field table mutably
    pub fn fields_mut(&mut self) -> &mut FieldTable {
        &mut self.fields
    }

    /// Register a setter for `name`, replacing any previous one
    pub fn define_setter<F>(&mut self, name: impl Into<String>, setter: F)
    where
        F: Fn(&mut FieldTable, Value) + Send + Sync + 'static,
    {
        self.setters.insert(name.into(), Arc::new(setter));
    }

    /// Check whether a setter is registered for `name`
    pub fn has_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// Invoke the setter for `name` with `value`, if one is registered
    ///
    /// Returns `true` if a setter ran.
    pub fn invoke_setter(&mut self, name: &str, value: Value) -> bool {
        match self.setters.get(name).cloned() {
            Some(setter) => {
                setter(&mut self.fields, value);
                true
            }
            None => false,
        }
    }

    /// The policy resolved by earlier imports, if any
    pub fn policy(&self) -> Option<&ImportPolicy> {
        self.policy.as_ref()
    }

    /// Attach or replace the object's policy
    pub fn set_policy(&mut self, policy: ImportPolicy) {
        self.policy = Some(policy);
    }

    /// The stored policy, or defaults if none has been resolved yet
    pub(crate) fn effective_policy(&self) -> ImportPolicy {
        self.policy.clone().unwrap_or_default()
    }
}

impl Default for DynObject {
    fn default() -> Self {
        Self::new()
    }
}

// Setter closures are opaque, so Debug shows their names only.
impl fmt::Debug for DynObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut setters: Vec<&str> = self.setters.keys().map(String::as_str).collect();
        setters.sort_unstable();
        f.debug_struct("DynObject")
            .field("fields", &self.fields)
            .field("setters", &setters)
            .field("policy", &self.policy)
            .finish()
    }
}
