//! Inheritable exclusion policy
//!
//! An `ExcludePolicy` suppresses source fields during projection. A rule is
//! either `Suppress` (drop the field outright) or `Scoped` (a nested policy
//! applied when that relation is projected). The caller's policy is inherited
//! at every relation hop: the effective nested policy is the outer policy
//! merged with either the relation's explicit scoped policy or, when the
//! caller gave none, a safety default that keeps deep dumps bounded.

use crate::error::Result;
use crate::map::Field;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// How a single field is excluded
#[derive(Debug, Clone, PartialEq)]
pub enum ExcludeRule {
    /// Drop the field from output entirely
    Suppress,
    /// Apply this policy when projecting the field's relation
    Scoped(ExcludePolicy),
}

/// Field-keyed exclusion rules, recursively scoped per relation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExcludePolicy {
    rules: IndexMap<Field, ExcludeRule>,
}

impl ExcludePolicy {
    /// Empty policy: nothing excluded
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress a field
    pub fn suppress(mut self, field: Field) -> Self {
        self.rules.insert(field, ExcludeRule::Suppress);
        self
    }

    /// Scope a nested policy to a relation field
    pub fn scoped(mut self, field: Field, policy: ExcludePolicy) -> Self {
        self.rules.insert(field, ExcludeRule::Scoped(policy));
        self
    }

    /// Safety default for cause (`from`) and aggregate (`errors`) hops
    pub fn cause_defaults() -> Self {
        Self::new()
            .suppress(Field::Fields)
            .suppress(Field::Errors)
            .suppress(Field::StatusCode)
    }

    /// Safety default for keyed-field (`fields`) hops
    ///
    /// Unlike [`cause_defaults`](Self::cause_defaults), nested `errors` are
    /// not auto-suppressed here. The asymmetry is load-bearing: keyed field
    /// errors commonly carry their own aggregate list and it stays visible.
    pub fn keyed_defaults() -> Self {
        Self::new()
            .suppress(Field::Fields)
            .suppress(Field::StatusCode)
    }

    /// Look up the rule for a field
    pub fn get(&self, field: Field) -> Option<&ExcludeRule> {
        self.rules.get(&field)
    }

    /// Whether a field is suppressed outright
    pub fn is_suppressed(&self, field: Field) -> bool {
        matches!(self.rules.get(&field), Some(ExcludeRule::Suppress))
    }

    /// Whether the policy excludes nothing
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Merge `inner` over this policy; inner rules win per field
    pub fn merged(&self, inner: &ExcludePolicy) -> ExcludePolicy {
        let mut rules = self.rules.clone();
        for (field, rule) in &inner.rules {
            rules.insert(*field, rule.clone());
        }
        ExcludePolicy { rules }
    }

    /// Leniently parse a policy from arbitrary JSON
    ///
    /// Non-object input yields the empty policy. Within an object, `true`
    /// suppresses the named field, a nested object scopes recursively, and
    /// any other value is ignored. Unrecognized field names are rejected.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return Ok(Self::new()),
        };

        let mut policy = Self::new();
        for (key, entry) in obj {
            let field: Field = key.parse()?;
            match entry {
                Value::Bool(true) => policy = policy.suppress(field),
                Value::Object(_) => policy = policy.scoped(field, Self::from_value(entry)?),
                _ => {}
            }
        }
        Ok(policy)
    }
}

/// Effective policy for one relation hop
///
/// Precedence: the relation's explicit scoped policy when the caller supplied
/// one, else `default`; either way merged over `outer` so suppressions
/// inherit down the tree.
pub fn resolve_exclude(
    outer: &ExcludePolicy,
    relation: Field,
    default: ExcludePolicy,
) -> ExcludePolicy {
    let scoped = match outer.get(relation) {
        Some(ExcludeRule::Scoped(policy)) => policy.clone(),
        _ => default,
    };
    outer.merged(&scoped)
}

impl Serialize for ExcludePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for (field, rule) in &self.rules {
            match rule {
                ExcludeRule::Suppress => map.serialize_entry(field.as_str(), &true)?,
                ExcludeRule::Scoped(policy) => map.serialize_entry(field.as_str(), policy)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExcludePolicy {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}
