//! Sparse capability-tag maps.
//!
//! The capability vocabulary is content-defined (keys, strength, clearance
//! levels, quest flags), so both sides of the check are open string-keyed
//! maps rather than fixed fields:
//!
//! - [`TraversalContext`] is what an actor currently *has*. Unknown tags read
//!   as `0`.
//! - [`ConditionSet`] is what one direction of a link *requires*. A
//!   requirement is met when the actor's value is `>=` the required value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The capability tags an actor carries for the duration of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraversalContext {
    tags: BTreeMap<String, i32>,
}

impl TraversalContext {
    /// Create an empty context (every tag reads as `0`).
    pub const fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`set_tag`](Self::set_tag).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>, value: i32) -> Self {
        self.set_tag(tag, value);
        self
    }

    /// Current value of `tag`, `0` when the actor does not carry it.
    pub fn value(&self, tag: &str) -> i32 {
        self.tags.get(tag).copied().unwrap_or(0)
    }

    /// Set a single tag, replacing any previous value.
    pub fn set_tag(&mut self, tag: impl Into<String>, value: i32) {
        self.tags.insert(tag.into(), value);
    }

    /// Bulk-merge tags into this context.
    ///
    /// Tags present in `tags` overwrite existing values; tags not mentioned
    /// are left untouched.
    pub fn set_tags<I, K>(&mut self, tags: I)
    where
        I: IntoIterator<Item = (K, i32)>,
        K: Into<String>,
    {
        for (tag, value) in tags {
            self.tags.insert(tag.into(), value);
        }
    }

    /// Drop a tag so it reads as `0` again. Returns the old value.
    pub fn remove_tag(&mut self, tag: &str) -> Option<i32> {
        self.tags.remove(tag)
    }

    /// Whether no tags are set.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over the explicitly set tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for TraversalContext {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        let mut ctx = Self::new();
        ctx.set_tags(iter);
        ctx
    }
}

/// Minimum tag values required to take one direction of a link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet {
    required: BTreeMap<String, i32>,
}

impl ConditionSet {
    /// Create an empty (always satisfied) condition set.
    pub const fn new() -> Self {
        Self {
            required: BTreeMap::new(),
        }
    }

    /// Require `tag >= value`. Returns `true` if the stored requirement changed.
    pub fn insert(&mut self, tag: impl Into<String>, value: i32) -> bool {
        let tag = tag.into();
        if self.required.get(&tag) == Some(&value) {
            return false;
        }
        self.required.insert(tag, value);
        true
    }

    /// Drop the requirement on `tag`. Returns `true` if it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        self.required.remove(tag).is_some()
    }

    /// Drop every requirement. Returns `true` if any was present.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.required.is_empty();
        self.required.clear();
        had_any
    }

    /// Required value for `tag`, if any.
    pub fn get(&self, tag: &str) -> Option<i32> {
        self.required.get(tag).copied()
    }

    /// Whether there are no requirements.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Number of required tags.
    pub fn len(&self) -> usize {
        self.required.len()
    }

    /// Iterate over requirements in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.required.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Evaluate the requirements against an actor's tags.
    ///
    /// An empty set is always satisfied. A non-empty set fails closed when
    /// no context is supplied, even if every requirement is `0`.
    pub fn is_satisfied_by(&self, context: Option<&TraversalContext>) -> bool {
        if self.required.is_empty() {
            return true;
        }
        let Some(ctx) = context else {
            return false;
        };
        self.required
            .iter()
            .all(|(tag, required)| ctx.value(tag) >= *required)
    }
}

impl<K: Into<String>> FromIterator<(K, i32)> for ConditionSet {
    fn from_iter<T: IntoIterator<Item = (K, i32)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (tag, value) in iter {
            set.insert(tag, value);
        }
        set
    }
}
