// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping of extracted breakpoints into batched selector queries.
//!
//! Many rules usually share a breakpoint (`a-meq-min-width~="300px"` on
//! several selectors). [`QueryRegistry`] merges their selectors into one
//! comma-separated list per breakpoint so the host is queried once per
//! unique breakpoint rather than once per rule.

use hashbrown::HashMap;

use crate::extract::BreakpointRule;
use crate::types::{Channel, Mode, Property};

/// A unique breakpoint: channel, mode, property, and literal threshold.
///
/// Thresholds compare by their literal text, so `"1px"` and `"1.0px"` are
/// distinct keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    /// Channel the breakpoint belongs to.
    pub channel: Channel,
    /// Comparison mode.
    pub mode: Mode,
    /// Measured dimension.
    pub property: Property,
    /// Threshold literal.
    pub threshold: String,
}

impl QueryKey {
    /// Returns the key a rule registers under.
    #[must_use]
    pub fn of(rule: &BreakpointRule) -> Self {
        Self {
            channel: rule.channel.clone(),
            mode: rule.mode,
            property: rule.property,
            threshold: rule.threshold.clone(),
        }
    }
}

/// One batched query: a breakpoint and the combined selector list for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryBatch {
    /// The breakpoint.
    pub key: QueryKey,
    /// Comma-joined selectors declaring the breakpoint.
    pub selector: String,
}

#[derive(Clone, Debug)]
struct Entry {
    key: QueryKey,
    selectors: Vec<String>,
}

/// Breakpoints discovered by a scan, grouped by [`QueryKey`].
///
/// Keys keep their first-registration order and selectors keep their
/// append order, so draining is deterministic.
///
/// ```
/// use understory_element_query::{Channel, Mode, Property, QueryRegistry};
///
/// let mut registry = QueryRegistry::new();
/// let a = Channel::new("a");
/// registry.register_parts(&a, Mode::Min, Property::Width, "300px", ".card");
/// registry.register_parts(&a, Mode::Min, Property::Width, "300px", ".panel");
/// registry.register_parts(&a, Mode::Min, Property::Width, "300px", ".card");
///
/// let batches: Vec<_> = registry.drain().collect();
/// assert_eq!(batches.len(), 1);
/// assert_eq!(batches[0].selector, ".card,.panel");
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryRegistry {
    entries: Vec<Entry>,
    index: HashMap<QueryKey, usize>,
}

impl QueryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. See [`register_parts`](Self::register_parts).
    pub fn register(&mut self, rule: &BreakpointRule) -> bool {
        self.insert(QueryKey::of(rule), &rule.selector)
    }

    /// Registers `selector` under a breakpoint.
    ///
    /// Returns `false` if the selector was already listed for that key.
    pub fn register_parts(
        &mut self,
        channel: &Channel,
        mode: Mode,
        property: Property,
        threshold: &str,
        selector: &str,
    ) -> bool {
        let key = QueryKey {
            channel: channel.clone(),
            mode,
            property,
            threshold: String::from(threshold),
        };
        self.insert(key, selector)
    }

    fn insert(&mut self, key: QueryKey, selector: &str) -> bool {
        if let Some(&idx) = self.index.get(&key) {
            let selectors = &mut self.entries[idx].selectors;
            if selectors.iter().any(|s| s == selector) {
                return false;
            }
            selectors.push(String::from(selector));
            return true;
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry {
            key,
            selectors: vec![String::from(selector)],
        });
        true
    }

    /// Returns the number of unique breakpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the combined selector list for `key`, if registered.
    #[must_use]
    pub fn selector_for(&self, key: &QueryKey) -> Option<String> {
        self.index
            .get(key)
            .map(|&idx| self.entries[idx].selectors.join(","))
    }

    /// Iterates over all batches without consuming the registry.
    pub fn iter(&self) -> impl Iterator<Item = QueryBatch> + '_ {
        self.entries.iter().map(|entry| QueryBatch {
            key: entry.key.clone(),
            selector: entry.selectors.join(","),
        })
    }

    /// Removes and yields all batches in registration order.
    pub fn drain(&mut self) -> impl Iterator<Item = QueryBatch> + '_ {
        self.index.clear();
        self.entries.drain(..).map(|entry| QueryBatch {
            selector: entry.selectors.join(","),
            key: entry.key,
        })
    }

    /// Removes every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
