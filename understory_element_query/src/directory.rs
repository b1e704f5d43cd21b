// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channel directory: which elements are bound under which channel.
//!
//! The directory exists so a channel can be recalculated without
//! re-scanning stylesheets or re-querying the document. Membership is
//! append-only and unique: an element is listed once per channel no matter
//! how many of that channel's breakpoints target it.

use std::hash::Hash;

use hashbrown::{HashMap, HashSet};

use crate::types::Channel;

#[derive(Clone, Debug)]
struct Members<K> {
    order: Vec<K>,
    set: HashSet<K>,
}

impl<K> Default for Members<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            set: HashSet::new(),
        }
    }
}

/// Channel name to bound elements, in binding order.
///
/// ```
/// use understory_element_query::{Channel, ChannelDirectory};
///
/// let mut channels = ChannelDirectory::<u32>::new();
/// let a = Channel::new("a");
/// assert!(channels.insert(&a, 7));
/// assert!(channels.insert(&a, 3));
/// assert!(!channels.insert(&a, 7));
///
/// assert_eq!(channels.get("a"), Some(&[7, 3][..]));
/// assert_eq!(channels.get("b"), None);
/// ```
#[derive(Clone, Debug)]
pub struct ChannelDirectory<K> {
    channels: Vec<(Channel, Members<K>)>,
    by_name: HashMap<Channel, usize>,
}

impl<K> Default for ChannelDirectory<K> {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<K> ChannelDirectory<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists `element` under `channel`.
    ///
    /// Returns `false` if it was already listed there.
    pub fn insert(&mut self, channel: &Channel, element: K) -> bool {
        let idx = match self.by_name.get(channel) {
            Some(&idx) => idx,
            None => {
                let idx = self.channels.len();
                self.channels.push((channel.clone(), Members::default()));
                self.by_name.insert(channel.clone(), idx);
                idx
            }
        };

        let members = &mut self.channels[idx].1;
        if !members.set.insert(element.clone()) {
            return false;
        }
        members.order.push(element);
        true
    }

    /// Returns the elements bound under the channel named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[K]> {
        self.get_channel(&Channel::new(name))
    }

    /// Returns the elements bound under `channel`.
    #[must_use]
    pub fn get_channel(&self, channel: &Channel) -> Option<&[K]> {
        self.by_name
            .get(channel)
            .map(|&idx| self.channels[idx].1.order.as_slice())
    }

    /// Returns `true` if `element` is bound under `channel`.
    #[must_use]
    pub fn contains(&self, channel: &Channel, element: &K) -> bool {
        self.by_name
            .get(channel)
            .is_some_and(|&idx| self.channels[idx].1.set.contains(element))
    }

    /// Iterates over channels and their elements, in first-binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&Channel, &[K])> + '_ {
        self.channels
            .iter()
            .map(|(channel, members)| (channel, members.order.as_slice()))
    }

    /// Returns every bound element once, in first-binding order across channels.
    #[must_use]
    pub fn elements(&self) -> Vec<K> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (_, members) in &self.channels {
            for element in &members.order {
                if seen.insert(element) {
                    out.push(element.clone());
                }
            }
        }
        out
    }

    /// Returns the number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no channel has any element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_unique_per_channel() {
        let mut channels = ChannelDirectory::<u32>::new();
        let a = Channel::new("a");
        let b = Channel::new("b");
        channels.insert(&a, 1);
        channels.insert(&a, 1);
        channels.insert(&b, 1);
        channels.insert(&b, 2);

        assert_eq!(channels.get("a"), Some(&[1][..]));
        assert_eq!(channels.get("B"), Some(&[1, 2][..]));
        assert!(channels.contains(&b, &2));
        assert!(!channels.contains(&a, &2));
        assert_eq!(channels.len(), 2);
    }

    #[test]
    fn elements_are_unique_across_channels() {
        let mut channels = ChannelDirectory::<u32>::new();
        channels.insert(&Channel::new("a"), 3);
        channels.insert(&Channel::new("a"), 1);
        channels.insert(&Channel::new("b"), 1);
        channels.insert(&Channel::new("b"), 9);
        assert_eq!(channels.elements(), [3, 1, 9]);
    }

    #[test]
    fn default_channel_is_addressable_by_empty_name() {
        let mut channels = ChannelDirectory::<u32>::new();
        channels.insert(&Channel::default_channel(), 4);
        assert_eq!(channels.get(""), Some(&[4][..]));
        let names: Vec<_> = channels.iter().map(|(c, _)| c.name()).collect();
        assert_eq!(names, [""]);
    }
}
