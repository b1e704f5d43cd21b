// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element evaluation contexts.
//!
//! A [`SetupInformation`] records every breakpoint bound to one element and
//! the output attributes it is responsible for. Evaluation recomputes the
//! full attribute state from that record each time, so binding breakpoints
//! one at a time and evaluating after each bind converges on the same result
//! as binding them all first.

use hashbrown::HashSet;
use kurbo::Size;
use smallvec::SmallVec;

use crate::engine::Config;
use crate::host::Document;
use crate::registry::QueryKey;
use crate::types::{Channel, Mode, Property};
use crate::units::{parse_float_prefix, to_pixels};

/// A breakpoint as bound to an element.
///
/// Carries the composite key used for deduplication, the output attribute
/// the breakpoint contributes to, and the four attributes its channel owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreakpointOption {
    key: QueryKey,
    attribute: String,
    owned_attributes: [String; 4],
}

impl BreakpointOption {
    /// Creates the option for a breakpoint.
    #[must_use]
    pub fn new(key: QueryKey) -> Self {
        let attribute = key.channel.attribute_name(key.mode, key.property);
        let owned_attributes = key.channel.attribute_names();
        Self {
            key,
            attribute,
            owned_attributes,
        }
    }

    /// Returns the composite key (channel, mode, property, threshold).
    #[must_use]
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Returns the channel.
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.key.channel
    }

    /// Returns the comparison mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.key.mode
    }

    /// Returns the measured dimension.
    #[must_use]
    pub fn property(&self) -> Property {
        self.key.property
    }

    /// Returns the threshold literal.
    #[must_use]
    pub fn threshold(&self) -> &str {
        &self.key.threshold
    }

    /// Returns the output attribute this breakpoint writes to.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    /// Returns every output attribute of this breakpoint's channel.
    #[must_use]
    pub fn owned_attributes(&self) -> &[String; 4] {
        &self.owned_attributes
    }
}

/// Output attribute values computed by an evaluation, in first-touch order.
pub type AttributeValues = SmallVec<[(String, String); 4]>;

/// Everything bound to one element.
#[derive(Clone, Debug, Default)]
pub struct SetupInformation {
    options: Vec<BreakpointOption>,
    keys: HashSet<QueryKey>,
    owned_attributes: Vec<String>,
}

impl SetupInformation {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a breakpoint.
    ///
    /// Returns `false` if a breakpoint with the same composite key is
    /// already bound; the context is unchanged in that case.
    pub fn add_option(&mut self, option: BreakpointOption) -> bool {
        if !self.keys.insert(option.key.clone()) {
            return false;
        }
        for name in &option.owned_attributes {
            if !self.owned_attributes.iter().any(|owned| owned == name) {
                self.owned_attributes.push(name.clone());
            }
        }
        self.options.push(option);
        true
    }

    /// Returns the bound breakpoints, in binding order.
    #[must_use]
    pub fn options(&self) -> &[BreakpointOption] {
        &self.options
    }

    /// Returns `true` if a breakpoint with `key` is bound.
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.keys.contains(key)
    }

    /// Returns the attributes cleared before each write.
    #[must_use]
    pub fn owned_attributes(&self) -> &[String] {
        &self.owned_attributes
    }

    /// Computes the attribute values for `element` without touching it.
    pub fn compute<D: Document + ?Sized>(
        &self,
        document: &D,
        element: &D::Element,
        config: &Config,
    ) -> AttributeValues {
        let size = measure(document, element, config);
        let mut values = AttributeValues::new();

        for option in &self.options {
            let threshold = to_pixels(
                document,
                element,
                option.threshold(),
                config.fallback_font_size,
            );
            let actual = option.property().of(size);

            let idx = match values.iter().position(|(name, _)| *name == option.attribute) {
                Some(idx) => idx,
                None => {
                    values.push((option.attribute.clone(), String::new()));
                    values.len() - 1
                }
            };

            let literal = option.threshold();
            if literal.is_empty() || !option.mode().is_satisfied(actual, threshold) {
                continue;
            }
            let list = &mut values[idx].1;
            if !contains_literal(list, literal) {
                if !list.is_empty() {
                    list.push(' ');
                }
                list.push_str(literal);
            }
        }

        values
    }

    /// Evaluates every bound breakpoint and rewrites `element`'s attributes.
    ///
    /// All owned attributes are removed first, then the non-empty values are
    /// set, so breakpoints that stopped holding leave nothing behind.
    pub fn evaluate<D: Document + ?Sized>(
        &self,
        document: &mut D,
        element: &D::Element,
        config: &Config,
    ) -> AttributeValues {
        let values = self.compute(document, element, config);

        for name in &self.owned_attributes {
            document.remove_attribute(element, name);
        }
        for (name, value) in &values {
            if !value.is_empty() {
                document.set_attribute(element, name, value);
            }
        }

        values
    }
}

/// Returns the size breakpoints are evaluated against.
///
/// Each dimension prefers its override attribute when present and falls
/// back to the host's measured box.
pub fn measure<D: Document + ?Sized>(document: &D, element: &D::Element, config: &Config) -> Size {
    let quick_width = document.attribute(element, &config.quick_width_attribute);
    let quick_height = document.attribute(element, &config.quick_height_attribute);
    if let (Some(width), Some(height)) = (&quick_width, &quick_height) {
        return Size::new(parse_float_prefix(width), parse_float_prefix(height));
    }

    let measured = document.offset_size(element);
    Size::new(
        quick_width.map_or(measured.width, |w| parse_float_prefix(&w)),
        quick_height.map_or(measured.height, |h| parse_float_prefix(&h)),
    )
}

/// Returns `true` if `literal` is one of the space-separated entries of `list`.
fn contains_literal(list: &str, literal: &str) -> bool {
    let bytes = list.as_bytes();
    list.match_indices(literal).any(|(start, _)| {
        let end = start + literal.len();
        (start == 0 || bytes[start - 1] == b' ') && (end == bytes.len() || bytes[end] == b' ')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(channel: &str, mode: Mode, property: Property, threshold: &str) -> BreakpointOption {
        BreakpointOption::new(QueryKey {
            channel: Channel::new(channel),
            mode,
            property,
            threshold: String::from(threshold),
        })
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut cx = SetupInformation::new();
        assert!(cx.add_option(option("a", Mode::Min, Property::Width, "1px")));
        assert!(!cx.add_option(option("a", Mode::Min, Property::Width, "1px")));
        assert!(cx.add_option(option("a", Mode::Min, Property::Width, "1.0px")));
        assert_eq!(cx.options().len(), 2);
    }

    #[test]
    fn owned_attributes_cover_each_channel_once() {
        let mut cx = SetupInformation::new();
        cx.add_option(option("a", Mode::Min, Property::Width, "1px"));
        cx.add_option(option("a", Mode::Max, Property::Height, "1px"));
        cx.add_option(option("b", Mode::Min, Property::Width, "1px"));
        assert_eq!(cx.owned_attributes().len(), 8);
        assert_eq!(cx.owned_attributes()[0], "a-meq-min-width");
        assert_eq!(cx.owned_attributes()[4], "b-meq-min-width");
    }

    #[test]
    fn option_knows_its_attribute() {
        let opt = option("", Mode::Max, Property::Height, "2em");
        assert_eq!(opt.attribute_name(), "meq-max-height");
        assert_eq!(opt.threshold(), "2em");
        assert!(opt.channel().is_default());
    }

    #[test]
    fn literal_matching_respects_boundaries() {
        assert!(contains_literal("100px", "100px"));
        assert!(contains_literal("50px 100px", "100px"));
        assert!(!contains_literal("1100px", "100px"));
        assert!(!contains_literal("100px2", "100px"));
        assert!(!contains_literal("", "100px"));
    }
}
