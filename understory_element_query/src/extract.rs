// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extraction of encoded breakpoints from selector text.
//!
//! Breakpoints are encoded in CSS as attribute selectors that no element
//! carries in its markup:
//!
//! ```css
//! .card[sidebar-meq-min-width~="300px"][sidebar-meq-max-width~="40em"]:hover { ... }
//! ```
//!
//! The extractor is regex based and best-effort. It finds compound selector
//! fragments carrying a run of one or more encoded bracket groups, strips the
//! groups (they are not queryable), and reports one [`BreakpointRule`] per
//! group. Anything it cannot recognize is skipped without error.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Channel, Mode, Property};

/// Substrings one of which every encoded breakpoint contains.
const MARKERS: [&str; 4] = [
    "meq-min-width",
    "meq-max-width",
    "meq-min-height",
    "meq-max-height",
];

/// A compound selector fragment: leading selector, bracket run, trailing text.
static FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i),?[\s\t]*([^,\n]*?)((?:\[[\s\t]*?(?:[\w-]+?-)?meq-(?:min|max)-(?:width|height)[\s\t]*?[~$^]?=[\s\t]*?"[^"]*?"[\s\t]*?\])+)([^,\n\s{]*)"#,
    )
    .expect("fragment pattern is valid")
});

/// One encoded bracket group: channel, mode, property, threshold.
static BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\[[\s\t]*?(?:([\w-]+?)-)?meq-(min|max)-(width|height)[\s\t]*?[~$^]?=[\s\t]*?"([^"]*?)"[\s\t]*?\]"#,
    )
    .expect("bracket pattern is valid")
});

/// A single breakpoint declared by a stylesheet selector.
///
/// `selector` is the compound selector with the encoded bracket groups
/// removed, ready to be handed to the host's selector engine. `threshold` is
/// the literal as written (`"300px"`, `"20em"`), converted only at
/// evaluation time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BreakpointRule {
    /// Queryable selector fragment.
    pub selector: String,
    /// Channel the breakpoint belongs to.
    pub channel: Channel,
    /// Comparison mode.
    pub mode: Mode,
    /// Measured dimension.
    pub property: Property,
    /// Threshold literal.
    pub threshold: String,
}

/// Returns `true` if `text` may contain an encoded breakpoint.
///
/// This is a cheap pre-filter; it expects lowercase markers.
#[must_use]
pub fn may_contain_queries(text: &str) -> bool {
    MARKERS.iter().any(|marker| text.contains(marker))
}

/// Extracts every encoded breakpoint from `css`.
///
/// ```
/// use understory_element_query::{Mode, Property, extract};
///
/// let rules = extract(r#".card[a-meq-min-width~="300px"][a-meq-max-height='20em']:hover"#);
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[0].selector, ".card:hover");
/// assert_eq!(rules[0].channel.name(), "a");
/// assert_eq!((rules[0].mode, rules[0].property), (Mode::Min, Property::Width));
/// assert_eq!(rules[1].threshold, "20em");
/// ```
#[must_use]
pub fn extract(css: &str) -> Vec<BreakpointRule> {
    let mut rules = Vec::new();
    extract_into(css, &mut rules);
    rules
}

/// Like [`extract`], appending to `out` instead of allocating a new vector.
pub fn extract_into(css: &str, out: &mut Vec<BreakpointRule>) {
    let css = normalize_quotes(css);

    for fragment in FRAGMENT.captures_iter(&css) {
        let leading = fragment.get(1).map_or("", |m| m.as_str());
        let trailing = fragment.get(3).map_or("", |m| m.as_str());
        let Some(brackets) = fragment.get(2) else {
            continue;
        };

        let mut selector = String::with_capacity(leading.len() + trailing.len());
        selector.push_str(leading);
        selector.push_str(trailing);

        for group in BRACKET.captures_iter(brackets.as_str()) {
            let (Some(mode), Some(property), Some(threshold)) = (
                group.get(2).and_then(|m| Mode::parse(m.as_str())),
                group.get(3).and_then(|m| Property::parse(m.as_str())),
                group.get(4),
            ) else {
                continue;
            };
            let channel = group
                .get(1)
                .map_or_else(Channel::default_channel, |m| Channel::new(m.as_str()));

            log::trace!(
                "extracted breakpoint {selector:?} {channel}:{}-{} {:?}",
                mode.as_str(),
                property.as_str(),
                threshold.as_str()
            );
            out.push(BreakpointRule {
                selector: selector.clone(),
                channel,
                mode,
                property,
                threshold: String::from(threshold.as_str()),
            });
        }
    }
}

fn normalize_quotes(css: &str) -> Cow<'_, str> {
    if css.contains('\'') {
        Cow::Owned(css.replace('\'', "\""))
    } else {
        Cow::Borrowed(css)
    }
}
