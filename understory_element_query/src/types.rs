// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breakpoint vocabulary: channels, comparison modes, and measured properties.

use std::fmt;
use std::sync::Arc;

use kurbo::Size;

/// Marker shared by every encoded attribute and every output attribute.
pub(crate) const MARKER: &str = "meq";

/// A named breakpoint namespace.
///
/// Each channel writes to its own set of output attributes, so several
/// consumers can query the same element without stepping on each other.
/// The [default channel](Self::default_channel) has an empty name and writes
/// unprefixed attributes (`meq-min-width`); a channel named `card` writes
/// `card-meq-min-width`.
///
/// Names are ASCII-lowercased on construction because attribute names are
/// matched case-insensitively by HTML hosts.
///
/// ```
/// use understory_element_query::{Channel, Mode, Property};
///
/// let card = Channel::new("Card");
/// assert_eq!(card.name(), "card");
/// assert_eq!(card.attribute_name(Mode::Min, Property::Width), "card-meq-min-width");
///
/// let default = Channel::default_channel();
/// assert_eq!(default.attribute_name(Mode::Max, Property::Height), "meq-max-height");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(Arc<str>);

impl Channel {
    /// Creates a channel from its name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Self(Arc::from(name.to_ascii_lowercase()))
        } else {
            Self(Arc::from(name))
        }
    }

    /// The unnamed channel used when an encoded attribute has no prefix.
    #[must_use]
    pub fn default_channel() -> Self {
        Self(Arc::from(""))
    }

    /// Returns the channel name (empty for the default channel).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the unnamed default channel.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the output attribute written for `mode`/`property` on this channel.
    #[must_use]
    pub fn attribute_name(&self, mode: Mode, property: Property) -> String {
        let mut name = String::with_capacity(self.0.len() + 15);
        if !self.is_default() {
            name.push_str(&self.0);
            name.push('-');
        }
        name.push_str(MARKER);
        name.push('-');
        name.push_str(mode.as_str());
        name.push('-');
        name.push_str(property.as_str());
        name
    }

    /// Returns the four output attributes owned by this channel.
    ///
    /// Order: min-width, min-height, max-width, max-height.
    #[must_use]
    pub fn attribute_names(&self) -> [String; 4] {
        [
            self.attribute_name(Mode::Min, Property::Width),
            self.attribute_name(Mode::Min, Property::Height),
            self.attribute_name(Mode::Max, Property::Width),
            self.attribute_name(Mode::Max, Property::Height),
        ]
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::default_channel()
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Channel").field(&&*self.0).finish()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Which side of the threshold satisfies a breakpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Satisfied when the measured value is at least the threshold.
    Min,
    /// Satisfied when the measured value is at most the threshold.
    Max,
}

impl Mode {
    /// Returns the encoded spelling (`min` or `max`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Parses `min`/`max`, ignoring ASCII case.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("min") {
            Some(Self::Min)
        } else if text.eq_ignore_ascii_case("max") {
            Some(Self::Max)
        } else {
            None
        }
    }

    /// Returns `true` if `actual` satisfies this mode against `threshold`.
    ///
    /// Comparisons involving NaN are never satisfied.
    #[must_use]
    pub fn is_satisfied(self, actual: f64, threshold: f64) -> bool {
        match self {
            Self::Min => actual >= threshold,
            Self::Max => actual <= threshold,
        }
    }
}

/// Which box dimension a breakpoint measures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// The element's width.
    Width,
    /// The element's height.
    Height,
}

impl Property {
    /// Returns the encoded spelling (`width` or `height`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }

    /// Parses `width`/`height`, ignoring ASCII case.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("width") {
            Some(Self::Width)
        } else if text.eq_ignore_ascii_case("height") {
            Some(Self::Height)
        } else {
            None
        }
    }

    /// Picks this dimension out of `size`.
    #[must_use]
    pub fn of(self, size: Size) -> f64 {
        match self {
            Self::Width => size.width,
            Self::Height => size.height,
        }
    }
}
