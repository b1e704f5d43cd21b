// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host document model the engine reads from and writes to.
//!
//! The engine owns no tree, no layout, and no style system. Everything it
//! needs from the embedding document is expressed by the [`Document`] trait:
//! stylesheet enumeration, batched selector queries, attribute access, and
//! the already-computed box metrics used for evaluation.

use std::fmt;
use std::hash::Hash;

use kurbo::Size;

/// A stylesheet as exposed by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleSheet {
    /// A parsed rule list (the usual CSSOM shape).
    Rules(Vec<CssRule>),
    /// Raw stylesheet text, for hosts that only expose `cssText`.
    Text(String),
}

/// A single rule inside a [`StyleSheet`].
#[derive(Clone, Debug, PartialEq)]
pub enum CssRule {
    /// A style rule; only its selector text is inspected.
    Style {
        /// The rule's selector text (or full text when no selector is exposed).
        selector_text: String,
    },
    /// A grouping at-rule (`@media`, `@supports`, ...) whose children are scanned.
    Grouping {
        /// Nested rules.
        rules: Vec<CssRule>,
    },
    /// An `@import` rule and the imported sheet's rules.
    ///
    /// The imported sheet may be inaccessible; that error aborts the
    /// enclosing stylesheet.
    Import {
        /// The imported rules, or the error raised while accessing them.
        rules: Result<Vec<CssRule>, SheetError>,
    },
    /// Any other rule (`@font-face`, `@keyframes`, ...). Ignored.
    Other,
}

impl CssRule {
    /// Convenience constructor for a style rule.
    #[must_use]
    pub fn style(selector_text: impl Into<String>) -> Self {
        Self::Style {
            selector_text: selector_text.into(),
        }
    }
}

/// Error raised by the host while accessing a stylesheet's rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetError {
    /// The sheet is cross-origin protected. The engine skips it.
    Security,
    /// Any other failure. The engine propagates it.
    Other(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Security => f.write_str("stylesheet access denied (cross-origin)"),
            Self::Other(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for SheetError {}

/// Error raised by the host's selector engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The host has no selector query capability at all.
    Unsupported,
    /// The host rejected the selector list.
    InvalidSelector(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("no selector query capability"),
            Self::InvalidSelector(message) => write!(f, "invalid selector: {message}"),
        }
    }
}

impl std::error::Error for QueryError {}

/// The embedding document.
///
/// `Element` is a cheap identity handle (a node id, an arena index, a
/// reference-counted node). The engine keys its per-element bookkeeping on
/// it, so two handles for the same node must compare and hash equal.
pub trait Document {
    /// Identity handle for an element.
    type Element: Clone + Eq + Hash;

    /// Returns every stylesheet attached to the document, in order.
    ///
    /// Sheets whose rules cannot be read are reported as `Err`.
    fn style_sheets(&self) -> Vec<Result<StyleSheet, SheetError>>;

    /// Returns every element matching a comma-separated selector list, in
    /// document order.
    fn query_selector_all(&self, selectors: &str) -> Result<Vec<Self::Element>, QueryError>;

    /// Returns an attribute's value, or `None` if absent.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Sets an attribute.
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Removes an attribute. Removing an absent attribute is a no-op.
    fn remove_attribute(&mut self, element: &Self::Element, name: &str);

    /// Returns the element's laid-out border-box size in CSS pixels.
    fn offset_size(&self, element: &Self::Element) -> Size;

    /// Returns the computed font size in pixels of `element`, or of the root
    /// element when `element` is `None`.
    ///
    /// Returning `None` (or a zero/NaN size) selects the engine's fallback.
    fn font_size(&self, element: Option<&Self::Element>) -> Option<f64>;

    /// Returns the viewport's client size in CSS pixels.
    fn viewport_size(&self) -> Size;
}
