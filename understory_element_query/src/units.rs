// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS length conversion to pixels.
//!
//! Conversion is deliberately permissive: a literal is split into a numeric
//! prefix (parsed like `parseFloat`) and a unit suffix (everything after the
//! last digit). Unknown suffixes leave the number untouched and unparsable
//! numbers become NaN, which never satisfies a breakpoint.

use crate::host::Document;

/// Font size used when the host reports none.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Length units understood by [`to_pixels`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// `px`, and any unit the converter does not know.
    Px,
    /// `em`: relative to the element's font size.
    Em,
    /// `rem`: relative to the root font size.
    Rem,
    /// `vw`: 1% of the viewport width.
    Vw,
    /// `vh`: 1% of the viewport height.
    Vh,
    /// `vmin`: 1% of the smaller viewport dimension.
    Vmin,
    /// `vmax`: 1% of the larger viewport dimension.
    Vmax,
}

impl LengthUnit {
    /// Classifies a unit suffix. Unknown suffixes map to [`LengthUnit::Px`].
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "em" => Self::Em,
            "rem" => Self::Rem,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "vmin" => Self::Vmin,
            "vmax" => Self::Vmax,
            _ => Self::Px,
        }
    }

    /// Returns the unit suffix of `literal`: the text after its last ASCII
    /// digit, or the whole literal if it has no digits.
    #[must_use]
    pub fn suffix_of(literal: &str) -> &str {
        match literal.rfind(|c: char| c.is_ascii_digit()) {
            Some(idx) => &literal[idx + 1..],
            None => literal,
        }
    }
}

/// Parses the longest numeric prefix of `text`, like `parseFloat`.
///
/// Leading whitespace is skipped. Accepts an optional sign, `Infinity`,
/// digits with an optional fraction, and an exponent when it has digits.
/// Returns NaN when no number is present.
///
/// ```
/// use understory_element_query::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("300px"), 300.0);
/// assert_eq!(parse_float_prefix("  -1.5e2em"), -150.0);
/// assert_eq!(parse_float_prefix(".5vw"), 0.5);
/// assert!(parse_float_prefix("px").is_nan());
/// ```
#[must_use]
pub fn parse_float_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Converts a CSS length literal to pixels relative to `element`.
///
/// `fallback_font_size` replaces a missing, zero, or NaN computed font size.
/// The document is consulted on every call; nothing is cached, since font
/// and viewport sizes may change between evaluations.
pub fn to_pixels<D: Document + ?Sized>(
    document: &D,
    element: &D::Element,
    literal: &str,
    fallback_font_size: f64,
) -> f64 {
    let value = parse_float_prefix(literal);
    match LengthUnit::from_suffix(LengthUnit::suffix_of(literal)) {
        LengthUnit::Px => value,
        LengthUnit::Em => value * font_size(document, Some(element), fallback_font_size),
        LengthUnit::Rem => value * font_size(document, None, fallback_font_size),
        LengthUnit::Vw => value * document.viewport_size().width / 100.0,
        LengthUnit::Vh => value * document.viewport_size().height / 100.0,
        LengthUnit::Vmin => {
            let viewport = document.viewport_size();
            value * viewport.width.min(viewport.height) / 100.0
        }
        LengthUnit::Vmax => {
            let viewport = document.viewport_size();
            value * viewport.width.max(viewport.height) / 100.0
        }
    }
}

fn font_size<D: Document + ?Sized>(
    document: &D,
    element: Option<&D::Element>,
    fallback: f64,
) -> f64 {
    match document.font_size(element) {
        Some(size) if size != 0.0 && !size.is_nan() => size,
        _ => fallback,
    }
}
