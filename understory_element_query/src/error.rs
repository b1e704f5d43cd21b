// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by a scan.

use std::fmt;

/// Error returned by [`ElementQueries`](crate::ElementQueries) scans.
///
/// Cross-origin stylesheets, malformed encodings, and unknown units are not
/// errors; they are skipped or degrade silently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The host has no selector query capability.
    NoSelectorEngine,
    /// The host rejected a batched selector list.
    InvalidSelector {
        /// The combined selector list that was queried.
        selector: String,
        /// The host's message.
        message: String,
    },
    /// A stylesheet failed for a reason other than cross-origin protection.
    StyleSheet {
        /// Position of the sheet in the document's sheet list.
        index: usize,
        /// The host's message.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelectorEngine => {
                f.write_str("the document provides no selector query capability")
            }
            Self::InvalidSelector { selector, message } => {
                write!(f, "selector query {selector:?} failed: {message}")
            }
            Self::StyleSheet { index, message } => {
                write!(f, "reading stylesheet {index} failed: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}
