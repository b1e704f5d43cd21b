// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Element Query: element (container) queries for hosts without native support.
//!
//! Stylesheets declare breakpoints on an element's own size by writing
//! attribute selectors that no markup carries:
//!
//! ```css
//! .card[sidebar-meq-min-width~="300px"] .title { font-size: 1.5em; }
//! ```
//!
//! The engine finds those encoded selectors, queries the document for the
//! elements they target, measures each element, and writes the satisfied
//! thresholds back as attributes (`sidebar-meq-min-width="300px"`), so the
//! rule starts matching exactly when the element is wide enough.
//!
//! ## Channels
//!
//! The prefix before `meq` names a [`Channel`]. Channels are independent
//! breakpoint sets on the same element, each writing to its own attribute
//! namespace, so several consumers can query one element without collision.
//! Selectors without a prefix use the [default channel](Channel::default_channel)
//! and write unprefixed attributes (`meq-min-width`).
//!
//! ## Pipeline
//!
//! - [`extract`]: regex-driven parser turning selector text into [`BreakpointRule`]s.
//! - [`QueryRegistry`]: merges rules sharing a breakpoint into one selector list,
//!   so the document is queried once per unique breakpoint.
//! - [`ElementQueries::bind`]: attaches a breakpoint to an element's
//!   [`SetupInformation`] and lists the element in the [`ChannelDirectory`].
//! - [`SetupInformation::evaluate`]: compares the element's size with every bound
//!   threshold (converted by [`to_pixels`]) and rewrites its attributes.
//!
//! [`ElementQueries`] drives the pipeline: [`init`](ElementQueries::init) and
//! [`update`](ElementQueries::update) rescan everything,
//! [`find_elements`](ElementQueries::find_elements) re-queries the document with the
//! breakpoints already known, and [`recalc`](ElementQueries::recalc) re-evaluates
//! bound elements by channel, element, or all at once. Nothing here listens for
//! resizes; call `recalc` when geometry may have changed.
//!
//! ## Not a layout engine
//!
//! The crate reads already-computed box sizes, font sizes, and viewport size from
//! the host through the [`Document`] trait. It never computes layout.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use kurbo::Size;
//! use understory_element_query::{
//!     CssRule, Document, ElementQueries, QueryError, RecalcTarget, SheetError, StyleSheet,
//! };
//!
//! struct Page {
//!     width: f64,
//!     attributes: HashMap<String, String>,
//! }
//!
//! impl Document for Page {
//!     type Element = u32;
//!
//!     fn style_sheets(&self) -> Vec<Result<StyleSheet, SheetError>> {
//!         vec![Ok(StyleSheet::Rules(vec![CssRule::style(
//!             r#".card[a-meq-min-width~="300px"]"#,
//!         )]))]
//!     }
//!     fn query_selector_all(&self, selectors: &str) -> Result<Vec<u32>, QueryError> {
//!         Ok(if selectors == ".card" { vec![1] } else { vec![] })
//!     }
//!     fn attribute(&self, _: &u32, name: &str) -> Option<String> {
//!         self.attributes.get(name).cloned()
//!     }
//!     fn set_attribute(&mut self, _: &u32, name: &str, value: &str) {
//!         self.attributes.insert(name.into(), value.into());
//!     }
//!     fn remove_attribute(&mut self, _: &u32, name: &str) {
//!         self.attributes.remove(name);
//!     }
//!     fn offset_size(&self, _: &u32) -> Size {
//!         Size::new(self.width, 100.0)
//!     }
//!     fn font_size(&self, _: Option<&u32>) -> Option<f64> {
//!         None
//!     }
//!     fn viewport_size(&self) -> Size {
//!         Size::new(1024.0, 768.0)
//!     }
//! }
//!
//! let mut page = Page { width: 320.0, attributes: HashMap::new() };
//! let mut queries = ElementQueries::new();
//! queries.init(&mut page).unwrap();
//! assert_eq!(page.attributes["a-meq-min-width"], "300px");
//!
//! page.width = 280.0;
//! queries.recalc(&mut page, RecalcTarget::Channel("a"));
//! assert!(!page.attributes.contains_key("a-meq-min-width"));
//! ```
//!
//! ## Logging
//!
//! Scans report through the [`log`] facade: skipped stylesheets and scan
//! totals at `debug`, individual breakpoints and query matches at `trace`.
//!
//! ## `std` Requirement
//!
//! Unlike most Understory crates this one is not `no_std`. Extraction runs on
//! the `regex` engine and keeps its compiled patterns in `std::sync::LazyLock`
//! statics, both of which need `std`.

mod context;
mod directory;
mod engine;
mod error;
mod extract;
mod host;
mod registry;
mod types;
mod units;

pub use context::{AttributeValues, BreakpointOption, SetupInformation, measure};
pub use directory::ChannelDirectory;
pub use engine::{Config, ElementQueries, ElementQueriesBuilder, Phase, RecalcTarget};
pub use error::Error;
pub use extract::{BreakpointRule, extract, extract_into, may_contain_queries};
pub use host::{CssRule, Document, QueryError, SheetError, StyleSheet};
pub use registry::{QueryBatch, QueryKey, QueryRegistry};
pub use types::{Channel, Mode, Property};
pub use units::{DEFAULT_FONT_SIZE, LengthUnit, parse_float_prefix, to_pixels};
