// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element query engine.

use std::hash::Hash;

use hashbrown::HashMap;

use crate::context::{AttributeValues, BreakpointOption, SetupInformation};
use crate::directory::ChannelDirectory;
use crate::error::Error;
use crate::extract::{extract_into, may_contain_queries};
use crate::host::{CssRule, Document, QueryError, SheetError, StyleSheet};
use crate::registry::{QueryBatch, QueryRegistry};
use crate::units::DEFAULT_FONT_SIZE;

/// Engine settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Font size used when the host reports none for `em`/`rem` conversion.
    pub fallback_font_size: f64,
    /// Attribute whose value, when present, replaces the measured width.
    pub quick_width_attribute: String,
    /// Attribute whose value, when present, replaces the measured height.
    pub quick_height_attribute: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_font_size: DEFAULT_FONT_SIZE,
            quick_width_attribute: String::from("meq-quick-width"),
            quick_height_attribute: String::from("meq-quick-height"),
        }
    }
}

/// Builder for [`ElementQueries`].
#[derive(Clone, Debug, Default)]
pub struct ElementQueriesBuilder {
    config: Config,
}

impl ElementQueriesBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size used when the host reports none.
    #[must_use]
    pub fn fallback_font_size(mut self, size: f64) -> Self {
        self.config.fallback_font_size = size;
        self
    }

    /// Renames the width/height override attributes.
    #[must_use]
    pub fn quick_attributes(mut self, width: impl Into<String>, height: impl Into<String>) -> Self {
        self.config.quick_width_attribute = width.into();
        self.config.quick_height_attribute = height.into();
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build<K>(self) -> ElementQueries<K> {
        ElementQueries {
            config: self.config,
            registry: QueryRegistry::new(),
            channels: ChannelDirectory::default(),
            contexts: HashMap::new(),
            phase: Phase::Uninitialized,
        }
    }
}

/// Where the engine is in its scan cycle.
///
/// A failed scan leaves the phase it failed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No scan has run.
    Uninitialized,
    /// Reading stylesheets into the registry.
    Scanning,
    /// Querying the document and binding matched elements.
    Bound,
    /// The last scan or query pass completed.
    Idle,
}

/// What [`ElementQueries::recalc`] re-evaluates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecalcTarget<'a, K> {
    /// Every bound element, once each.
    All,
    /// Every element bound under the named channel.
    Channel(&'a str),
    /// A single element.
    Element(&'a K),
}

/// Element query engine for one document.
///
/// The engine owns the breakpoint registry, the channel directory, and one
/// [`SetupInformation`] per bound element. The document itself is passed to
/// each operation, so the engine never holds on to host state.
///
/// Scans take `&mut self`, so a scan can never start while another is in
/// progress on the same engine.
#[derive(Clone, Debug)]
pub struct ElementQueries<K> {
    config: Config,
    registry: QueryRegistry,
    channels: ChannelDirectory<K>,
    contexts: HashMap<K, SetupInformation>,
    phase: Phase,
}

impl<K> Default for ElementQueries<K> {
    fn default() -> Self {
        ElementQueriesBuilder::new().build()
    }
}

impl<K> ElementQueries<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates an engine with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for custom settings.
    #[must_use]
    pub fn builder() -> ElementQueriesBuilder {
        ElementQueriesBuilder::new()
    }

    /// Returns the engine settings.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the breakpoints found by the last scan.
    #[must_use]
    pub fn registry(&self) -> &QueryRegistry {
        &self.registry
    }

    /// Returns the channel directory.
    #[must_use]
    pub fn channels(&self) -> &ChannelDirectory<K> {
        &self.channels
    }

    /// Returns the evaluation context bound to `element`, if any.
    #[must_use]
    pub fn context(&self, element: &K) -> Option<&SetupInformation> {
        self.contexts.get(element)
    }

    /// Returns `true` if at least one breakpoint is bound to `element`.
    #[must_use]
    pub fn is_bound(&self, element: &K) -> bool {
        self.contexts.contains_key(element)
    }

    /// Scans every stylesheet, then binds and evaluates every match.
    ///
    /// The registry is rebuilt from scratch. Bound elements keep their
    /// existing breakpoints. Cross-origin sheets are skipped; any other
    /// sheet error aborts the scan.
    pub fn init<D>(&mut self, document: &mut D) -> Result<(), Error>
    where
        D: Document<Element = K> + ?Sized,
    {
        self.phase = Phase::Scanning;
        self.registry = QueryRegistry::new();

        let sheets = document.style_sheets();
        let sheet_count = sheets.len();
        for (index, sheet) in sheets.into_iter().enumerate() {
            match sheet.and_then(|sheet| self.read_sheet(&sheet)) {
                Ok(()) => {}
                Err(SheetError::Security) => {
                    log::debug!("skipping cross-origin stylesheet {index}");
                }
                Err(SheetError::Other(message)) => {
                    return Err(Error::StyleSheet { index, message });
                }
            }
        }
        log::debug!(
            "scanned {sheet_count} stylesheets, {} unique breakpoints",
            self.registry.len()
        );

        self.find_elements(document).map(drop)
    }

    /// Re-runs [`init`](Self::init).
    pub fn update<D>(&mut self, document: &mut D) -> Result<(), Error>
    where
        D: Document<Element = K> + ?Sized,
    {
        self.init(document)
    }

    /// Queries the document for every registered breakpoint and binds the
    /// matches, without re-reading stylesheets.
    ///
    /// Each newly bound breakpoint triggers an evaluation of its element.
    /// Returns the number of new bindings.
    pub fn find_elements<D>(&mut self, document: &mut D) -> Result<usize, Error>
    where
        D: Document<Element = K> + ?Sized,
    {
        self.phase = Phase::Bound;

        let batches: Vec<QueryBatch> = self.registry.iter().collect();
        let mut bound = 0;
        for QueryBatch { key, selector } in batches {
            let elements = match document.query_selector_all(&selector) {
                Ok(elements) => elements,
                Err(QueryError::Unsupported) => return Err(Error::NoSelectorEngine),
                Err(QueryError::InvalidSelector(message)) => {
                    return Err(Error::InvalidSelector { selector, message });
                }
            };
            log::trace!("{selector:?} matched {} elements", elements.len());

            let option = BreakpointOption::new(key);
            for element in &elements {
                if self.bind(element, option.clone()) {
                    bound += 1;
                    self.evaluate(document, element);
                }
            }
        }

        self.phase = Phase::Idle;
        Ok(bound)
    }

    /// Binds a breakpoint to `element`, creating its context on first use.
    ///
    /// Returns `false` if the breakpoint was already bound. Otherwise the
    /// element is listed under the breakpoint's channel and `true` is
    /// returned; the caller is expected to evaluate the element next.
    pub fn bind(&mut self, element: &K, option: BreakpointOption) -> bool {
        let channel = option.channel().clone();
        let context = self.contexts.entry(element.clone()).or_default();
        if !context.add_option(option) {
            return false;
        }
        self.channels.insert(&channel, element.clone());
        true
    }

    /// Evaluates `element` against all its bound breakpoints and writes the
    /// resulting attributes.
    ///
    /// Returns `None` if nothing is bound to `element`.
    pub fn evaluate<D>(&self, document: &mut D, element: &K) -> Option<AttributeValues>
    where
        D: Document<Element = K> + ?Sized,
    {
        let context = self.contexts.get(element)?;
        Some(context.evaluate(document, element, &self.config))
    }

    /// Re-evaluates bound elements after their geometry may have changed.
    ///
    /// Neither stylesheets nor the document's element set are consulted.
    /// Returns the number of elements evaluated.
    pub fn recalc<D>(&self, document: &mut D, target: RecalcTarget<'_, K>) -> usize
    where
        D: Document<Element = K> + ?Sized,
    {
        match target {
            RecalcTarget::Element(element) => {
                usize::from(self.evaluate(document, element).is_some())
            }
            RecalcTarget::Channel(name) => self
                .channels
                .get(name)
                .unwrap_or_default()
                .iter()
                .filter(|element| self.evaluate(document, element).is_some())
                .count(),
            RecalcTarget::All => self
                .channels
                .elements()
                .iter()
                .filter(|element| self.evaluate(document, element).is_some())
                .count(),
        }
    }

    /// Reads a rule list into the registry.
    ///
    /// Style rules are filtered by [`may_contain_queries`] before
    /// extraction; grouping and import rules are walked recursively. An
    /// inaccessible import aborts the walk with its error.
    pub fn read_rules(&mut self, rules: &[CssRule]) -> Result<(), SheetError> {
        for rule in rules {
            match rule {
                CssRule::Style { selector_text } => {
                    if may_contain_queries(selector_text) {
                        self.queue(selector_text);
                    }
                }
                CssRule::Grouping { rules } => self.read_rules(rules)?,
                CssRule::Import { rules } => match rules {
                    Ok(rules) => self.read_rules(rules)?,
                    Err(err) => return Err(err.clone()),
                },
                CssRule::Other => {}
            }
        }
        Ok(())
    }

    /// Reads raw stylesheet text into the registry.
    ///
    /// The text is ASCII-lowercased before filtering and extraction.
    pub fn read_text(&mut self, css: &str) {
        let css = css.to_ascii_lowercase();
        if may_contain_queries(&css) {
            self.queue(&css);
        }
    }

    fn read_sheet(&mut self, sheet: &StyleSheet) -> Result<(), SheetError> {
        match sheet {
            StyleSheet::Rules(rules) => self.read_rules(rules),
            StyleSheet::Text(text) => {
                self.read_text(text);
                Ok(())
            }
        }
    }

    fn queue(&mut self, css: &str) {
        let mut rules = Vec::new();
        extract_into(css, &mut rules);
        for rule in &rules {
            self.registry.register(rule);
        }
    }
}
