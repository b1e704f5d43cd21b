// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host document shared by the integration tests.
//!
//! Selector matching is table driven: each element lists the exact simple
//! selectors it answers to, and a query matches an element when any
//! comma-separated part of the query is in that list.

#![allow(dead_code, reason = "not every test binary uses every helper")]
#![allow(unreachable_pub, reason = "helpers are shared across test binaries")]

use std::cell::Cell;
use std::collections::BTreeMap;

use kurbo::Size;
use understory_element_query::{CssRule, Document, QueryError, SheetError, StyleSheet};

#[derive(Debug, Default)]
pub struct FakeElement {
    pub selectors: Vec<String>,
    pub size: Size,
    pub font_size: Option<f64>,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct FakeDocument {
    pub sheets: Vec<Result<StyleSheet, SheetError>>,
    pub elements: Vec<FakeElement>,
    pub viewport: Size,
    pub root_font_size: Option<f64>,
    pub query_supported: bool,
    pub queries: Cell<usize>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            elements: Vec::new(),
            viewport: Size::new(1000.0, 800.0),
            root_font_size: None,
            query_supported: true,
            queries: Cell::new(0),
        }
    }

    /// Adds a sheet made of style rules with the given selector texts.
    pub fn with_rules(mut self, selectors: &[&str]) -> Self {
        let rules = selectors.iter().map(|s| CssRule::style(*s)).collect();
        self.sheets.push(Ok(StyleSheet::Rules(rules)));
        self
    }

    /// Adds an element answering to `selectors` and returns its id.
    pub fn add(&mut self, selectors: &[&str], width: f64, height: f64) -> u32 {
        self.elements.push(FakeElement {
            selectors: selectors.iter().map(|s| (*s).to_owned()).collect(),
            size: Size::new(width, height),
            ..FakeElement::default()
        });
        u32::try_from(self.elements.len() - 1).unwrap()
    }

    pub fn resize(&mut self, id: u32, width: f64, height: f64) {
        self.elements[id as usize].size = Size::new(width, height);
    }

    pub fn attr(&self, id: u32, name: &str) -> Option<&str> {
        self.elements[id as usize]
            .attributes
            .get(name)
            .map(String::as_str)
    }

    pub fn attrs(&self, id: u32) -> BTreeMap<String, String> {
        self.elements[id as usize].attributes.clone()
    }

    pub fn set(&mut self, id: u32, name: &str, value: &str) {
        self.elements[id as usize]
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }
}

impl Document for FakeDocument {
    type Element = u32;

    fn style_sheets(&self) -> Vec<Result<StyleSheet, SheetError>> {
        self.sheets.clone()
    }

    fn query_selector_all(&self, selectors: &str) -> Result<Vec<u32>, QueryError> {
        if !self.query_supported {
            return Err(QueryError::Unsupported);
        }
        self.queries.set(self.queries.get() + 1);

        let parts: Vec<&str> = selectors.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(QueryError::InvalidSelector(selectors.to_owned()));
        }
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.selectors.iter().any(|s| parts.contains(&s.as_str())))
            .map(|(idx, _)| u32::try_from(idx).unwrap())
            .collect())
    }

    fn attribute(&self, element: &u32, name: &str) -> Option<String> {
        self.attr(*element, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, element: &u32, name: &str, value: &str) {
        self.set(*element, name, value);
    }

    fn remove_attribute(&mut self, element: &u32, name: &str) {
        self.elements[*element as usize].attributes.remove(name);
    }

    fn offset_size(&self, element: &u32) -> Size {
        self.elements[*element as usize].size
    }

    fn font_size(&self, element: Option<&u32>) -> Option<f64> {
        match element {
            Some(id) => self.elements[*id as usize].font_size,
            None => self.root_font_size,
        }
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }
}
