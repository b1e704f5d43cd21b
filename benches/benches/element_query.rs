// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_element_query`: selector extraction and recalculation.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use std::collections::HashMap;

use kurbo::Size;
use understory_element_query::{
    CssRule, Document, ElementQueries, QueryError, RecalcTarget, SheetError, StyleSheet, extract,
};

/// Every element answers to every selector; attributes live in one flat map.
struct Host {
    sheet: Vec<CssRule>,
    sizes: Vec<Size>,
    attributes: HashMap<(u32, String), String>,
}

impl Host {
    fn new(rules: &[String], elements: u32) -> Self {
        Self {
            sheet: rules.iter().map(|r| CssRule::style(r.as_str())).collect(),
            sizes: (0..elements)
                .map(|i| Size::new(f64::from(i % 1200), 200.0))
                .collect(),
            attributes: HashMap::new(),
        }
    }
}

impl Document for Host {
    type Element = u32;

    fn style_sheets(&self) -> Vec<Result<StyleSheet, SheetError>> {
        vec![Ok(StyleSheet::Rules(self.sheet.clone()))]
    }

    fn query_selector_all(&self, _: &str) -> Result<Vec<u32>, QueryError> {
        let len = u32::try_from(self.sizes.len()).unwrap_or(u32::MAX);
        Ok((0..len).collect())
    }

    fn attribute(&self, element: &u32, name: &str) -> Option<String> {
        self.attributes.get(&(*element, name.to_owned())).cloned()
    }

    fn set_attribute(&mut self, element: &u32, name: &str, value: &str) {
        self.attributes
            .insert((*element, name.to_owned()), value.to_owned());
    }

    fn remove_attribute(&mut self, element: &u32, name: &str) {
        self.attributes.remove(&(*element, name.to_owned()));
    }

    fn offset_size(&self, element: &u32) -> Size {
        self.sizes[*element as usize]
    }

    fn font_size(&self, _: Option<&u32>) -> Option<f64> {
        None
    }

    fn viewport_size(&self) -> Size {
        Size::new(1280.0, 800.0)
    }
}

fn breakpoint_rules(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                r#".card-{i}[layout-meq-min-width~="{}px"][layout-meq-max-width~="{}em"]:hover"#,
                i * 40,
                i * 3 + 20
            )
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_query/extract");
    for count in [16_usize, 256, 4_096] {
        let css = breakpoint_rules(count).join(",\n");
        group.throughput(Throughput::Bytes(css.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &css, |b, css| {
            b.iter(|| black_box(extract(css)));
        });
    }
    group.finish();
}

fn bench_recalc(c: &mut Criterion) {
    let mut group = c.benchmark_group("element_query/recalc_all");
    let rules = breakpoint_rules(8);
    for elements in [64_u32, 1_024] {
        group.throughput(Throughput::Elements(u64::from(elements)));
        group.bench_with_input(
            BenchmarkId::from_parameter(elements),
            &elements,
            |b, &elements| {
                b.iter_batched(
                    || {
                        let mut host = Host::new(&rules, elements);
                        let mut queries = ElementQueries::new();
                        queries.init(&mut host).unwrap();
                        (host, queries)
                    },
                    |(mut host, queries)| {
                        black_box(queries.recalc(&mut host, RecalcTarget::All));
                    },
                    BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_extract, bench_recalc);
criterion_main!(benches);
