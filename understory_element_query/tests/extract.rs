// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extraction recovers exactly what was encoded.

use understory_element_query::{BreakpointRule, Channel, Mode, Property, extract};

fn encode(channel: &str, mode: Mode, property: Property, threshold: &str) -> String {
    let prefix = if channel.is_empty() {
        String::new()
    } else {
        format!("{channel}-")
    };
    format!(
        r#"[{prefix}meq-{}-{}~="{threshold}"]"#,
        mode.as_str(),
        property.as_str()
    )
}

#[test]
fn reserializing_extracted_rules_recovers_the_encoding() {
    let declared = [
        ("a", Mode::Min, Property::Width, "300px"),
        ("side-bar", Mode::Max, Property::Height, "12.5em"),
        ("", Mode::Max, Property::Width, "40vw"),
        ("b_2", Mode::Min, Property::Height, "1e2px"),
    ];
    let brackets: String = declared
        .iter()
        .map(|(c, m, p, t)| encode(c, *m, *p, t))
        .collect();
    let css = format!("article.post{brackets}:hover, .other");

    let rules = extract(&css);
    assert_eq!(rules.len(), declared.len());
    for (rule, (channel, mode, property, threshold)) in rules.iter().zip(declared) {
        assert_eq!(rule.selector, "article.post:hover");
        assert_eq!(
            encode(rule.channel.name(), rule.mode, rule.property, &rule.threshold),
            encode(channel, mode, property, threshold)
        );
    }
}

#[test]
fn nested_rule_text_is_scanned_fragment_by_fragment() {
    let css = r#"
.grid[cols-meq-min-width~="600px"] > .cell,
.grid[cols-meq-min-width~="900px"] > .cell { flex-basis: 33%; }
.nav[meq-max-width~='480px'] a { display: block; }
"#;
    let rules = extract(css);
    let expected = [
        BreakpointRule {
            selector: String::from(".grid"),
            channel: Channel::new("cols"),
            mode: Mode::Min,
            property: Property::Width,
            threshold: String::from("600px"),
        },
        BreakpointRule {
            selector: String::from(".grid"),
            channel: Channel::new("cols"),
            mode: Mode::Min,
            property: Property::Width,
            threshold: String::from("900px"),
        },
        BreakpointRule {
            selector: String::from(".nav"),
            channel: Channel::default_channel(),
            mode: Mode::Max,
            property: Property::Width,
            threshold: String::from("480px"),
        },
    ];
    assert_eq!(rules, expected);
}
