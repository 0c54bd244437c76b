// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Prometheus text exposition (version 0.0.4) of a scrape's sample stream.

use redfish_collector::Sample;
use std::fmt::Write;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders the samples grouped by metric name, `# HELP` / `# TYPE gauge`
/// once per name, in first-seen order.
pub fn render(samples: &[Sample]) -> String {
    let mut groups: Vec<(&str, Vec<&Sample>)> = Vec::new();
    for sample in samples {
        match groups.iter().position(|(name, _)| *name == sample.name) {
            Some(i) => groups[i].1.push(sample),
            None => groups.push((&sample.name, vec![sample])),
        }
    }

    let mut out = String::new();
    for (name, group) in groups {
        // Writes to a String cannot fail.
        let _ = writeln!(out, "# HELP {name} {}", escape_help(&group[0].help));
        let _ = writeln!(out, "# TYPE {name} gauge");
        for sample in group {
            let _ = write!(out, "{name}");
            if !sample.labels.is_empty() {
                let _ = write!(out, "{{");
                for (i, (key, value)) in sample.labels.iter().enumerate() {
                    if i > 0 {
                        let _ = write!(out, ",");
                    }
                    let _ = write!(out, "{key}=\"{}\"", escape_label_value(value));
                }
                let _ = write!(out, "}}");
            }
            let _ = writeln!(out, " {}", sample.value);
        }
    }
    out
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
