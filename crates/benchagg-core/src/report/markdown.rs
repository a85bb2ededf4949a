// Benchagg - Benchmark Result Aggregator
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Markdown summary, suitable for posting as a pull request comment.

use super::format::format_thousands;
use crate::chart::CHART_FILES;
use crate::config::ReportConfig;
use crate::error::{AggError, Result};
use crate::table::{ResultsTable, TableRow};
use crate::winners::WinnersMap;
use std::fs;
use std::path::Path;

/// Summary written when no artifact produced any rows.
pub const EMPTY_SUMMARY: &str = "# 📊 Benchmark Results\n\nNo benchmark results were collected.\n";

/// The four standard scenarios, in report order.
pub const KNOWN_TEST_TYPES: [&str; 4] = ["low_normal", "high_normal", "low_stressed", "high_stressed"];

/// Short scenario label used in the winners table.
fn winner_label(test_type: &str) -> &str {
    match test_type {
        "low_normal" => "🟢 Low Connections",
        "high_normal" => "🔴 High Connections",
        "low_stressed" => "🌐 Low + Network Stress",
        "high_stressed" => "🌐 High + Network Stress",
        other => other,
    }
}

/// Section heading for a scenario's detail table.
fn detail_heading(test_type: &str) -> &str {
    match test_type {
        "low_normal" => "Normal Network - Low Connections (100)",
        "high_normal" => "Normal Network - High Connections (512)",
        "low_stressed" => "Stressed Network - Low Connections (100)",
        "high_stressed" => "Stressed Network - High Connections (512)",
        other => other,
    }
}

/// Platform label for an OS name such as `ubuntu-22.04`.
pub fn os_label(os: &str) -> String {
    let lower = os.to_lowercase();
    if ["ubuntu", "debian", "fedora", "linux"]
        .iter()
        .any(|name| lower.contains(name))
    {
        "🐧 Linux".to_string()
    } else if lower.contains("windows") {
        "🪟 Windows".to_string()
    } else if lower.contains("macos") {
        "🍎 macOS".to_string()
    } else {
        os.to_string()
    }
}

fn push_winners(lines: &mut Vec<String>, winners: &WinnersMap) {
    if winners.is_empty() {
        return;
    }

    lines.push("| Test Type | Best Throughput | Lowest Latency | Lowest Memory |".to_string());
    lines.push("|-----------|-----------------|----------------|---------------|".to_string());
    for (test_type, w) in winners.iter() {
        lines.push(format!(
            "| {} | {} | {} | {} |",
            winner_label(test_type),
            w.throughput.as_deref().unwrap_or("N/A"),
            w.latency.as_deref().unwrap_or("N/A"),
            w.memory.as_deref().unwrap_or("N/A"),
        ));
    }
    lines.push(String::new());
}

fn detail_row(row: &TableRow) -> String {
    format!(
        "| {} | {} | {} | {} | {:.1} |",
        row.framework,
        format_thousands(row.throughput_req_s, 0),
        format_thousands(row.latency_us, 2),
        format_thousands(row.mem_peak_kb, 0),
        row.cpu_percent,
    )
}

fn push_os_details(lines: &mut Vec<String>, table: &ResultsTable) {
    let observed = table.test_types();
    let ordered: Vec<&str> = KNOWN_TEST_TYPES
        .iter()
        .copied()
        .chain(
            observed
                .iter()
                .copied()
                .filter(|t| !KNOWN_TEST_TYPES.contains(t)),
        )
        .collect();

    for os in table.oses() {
        lines.push(format!("## {} Results ({os})", os_label(os)));
        lines.push(String::new());

        for test_type in &ordered {
            let rows: Vec<&TableRow> = table
                .rows_for(test_type)
                .filter(|r| r.os == os)
                .collect();
            if rows.is_empty() {
                continue;
            }

            lines.push(format!("### {}", detail_heading(test_type)));
            lines.push(String::new());
            lines.push(
                "| Framework | Throughput (req/s) | Latency (μs) | Memory Peak (KB) | CPU (%) |"
                    .to_string(),
            );
            lines.push(
                "|-----------|-------------------|--------------|------------------|---------|"
                    .to_string(),
            );
            lines.extend(rows.into_iter().map(detail_row));
            lines.push(String::new());
        }
    }
}

fn push_charts(lines: &mut Vec<String>) {
    let descriptions = [
        "Throughput comparison",
        "Latency comparison",
        "Memory usage comparison",
        "Stressed network comparison",
    ];

    lines.push("## 📈 Charts".to_string());
    lines.push(String::new());
    lines.push("Charts are available in the artifacts:".to_string());
    for (file, description) in CHART_FILES.iter().zip(descriptions) {
        lines.push(format!("- `{file}` - {description}"));
    }
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push("*Full raw data available in the benchmark-final-report artifact.*".to_string());
}

/// Renders the full summary document.
pub fn render_markdown(table: &ResultsTable, winners: &WinnersMap, config: &ReportConfig) -> String {
    let mut lines = vec![
        "# 📊 Comprehensive Benchmark Results".to_string(),
        String::new(),
        format!(
            "**Generated:** {}",
            config.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!("**Benchmark runs per test:** {}", config.benchmark_runs),
        format!("**Test duration:** {}s", config.test_duration),
        String::new(),
        "## 🏆 Winners by Category".to_string(),
        String::new(),
    ];

    push_winners(&mut lines, winners);
    push_os_details(&mut lines, table);
    push_charts(&mut lines);

    let mut md = lines.join("\n");
    md.push('\n');
    md
}

/// Writes the full summary document to `path`.
pub fn export_markdown(
    table: &ResultsTable,
    winners: &WinnersMap,
    config: &ReportConfig,
    path: &Path,
) -> Result<()> {
    fs::write(path, render_markdown(table, winners, config)).map_err(|e| AggError::io_error(path, e))
}

/// Writes the "no results" summary to `path`.
pub fn export_empty_summary(path: &Path) -> Result<()> {
    fs::write(path, EMPTY_SUMMARY).map_err(|e| AggError::io_error(path, e))
}
