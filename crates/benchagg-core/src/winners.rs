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

//! Winner selection per test type.
//!
//! Throughput is higher-is-better over every row of a test type. Latency and
//! peak memory are lower-is-better and only consider strictly positive
//! values, since zero means "not measured". Ties go to the earliest row in
//! table order.

use crate::table::{Metric, ResultsTable, TableRow};

/// Test type excluded from winner comparisons.
pub const PROFILE_TEST_TYPE: &str = "profile";

/// Winners of one test type, each formatted as `framework (os)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryWinners {
    pub throughput: Option<String>,
    pub latency: Option<String>,
    pub memory: Option<String>,
}

/// Winners keyed by test type, in first-seen table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinnersMap {
    entries: Vec<(String, CategoryWinners)>,
}

impl WinnersMap {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, test_type: &str) -> Option<&CategoryWinners> {
        self.entries
            .iter()
            .find(|(name, _)| name == test_type)
            .map(|(_, winners)| winners)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryWinners)> {
        self.entries.iter().map(|(name, w)| (name.as_str(), w))
    }
}

fn display(row: &TableRow) -> String {
    format!("{} ({})", row.framework, row.os)
}

/// Row with the largest value; the first one wins ties.
fn best_max<'a>(rows: &[&'a TableRow], metric: Metric) -> Option<&'a TableRow> {
    rows.iter().copied().fold(None, |best, row| match best {
        Some(b) if metric.value(row) <= metric.value(b) => Some(b),
        _ => Some(row),
    })
}

/// Row with the smallest strictly positive value; the first one wins ties.
fn best_positive_min<'a>(rows: &[&'a TableRow], metric: Metric) -> Option<&'a TableRow> {
    rows.iter()
        .copied()
        .filter(|row| metric.value(row) > 0.0)
        .fold(None, |best, row| match best {
            Some(b) if metric.value(row) >= metric.value(b) => Some(b),
            _ => Some(row),
        })
}

/// Computes winners for every test type except `profile`.
///
/// # Examples
///
/// ```
/// use benchagg_core::{find_winners, ResultsTable, TableRow};
///
/// let row = |framework: &str, throughput: f64| TableRow {
///     framework: framework.to_string(),
///     os: "ubuntu-22.04".to_string(),
///     test_type: "low_normal".to_string(),
///     latency_us: 0.0,
///     throughput_req_s: throughput,
///     mem_peak_kb: 0.0,
///     mem_avg_kb: 0.0,
///     cpu_percent: 0.0,
/// };
/// let table = ResultsTable::new(vec![row("a", 100.0), row("b", 200.0)]);
///
/// let winners = find_winners(&table);
/// let low = winners.get("low_normal").unwrap();
/// assert_eq!(low.throughput.as_deref(), Some("b (ubuntu-22.04)"));
/// assert_eq!(low.latency, None);
/// ```
pub fn find_winners(table: &ResultsTable) -> WinnersMap {
    let mut entries = Vec::new();

    for test_type in table.test_types() {
        if test_type == PROFILE_TEST_TYPE {
            continue;
        }

        let subset: Vec<&TableRow> = table.rows_for(test_type).collect();
        if subset.is_empty() {
            continue;
        }

        let winners = CategoryWinners {
            throughput: best_max(&subset, Metric::Throughput).map(display),
            latency: best_positive_min(&subset, Metric::Latency).map(display),
            memory: best_positive_min(&subset, Metric::MemPeak).map(display),
        };
        entries.push((test_type.to_string(), winners));
    }

    WinnersMap { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(framework: &str, os: &str, test_type: &str, tp: f64, lat: f64, mem: f64) -> TableRow {
        TableRow {
            framework: framework.to_string(),
            os: os.to_string(),
            test_type: test_type.to_string(),
            latency_us: lat,
            throughput_req_s: tp,
            mem_peak_kb: mem,
            mem_avg_kb: 0.0,
            cpu_percent: 0.0,
        }
    }

    #[test]
    fn test_throughput_max() {
        let table = ResultsTable::new(vec![
            row("a", "ubuntu", "low_normal", 100.0, 0.0, 0.0),
            row("b", "ubuntu", "low_normal", 200.0, 0.0, 0.0),
        ]);
        let winners = find_winners(&table);
        assert_eq!(
            winners.get("low_normal").unwrap().throughput.as_deref(),
            Some("b (ubuntu)")
        );
    }

    #[test]
    fn test_latency_ignores_non_positive() {
        let table = ResultsTable::new(vec![
            row("a", "ubuntu", "low_normal", 1.0, 0.0, 10.0),
            row("b", "windows", "low_normal", 1.0, -3.0, 20.0),
            row("c", "ubuntu", "low_normal", 1.0, 50.0, 5.0),
            row("d", "windows", "low_normal", 1.0, 40.0, 0.0),
        ]);
        let low = find_winners(&table).get("low_normal").cloned().unwrap();
        assert_eq!(low.latency.as_deref(), Some("d (windows)"));
        assert_eq!(low.memory.as_deref(), Some("c (ubuntu)"));
    }

    #[test]
    fn test_all_zero_latency_omitted() {
        let table = ResultsTable::new(vec![
            row("a", "ubuntu", "high_normal", 10.0, 0.0, 0.0),
            row("b", "ubuntu", "high_normal", 20.0, -1.0, 0.0),
        ]);
        let high = find_winners(&table).get("high_normal").cloned().unwrap();
        assert_eq!(high.throughput.as_deref(), Some("b (ubuntu)"));
        assert_eq!(high.latency, None);
        assert_eq!(high.memory, None);
    }

    #[test]
    fn test_ties_go_to_first_row() {
        let table = ResultsTable::new(vec![
            row("first", "ubuntu", "low_normal", 500.0, 10.0, 64.0),
            row("second", "windows", "low_normal", 500.0, 10.0, 64.0),
        ]);
        let low = find_winners(&table).get("low_normal").cloned().unwrap();
        assert_eq!(low.throughput.as_deref(), Some("first (ubuntu)"));
        assert_eq!(low.latency.as_deref(), Some("first (ubuntu)"));
        assert_eq!(low.memory.as_deref(), Some("first (ubuntu)"));
    }

    #[test]
    fn test_profile_excluded_and_order_kept() {
        let table = ResultsTable::new(vec![
            row("a", "ubuntu", "high_stressed", 1.0, 1.0, 1.0),
            row("a", "ubuntu", "profile", 9.0, 1.0, 1.0),
            row("a", "ubuntu", "low_normal", 1.0, 1.0, 1.0),
        ]);
        let winners = find_winners(&table);
        assert_eq!(winners.len(), 2);
        assert!(winners.get(PROFILE_TEST_TYPE).is_none());
        let order: Vec<&str> = winners.iter().map(|(t, _)| t).collect();
        assert_eq!(order, vec!["high_stressed", "low_normal"]);
    }

    #[test]
    fn test_empty_table() {
        assert!(find_winners(&ResultsTable::default()).is_empty());
    }
}
