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

//! Flat results table.
//!
//! [`ResultsTable`] is the single shape every downstream stage reads: one
//! [`TableRow`] per loaded result row, keyed by framework, OS and test type.

use crate::loader::RawResults;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder for categorical values that were never set.
pub const UNKNOWN: &str = "unknown";

/// One row of the aggregated table. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub framework: String,
    pub os: String,
    pub test_type: String,
    pub latency_us: f64,
    pub throughput_req_s: f64,
    pub mem_peak_kb: f64,
    pub mem_avg_kb: f64,
    pub cpu_percent: f64,
}

/// Numeric columns of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Latency,
    Throughput,
    MemPeak,
    MemAvg,
    Cpu,
}

impl Metric {
    /// Column name in CSV input and output.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Latency => "latency_us",
            Metric::Throughput => "throughput_req_s",
            Metric::MemPeak => "mem_peak_kb",
            Metric::MemAvg => "mem_avg_kb",
            Metric::Cpu => "cpu_percent",
        }
    }

    /// Reads this metric from a row.
    pub fn value(&self, row: &TableRow) -> f64 {
        match self {
            Metric::Latency => row.latency_us,
            Metric::Throughput => row.throughput_req_s,
            Metric::MemPeak => row.mem_peak_kb,
            Metric::MemAvg => row.mem_avg_kb,
            Metric::Cpu => row.cpu_percent,
        }
    }
}

/// Framework × OS matrix of averaged values.
///
/// Both axes are sorted. `values[f][o]` is `None` when no row exists for
/// `frameworks[f]` on `oses[o]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub frameworks: Vec<String>,
    pub oses: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    /// Returns true when the pivot has no cells.
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }

    /// Largest value in the matrix, if any.
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }

    /// Values of one OS column, in framework order.
    pub fn column(&self, os_index: usize) -> Vec<Option<f64>> {
        self.values.iter().map(|row| row[os_index]).collect()
    }
}

/// Ordered, read-only table of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    rows: Vec<TableRow>,
}

impl ResultsTable {
    /// Wraps existing rows.
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Flattens loaded results. Rows keep framework order, then file order.
    pub fn from_results(results: &RawResults) -> Self {
        let rows = results
            .iter()
            .flat_map(|(framework, rows)| {
                rows.iter().map(move |row| TableRow {
                    framework: framework.to_string(),
                    os: row.os.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                    test_type: row.test_type.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                    latency_us: row.latency_us,
                    throughput_req_s: row.throughput_req_s,
                    mem_peak_kb: row.mem_peak_kb,
                    mem_avg_kb: row.mem_avg_kb,
                    cpu_percent: row.cpu_percent,
                })
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct test types in first-seen order.
    pub fn test_types(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|r| r.test_type.as_str()))
    }

    /// Distinct operating systems in first-seen order.
    pub fn oses(&self) -> Vec<&str> {
        distinct(self.rows.iter().map(|r| r.os.as_str()))
    }

    /// Rows of one test type, in table order.
    pub fn rows_for<'a>(&'a self, test_type: &'a str) -> impl Iterator<Item = &'a TableRow> + 'a {
        self.rows.iter().filter(move |r| r.test_type == test_type)
    }

    /// Averages `metric` per (framework, OS) over rows whose test type is in
    /// `test_types`.
    pub fn pivot_mean(&self, test_types: &[&str], metric: Metric) -> Pivot {
        let mut sums: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
        let mut frameworks = BTreeSet::new();
        let mut oses = BTreeSet::new();

        for row in self
            .rows
            .iter()
            .filter(|r| test_types.contains(&r.test_type.as_str()))
        {
            frameworks.insert(row.framework.as_str());
            oses.insert(row.os.as_str());
            let cell = sums
                .entry((row.framework.as_str(), row.os.as_str()))
                .or_insert((0.0, 0));
            cell.0 += metric.value(row);
            cell.1 += 1;
        }

        let values = frameworks
            .iter()
            .map(|fw| {
                oses.iter()
                    .map(|os| {
                        sums.get(&(*fw, *os))
                            .map(|(sum, count)| sum / *count as f64)
                    })
                    .collect()
            })
            .collect();

        Pivot {
            frameworks: frameworks.into_iter().map(str::to_string).collect(),
            oses: oses.into_iter().map(str::to_string).collect(),
            values,
        }
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
