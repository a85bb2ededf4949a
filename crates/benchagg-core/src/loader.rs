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

//! Result loading.
//!
//! Each artifact directory holds a `results.csv` written by the benchmark job,
//! either at its root or somewhere below it. Rows are read into fixed
//! [`ResultRow`] records: the five known metric columns are always numbers,
//! other columns are kept as-is in [`ResultRow::extra`].

use crate::artifact::{parse_artifact_name, ArtifactMeta};
use crate::config::LoadConfig;
use crate::error::{AggError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name searched for inside each artifact directory.
pub const RESULTS_FILE_NAME: &str = "results.csv";

/// Value of a column the loader has no fixed slot for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The cell parsed as a number (empty cells count as zero).
    Number(f64),
    /// The cell kept as written.
    Text(String),
}

impl FieldValue {
    /// Best-effort numeric typing of a raw cell. Non-finite values such as
    /// `nan` or `inf` stay text, since JSON has no number for them.
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Number(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => FieldValue::Number(v),
            _ => FieldValue::Text(raw.to_string()),
        }
    }
}

/// One data row of a results file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Framework column as written by the benchmark job.
    pub framework: Option<String>,
    /// Test type; overwritten with the artifact's test type on load.
    pub test_type: Option<String>,
    /// Metric label column.
    pub metric: Option<String>,
    /// Mean latency in microseconds.
    pub latency_us: f64,
    /// Requests per second.
    pub throughput_req_s: f64,
    /// Peak resident memory in KB.
    pub mem_peak_kb: f64,
    /// Average resident memory in KB.
    pub mem_avg_kb: f64,
    /// CPU utilisation percentage.
    pub cpu_percent: f64,
    /// Operating system; overwritten with the artifact's OS on load.
    pub os: Option<String>,
    /// Every other column, keyed by header name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl ResultRow {
    /// Stores one cell. `None` means the row was shorter than the header.
    fn set_field(&mut self, column: &str, cell: Option<&str>) {
        match column {
            "framework" => self.framework = cell.map(str::to_string),
            "test_type" => self.test_type = cell.map(str::to_string),
            "metric" => self.metric = cell.map(str::to_string),
            "os" => self.os = cell.map(str::to_string),
            "latency_us" => self.latency_us = coerce_metric(column, cell),
            "throughput_req_s" => self.throughput_req_s = coerce_metric(column, cell),
            "mem_peak_kb" => self.mem_peak_kb = coerce_metric(column, cell),
            "mem_avg_kb" => self.mem_avg_kb = coerce_metric(column, cell),
            "cpu_percent" => self.cpu_percent = coerce_metric(column, cell),
            _ => {
                self.extra
                    .insert(column.to_string(), FieldValue::from_cell(cell.unwrap_or("")));
            }
        }
    }

    /// Applies the artifact's identity to the row.
    fn tag(&mut self, meta: &ArtifactMeta) {
        self.os = Some(meta.os.clone());
        self.test_type = Some(meta.test_type.clone());
    }
}

/// Empty, missing, malformed and non-finite cells all load as zero.
fn coerce_metric(column: &str, cell: Option<&str>) -> f64 {
    let raw = cell.unwrap_or("").trim();
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!(column, value = raw, "non-numeric metric value, using 0");
            0.0
        }
    }
}

/// Loaded rows grouped by the framework named in the artifact directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResults {
    frameworks: BTreeMap<String, Vec<ResultRow>>,
}

impl RawResults {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row under `framework`.
    pub fn push(&mut self, framework: impl Into<String>, row: ResultRow) {
        self.frameworks.entry(framework.into()).or_default().push(row);
    }

    /// Returns true when no rows were loaded at all.
    pub fn is_empty(&self) -> bool {
        self.frameworks.values().all(Vec::is_empty)
    }

    /// Number of frameworks with at least one row.
    pub fn framework_count(&self) -> usize {
        self.frameworks.values().filter(|rows| !rows.is_empty()).count()
    }

    /// Total number of rows across frameworks.
    pub fn row_count(&self) -> usize {
        self.frameworks.values().map(Vec::len).sum()
    }

    /// Rows of one framework.
    pub fn get(&self, framework: &str) -> Option<&[ResultRow]> {
        self.frameworks.get(framework).map(Vec::as_slice)
    }

    /// Iterates frameworks in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResultRow])> {
        self.frameworks
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }
}

/// Parses results from any CSV reader with a header row.
///
/// # Examples
///
/// ```
/// use benchagg_core::read_results;
///
/// let csv = "framework,metric,latency_us,throughput_req_s\ncoroute,http,12.5,\n";
/// let rows = read_results(csv.as_bytes()).unwrap();
/// assert_eq!(rows[0].latency_us, 12.5);
/// assert_eq!(rows[0].throughput_req_s, 0.0);
/// ```
pub fn read_results<R: io::Read>(reader: R) -> std::result::Result<Vec<ResultRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            debug!(
                line = record.position().map(|p| p.line()),
                "ignoring cells beyond the header width"
            );
        }

        let mut row = ResultRow::default();
        for (index, column) in headers.iter().enumerate() {
            row.set_field(column, record.get(index));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Loads one results file. A missing file yields no rows.
pub fn load_results_csv(path: &Path, config: &LoadConfig) -> Result<Vec<ResultRow>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let metadata = fs::metadata(path).map_err(|e| AggError::io_error(path, e))?;
    if metadata.len() > config.max_file_size {
        return Err(AggError::file_too_large(
            path,
            metadata.len(),
            config.max_file_size,
        ));
    }

    let file = File::open(path).map_err(|e| AggError::io_error(path, e))?;
    read_results(file).map_err(|e| AggError::csv_error(path, e))
}

/// Locates the results file of an artifact: directly inside it, or else the
/// first match (in file name order) anywhere beneath it.
pub fn find_results_csv(artifact_dir: &Path) -> Option<PathBuf> {
    let direct = artifact_dir.join(RESULTS_FILE_NAME);
    if direct.is_file() {
        return Some(direct);
    }

    WalkDir::new(artifact_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == RESULTS_FILE_NAME)
        .map(|entry| entry.into_path())
}

/// Loads every artifact below `input_dir`.
///
/// Subdirectories are visited in name order. Entries that are not
/// directories, or whose names are not artifact names, are skipped.
pub fn load_all_results(input_dir: &Path, config: &LoadConfig) -> Result<RawResults> {
    let entries = fs::read_dir(input_dir).map_err(|e| AggError::io_error(input_dir, e))?;

    let mut artifact_dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AggError::io_error(input_dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            artifact_dirs.push(path);
        }
    }
    artifact_dirs.sort();

    let mut results = RawResults::new();
    for dir in artifact_dirs {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(meta) = parse_artifact_name(name) else {
            debug!(directory = name, "not an artifact directory, skipping");
            continue;
        };
        let Some(csv_path) = find_results_csv(&dir) else {
            debug!(artifact = name, "no {RESULTS_FILE_NAME} found");
            continue;
        };

        let rows = load_results_csv(&csv_path, config)?;
        debug!(
            artifact = name,
            path = %csv_path.display(),
            rows = rows.len(),
            "loaded artifact"
        );
        for mut row in rows {
            row.tag(&meta);
            results.push(meta.framework.clone(), row);
        }
    }

    info!(
        frameworks = results.framework_count(),
        rows = results.row_count(),
        "finished loading results"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str =
        "framework,test_type,metric,latency_us,throughput_req_s,mem_peak_kb,mem_avg_kb,cpu_percent";

    #[test]
    fn test_read_numeric_fields() {
        let csv = format!("{HEADER}\ncoroute,low_normal,http,85.5,120000,5120,4096,93.2\n");
        let rows = read_results(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.framework.as_deref(), Some("coroute"));
        assert_eq!(row.metric.as_deref(), Some("http"));
        assert_eq!(row.latency_us, 85.5);
        assert_eq!(row.throughput_req_s, 120_000.0);
        assert_eq!(row.mem_peak_kb, 5120.0);
        assert_eq!(row.mem_avg_kb, 4096.0);
        assert_eq!(row.cpu_percent, 93.2);
    }

    #[test]
    fn test_empty_and_malformed_cells_are_zero() {
        let csv = format!("{HEADER}\ncoroute,low_normal,http,,n/a,NaN,  ,7\n");
        let rows = read_results(csv.as_bytes()).unwrap();

        let row = &rows[0];
        assert_eq!(row.latency_us, 0.0);
        assert_eq!(row.throughput_req_s, 0.0);
        assert_eq!(row.mem_peak_kb, 0.0);
        assert_eq!(row.mem_avg_kb, 0.0);
        assert_eq!(row.cpu_percent, 7.0);
    }

    #[test]
    fn test_short_row_defaults() {
        let csv = format!("{HEADER},p99_us\ncoroute,low_normal\n");
        let rows = read_results(csv.as_bytes()).unwrap();

        let row = &rows[0];
        assert_eq!(row.metric, None);
        assert_eq!(row.cpu_percent, 0.0);
        assert_eq!(row.extra.get("p99_us"), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn test_extra_columns_keep_text() {
        let csv = "framework,p99_us,notes\ncoroute,310.5,warm cache\n";
        let rows = read_results(csv.as_bytes()).unwrap();

        let row = &rows[0];
        assert_eq!(row.extra.get("p99_us"), Some(&FieldValue::Number(310.5)));
        assert_eq!(
            row.extra.get("notes"),
            Some(&FieldValue::Text("warm cache".to_string()))
        );
    }

    #[test]
    fn test_non_finite_extra_cells_stay_text() {
        assert_eq!(FieldValue::from_cell("nan"), FieldValue::Text("nan".to_string()));
        assert_eq!(FieldValue::from_cell("-inf"), FieldValue::Text("-inf".to_string()));
        assert_eq!(FieldValue::from_cell(" 2.5 "), FieldValue::Number(2.5));

        let csv = "framework,p99_us\ncoroute,NaN\n";
        let rows = read_results(csv.as_bytes()).unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json["p99_us"], "NaN");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let rows = load_results_csv(&dir.path().join("results.csv"), &LoadConfig::default())
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, format!("{HEADER}\ncoroute,x,y,1,2,3,4,5\n")).unwrap();

        let config = LoadConfig { max_file_size: 10 };
        let err = load_results_csv(&path, &config).unwrap_err();
        assert!(matches!(err, AggError::FileTooLarge { max: 10, .. }));
    }

    #[test]
    fn test_find_nested_results() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("b").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(nested.join(RESULTS_FILE_NAME), HEADER).unwrap();
        fs::write(dir.path().join("a").join(RESULTS_FILE_NAME), HEADER).unwrap();

        let found = find_results_csv(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("a").join(RESULTS_FILE_NAME));
    }

    #[test]
    fn test_find_prefers_direct_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a").join(RESULTS_FILE_NAME), HEADER).unwrap();
        fs::write(dir.path().join(RESULTS_FILE_NAME), HEADER).unwrap();

        let found = find_results_csv(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(RESULTS_FILE_NAME));
    }

    #[test]
    fn test_find_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_results_csv(dir.path()).is_none());
    }

    #[test]
    fn test_load_all_tags_rows() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("results-ubuntu-22.04-coroute-low_normal");
        fs::create_dir_all(&artifact).unwrap();
        fs::write(
            artifact.join(RESULTS_FILE_NAME),
            format!("{HEADER},os\nother,wrong_type,http,10,100,1,1,1,linux\n"),
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("not-an-artifact")).unwrap();
        fs::write(dir.path().join("results-file-x-y"), "stray file").unwrap();

        let results = load_all_results(dir.path(), &LoadConfig::default()).unwrap();
        assert_eq!(results.framework_count(), 1);

        let rows = results.get("coroute").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].os.as_deref(), Some("ubuntu-22.04"));
        assert_eq!(rows[0].test_type.as_deref(), Some("low_normal"));
        // The CSV's own framework column is preserved for the raw dump.
        assert_eq!(rows[0].framework.as_deref(), Some("other"));
    }

    #[test]
    fn test_load_all_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_all_results(&dir.path().join("missing"), &LoadConfig::default())
            .unwrap_err();
        assert!(matches!(err, AggError::Io { .. }));
    }

    #[test]
    fn test_header_only_file_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("results-ubuntu-coroute-low_normal");
        fs::create_dir_all(&artifact).unwrap();
        fs::write(artifact.join(RESULTS_FILE_NAME), format!("{HEADER}\n")).unwrap();

        let results = load_all_results(dir.path(), &LoadConfig::default()).unwrap();
        assert!(results.is_empty());
        assert_eq!(results.framework_count(), 0);
    }
}
