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

//! End-to-end aggregation run.

use crate::chart::{render_charts, ChartRenderer};
use crate::config::AggregateConfig;
use crate::error::{AggError, Result};
use crate::loader::load_all_results;
use crate::report::{
    export_csv, export_empty_summary, export_json, export_markdown, COMBINED_CSV_FILE,
    RAW_JSON_FILE, SUMMARY_FILE,
};
use crate::table::ResultsTable;
use crate::winners::{find_winners, WinnersMap};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Frameworks with at least one row.
    pub frameworks: usize,
    /// Rows in the aggregated table.
    pub data_points: usize,
    pub winners: WinnersMap,
    /// Charts actually written.
    pub charts: Vec<PathBuf>,
    /// Summary, combined CSV and raw JSON paths.
    pub reports: Vec<PathBuf>,
}

/// Result of [`run`].
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No artifact yielded rows; only the "no results" summary was written.
    NoResults { summary: PathBuf },
    /// Full report written.
    Report(RunSummary),
}

/// Loads every artifact under `config.input_dir` and writes the report set
/// to `config.output_dir`.
///
/// Output order: charts, `summary.md`, `combined_results.csv`,
/// `raw_results.json`. Chart failures are logged, everything else is fatal.
pub fn run(config: &AggregateConfig, renderer: &dyn ChartRenderer) -> Result<RunOutcome> {
    if config.input_dir.exists() && !config.input_dir.is_dir() {
        return Err(AggError::invalid_input(format!(
            "input path '{}' is not a directory",
            config.input_dir.display()
        )));
    }

    let output_dir = &config.output_dir;
    fs::create_dir_all(output_dir).map_err(|e| AggError::io_error(output_dir, e))?;

    info!(input = %config.input_dir.display(), "loading results");
    let results = load_all_results(&config.input_dir, &config.load)?;

    let summary_path = output_dir.join(SUMMARY_FILE);
    if results.is_empty() {
        warn!("no results found");
        export_empty_summary(&summary_path)?;
        return Ok(RunOutcome::NoResults {
            summary: summary_path,
        });
    }
    info!(frameworks = results.framework_count(), "found results");

    let table = ResultsTable::from_results(&results);
    info!(data_points = table.len(), "aggregated results");

    let winners = find_winners(&table);
    let charts = render_charts(&table, renderer, output_dir);

    info!("generating reports");
    let csv_path = output_dir.join(COMBINED_CSV_FILE);
    let json_path = output_dir.join(RAW_JSON_FILE);
    export_markdown(&table, &winners, &config.report, &summary_path)?;
    export_csv(&table, &csv_path)?;
    export_json(&results, &json_path)?;
    info!(output = %output_dir.display(), "reports saved");

    Ok(RunOutcome::Report(RunSummary {
        frameworks: results.framework_count(),
        data_points: table.len(),
        winners,
        charts,
        reports: vec![summary_path, csv_path, json_path],
    }))
}
