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

//! Benchmark result aggregation.
//!
//! Benchmark CI jobs upload one artifact directory per (OS, framework, test
//! type) combination, each holding a `results.csv`. This crate merges them
//! into a single report set:
//!
//! - `summary.md`: winners per test type plus per-OS detail tables
//! - `combined_results.csv`: every row in one flat table
//! - `raw_results.json`: the rows as loaded, grouped by framework
//! - `throughput.png`, `latency.png`, `memory.png`, `stressed.png` when
//!   chart rendering is available
//!
//! # Pipeline
//!
//! ```text
//! artifact names ──► parse_artifact_name ─┐
//!                                         ├─► ResultsTable ─┬─► find_winners ─┐
//! results.csv    ──► load_all_results ────┘                 ├─► render_charts ┼─► reports
//!                                                           └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use benchagg_core::{run, select_renderer, AggregateConfig, RunOutcome};
//!
//! # fn main() -> Result<(), benchagg_core::AggError> {
//! let config = AggregateConfig::new("all-results", "final-report");
//! let renderer = select_renderer(true);
//!
//! match run(&config, renderer.as_ref())? {
//!     RunOutcome::NoResults { .. } => println!("nothing to report"),
//!     RunOutcome::Report(summary) => println!("{} data points", summary.data_points),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `charts` (default): PNG charts through plotters. Without it every chart
//!   is skipped.
//! - `chart-fonts`: draw chart titles, axis labels and legends with system
//!   fonts. Without it charts show bars and grid only.

pub mod artifact;
pub mod chart;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod winners;

pub use artifact::{parse_artifact_name, ArtifactMeta};
pub use chart::{render_charts, select_renderer, ChartRenderer, ChartSpec, NoopRenderer};
pub use config::{AggregateConfig, LoadConfig, ReportConfig};
pub use error::{AggError, Result};
pub use loader::{
    find_results_csv, load_all_results, load_results_csv, read_results, FieldValue, RawResults,
    ResultRow,
};
pub use pipeline::{run, RunOutcome, RunSummary};
pub use table::{Metric, Pivot, ResultsTable, TableRow};
pub use winners::{find_winners, CategoryWinners, WinnersMap};

#[cfg(feature = "charts")]
pub use chart::PlottersRenderer;
