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

//! Run configuration.
//!
//! The CLI builds an [`AggregateConfig`] from its arguments; library callers
//! and tests construct one directly.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Default maximum size of a single results file (1 GB).
/// Can be overridden via the `BENCHAGG_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`].
pub const MAX_FILE_SIZE_ENV: &str = "BENCHAGG_MAX_FILE_SIZE";

/// Options for the result loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// Results files larger than this are rejected before reading.
    pub max_file_size: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl LoadConfig {
    /// Reads `BENCHAGG_MAX_FILE_SIZE`, falling back to the default when the
    /// variable is unset or not a valid byte count.
    pub fn from_env() -> Self {
        let max_file_size = std::env::var(MAX_FILE_SIZE_ENV)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);
        Self { max_file_size }
    }
}

/// Informational values printed in the markdown header.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Number of benchmark runs per test, as passed by the CI job.
    pub benchmark_runs: String,
    /// Test duration in seconds, as passed by the CI job.
    pub test_duration: String,
    /// Timestamp printed as "Generated".
    pub generated_at: DateTime<Utc>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            benchmark_runs: "5".to_string(),
            test_duration: "30".to_string(),
            generated_at: Utc::now(),
        }
    }
}

/// Everything a single aggregation run needs.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Directory holding one subdirectory per benchmark artifact.
    pub input_dir: PathBuf,
    /// Directory receiving the summary, combined CSV, raw JSON and charts.
    pub output_dir: PathBuf,
    /// Markdown header values.
    pub report: ReportConfig,
    /// Loader limits.
    pub load: LoadConfig,
}

impl AggregateConfig {
    /// Creates a configuration with default report and loader settings.
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            report: ReportConfig::default(),
            load: LoadConfig::default(),
        }
    }

    /// Replaces the report settings.
    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    /// Replaces the loader settings.
    pub fn with_load(mut self, load: LoadConfig) -> Self {
        self.load = load;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.benchmark_runs, "5");
        assert_eq!(config.test_duration, "30");
    }

    #[test]
    fn test_builder_overrides() {
        let config = AggregateConfig::new("in", "out").with_load(LoadConfig { max_file_size: 10 });
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.load.max_file_size, 10);
    }
}
