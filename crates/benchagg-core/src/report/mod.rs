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

//! Report writers.
//!
//! - `markdown`: the human-readable summary (`summary.md`)
//! - `csv_table`: the flat results table (`combined_results.csv`)
//! - `json`: the raw loaded rows (`raw_results.json`)
//! - `format`: number formatting shared by the writers

pub mod csv_table;
pub mod format;
pub mod json;
pub mod markdown;

pub use csv_table::{export_csv, load_combined_csv};
pub use format::format_thousands;
pub use json::export_json;
pub use markdown::{export_empty_summary, export_markdown, render_markdown, EMPTY_SUMMARY};

pub const SUMMARY_FILE: &str = "summary.md";
pub const COMBINED_CSV_FILE: &str = "combined_results.csv";
pub const RAW_JSON_FILE: &str = "raw_results.json";
