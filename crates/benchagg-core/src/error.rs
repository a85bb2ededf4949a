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

//! Structured error types for benchmark aggregation.
//!
//! Every fallible pipeline stage returns [`Result<T>`]. Chart rendering is the
//! one exception: its failures are reported through
//! [`ChartError`](crate::chart::ChartError) and never abort a run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggError>;

/// The main error type for aggregation operations.
///
/// # Examples
///
/// ```rust,no_run
/// use benchagg_core::AggError;
///
/// fn read(path: &str) -> Result<String, AggError> {
///     std::fs::read_to_string(path).map_err(|e| AggError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum AggError {
    /// I/O operation failed (directory listing, file read or write).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A results file could not be read or written as CSV.
    #[error("CSV error for '{path}': {message}")]
    Csv {
        /// The CSV file path
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// JSON serialization failed.
    #[error("JSON error: {message}")]
    Json {
        /// The error message
        message: String,
    },

    /// A results file exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The offending file
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// Invalid input provided by the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AggError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a CSV error with path context.
    pub fn csv_error(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benchagg_core::AggError;
    ///
    /// let err = AggError::file_too_large("results.csv", 3_000_000, 1024 * 1024);
    /// assert!(err.to_string().contains("1 MB"));
    /// ```
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for AggError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            message: source.to_string(),
        }
    }
}
