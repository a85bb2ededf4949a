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

//! Artifact directory name decoding.
//!
//! Benchmark jobs upload their output as `results-<os>-<framework>-<test_type>`.
//! OS names with a version (`ubuntu-22.04`, `windows-2022`) arrive split over
//! two segments and are stitched back together here.

use serde::{Deserialize, Serialize};

/// Prefix every artifact directory starts with.
pub const ARTIFACT_PREFIX: &str = "results-";

/// Segment delimiter inside an artifact name.
pub const ARTIFACT_DELIMITER: char = '-';

/// Identity of one benchmark artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Operating system, including its version when present.
    pub os: String,
    /// Framework under test.
    pub framework: String,
    /// Scenario label such as `low_normal`.
    pub test_type: String,
}

impl ArtifactMeta {
    /// Creates artifact metadata.
    pub fn new(
        os: impl Into<String>,
        framework: impl Into<String>,
        test_type: impl Into<String>,
    ) -> Self {
        Self {
            os: os.into(),
            framework: framework.into(),
            test_type: test_type.into(),
        }
    }

    /// Rebuilds the directory name this metadata was decoded from.
    pub fn artifact_name(&self) -> String {
        format!(
            "{ARTIFACT_PREFIX}{}{ARTIFACT_DELIMITER}{}{ARTIFACT_DELIMITER}{}",
            self.os, self.framework, self.test_type
        )
    }
}

/// Decodes an artifact directory name.
///
/// Returns `None` when the name lacks the `results-` prefix or has fewer
/// than three segments after the prefix.
///
/// # Examples
///
/// ```
/// use benchagg_core::parse_artifact_name;
///
/// let meta = parse_artifact_name("results-ubuntu-22.04-coroute-low_normal").unwrap();
/// assert_eq!(meta.os, "ubuntu-22.04");
/// assert_eq!(meta.framework, "coroute");
/// assert_eq!(meta.test_type, "low_normal");
///
/// assert!(parse_artifact_name("logs-ubuntu-coroute-low_normal").is_none());
/// ```
pub fn parse_artifact_name(name: &str) -> Option<ArtifactMeta> {
    let rest = name.strip_prefix(ARTIFACT_PREFIX)?;
    let mut parts: Vec<&str> = rest.split(ARTIFACT_DELIMITER).collect();
    if parts.len() < 3 {
        return None;
    }

    let os = if parts.len() > 3 && is_version_segment(parts[1]) {
        let joined = format!("{}{ARTIFACT_DELIMITER}{}", parts[0], parts[1]);
        parts.drain(..2);
        joined
    } else {
        parts.remove(0).to_string()
    };

    if parts.len() < 2 {
        return None;
    }

    let framework = parts[0].to_string();
    let test_type = parts[1..].join(&ARTIFACT_DELIMITER.to_string());

    Some(ArtifactMeta {
        os,
        framework,
        test_type,
    })
}

/// `22.04`, `2022` and `11` are versions; `coroute` and `` are not.
fn is_version_segment(segment: &str) -> bool {
    let digits: String = segment.chars().filter(|&c| c != '.').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_os_version() {
        let meta = parse_artifact_name("results-ubuntu-22.04-coroute-low_normal").unwrap();
        assert_eq!(meta, ArtifactMeta::new("ubuntu-22.04", "coroute", "low_normal"));
    }

    #[test]
    fn test_numeric_os_version() {
        let meta = parse_artifact_name("results-windows-2022-drogon-high_stressed").unwrap();
        assert_eq!(meta, ArtifactMeta::new("windows-2022", "drogon", "high_stressed"));
    }

    #[test]
    fn test_plain_os() {
        let meta = parse_artifact_name("results-macos-axum-profile").unwrap();
        assert_eq!(meta, ArtifactMeta::new("macos", "axum", "profile"));
    }

    #[test]
    fn test_multi_segment_test_type() {
        let meta = parse_artifact_name("results-ubuntu-22.04-coroute-low-normal").unwrap();
        assert_eq!(meta.os, "ubuntu-22.04");
        assert_eq!(meta.test_type, "low-normal");
    }

    #[test]
    fn test_three_segments_never_merge() {
        // Only three segments: the numeric one is the framework.
        let meta = parse_artifact_name("results-ubuntu-22-low_normal").unwrap();
        assert_eq!(meta, ArtifactMeta::new("ubuntu", "22", "low_normal"));
    }

    #[test]
    fn test_missing_prefix() {
        assert!(parse_artifact_name("ubuntu-22.04-coroute-low_normal").is_none());
        assert!(parse_artifact_name("result-ubuntu-coroute-low_normal").is_none());
        assert!(parse_artifact_name("").is_none());
    }

    #[test]
    fn test_too_few_segments() {
        assert!(parse_artifact_name("results-").is_none());
        assert!(parse_artifact_name("results-ubuntu").is_none());
        assert!(parse_artifact_name("results-ubuntu-coroute").is_none());
    }

    #[test]
    fn test_empty_version_segment_is_not_numeric() {
        let meta = parse_artifact_name("results-ubuntu--coroute-low").unwrap();
        assert_eq!(meta.os, "ubuntu");
        assert_eq!(meta.framework, "");
        assert_eq!(meta.test_type, "coroute-low");
    }

    #[test]
    fn test_artifact_name_round_trip() {
        let meta = ArtifactMeta::new("ubuntu-22.04", "x", "low_normal");
        assert_eq!(meta.artifact_name(), "results-ubuntu-22.04-x-low_normal");
        assert_eq!(parse_artifact_name(&meta.artifact_name()), Some(meta));
    }
}
