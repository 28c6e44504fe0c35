//! Configuration for implore-facts
//!
//! Scoring thresholds and weights for every calculator. Defaults reproduce
//! the reference behaviour; a TOML file may override any subset of keys.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FactError, FactResult};

/// Engine-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactConfig {
    /// Comparison scoring and formatting
    pub compare: CompareConfig,
    /// Combined trend scoring
    pub combine: CombineConfig,
    /// Merged trend scoring
    pub merge: MergeConfig,
    /// Output ranking
    pub ranking: RankingConfig,
    /// Clamp aggregate-min and merge scores into [0, 1]
    pub clamp_scores: bool,
}

impl Default for FactConfig {
    fn default() -> Self {
        Self {
            compare: CompareConfig::default(),
            combine: CombineConfig::default(),
            merge: MergeConfig::default(),
            ranking: RankingConfig::default(),
            clamp_scores: false,
        }
    }
}

impl FactConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> FactResult<Self> {
        let config: FactConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> FactResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FactError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> FactResult<()> {
        let thresholds = [
            ("compare.min_score", self.compare.min_score),
            ("combine.min_score", self.combine.min_score),
            ("merge.min_score", self.merge.min_score),
            ("compare.max_min_damping", self.compare.max_min_damping),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(FactError::InvalidConfig(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if !(self.compare.multiplier_lower > 0.0
            && self.compare.multiplier_lower < 1.0
            && self.compare.multiplier_upper > 1.0)
        {
            return Err(FactError::InvalidConfig(format!(
                "multiplier bounds must satisfy 0 < lower < 1 < upper, got {} and {}",
                self.compare.multiplier_lower, self.compare.multiplier_upper
            )));
        }
        if self.merge.max_group_size < 2 {
            return Err(FactError::InvalidConfig(format!(
                "merge.max_group_size must be at least 2, got {}",
                self.merge.max_group_size
            )));
        }
        if self.compare.similar_epsilon < 0.0 {
            return Err(FactError::InvalidConfig(
                "compare.similar_epsilon must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Comparison fact configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Facts scoring below this are dropped
    pub min_score: f64,
    /// Multiplier applied to max-vs-min comparisons
    pub max_min_damping: f64,
    /// Absolute difference below which two values are "similar"
    pub similar_epsilon: f64,
    /// Ratios at or above this are phrased as a multiplier
    pub multiplier_upper: f64,
    /// Ratios at or below this are phrased as a multiplier
    pub multiplier_lower: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            max_min_damping: 0.7,
            similar_epsilon: 1e-6,
            multiplier_upper: 1.5,
            multiplier_lower: 2.0 / 3.0,
        }
    }
}

/// Combined trend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    pub min_score: f64,
    /// Weight of the stronger trend's score
    pub max_weight: f64,
    /// Constant floor added to every combined score
    pub base: f64,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            max_weight: 0.4,
            base: 0.6,
        }
    }
}

/// Merged trend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub min_score: f64,
    /// Weight of the strongest member trend score
    pub base_weight: f64,
    /// Weight of the share of series covered by the merge
    pub coverage_weight: f64,
    /// Most trends of one pattern whose subsets are enumerated; larger
    /// groups keep their highest scoring members
    pub max_group_size: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            base_weight: 0.7,
            coverage_weight: 0.3,
            max_group_size: 10,
        }
    }
}

/// Ranking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Number of facts handed to text conversion
    pub top_k: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FactConfig::default();
        assert_eq!(config.compare.min_score, 0.5);
        assert_eq!(config.compare.max_min_damping, 0.7);
        assert_eq!(config.ranking.top_k, 5);
        assert!(!config.clamp_scores);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FactConfig::from_toml_str(
            r#"
            clamp_scores = true

            [ranking]
            top_k = 3

            [merge]
            min_score = 0.6
            "#,
        )
        .unwrap();

        assert!(config.clamp_scores);
        assert_eq!(config.ranking.top_k, 3);
        assert_eq!(config.merge.min_score, 0.6);
        assert_eq!(config.merge.base_weight, 0.7);
        assert_eq!(config.merge.max_group_size, 10);
        assert_eq!(config.compare, CompareConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = FactConfig::from_toml_str("[ranking\ntop_k = 3");
        assert!(matches!(result, Err(FactError::Config(_))));
    }

    #[test]
    fn test_out_of_range_threshold() {
        let result = FactConfig::from_toml_str("[compare]\nmin_score = 1.5\n");
        assert!(matches!(result, Err(FactError::InvalidConfig(_))));

        let result = FactConfig::from_toml_str("[compare]\nmultiplier_upper = 0.9\n");
        assert!(matches!(result, Err(FactError::InvalidConfig(_))));

        let result = FactConfig::from_toml_str("[merge]\nmax_group_size = 1\n");
        assert!(matches!(result, Err(FactError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[combine]\nmin_score = 0.7").unwrap();

        let config = FactConfig::load(file.path()).unwrap();
        assert_eq!(config.combine.min_score, 0.7);
    }

    #[test]
    fn test_load_missing_file() {
        let result = FactConfig::load("/nonexistent/facts.toml");
        assert!(matches!(result, Err(FactError::ReadFailed { .. })));
    }
}
