//! TOML-based clustering configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::cluster::kmeans::KMeans;
use crate::cluster::labels::LabelOrder;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults. Load from TOML with
/// [`ClusteringConfig::from_toml_file`] or use [`ClusteringConfig::defaults`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusteringConfig {
    /// Cluster counts, seed and output order.
    #[serde(default)]
    pub clustering: ClusterSection,
    /// Parameters of the k-means partitioner.
    #[serde(default)]
    pub kmeans: KMeansSection,
    /// Layout of the input CSV.
    #[serde(default)]
    pub input: InputConfig,
}

/// Cluster counts, seed and output order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterSection {
    /// Number of consumption (stage-1) groups (must be > 0).
    pub k_consumption: usize,
    /// Number of peak-time (stage-2) groups per consumption group (must be > 0).
    pub k_peaktime: usize,
    /// Master random seed.
    pub seed: u64,
    /// Output order: `"grouped"` or `"original"`.
    pub label_order: String,
}

impl Default for ClusterSection {
    fn default() -> Self {
        Self {
            k_consumption: 3,
            k_peaktime: 2,
            seed: 42,
            label_order: "grouped".to_string(),
        }
    }
}

/// Parameters of the k-means partitioner.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KMeansSection {
    /// Maximum Lloyd iterations per restart (must be > 0).
    pub max_iter: usize,
    /// Number of restarts (must be > 0).
    pub n_init: usize,
    /// Relative convergence tolerance (must be finite and >= 0).
    pub tol: f64,
}

impl Default for KMeansSection {
    fn default() -> Self {
        let km = KMeans::default();
        Self {
            max_iter: km.max_iter,
            n_init: km.n_init,
            tol: km.tol,
        }
    }
}

/// Layout of the input CSV.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Whether the first record is a header row.
    pub has_headers: bool,
    /// Whether the first column holds a load identifier instead of a reading.
    pub id_column: bool,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"clustering.k_consumption"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ClusteringConfig {
    /// Returns the built-in default configuration.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// The k-means partitioner described by the `[kmeans]` section.
    pub fn partitioner(&self) -> KMeans {
        let km = &self.kmeans;
        KMeans::new(km.max_iter, km.n_init, km.tol)
    }

    /// The configured label order, falling back to grouped for unknown names.
    ///
    /// Run [`validate`](Self::validate) first to reject unknown names.
    pub fn label_order(&self) -> LabelOrder {
        LabelOrder::from_name(&self.clustering.label_order).unwrap_or_default()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let c = &self.clustering;

        if c.k_consumption == 0 {
            errors.push(ConfigError {
                field: "clustering.k_consumption".into(),
                message: "must be > 0".into(),
            });
        }
        if c.k_peaktime == 0 {
            errors.push(ConfigError {
                field: "clustering.k_peaktime".into(),
                message: "must be > 0".into(),
            });
        }
        if LabelOrder::from_name(&c.label_order).is_none() {
            errors.push(ConfigError {
                field: "clustering.label_order".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    LabelOrder::NAMES.join(", "),
                    c.label_order
                ),
            });
        }

        let km = &self.kmeans;
        if km.max_iter == 0 {
            errors.push(ConfigError {
                field: "kmeans.max_iter".into(),
                message: "must be > 0".into(),
            });
        }
        if km.n_init == 0 {
            errors.push(ConfigError {
                field: "kmeans.n_init".into(),
                message: "must be > 0".into(),
            });
        }
        if !km.tol.is_finite() || km.tol < 0.0 {
            errors.push(ConfigError {
                field: "kmeans.tol".into(),
                message: "must be finite and >= 0".into(),
            });
        }

        errors
    }
}
