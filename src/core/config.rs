use crate::core::index::{IndexRecord, PeriodReturns, ReferenceTable, ReturnBasis};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// An index record supplied in the config file, added to or replacing a
/// built-in record of the same name.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CustomIndex {
    pub name: String,
    pub capm: f64,
    pub probability_up: f64,
    pub three_months: Option<f64>,
    pub six_months: Option<f64>,
    pub one_year: Option<f64>,
}

impl CustomIndex {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Custom index name must not be empty");
        }
        if !(0.0..=1.0).contains(&self.probability_up) {
            anyhow::bail!(
                "Custom index {}: probability_up must be within [0, 1], got {}",
                self.name,
                self.probability_up
            );
        }
        let returns = [
            Some(self.capm),
            self.three_months,
            self.six_months,
            self.one_year,
        ];
        if returns.iter().flatten().any(|r| !r.is_finite()) {
            anyhow::bail!("Custom index {}: returns must be finite", self.name);
        }
        Ok(())
    }

    fn to_record(&self) -> IndexRecord {
        let period_returns = match (self.three_months, self.six_months, self.one_year) {
            (Some(three_months), Some(six_months), Some(one_year)) => Some(PeriodReturns {
                three_months,
                six_months,
                one_year,
            }),
            _ => None,
        };
        IndexRecord {
            name: self.name.clone(),
            capm: self.capm,
            probability_up: self.probability_up,
            period_returns,
        }
    }
}

fn default_selection() -> Vec<String> {
    vec!["S&P 500".to_string(), "NIKKEI 225".to_string()]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_selection")]
    pub default_selection: Vec<String>,
    #[serde(default)]
    pub basis: ReturnBasis,
    #[serde(default)]
    pub indices: Vec<CustomIndex>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_selection: default_selection(),
            basis: ReturnBasis::default(),
            indices: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or built-in defaults when
    /// no config file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "capmatic", "capmatic")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        for index in &config.indices {
            index.validate()?;
        }
        Ok(config)
    }

    /// Built-in reference table extended with the configured custom indices.
    pub fn reference_table(&self) -> ReferenceTable {
        ReferenceTable::builtin().extended(self.indices.iter().map(CustomIndex::to_record))
    }
}
