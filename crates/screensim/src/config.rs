//! Run configuration
//!
//! A run is described by a YAML file (all fields optional) and then
//! adjusted by command-line flags. Example:
//!
//! ```yaml
//! strategies: [hpv, cytology, dual]
//! population_size: 2000
//! horizon: 80
//! cohorts: 50
//! probabilistic: true
//! alpha: 0.05
//! survival_step: 10
//! ```

use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, bail};
use serde::{Deserialize, Serialize};

use screensim_core::config::SimulationConfig;
use screensim_core::screening::Strategy;

fn default_strategies() -> Vec<Strategy> {
    Strategy::ALL.to_vec()
}

fn default_population_size() -> usize {
    SimulationConfig::default().population_size
}

fn default_horizon() -> f64 {
    SimulationConfig::default().horizon
}

fn default_cohorts() -> u32 {
    1
}

fn default_alpha() -> f64 {
    0.05
}

fn default_survival_step() -> f64 {
    10.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Strategies to simulate; the first one is the comparison baseline
    #[serde(default = "default_strategies")]
    pub strategies: Vec<Strategy>,

    /// Individuals per cohort
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Observation horizon in years
    #[serde(default = "default_horizon")]
    pub horizon: f64,

    /// Cohorts per strategy; more than one reports across-cohort
    /// prediction intervals
    #[serde(default = "default_cohorts")]
    pub cohorts: u32,

    /// Re-sample costs for every cohort instead of using the base case
    #[serde(default)]
    pub probabilistic: bool,

    /// Significance level of every reported interval
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Spacing in years of the survival table rows
    #[serde(default = "default_survival_step")]
    pub survival_step: f64,

    /// Also write a JSON summary here
    #[serde(default)]
    pub json_out: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            population_size: default_population_size(),
            horizon: default_horizon(),
            cohorts: default_cohorts(),
            probabilistic: false,
            alpha: default_alpha(),
            survival_step: default_survival_step(),
            json_out: None,
        }
    }
}

impl RunConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Population size and horizon shared by every cohort
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig::new(self.population_size, self.horizon)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading run config {}", path.display()))?;
        Self::from_yaml(&yaml).wrap_err_with(|| format!("parsing run config {}", path.display()))
    }

    /// Checks not covered by the engine's own validation
    pub fn validate(&self) -> color_eyre::Result<()> {
        if self.strategies.is_empty() {
            bail!("no strategies selected");
        }
        if let Some((i, dup)) = self
            .strategies
            .iter()
            .enumerate()
            .find(|&(i, s)| self.strategies[..i].contains(s))
        {
            bail!("strategy '{}' listed twice (position {})", dup.key(), i + 1);
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            bail!("alpha must be between 0 and 1, got {}", self.alpha);
        }
        if !(self.survival_step.is_finite() && self.survival_step > 0.0) {
            bail!(
                "survival_step must be positive, got {}",
                self.survival_step
            );
        }
        self.simulation()
            .validate()
            .wrap_err("invalid simulation settings")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = RunConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.population_size, 1000);
        assert_eq!(config.horizon, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "\
strategies: [dual, hpv]
population_size: 250
horizon: 40
cohorts: 8
probabilistic: true
alpha: 0.1
survival_step: 5
json_out: out/summary.json
";
        let config = RunConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.strategies, vec![Strategy::Dual, Strategy::Hpv]);
        assert_eq!(config.simulation(), SimulationConfig::new(250, 40.0));
        assert_eq!(config.cohorts, 8);
        assert!(config.probabilistic);
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.survival_step, 5.0);
        assert_eq!(config.json_out, Some(PathBuf::from("out/summary.json")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        fs::write(&path, "strategies: [cytology]\nhorizon: 25\n").unwrap();

        let config = RunConfig::load(&path).unwrap();
        assert_eq!(config.strategies, vec![Strategy::Cytology]);
        assert_eq!(config.horizon, 25.0);
        assert_eq!(config.population_size, 1000);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = RunConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("reading run config"));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        assert!(RunConfig::from_yaml("strategies: [mri]\n").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_runs() {
        let mut config = RunConfig {
            strategies: vec![Strategy::Hpv, Strategy::Hpv],
            ..RunConfig::default()
        };
        assert!(config.validate().is_err());

        config.strategies = vec![Strategy::Hpv];
        config.alpha = 1.5;
        assert!(config.validate().is_err());

        config.alpha = 0.05;
        config.horizon = 0.0;
        assert!(config.validate().is_err());

        config.horizon = 10.0;
        assert!(config.validate().is_ok());
    }
}
