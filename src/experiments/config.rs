use serde::{Deserialize, Serialize};
use std::path::Path;

use rand::Rng;

use super::bootstrap::{BootstrapOptions, DEFAULT_ITERATIONS, DEFAULT_MIN_VALID_FRACTION};
use super::interleaving::{team_draft_interleave, InterleavedResult};
use crate::error::{Result, TeamDraftError};
use crate::types::AggregationMode;

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_page_size() -> usize {
    10
}

fn default_min_valid_fraction() -> f64 {
    DEFAULT_MIN_VALID_FRACTION
}

fn default_parallel() -> bool {
    true
}

/// Settings for interleaving pages and analysing their clicks.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentConfig {
    #[serde(default)]
    pub mode: AggregationMode,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Base seed for the bootstrap. `None` draws one per run; the drawn
    /// seed is reported so the run can be replayed.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_min_valid_fraction")]
    pub min_valid_fraction: f64,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            mode: AggregationMode::default(),
            iterations: default_iterations(),
            confidence_level: default_confidence_level(),
            page_size: default_page_size(),
            seed: None,
            min_valid_fraction: default_min_valid_fraction(),
            parallel: default_parallel(),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(TeamDraftError::InvalidInput(
                "iterations must be greater than 0".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(TeamDraftError::InvalidInput(format!(
                "confidenceLevel must be in (0.0, 1.0) exclusive, got {}",
                self.confidence_level
            )));
        }
        if self.page_size == 0 {
            return Err(TeamDraftError::InvalidInput(
                "pageSize must be greater than 0".to_string(),
            ));
        }
        if !(self.min_valid_fraction > 0.0 && self.min_valid_fraction <= 1.0) {
            return Err(TeamDraftError::Config(format!(
                "minValidFraction must be in (0.0, 1.0], got {}",
                self.min_valid_fraction
            )));
        }
        Ok(())
    }

    /// Read and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: ExperimentConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// The configured seed, or a fresh one from the thread RNG.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Interleave one query's ranked lists into a page of `page_size` results.
    pub fn interleave<S, R>(
        &self,
        list_a: &[S],
        list_b: &[S],
        rng: &mut R,
    ) -> Result<InterleavedResult>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        team_draft_interleave(list_a, list_b, self.page_size, rng)
    }

    pub fn bootstrap_options(&self, seed: u64) -> BootstrapOptions {
        BootstrapOptions {
            iterations: self.iterations,
            seed,
            min_valid_fraction: self.min_valid_fraction,
            parallel: self.parallel,
        }
    }
}
