use std::hash::Hash;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use super::stats::{self, Outcome, OutcomeCounts};
use crate::error::{InsufficientData, Result, TeamDraftError};
use crate::types::{AggregationMode, Team};

pub const DEFAULT_ITERATIONS: usize = 2000;
pub const DEFAULT_MIN_VALID_FRACTION: f64 = 0.5;

/// Knobs for one bootstrap run.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapOptions {
    pub iterations: usize,
    /// Iteration `i` draws from `StdRng::seed_from_u64(seed + i)`.
    pub seed: u64,
    /// Fraction of iterations that must yield an estimate, in (0, 1].
    pub min_valid_fraction: f64,
    /// Spread iterations over the rayon pool. Results are identical either way.
    pub parallel: bool,
}

impl BootstrapOptions {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed,
            min_valid_fraction: DEFAULT_MIN_VALID_FRACTION,
            parallel: true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(TeamDraftError::InvalidInput(
                "iterations must be greater than 0".to_string(),
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

    /// Smallest number of informative iterations accepted:
    /// `ceil(iterations · min_valid_fraction)`, at least 1.
    pub fn minimum_valid(&self) -> usize {
        // 0.07 * 100 is 7.000000000000001 in f64; shave the rounding noise
        // so an exact product does not ceil one too high.
        let exact = self.iterations as f64 * self.min_valid_fraction;
        ((exact - 1e-9).ceil() as usize).max(1)
    }
}

/// Bootstrap distribution of ΔAB.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapSample {
    /// One value per informative iteration, in iteration order.
    pub values: Vec<f64>,
    pub requested: usize,
    /// Iterations whose resample held no informative group.
    pub dropped: usize,
    pub seed: u64,
}

impl BootstrapSample {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    pub fn median(&self) -> Option<f64> {
        percentile(&self.sorted(), 0.5)
    }

    pub fn confidence_interval(&self, level: f64) -> Result<ConfidenceInterval> {
        confidence_interval(&self.values, level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
    pub level: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Resample grouping keys with replacement and recompute ΔAB per resample.
///
/// The resampling unit is the group: each iteration draws `n` of the `n`
/// distinct keys uniformly with replacement, and a key drawn twice
/// contributes its whole group twice. Iterations whose resample holds no
/// informative group are dropped and counted in
/// [`BootstrapSample::dropped`].
///
/// # Errors
///
/// - [`TeamDraftError::InvalidInput`] for zero iterations or misaligned
///   sequences.
/// - [`InsufficientData::NoClickData`] for an empty click log.
/// - [`InsufficientData::NoInformativeClicks`] when no group has an
///   attributed click, so no resample could be informative.
/// - [`InsufficientData::TooFewResamples`] when fewer than
///   [`BootstrapOptions::minimum_valid`] iterations were informative.
pub fn bootstrap<K>(
    keys: &[K],
    teams: &[Option<Team>],
    mode: AggregationMode,
    options: &BootstrapOptions,
) -> Result<BootstrapSample>
where
    K: Hash + Eq + Clone,
{
    options.validate()?;
    let tallies = stats::tally_groups(keys, teams)?;
    if tallies.is_empty() {
        return Err(InsufficientData::NoClickData.into());
    }
    let outcomes: Vec<Option<Outcome>> = tallies.values().map(|t| t.outcome()).collect();
    if outcomes.iter().all(Option::is_none) {
        return Err(InsufficientData::NoInformativeClicks { clicks: keys.len() }.into());
    }

    let run = |i: usize| resample_delta(&outcomes, options.seed.wrapping_add(i as u64));
    let draws: Vec<Option<f64>> = if options.parallel {
        (0..options.iterations).into_par_iter().map(run).collect()
    } else {
        (0..options.iterations).map(run).collect()
    };

    let values: Vec<f64> = draws.into_iter().flatten().collect();
    let dropped = options.iterations - values.len();
    let minimum = options.minimum_valid();

    if values.len() < minimum {
        return Err(InsufficientData::TooFewResamples {
            kept: values.len(),
            requested: options.iterations,
            minimum,
        }
        .into());
    }
    if dropped > 0 {
        tracing::warn!(
            mode = %mode,
            dropped,
            requested = options.iterations,
            "dropped {dropped} bootstrap resamples without any informative {}",
            mode.unit()
        );
    }
    tracing::debug!(
        mode = %mode,
        groups = outcomes.len(),
        iterations = options.iterations,
        kept = values.len(),
        seed = options.seed,
        "bootstrap complete"
    );

    Ok(BootstrapSample {
        values,
        requested: options.iterations,
        dropped,
        seed: options.seed,
    })
}

/// One bootstrap iteration over pre-classified groups.
fn resample_delta(outcomes: &[Option<Outcome>], seed: u64) -> Option<f64> {
    let n = outcomes.len();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = OutcomeCounts::default();
    for _ in 0..n {
        counts.record(outcomes[rng.gen_range(0..n)]);
    }
    counts.delta_ab()
}

/// Percentile of an ascending slice, interpolating linearly between order
/// statistics at rank `p · (n − 1)`. `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Percentile-method interval: the (1 − level)/2 and 1 − (1 − level)/2
/// percentiles of `values`.
pub fn confidence_interval(values: &[f64], level: f64) -> Result<ConfidenceInterval> {
    if !(level > 0.0 && level < 1.0) {
        return Err(TeamDraftError::InvalidInput(format!(
            "confidence level must be in (0.0, 1.0) exclusive, got {level}"
        )));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let tail = (1.0 - level) / 2.0;
    match (percentile(&sorted, tail), percentile(&sorted, 1.0 - tail)) {
        (Some(low), Some(high)) => Ok(ConfidenceInterval { low, high, level }),
        _ => Err(TeamDraftError::InvalidInput(
            "cannot compute a confidence interval from an empty sample".to_string(),
        )),
    }
}

/// Bootstrap and reduce straight to an interval.
pub fn bootstrap_confidence_interval<K>(
    keys: &[K],
    teams: &[Option<Team>],
    mode: AggregationMode,
    options: &BootstrapOptions,
    level: f64,
) -> Result<ConfidenceInterval>
where
    K: Hash + Eq + Clone,
{
    // Reject a bad level before spending the iterations.
    confidence_interval(&[0.0], level)?;
    bootstrap(keys, teams, mode, options)?.confidence_interval(level)
}
