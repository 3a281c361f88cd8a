use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{InsufficientData, Result, TeamDraftError};
use crate::types::{AggregationMode, Team};

// ── Normal Survival Function (A&S 26.2.17 with Horner's method) ─────

/// Computes P(Z > z) for the standard normal distribution.
/// Uses Abramowitz & Stegun 26.2.17 rational approximation with Horner's method.
/// Caller must pass z >= 0 (use z.abs() before calling).
pub fn normal_sf(z: f64) -> f64 {
    debug_assert!(z >= 0.0, "normal_sf requires z >= 0, got {}", z);

    let t = 1.0 / (1.0 + 0.2316419 * z);
    let d = 0.3989422804014327; // 1/sqrt(2*pi)
    let p = d * (-z * z / 2.0).exp();

    let poly = t
        * (0.319381530
            + t * (-0.356563782 + t * (1.781477937 + t * (-1.821255978 + t * 1.330274429))));

    p * poly
}

// ── Per-group click tallies ─────────────────────────────────────────

/// Attributed clicks of one group (session or search).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTally {
    pub clicks_a: u32,
    pub clicks_b: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WinA,
    WinB,
    Tie,
}

impl GroupTally {
    /// Win/tie classification, or `None` for a group with no attributed
    /// clicks (no signal; excluded from every bucket).
    pub fn outcome(&self) -> Option<Outcome> {
        match self.clicks_a.cmp(&self.clicks_b) {
            std::cmp::Ordering::Greater => Some(Outcome::WinA),
            std::cmp::Ordering::Less => Some(Outcome::WinB),
            std::cmp::Ordering::Equal if self.clicks_a > 0 => Some(Outcome::Tie),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Group aligned click records by key and count attributed clicks per team.
///
/// Records with `None` team still register their group, which then tallies
/// as (0, 0). Groups keep first-seen order, so downstream resampling is
/// reproducible.
pub fn tally_groups<K>(keys: &[K], teams: &[Option<Team>]) -> Result<IndexMap<K, GroupTally>>
where
    K: Hash + Eq + Clone,
{
    if keys.len() != teams.len() {
        return Err(TeamDraftError::InvalidInput(format!(
            "grouping keys ({}) and team labels ({}) must be aligned",
            keys.len(),
            teams.len()
        )));
    }

    let mut by_group: IndexMap<K, GroupTally> = IndexMap::new();
    for (key, team) in keys.iter().zip(teams) {
        let entry = by_group.entry(key.clone()).or_default();
        match team {
            Some(Team::A) => entry.clicks_a += 1,
            Some(Team::B) => entry.clicks_b += 1,
            None => {}
        }
    }
    Ok(by_group)
}

// ── Win / tie accounting ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub wins_a: u64,
    pub wins_b: u64,
    pub ties: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Option<Outcome>) {
        match outcome {
            Some(Outcome::WinA) => self.wins_a += 1,
            Some(Outcome::WinB) => self.wins_b += 1,
            Some(Outcome::Tie) => self.ties += 1,
            None => {}
        }
    }

    pub fn informative(&self) -> u64 {
        self.wins_a + self.wins_b + self.ties
    }

    /// ΔAB = (wins_A + ties/2) / (wins_A + wins_B + ties) − 0.5.
    /// `None` when no group carried a click.
    pub fn delta_ab(&self) -> Option<f64> {
        let total = self.informative();
        if total == 0 {
            return None;
        }
        Some((self.wins_a as f64 + 0.5 * self.ties as f64) / total as f64 - 0.5)
    }
}

impl<'a> FromIterator<&'a GroupTally> for OutcomeCounts {
    fn from_iter<I: IntoIterator<Item = &'a GroupTally>>(iter: I) -> Self {
        let mut counts = OutcomeCounts::default();
        for tally in iter {
            counts.record(tally.outcome());
        }
        counts
    }
}

// ── Interleaving Preference Scoring ─────────────────────────────────

/// Result of interleaving preference analysis across groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSummary {
    /// ΔAB in [-0.5, 0.5]. Positive → A preferred; negative → B preferred.
    pub delta_ab: f64,
    pub wins_a: u64,
    pub wins_b: u64,
    pub ties: u64,
    /// Distinct groups seen, including groups without attributed clicks.
    pub groups: usize,
    /// Two-sided sign test p-value (binomial at p=0.5, ties excluded).
    pub p_value: f64,
}

/// Classify already-tallied groups and compute the preference summary.
pub fn summarize<K>(
    tallies: &IndexMap<K, GroupTally>,
    clicks: usize,
    mode: AggregationMode,
) -> Result<PreferenceSummary> {
    if clicks == 0 {
        return Err(InsufficientData::NoClickData.into());
    }
    let counts: OutcomeCounts = tallies.values().collect();
    let delta_ab = counts
        .delta_ab()
        .ok_or(InsufficientData::NoInformativeClicks { clicks })?;

    tracing::debug!(
        mode = %mode,
        groups = tallies.len(),
        wins_a = counts.wins_a,
        wins_b = counts.wins_b,
        ties = counts.ties,
        delta_ab,
        "computed {} preference",
        mode.unit()
    );

    Ok(PreferenceSummary {
        delta_ab,
        wins_a: counts.wins_a,
        wins_b: counts.wins_b,
        ties: counts.ties,
        groups: tallies.len(),
        p_value: sign_test_p_value(counts.wins_a, counts.wins_b),
    })
}

/// Preference summary straight from aligned click records.
pub fn preference_summary<K>(
    keys: &[K],
    teams: &[Option<Team>],
    mode: AggregationMode,
) -> Result<PreferenceSummary>
where
    K: Hash + Eq + Clone,
{
    let tallies = tally_groups(keys, teams)?;
    summarize(&tallies, keys.len(), mode)
}

/// Signed preference statistic ΔAB for aligned click records.
///
/// `keys[i]` is the grouping key of click `i` (a session id, or a
/// (session, query) pair in per-search mode) and `teams[i]` the team that
/// owns the clicked result. The estimator only aggregates by key value;
/// `mode` names the grouping unit in diagnostics.
///
/// # Errors
///
/// - [`TeamDraftError::InvalidInput`] if the sequences differ in length.
/// - [`InsufficientData::NoClickData`] if there are no records.
/// - [`InsufficientData::NoInformativeClicks`] if no group has an
///   attributed click.
pub fn preference<K>(keys: &[K], teams: &[Option<Team>], mode: AggregationMode) -> Result<f64>
where
    K: Hash + Eq + Clone,
{
    preference_summary(keys, teams, mode).map(|s| s.delta_ab)
}

/// Two-sided sign test p-value (binomial at p=0.5).
///
/// n = wins_a + wins_b (ties excluded). Uses normal approximation
/// when n > 20; returns 1.0 when n == 0.
pub fn sign_test_p_value(wins_a: u64, wins_b: u64) -> f64 {
    let n = wins_a + wins_b;
    if n == 0 {
        return 1.0;
    }
    let n_f = n as f64;

    if n > 20 {
        let z = ((wins_a as f64) - n_f / 2.0).abs() / (n_f / 4.0).sqrt();
        (2.0 * normal_sf(z)).min(1.0)
    } else {
        // Exact: p = 2 * P(X ≤ min(wins)) where X ~ Binomial(n, 0.5), capped at 1.0
        let k = wins_a.min(wins_b);
        let p_n = 0.5_f64.powi(n as i32);
        let mut cdf = 0.0;
        let mut binom_coeff: f64 = 1.0;
        for i in 0..=k {
            cdf += binom_coeff * p_n;
            binom_coeff *= (n - i) as f64 / (i + 1) as f64;
        }
        (2.0 * cdf).min(1.0)
    }
}
