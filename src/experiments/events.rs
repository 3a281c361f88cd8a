use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::stats::{self, GroupTally, PreferenceSummary};
use crate::error::{Result, TeamDraftError};
use crate::types::{AggregationMode, EventRecord, GroupKey, Team};

/// Click records keyed for one aggregation mode.
///
/// `keys[i]` and `teams[i]` describe click `i`. A `None` team is a click on a
/// result neither ranker drafted; its group is kept so that it counts as a
/// zero-click group (and as a resampling unit) without carrying signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickLog {
    mode: AggregationMode,
    keys: Vec<GroupKey>,
    teams: Vec<Option<Team>>,
}

impl ClickLog {
    /// Wrap caller-built aligned sequences.
    pub fn new(
        keys: Vec<GroupKey>,
        teams: Vec<Option<Team>>,
        mode: AggregationMode,
    ) -> Result<Self> {
        if keys.len() != teams.len() {
            return Err(TeamDraftError::InvalidInput(format!(
                "grouping keys ({}) and team labels ({}) must be aligned",
                keys.len(),
                teams.len()
            )));
        }
        Ok(Self { mode, keys, teams })
    }

    /// Build a click log from raw event rows.
    ///
    /// Only `click` events are kept. Rows must already be sorted by time
    /// within each group; the log is not re-sorted.
    ///
    /// # Errors
    ///
    /// [`TeamDraftError::InvalidInput`] when a per-search event has no query
    /// id, or when a group's clicks go backwards in time.
    pub fn from_events(events: &[EventRecord], mode: AggregationMode) -> Result<Self> {
        let mut keys = Vec::new();
        let mut teams = Vec::new();
        let mut last_seen: HashMap<GroupKey, DateTime<Utc>> = HashMap::new();
        let mut skipped = 0usize;

        for (row, event) in events.iter().enumerate() {
            if !event.is_click() {
                skipped += 1;
                continue;
            }
            let key = mode.group_key(event).ok_or_else(|| {
                TeamDraftError::InvalidInput(format!(
                    "event {row} (session {}) has no queryId, required in {mode} mode",
                    event.session_id
                ))
            })?;
            if let Some(prev) = last_seen.get(&key) {
                if event.timestamp < *prev {
                    return Err(TeamDraftError::InvalidInput(format!(
                        "events for {} {key} are not sorted by timestamp (row {row})",
                        mode.unit()
                    )));
                }
            }
            last_seen.insert(key.clone(), event.timestamp);
            keys.push(key);
            teams.push(event.team);
        }

        tracing::debug!(
            mode = %mode,
            clicks = keys.len(),
            groups = last_seen.len(),
            skipped,
            "built click log"
        );

        Ok(Self { mode, keys, teams })
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    pub fn teams(&self) -> &[Option<Team>] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Clicks that landed on a result owned by one of the teams.
    pub fn attributed_clicks(&self) -> usize {
        self.teams.iter().filter(|t| t.is_some()).count()
    }

    pub fn tally(&self) -> Result<IndexMap<GroupKey, GroupTally>> {
        stats::tally_groups(&self.keys, &self.teams)
    }

    pub fn summary(&self) -> Result<PreferenceSummary> {
        stats::preference_summary(&self.keys, &self.teams, self.mode)
    }

    pub fn preference(&self) -> Result<f64> {
        stats::preference(&self.keys, &self.teams, self.mode)
    }
}
