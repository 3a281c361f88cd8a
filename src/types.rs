use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result identifier — an opaque id produced by one of the rankers.
pub type DocumentId = String;
/// Session identifier as it appears in the click log.
pub type SessionId = String;

/// The two rankers under comparison.
///
/// Serialized as `"A"` / `"B"`; the analytics-style `"control"` / `"variant"`
/// spellings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "A", alias = "a", alias = "control")]
    A,
    #[serde(rename = "B", alias = "b", alias = "variant")]
    B,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => f.write_str("A"),
            Team::B => f.write_str("B"),
        }
    }
}

/// How click records are grouped into win/tie units (and bootstrap
/// resampling units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationMode {
    /// One group per session id, across every query in the session.
    #[default]
    PerSession,
    /// One group per (session id, query id) pair.
    PerSearch,
}

impl AggregationMode {
    /// Human-readable name of the grouping unit, used in log lines.
    pub fn unit(self) -> &'static str {
        match self {
            AggregationMode::PerSession => "session",
            AggregationMode::PerSearch => "search",
        }
    }

    /// Build the grouping key for an event under this mode.
    ///
    /// Returns `None` in per-search mode when the event carries no query id.
    pub fn group_key(self, event: &EventRecord) -> Option<GroupKey> {
        match self {
            AggregationMode::PerSession => Some(GroupKey::Session(event.session_id.clone())),
            AggregationMode::PerSearch => event.query_id.as_ref().map(|q| GroupKey::Search {
                session_id: event.session_id.clone(),
                query_id: q.clone(),
            }),
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::PerSession => f.write_str("per_session"),
            AggregationMode::PerSearch => f.write_str("per_search"),
        }
    }
}

/// Grouping key: the unit of win/tie classification and of resampling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKey {
    Session(SessionId),
    #[serde(rename_all = "camelCase")]
    Search {
        session_id: SessionId,
        query_id: String,
    },
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Session(s) => write!(f, "{s}"),
            GroupKey::Search {
                session_id,
                query_id,
            } => write!(f, "{session_id}:{query_id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Click,
    Conversion,
    View,
    #[serde(other)]
    Other,
}

/// One row of the observed event log.
///
/// `team` is the ranker that drafted the interacted result, or `None` when
/// the result was not part of the interleaved page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub session_id: SessionId,
    #[serde(default)]
    pub query_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub team: Option<Team>,
    pub event_type: EventType,
}

impl EventRecord {
    pub fn is_click(&self) -> bool {
        self.event_type == EventType::Click
    }
}
