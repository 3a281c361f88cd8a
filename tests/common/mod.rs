use chrono::{Duration, TimeZone, Utc};
use teamdraft::{EventRecord, EventType, Team};

/// Route library logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("teamdraft=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn click(session: &str, query: &str, offset_secs: i64, team: Option<Team>) -> EventRecord {
    EventRecord {
        session_id: session.to_string(),
        query_id: Some(query.to_string()),
        timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(offset_secs),
        team,
        event_type: EventType::Click,
    }
}

pub fn view(session: &str, query: &str, offset_secs: i64) -> EventRecord {
    EventRecord {
        event_type: EventType::View,
        team: None,
        ..click(session, query, offset_secs, None)
    }
}

/// `n` sessions with exactly one click each, on the team picked by `team_of`.
pub fn one_click_sessions(n: usize, team_of: impl Fn(usize) -> Team) -> Vec<EventRecord> {
    (0..n)
        .map(|i| click(&format!("session-{i:03}"), "q1", 0, Some(team_of(i))))
        .collect()
}
