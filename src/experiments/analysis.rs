use serde::Serialize;

use super::bootstrap::{self, BootstrapSample, ConfidenceInterval};
use super::config::ExperimentConfig;
use super::events::ClickLog;
use super::stats::PreferenceSummary;
use crate::error::Result;
use crate::types::{AggregationMode, EventRecord};

/// Point estimate, interval and raw bootstrap distribution for one
/// experiment's click log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterleavingReport {
    pub mode: AggregationMode,
    pub clicks: usize,
    pub attributed_clicks: usize,
    pub preference: PreferenceSummary,
    pub interval: ConfidenceInterval,
    /// Kept whole so an external renderer can plot the distribution.
    pub bootstrap: BootstrapSample,
}

impl InterleavingReport {
    /// True when the interval excludes zero, i.e. one ranker is preferred.
    pub fn has_preference(&self) -> bool {
        !self.interval.contains(0.0)
    }
}

/// Analyse raw event rows under `config`.
///
/// # Errors
///
/// Config and event validation fail with `InvalidInput`/`Config`; a log
/// without any click, or without any attributed click, fails with the
/// matching `InsufficientData` reason.
pub fn analyze(events: &[EventRecord], config: &ExperimentConfig) -> Result<InterleavingReport> {
    config.validate()?;
    let log = ClickLog::from_events(events, config.mode)?;
    analyze_click_log(&log, config)
}

/// Analyse an already-keyed click log. The log's own mode wins over
/// `config.mode`.
pub fn analyze_click_log(log: &ClickLog, config: &ExperimentConfig) -> Result<InterleavingReport> {
    config.validate()?;
    let mode = log.mode();
    let preference = log.summary()?;

    let seed = config.resolve_seed();
    let sample = bootstrap::bootstrap(
        log.keys(),
        log.teams(),
        mode,
        &config.bootstrap_options(seed),
    )?;
    let interval = sample.confidence_interval(config.confidence_level)?;

    tracing::info!(
        mode = %mode,
        groups = preference.groups,
        delta_ab = preference.delta_ab,
        low = interval.low,
        high = interval.high,
        level = interval.level,
        seed,
        "interleaving preference: ΔAB={:.4} [{:.4}, {:.4}]",
        preference.delta_ab,
        interval.low,
        interval.high
    );

    Ok(InterleavingReport {
        mode,
        clicks: log.len(),
        attributed_clicks: log.attributed_clicks(),
        preference,
        interval,
        bootstrap: sample,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InsufficientData, TeamDraftError};
    use crate::types::{EventType, Team};
    use chrono::{TimeZone, Utc};

    fn click(session: &str, team: Option<Team>) -> EventRecord {
        EventRecord {
            session_id: session.to_string(),
            query_id: Some("q".to_string()),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            team,
            event_type: EventType::Click,
        }
    }

    fn config(iterations: usize) -> ExperimentConfig {
        ExperimentConfig {
            iterations,
            seed: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn report_carries_point_estimate_and_interval() {
        let mut events: Vec<EventRecord> =
            (0..30).map(|i| click(&format!("a{i}"), Some(Team::A))).collect();
        events.extend((0..10).map(|i| click(&format!("b{i}"), Some(Team::B))));

        let report = analyze(&events, &config(400)).unwrap();
        assert_eq!(report.clicks, 40);
        assert_eq!(report.attributed_clicks, 40);
        assert!((report.preference.delta_ab - 0.25).abs() < 1e-12);
        assert_eq!(report.bootstrap.len(), 400);
        assert_eq!(report.bootstrap.seed, 17);
        assert!(report.interval.low <= report.preference.delta_ab);
        assert!(report.preference.delta_ab <= report.interval.high);
        assert!(report.has_preference());
    }

    #[test]
    fn same_seed_same_report() {
        let events: Vec<EventRecord> = (0..20)
            .map(|i| click(&format!("s{i}"), Some(if i % 3 == 0 { Team::B } else { Team::A })))
            .collect();
        let first = analyze(&events, &config(200)).unwrap();
        assert_eq!(first, analyze(&events, &config(200)).unwrap());
    }

    #[test]
    fn no_clicks_is_reported_as_no_click_data() {
        let err = analyze(&[], &config(10)).unwrap_err();
        assert_eq!(err, TeamDraftError::InsufficientData(InsufficientData::NoClickData));
        assert!(err.to_string().contains("no click data"));
    }

    #[test]
    fn unattributed_clicks_are_reported_as_uninformative() {
        let events = vec![click("s1", None), click("s2", None)];
        let err = analyze(&events, &config(10)).unwrap_err();
        assert!(err.to_string().contains("no informative clicks"), "{err}");
    }

    #[test]
    fn invalid_config_aborts_before_analysis() {
        let bad = ExperimentConfig {
            confidence_level: 1.2,
            ..config(10)
        };
        let err = analyze(&[click("s1", Some(Team::A))], &bad).unwrap_err();
        assert!(matches!(err, TeamDraftError::InvalidInput(_)));
    }

    #[test]
    fn report_serializes_camel_case() {
        let events = vec![click("s1", Some(Team::A)), click("s2", Some(Team::B))];
        let report = analyze(&events, &config(50)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("attributedClicks").is_some());
        assert!(json["preference"].get("deltaAb").is_some());
        assert_eq!(json["bootstrap"]["values"].as_array().unwrap().len(), report.bootstrap.len());
    }
}
