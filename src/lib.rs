//! Team-draft interleaving experiments.
//!
//! Two rankers are compared by merging their results into one interleaved
//! page per query ([`team_draft_interleave`]), attributing each click to the
//! ranker that drafted the clicked result, and scoring which ranker wins more
//! sessions or searches ([`preference`]). [`bootstrap`] resamples the grouping
//! units to put a percentile confidence interval around the score, and
//! [`analyze`] runs the whole pipeline from an event log.

pub mod error;
pub mod experiments;
pub mod types;

pub use error::{InsufficientData, Result, TeamDraftError};
pub use experiments::analysis::{analyze, analyze_click_log, InterleavingReport};
pub use experiments::bootstrap::{
    bootstrap, bootstrap_confidence_interval, confidence_interval, percentile, BootstrapOptions,
    BootstrapSample, ConfidenceInterval,
};
pub use experiments::config::ExperimentConfig;
pub use experiments::events::ClickLog;
pub use experiments::interleaving::{
    first_team_a_ratio, team_draft_interleave, InterleavedItem, InterleavedResult,
};
pub use experiments::stats::{preference, preference_summary, PreferenceSummary};
pub use types::{AggregationMode, EventRecord, EventType, GroupKey, Team};
