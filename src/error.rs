use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TeamDraftError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(InsufficientData),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

/// Reasons an estimate cannot be produced from the data supplied.
///
/// Kept apart from `InvalidInput`: the call was well-formed, the data just
/// carries no signal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsufficientData {
    #[error("no click data")]
    NoClickData,

    #[error("no informative clicks ({clicks} clicks, none attributed to either team)")]
    NoInformativeClicks { clicks: usize },

    #[error(
        "only {kept} of {requested} bootstrap resamples were informative (minimum {minimum})"
    )]
    TooFewResamples {
        kept: usize,
        requested: usize,
        minimum: usize,
    },
}

pub type Result<T> = std::result::Result<T, TeamDraftError>;

impl From<InsufficientData> for TeamDraftError {
    fn from(e: InsufficientData) -> Self {
        TeamDraftError::InsufficientData(e)
    }
}

impl From<std::io::Error> for TeamDraftError {
    fn from(e: std::io::Error) -> Self {
        TeamDraftError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for TeamDraftError {
    fn from(e: serde_json::Error) -> Self {
        TeamDraftError::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_messages_distinguish_empty_from_uninformative() {
        let empty = TeamDraftError::from(InsufficientData::NoClickData).to_string();
        let uninformative =
            TeamDraftError::from(InsufficientData::NoInformativeClicks { clicks: 4 }).to_string();
        assert!(empty.contains("no click data"), "{empty}");
        assert!(uninformative.contains("no informative clicks"), "{uninformative}");
        assert_ne!(empty, uninformative);
    }

    #[test]
    fn io_error_converts_to_io_variant() {
        let e: TeamDraftError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, TeamDraftError::Io(ref msg) if msg.contains("gone")));
    }

    #[test]
    fn json_error_converts_to_json_variant() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: TeamDraftError = parse.into();
        assert!(matches!(e, TeamDraftError::Json(_)));
    }
}
