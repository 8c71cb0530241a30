//! Error taxonomy for the dashboard client.
//!
//! `Transport`, `Status` and `Decode` all mean "no usable snapshot". The
//! poll loops swallow them; the override path hands them to the operator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Network unreachable, connection reset, timeout.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {status} for {route}")]
    Status { route: String, status: u16 },

    /// The response body was not the expected JSON shape.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Upload rejected before it left the client.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// The backend accepted the request but reported an error.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// Local file access (upload source, operator profile, SVG output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl DashboardError {
    /// True for the failures that only mean "skip this tick".
    pub fn is_no_snapshot(&self) -> bool {
        matches!(
            self,
            DashboardError::Transport(_) | DashboardError::Status { .. } | DashboardError::Decode(_)
        )
    }
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_failures_are_classified_uniformly() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(DashboardError::Decode(decode).is_no_snapshot());
        assert!(DashboardError::Transport("refused".into()).is_no_snapshot());
        assert!(DashboardError::Status {
            route: "/api/hazards".into(),
            status: 502
        }
        .is_no_snapshot());
        assert!(!DashboardError::Rejected("Empty filename".into()).is_no_snapshot());
    }

    #[test]
    fn status_error_message_names_route() {
        let err = DashboardError::Status {
            route: "/api/room_states".into(),
            status: 500,
        };
        assert_eq!(
            err.to_string(),
            "backend returned HTTP 500 for /api/room_states"
        );
    }
}
