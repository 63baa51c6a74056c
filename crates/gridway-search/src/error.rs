//! Search-invocation errors.

use std::fmt;

use gridway_core::MoveMode;

/// Reasons a search request is rejected before the loop runs.
///
/// Frontier exhaustion is *not* an error: "no path exists" is a normal
/// outcome, surfaced as [`SearchOutcome::Exhausted`](crate::SearchOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// Start or end is unset on the grid.
    MissingEndpoints,
    /// The requested mode does not match the grid's last adjacency refresh
    /// (`adjacency: None` means the cache is stale or was never built).
    ModeMismatch {
        requested: MoveMode,
        adjacency: Option<MoveMode>,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoints => write!(f, "search requires both a start and an end cell"),
            Self::ModeMismatch {
                requested,
                adjacency: Some(have),
            } => write!(
                f,
                "requested {requested} search but adjacency was refreshed for {have}"
            ),
            Self::ModeMismatch {
                requested,
                adjacency: None,
            } => write!(
                f,
                "requested {requested} search but adjacency is stale; call refresh_adjacency first"
            ),
        }
    }
}

impl std::error::Error for SearchError {}
