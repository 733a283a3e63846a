//! Error types for plan loading and editing.

use thiserror::Error;

use crate::plan::GroupId;

/// Errors raised by edit operations on a loaded plan.
///
/// Every mutating operation checks for these before touching the plan.
/// A missing group and a missing cluster index are both "not found"; they are
/// split so the message can name what was missing. Match on
/// [`EditError::is_not_found`] to treat them alike.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("cluster {cluster_index} not found in group {group_id}")]
    NotFound {
        group_id: GroupId,
        cluster_index: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EditError {
    /// True for a missing group or a missing cluster index.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditError::GroupNotFound(_) | EditError::NotFound { .. })
    }
}

/// Errors raised while obtaining or validating a preview payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid preview payload: {0}")]
    Invalid(String),
}
