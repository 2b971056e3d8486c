//! Group join request entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamchat_common::UserRef;

/// Join request status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRequestStatus {
    /// Awaiting a decision.
    #[default]
    Pending,
    /// Accepted; the user was added as a member.
    Approved,
    /// Declined.
    Rejected,
}

/// Request by a user to join an approval-gated group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// The requesting user.
    pub user_id: UserRef,

    /// When the request was made.
    pub requested_at: DateTime<Utc>,

    /// Current status.
    #[serde(default)]
    pub status: JoinRequestStatus,
}

impl JoinRequest {
    /// Whether the request still awaits a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == JoinRequestStatus::Pending
    }
}
