//! Group ban entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamchat_common::UserRef;

/// Ban record. Bans are append-only and consulted on every join attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBan {
    /// The banned user.
    pub user_id: UserRef,

    /// When the ban was issued.
    pub banned_at: DateTime<Utc>,

    /// Who issued the ban.
    pub banned_by: UserRef,

    /// Reason given by the moderator (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
