//! Group member entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamchat_common::UserRef;

/// Role of a group member, highest authority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupRole {
    /// Owner - full control including transfer.
    Owner,
    /// Admin - full management except ownership transfer.
    Admin,
    /// Moderator - can pin and delete lower members' messages.
    Moderator,
    /// Regular member.
    Member,
    /// Read-only - can view but not post.
    ReadOnly,
}

impl GroupRole {
    /// All roles, highest authority first.
    pub const ALL: [Self; 5] = [
        Self::Owner,
        Self::Admin,
        Self::Moderator,
        Self::Member,
        Self::ReadOnly,
    ];

    /// Position in the role hierarchy (higher = more authority).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Owner => 5,
            Self::Admin => 4,
            Self::Moderator => 3,
            Self::Member => 2,
            Self::ReadOnly => 1,
        }
    }

    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Moderator => "moderator",
            Self::Member => "member",
            Self::ReadOnly => "read-only",
        }
    }

    /// Parse a stored role string. Unknown strings yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }

    /// Check if this is the owner role.
    #[must_use]
    pub const fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl std::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group member - one membership record per user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    /// The member, raw or populated.
    pub user_id: UserRef,

    /// Role of the member in the group (required).
    pub role: GroupRole,

    /// When the user joined the group.
    pub joined_at: DateTime<Utc>,

    /// Whether the user is muted within this group.
    #[serde(default)]
    pub is_muted: bool,
}

impl GroupMember {
    /// Create a new, unmuted membership.
    #[must_use]
    pub fn new(user_id: impl Into<UserRef>, role: GroupRole, joined_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            joined_at,
            is_muted: false,
        }
    }
}
