//! Group entity for team chats.

use serde::{Deserialize, Serialize};

use super::{GroupBan, GroupMember, JoinRequest};

/// Group-level toggles, consulted alongside role permissions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSettings {
    /// Only owners and admins may attach files to messages.
    #[serde(default)]
    pub only_admins_send_files: bool,

    /// New members must be approved through a join request.
    #[serde(default)]
    pub require_approval: bool,
}

/// Group aggregate as loaded from storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Group name.
    #[serde(default)]
    pub name: String,

    /// Memberships, one per user.
    #[serde(default)]
    pub members: Vec<GroupMember>,

    /// Ban records (append-only).
    #[serde(default)]
    pub banned_users: Vec<GroupBan>,

    /// Join requests, all statuses.
    #[serde(default)]
    pub join_requests: Vec<JoinRequest>,

    /// Group-level toggles.
    #[serde(default)]
    pub settings: GroupSettings,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Find the membership record of `user_id`.
    #[must_use]
    pub fn member(&self, user_id: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id.is(user_id))
    }

    /// Find the membership record of `user_id`, mutably.
    pub fn member_mut(&mut self, user_id: &str) -> Option<&mut GroupMember> {
        self.members.iter_mut().find(|m| m.user_id.is(user_id))
    }

    /// Find the pending join request of `user_id`.
    pub fn pending_request_mut(&mut self, user_id: &str) -> Option<&mut JoinRequest> {
        self.join_requests
            .iter_mut()
            .find(|r| r.is_pending() && r.user_id.is(user_id))
    }

    /// Number of members.
    #[must_use]
    pub fn members_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{GroupRole, JoinRequestStatus};

    #[test]
    fn test_deserialize_stored_document() {
        let json = r#"{
            "_id": "g1",
            "name": "Platform team",
            "members": [
                {"userId": "u1", "role": "owner", "joinedAt": "2024-01-01T00:00:00Z"},
                {"userId": {"_id": "u2", "username": "bob"}, "role": "read-only",
                 "joinedAt": "2024-01-02T00:00:00Z", "isMuted": true}
            ],
            "bannedUsers": [
                {"userId": "u9", "bannedAt": "2024-01-03T00:00:00Z", "bannedBy": "u1",
                 "reason": "spam"}
            ],
            "joinRequests": [
                {"userId": "u5", "requestedAt": "2024-01-04T00:00:00Z", "status": "pending"}
            ],
            "settings": {"onlyAdminsSendFiles": true}
        }"#;

        let mut group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.id, "g1");
        assert_eq!(group.members_count(), 2);
        assert_eq!(group.member("u1").unwrap().role, GroupRole::Owner);

        let bob = group.member("u2").unwrap();
        assert_eq!(bob.role, GroupRole::ReadOnly);
        assert!(bob.is_muted);

        assert_eq!(group.banned_users[0].reason.as_deref(), Some("spam"));
        assert!(group.settings.only_admins_send_files);
        assert!(!group.settings.require_approval);

        let request = group.pending_request_mut("u5").unwrap();
        assert_eq!(request.status, JoinRequestStatus::Pending);
        assert!(group.member("u5").is_none());
    }

    #[test]
    fn test_unknown_role_is_rejected_at_load() {
        let json = r#"{"_id":"g1","members":[
            {"userId":"u1","role":"superuser","joinedAt":"2024-01-01T00:00:00Z"}]}"#;
        assert!(serde_json::from_str::<Group>(json).is_err());
    }
}
