//! Group access control.
//!
//! Pure predicates over a loaded [`Group`] snapshot. Nothing here performs
//! I/O, mutates the group, or returns an error: unknown roles, unknown
//! capabilities, empty identifiers and non-members all resolve to the most
//! restrictive answer. Callers must re-check against a fresh snapshot right
//! before their write, since the answer only holds for the state passed in.

use serde::{Deserialize, Serialize};
use teamchat_db::entities::{Group, GroupRole};

/// A named permission checked against a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Post messages to the group.
    CanSendMessage,
    /// Add users to the group.
    CanAddMembers,
    /// Remove members from the group.
    CanRemoveMembers,
    /// Edit group name, description and settings.
    CanChangeGroupInfo,
    /// Pin and unpin messages.
    CanPinMessages,
    /// Delete messages sent by others.
    CanDeleteMessages,
    /// Create polls.
    CanCreatePolls,
    /// Create events.
    CanCreateEvents,
    /// Change member roles.
    CanManageRoles,
}

impl Capability {
    /// All capabilities.
    pub const ALL: [Self; 9] = [
        Self::CanSendMessage,
        Self::CanAddMembers,
        Self::CanRemoveMembers,
        Self::CanChangeGroupInfo,
        Self::CanPinMessages,
        Self::CanDeleteMessages,
        Self::CanCreatePolls,
        Self::CanCreateEvents,
        Self::CanManageRoles,
    ];

    /// Wire name of the capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CanSendMessage => "canSendMessage",
            Self::CanAddMembers => "canAddMembers",
            Self::CanRemoveMembers => "canRemoveMembers",
            Self::CanChangeGroupInfo => "canChangeGroupInfo",
            Self::CanPinMessages => "canPinMessages",
            Self::CanDeleteMessages => "canDeleteMessages",
            Self::CanCreatePolls => "canCreatePolls",
            Self::CanCreateEvents => "canCreateEvents",
            Self::CanManageRoles => "canManageRoles",
        }
    }

    /// Parse a capability name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cap| cap.as_str() == value)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const FULL: &[Capability] = &Capability::ALL;

const MODERATOR: &[Capability] = &[
    Capability::CanSendMessage,
    Capability::CanPinMessages,
    Capability::CanDeleteMessages,
];

const MEMBER: &[Capability] = &[Capability::CanSendMessage];

const READ_ONLY: &[Capability] = &[];

/// Capabilities granted to `role`.
#[must_use]
pub const fn capabilities(role: GroupRole) -> &'static [Capability] {
    match role {
        GroupRole::Owner | GroupRole::Admin => FULL,
        GroupRole::Moderator => MODERATOR,
        GroupRole::Member => MEMBER,
        GroupRole::ReadOnly => READ_ONLY,
    }
}

/// Check if `role` is granted `capability`.
#[must_use]
pub fn role_has_capability(role: GroupRole, capability: Capability) -> bool {
    capabilities(role).contains(&capability)
}

/// Check if `acting` may create, change or remove a membership holding `target`.
///
/// Owners manage every role except another owner; everyone else only
/// manages strictly lower roles.
#[must_use]
pub const fn role_can_manage(acting: GroupRole, target: GroupRole) -> bool {
    match acting {
        GroupRole::Owner => !target.is_owner(),
        _ => acting.level() > target.level(),
    }
}

/// String form of [`role_has_capability`].
#[must_use]
pub fn has_permission(role: &str, capability: &str) -> bool {
    match (GroupRole::parse(role), Capability::parse(capability)) {
        (Some(role), Some(capability)) => role_has_capability(role, capability),
        _ => false,
    }
}

/// String form of [`role_can_manage`].
#[must_use]
pub fn can_manage_role(acting_role: &str, target_role: &str) -> bool {
    match (GroupRole::parse(acting_role), GroupRole::parse(target_role)) {
        (Some(acting), Some(target)) => role_can_manage(acting, target),
        _ => false,
    }
}

/// Role held by `user_id` in `group`, or `None` for non-members.
#[must_use]
pub fn get_member_role(group: &Group, user_id: &str) -> Option<GroupRole> {
    group.member(user_id).map(|m| m.role)
}

/// Check if `user_id` holds a membership in `group`.
#[must_use]
pub fn is_member(group: &Group, user_id: &str) -> bool {
    group.member(user_id).is_some()
}

/// Check if `user_id` appears in the group's ban list.
#[must_use]
pub fn is_banned(group: &Group, user_id: &str) -> bool {
    group.banned_users.iter().any(|b| b.user_id.is(user_id))
}

/// Check if the actor may delete a message sent by `message_sender_id`.
///
/// Owners and admins delete anything. Moderators delete messages whose
/// sender currently holds member or read-only. Anyone deletes their own
/// message, independent of the capability table.
#[must_use]
pub fn can_delete_message(
    group: &Group,
    acting_role: Option<GroupRole>,
    message_sender_id: &str,
    acting_user_id: &str,
) -> bool {
    if let Some(role) =
        acting_role.filter(|role| role_has_capability(*role, Capability::CanDeleteMessages))
    {
        match role {
            GroupRole::Owner | GroupRole::Admin => return true,
            GroupRole::Moderator => {
                if matches!(
                    get_member_role(group, message_sender_id),
                    Some(GroupRole::Member | GroupRole::ReadOnly)
                ) {
                    return true;
                }
            }
            GroupRole::Member | GroupRole::ReadOnly => {}
        }
    }

    !acting_user_id.is_empty() && message_sender_id == acting_user_id
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use teamchat_common::{PopulatedUser, UserRef};
    use teamchat_db::entities::{GroupBan, GroupMember};

    fn group() -> Group {
        let now = Utc::now();
        let mut group = Group::new("g1", "Platform");
        group.members = vec![
            GroupMember::new("u1", GroupRole::Owner, now),
            GroupMember::new("u2", GroupRole::Admin, now),
            GroupMember::new("u3", GroupRole::Moderator, now),
            GroupMember::new("u4", GroupRole::Member, now),
            GroupMember::new("u5", GroupRole::ReadOnly, now),
            GroupMember::new("u6", GroupRole::Moderator, now),
        ];
        group
    }

    fn populated(id: &str) -> UserRef {
        UserRef::Populated(PopulatedUser {
            id: Some(id.to_string()),
            username: Some(format!("user-{id}")),
            display_name: None,
        })
    }

    #[test]
    fn test_send_message_permission() {
        for role in ["owner", "admin", "moderator", "member"] {
            assert!(has_permission(role, "canSendMessage"), "{role}");
        }
        assert!(!has_permission("read-only", "canSendMessage"));
        assert!(!has_permission("guest", "canSendMessage"));
        assert!(!has_permission("", "canSendMessage"));
    }

    #[test]
    fn test_permission_table() {
        for cap in Capability::ALL {
            assert!(role_has_capability(GroupRole::Owner, cap));
            assert!(role_has_capability(GroupRole::Admin, cap));
            assert!(!role_has_capability(GroupRole::ReadOnly, cap));
        }

        assert!(has_permission("moderator", "canPinMessages"));
        assert!(has_permission("moderator", "canDeleteMessages"));
        assert!(!has_permission("moderator", "canAddMembers"));
        assert!(!has_permission("moderator", "canManageRoles"));
        assert!(!has_permission("member", "canPinMessages"));
        assert!(!has_permission("member", "canCreatePolls"));
    }

    #[test]
    fn test_unknown_capability_denies() {
        assert!(!has_permission("owner", "canDoAnything"));
        assert!(!has_permission("owner", "CanSendMessage"));
        assert_eq!(Capability::parse("canManageRoles"), Some(Capability::CanManageRoles));
        assert_eq!(
            serde_json::to_string(&Capability::CanChangeGroupInfo).unwrap(),
            "\"canChangeGroupInfo\""
        );
    }

    #[test]
    fn test_owner_manages_everyone_but_owner() {
        assert!(!can_manage_role("owner", "owner"));
        for target in ["admin", "moderator", "member", "read-only"] {
            assert!(can_manage_role("owner", target), "{target}");
        }
    }

    #[test]
    fn test_non_owner_management_follows_hierarchy() {
        for acting in GroupRole::ALL.into_iter().filter(|r| !r.is_owner()) {
            for target in GroupRole::ALL {
                assert_eq!(
                    role_can_manage(acting, target),
                    acting.level() > target.level(),
                    "{acting} -> {target}"
                );
            }
        }
        assert!(!can_manage_role("admin", "admin"));
        assert!(!can_manage_role("moderator", "admin"));
        assert!(!can_manage_role("moderator", "moderator"));
        assert!(can_manage_role("moderator", "member"));
        assert!(!can_manage_role("read-only", "read-only"));
        assert!(!can_manage_role("root", "member"));
        assert!(!can_manage_role("admin", "nobody"));
    }

    #[test]
    fn test_get_member_role() {
        let mut group = group();
        assert_eq!(get_member_role(&group, "u3"), Some(GroupRole::Moderator));
        assert_eq!(get_member_role(&group, "u99"), None);
        assert_eq!(get_member_role(&group, ""), None);

        group.members[3].user_id = populated("u4");
        assert_eq!(get_member_role(&group, "u4"), Some(GroupRole::Member));
    }

    #[test]
    fn test_membership_and_bans_with_both_shapes() {
        let mut group = group();
        group.members[0].user_id = populated("u1");
        group.banned_users = vec![
            GroupBan {
                user_id: UserRef::from("b1"),
                banned_at: Utc::now(),
                banned_by: UserRef::from("u1"),
                reason: None,
            },
            GroupBan {
                user_id: populated("b2"),
                banned_at: Utc::now(),
                banned_by: populated("u1"),
                reason: Some("spam".to_string()),
            },
        ];

        assert!(is_member(&group, "u1"));
        assert!(is_member(&group, "u2"));
        assert!(!is_member(&group, "b1"));
        assert!(!is_member(&group, ""));

        assert!(is_banned(&group, "b1"));
        assert!(is_banned(&group, "b2"));
        assert!(!is_banned(&group, "u1"));
        assert!(!is_banned(&group, ""));
    }

    #[test]
    fn test_populated_reference_without_id_is_nobody() {
        let mut group = group();
        group.members[4].user_id = UserRef::Populated(PopulatedUser::default());
        assert!(!is_member(&group, "u5"));
        assert!(!is_member(&group, ""));
    }

    #[test]
    fn test_anyone_deletes_own_message() {
        let group = group();
        assert!(can_delete_message(&group, Some(GroupRole::ReadOnly), "u5", "u5"));
        assert!(can_delete_message(&group, Some(GroupRole::Member), "u4", "u4"));
        assert!(can_delete_message(&group, None, "u42", "u42"));
        assert!(!can_delete_message(&group, None, "", ""));
    }

    #[test]
    fn test_owner_and_admin_delete_any_message() {
        let group = group();
        assert!(can_delete_message(&group, Some(GroupRole::Owner), "u4", "u1"));
        assert!(can_delete_message(&group, Some(GroupRole::Owner), "u2", "u1"));
        assert!(can_delete_message(&group, Some(GroupRole::Admin), "u1", "u2"));
    }

    #[test]
    fn test_moderator_deletes_only_lower_members() {
        let group = group();
        assert!(can_delete_message(&group, Some(GroupRole::Moderator), "u4", "u3"));
        assert!(can_delete_message(&group, Some(GroupRole::Moderator), "u5", "u3"));
        assert!(!can_delete_message(&group, Some(GroupRole::Moderator), "u2", "u3"));
        assert!(!can_delete_message(&group, Some(GroupRole::Moderator), "u1", "u3"));
        assert!(!can_delete_message(&group, Some(GroupRole::Moderator), "u6", "u3"));
        // Sender who already left the group.
        assert!(!can_delete_message(&group, Some(GroupRole::Moderator), "u99", "u3"));
    }

    #[test]
    fn test_member_cannot_delete_others() {
        let mut group = group();
        group.members.push(GroupMember::new("u7", GroupRole::Member, Utc::now()));
        assert!(!can_delete_message(&group, Some(GroupRole::Member), "u7", "u4"));
        assert!(!can_delete_message(&group, Some(GroupRole::ReadOnly), "u4", "u5"));
    }
}
