//! Group service.
//!
//! Membership operations over a loaded group document. Each operation
//! authorizes through [`group_permission`](super::group_permission), applies
//! the change in memory and leaves persisting the document to the caller in
//! a single write.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use teamchat_common::{AppError, AppResult, UserRef, config::GroupConfig};
use teamchat_db::entities::{
    Group, GroupBan, GroupMember, GroupRole, JoinRequest, JoinRequestStatus,
};
use tracing::{debug, info};
use validator::Validate;

use super::group_permission::{
    Capability, can_delete_message, get_member_role, is_banned, is_member, role_can_manage,
    role_has_capability,
};

/// Input for banning a user from a group.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BanInput {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[validate(length(max = 512))]
    pub reason: Option<String>,
}

/// Input for updating group info.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupInput {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub only_admins_send_files: Option<bool>,
    pub require_approval: Option<bool>,
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user is now a member.
    Joined,
    /// A join request is awaiting approval.
    Requested,
}

/// Number of members holding the owner role.
#[must_use]
pub fn owner_count(group: &Group) -> usize {
    group.members.iter().filter(|m| m.role.is_owner()).count()
}

/// Service for managing group membership.
#[derive(Debug, Clone, Default)]
pub struct GroupService {
    config: GroupConfig,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub const fn new(config: GroupConfig) -> Self {
        Self { config }
    }

    /// Resolve the role of `user_id` and require `capability`.
    pub fn authorize(
        &self,
        group: &Group,
        user_id: &str,
        capability: Capability,
    ) -> AppResult<GroupRole> {
        let role = get_member_role(group, user_id).ok_or_else(|| {
            debug!(group_id = %group.id, user_id, %capability, "Denied: not a member");
            AppError::NotMember(format!("Not a member of group {}", group.id))
        })?;

        if !role_has_capability(role, capability) {
            debug!(group_id = %group.id, user_id, %role, %capability, "Denied: missing capability");
            return Err(AppError::Forbidden(format!(
                "Role {role} does not have {capability}"
            )));
        }

        Ok(role)
    }

    // ==================== Member Operations ====================

    /// Add a user to the group.
    pub fn add_member(
        &self,
        group: &mut Group,
        actor_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.authorize(group, actor_id, Capability::CanAddMembers)?;
        self.admit(group, user_id, now)?;

        info!(group_id = %group.id, actor_id, user_id, "Member added");
        Ok(())
    }

    /// Join a group, or ask to when it requires approval.
    pub fn request_join(
        &self,
        group: &mut Group,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<JoinOutcome> {
        if user_id.is_empty() {
            return Err(AppError::BadRequest("Missing user id".to_string()));
        }
        if is_banned(group, user_id) {
            return Err(AppError::Banned(format!("Banned from group {}", group.id)));
        }
        if is_member(group, user_id) {
            return Err(AppError::Conflict("Already a member".to_string()));
        }

        if !group.settings.require_approval {
            self.admit(group, user_id, now)?;
            info!(group_id = %group.id, user_id, "Member joined");
            return Ok(JoinOutcome::Joined);
        }

        if group.pending_request_mut(user_id).is_some() {
            return Err(AppError::Conflict(
                "Already have a pending request".to_string(),
            ));
        }

        let pending = group.join_requests.iter().filter(|r| r.is_pending()).count();
        if pending >= self.config.max_pending_requests {
            return Err(AppError::Validation(
                "Too many pending join requests".to_string(),
            ));
        }

        group.join_requests.push(JoinRequest {
            user_id: UserRef::from(user_id),
            requested_at: now,
            status: JoinRequestStatus::Pending,
        });

        info!(group_id = %group.id, user_id, "Join requested");
        Ok(JoinOutcome::Requested)
    }

    /// Approve a pending join request.
    pub fn approve_join_request(
        &self,
        group: &mut Group,
        actor_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.authorize(group, actor_id, Capability::CanAddMembers)?;

        if group.pending_request_mut(user_id).is_none() {
            return Err(AppError::NotFound("Join request not found".to_string()));
        }

        self.admit(group, user_id, now)?;

        info!(group_id = %group.id, actor_id, user_id, "Join request approved");
        Ok(())
    }

    /// Reject a pending join request.
    pub fn reject_join_request(
        &self,
        group: &mut Group,
        actor_id: &str,
        user_id: &str,
    ) -> AppResult<()> {
        self.authorize(group, actor_id, Capability::CanAddMembers)?;

        let request = group
            .pending_request_mut(user_id)
            .ok_or_else(|| AppError::NotFound("Join request not found".to_string()))?;
        request.status = JoinRequestStatus::Rejected;

        info!(group_id = %group.id, actor_id, user_id, "Join request rejected");
        Ok(())
    }

    /// Remove a member from the group.
    pub fn remove_member(&self, group: &mut Group, actor_id: &str, user_id: &str) -> AppResult<()> {
        if actor_id == user_id {
            return Err(AppError::Validation(
                "Use leave to remove yourself".to_string(),
            ));
        }

        let actor_role = self.authorize(group, actor_id, Capability::CanRemoveMembers)?;
        let target_role = get_member_role(group, user_id)
            .ok_or_else(|| AppError::NotFound("User is not a member".to_string()))?;

        if !role_can_manage(actor_role, target_role) {
            debug!(group_id = %group.id, actor_id, user_id, %actor_role, %target_role, "Denied: remove");
            return Err(AppError::Forbidden(
                "Cannot remove members with equal or higher role".to_string(),
            ));
        }

        group.members.retain(|m| !m.user_id.is(user_id));

        info!(group_id = %group.id, actor_id, user_id, "Member removed");
        Ok(())
    }

    /// Change a member's role.
    ///
    /// The actor must outrank both the member's current role and the new one.
    pub fn change_role(
        &self,
        group: &mut Group,
        actor_id: &str,
        user_id: &str,
        new_role: GroupRole,
    ) -> AppResult<()> {
        let actor_role = self.authorize(group, actor_id, Capability::CanManageRoles)?;

        if new_role.is_owner() {
            return Err(AppError::Forbidden(
                "Use transfer_ownership to promote to owner".to_string(),
            ));
        }

        let current = get_member_role(group, user_id)
            .ok_or_else(|| AppError::NotFound("User is not a member".to_string()))?;

        if !role_can_manage(actor_role, current) || !role_can_manage(actor_role, new_role) {
            debug!(
                group_id = %group.id, actor_id, user_id, %actor_role, %current, %new_role,
                "Denied: change role"
            );
            return Err(AppError::Forbidden(
                "Cannot assign or change a role equal to or above your own".to_string(),
            ));
        }

        if let Some(member) = group.member_mut(user_id) {
            member.role = new_role;
        }

        info!(group_id = %group.id, actor_id, user_id, from = %current, to = %new_role, "Role changed");
        Ok(())
    }

    /// Transfer group ownership to another member.
    ///
    /// The previous owner becomes an admin in the same mutation.
    pub fn transfer_ownership(
        &self,
        group: &mut Group,
        owner_id: &str,
        new_owner_id: &str,
    ) -> AppResult<()> {
        let role = get_member_role(group, owner_id)
            .ok_or_else(|| AppError::NotMember(format!("Not a member of group {}", group.id)))?;

        if !role.is_owner() {
            return Err(AppError::Forbidden(
                "Only the owner can transfer ownership".to_string(),
            ));
        }
        if owner_id == new_owner_id {
            return Err(AppError::Validation("Already the owner".to_string()));
        }
        if !is_member(group, new_owner_id) {
            return Err(AppError::Validation(
                "New owner must be a member".to_string(),
            ));
        }

        for member in &mut group.members {
            if member.user_id.is(owner_id) {
                member.role = GroupRole::Admin;
            } else if member.user_id.is(new_owner_id) {
                member.role = GroupRole::Owner;
            }
        }

        info!(group_id = %group.id, owner_id, new_owner_id, "Ownership transferred");
        Ok(())
    }

    /// Leave a group.
    pub fn leave(&self, group: &mut Group, user_id: &str) -> AppResult<()> {
        let role = get_member_role(group, user_id)
            .ok_or_else(|| AppError::NotMember(format!("Not a member of group {}", group.id)))?;

        // Owner cannot leave (must transfer first)
        if role.is_owner() {
            return Err(AppError::Validation(
                "Owner cannot leave. Transfer ownership first.".to_string(),
            ));
        }

        group.members.retain(|m| !m.user_id.is(user_id));

        info!(group_id = %group.id, user_id, "Member left");
        Ok(())
    }

    /// Ban a user, removing any membership they hold.
    pub fn ban(
        &self,
        group: &mut Group,
        actor_id: &str,
        input: BanInput,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        input.validate()?;

        if actor_id == input.user_id {
            return Err(AppError::Validation("Cannot ban yourself".to_string()));
        }

        let actor_role = self.authorize(group, actor_id, Capability::CanRemoveMembers)?;

        if is_banned(group, &input.user_id) {
            return Err(AppError::Conflict("User is already banned".to_string()));
        }

        let outranked = get_member_role(group, &input.user_id)
            .is_some_and(|target_role| !role_can_manage(actor_role, target_role));
        if outranked {
            return Err(AppError::Forbidden(
                "Cannot ban members with equal or higher role".to_string(),
            ));
        }

        let user_id = input.user_id.as_str();
        group.members.retain(|m| !m.user_id.is(user_id));
        for request in &mut group.join_requests {
            if request.is_pending() && request.user_id.is(user_id) {
                request.status = JoinRequestStatus::Rejected;
            }
        }
        group.banned_users.push(GroupBan {
            user_id: UserRef::from(user_id),
            banned_at: now,
            banned_by: UserRef::from(actor_id),
            reason: input.reason,
        });

        info!(group_id = %group.id, actor_id, user_id, "User banned");
        Ok(())
    }

    /// Mute or unmute a member.
    pub fn set_muted(
        &self,
        group: &mut Group,
        actor_id: &str,
        user_id: &str,
        muted: bool,
    ) -> AppResult<()> {
        let actor_role = self.authorize(group, actor_id, Capability::CanRemoveMembers)?;
        let target_role = get_member_role(group, user_id)
            .ok_or_else(|| AppError::NotFound("User is not a member".to_string()))?;

        if !role_can_manage(actor_role, target_role) {
            return Err(AppError::Forbidden(
                "Cannot mute members with equal or higher role".to_string(),
            ));
        }

        if let Some(member) = group.member_mut(user_id) {
            member.is_muted = muted;
        }

        info!(group_id = %group.id, actor_id, user_id, muted, "Mute updated");
        Ok(())
    }

    /// Update group name and settings.
    pub fn update_info(
        &self,
        group: &mut Group,
        actor_id: &str,
        input: UpdateGroupInput,
    ) -> AppResult<()> {
        input.validate()?;
        self.authorize(group, actor_id, Capability::CanChangeGroupInfo)?;

        if let Some(name) = input.name {
            group.name = name;
        }
        if let Some(only_admins_send_files) = input.only_admins_send_files {
            group.settings.only_admins_send_files = only_admins_send_files;
        }
        if let Some(require_approval) = input.require_approval {
            group.settings.require_approval = require_approval;
        }

        info!(group_id = %group.id, actor_id, "Group info updated");
        Ok(())
    }

    // ==================== Message Checks ====================

    /// Check that `user_id` may post a message, optionally with attachments.
    pub fn check_send_message(
        &self,
        group: &Group,
        user_id: &str,
        has_attachment: bool,
    ) -> AppResult<GroupRole> {
        let role = self.authorize(group, user_id, Capability::CanSendMessage)?;

        if group.member(user_id).is_some_and(|m| m.is_muted) {
            return Err(AppError::Forbidden("You are muted in this group".to_string()));
        }

        if has_attachment
            && group.settings.only_admins_send_files
            && !matches!(role, GroupRole::Owner | GroupRole::Admin)
        {
            return Err(AppError::Forbidden(
                "Only admins can send files in this group".to_string(),
            ));
        }

        Ok(role)
    }

    /// Check that `actor_id` may delete a message sent by `sender_id`.
    pub fn check_delete_message(
        &self,
        group: &Group,
        actor_id: &str,
        sender_id: &str,
    ) -> AppResult<()> {
        let role = get_member_role(group, actor_id)
            .ok_or_else(|| AppError::NotMember(format!("Not a member of group {}", group.id)))?;

        if !can_delete_message(group, Some(role), sender_id, actor_id) {
            debug!(group_id = %group.id, actor_id, sender_id, %role, "Denied: delete message");
            return Err(AppError::Forbidden(
                "No permission to delete this message".to_string(),
            ));
        }

        Ok(())
    }

    // ==================== Helpers ====================

    /// Add `user_id` as a plain member after ban, duplicate and capacity checks.
    ///
    /// Any pending join request of the user is resolved as approved.
    fn admit(&self, group: &mut Group, user_id: &str, now: DateTime<Utc>) -> AppResult<()> {
        if user_id.is_empty() {
            return Err(AppError::BadRequest("Missing user id".to_string()));
        }
        if is_banned(group, user_id) {
            return Err(AppError::Banned(format!("Banned from group {}", group.id)));
        }
        if is_member(group, user_id) {
            return Err(AppError::Conflict("User is already a member".to_string()));
        }
        if group.members_count() >= self.config.max_members {
            return Err(AppError::Validation(format!(
                "Maximum of {} members allowed per group",
                self.config.max_members
            )));
        }

        group
            .members
            .push(GroupMember::new(user_id, GroupRole::Member, now));
        for request in &mut group.join_requests {
            if request.is_pending() && request.user_id.is(user_id) {
                request.status = JoinRequestStatus::Approved;
            }
        }
        Ok(())
    }
}
