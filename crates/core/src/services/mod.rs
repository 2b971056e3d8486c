//! Business logic services.

#![allow(missing_docs)]

pub mod group;
pub mod group_permission;

pub use group::{BanInput, GroupService, JoinOutcome, UpdateGroupInput, owner_count};
pub use group_permission::{
    Capability, can_delete_message, can_manage_role, capabilities, get_member_role,
    has_permission, is_banned, is_member, role_can_manage, role_has_capability,
};
