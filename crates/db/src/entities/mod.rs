//! Stored document shapes.

pub mod group;
pub mod group_ban;
pub mod group_member;
pub mod join_request;

pub use group::{Group, GroupSettings};
pub use group_ban::GroupBan;
pub use group_member::{GroupMember, GroupRole};
pub use join_request::{JoinRequest, JoinRequestStatus};
