//! Document model for teamchat.
//!
//! Groups are stored as single documents embedding their memberships, bans
//! and join requests. The storage driver is owned by the caller; this crate
//! only describes the document shapes so they can be loaded, checked and
//! written back in one update.

pub mod entities;

pub use entities::{
    Group, GroupBan, GroupMember, GroupRole, GroupSettings, JoinRequest, JoinRequestStatus,
};
