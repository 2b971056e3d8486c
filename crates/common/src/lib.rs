//! Common utilities and shared types for teamchat.
//!
//! This crate provides foundational components used across all teamchat crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Identifiers**: Normalization of raw and populated user references via [`UserRef`]
//!
//! # Example
//!
//! ```no_run
//! use teamchat_common::{AppResult, Config, UserRef};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let user = UserRef::from("64f0c2a9e1");
//!     println!("max members: {}, user: {:?}", config.groups.max_members, user.id());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{PopulatedUser, UserRef, to_id};
