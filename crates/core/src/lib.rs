//! Core business logic for teamchat.

pub mod services;

pub use services::*;
