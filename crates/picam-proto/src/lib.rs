//! Shared types and HTTP plumbing for the picam camera dashboard.

pub mod client;
pub mod config;
pub mod format;
pub mod platform;
pub mod protocol;
