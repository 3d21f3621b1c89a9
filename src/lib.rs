// ABOUTME: Library root for slipway - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod cluster;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod lint;
pub mod notify;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod types;
pub mod vcs;
