// ABOUTME: Command module aggregator for the slipway CLI.
// ABOUTME: Re-exports release and status command handlers.

mod engine_connection;
mod release;
mod status;

pub use release::{Flow, release};
pub use status::status;
