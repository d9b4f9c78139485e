//! Command implementations for modconf-cli

pub mod resolve;

pub use resolve::{run_resolve, run_routes};
