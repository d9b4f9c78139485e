//! Shared test utilities for the modconf workspace.
//!
//! Dev-dependency only, never published.

pub mod project;

pub use project::TestProject;
