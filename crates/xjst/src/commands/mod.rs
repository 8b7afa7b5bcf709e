//! Command implementations for the XJST CLI
//!
//! Each command module handles the CLI interface and delegates to
//! xjst-core for the actual work.

pub mod build;
