//! Shared utilities for Dengon binaries.

pub mod logger;
pub mod time;
