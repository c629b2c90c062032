//! Shared utilities for the covault workspace.

pub mod logging;
