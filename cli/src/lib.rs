//! task-console library: modules exposed for tests.

pub mod app;
pub mod commands;
pub mod tui;
