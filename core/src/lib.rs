//! Core of the task console: the REST client for the tasks service, the view
//! model the terminal front-end renders, and its configuration.

pub mod api;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod table;
pub mod theme;
