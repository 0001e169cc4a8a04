//! Terminal host for the todo grid.
//!
//! # Overview
//! Executes the requests built by `todo-grid-core` over HTTP (`ureq`) and
//! prints the resulting list and detail models as text.

pub mod commands;
pub mod config;
pub mod render;
pub mod transport;

pub use commands::{App, ListRequest};
pub use config::Config;
pub use transport::{Transport, UreqTransport};
