pub mod apis;
pub mod auth;
pub mod config;
pub mod constants;
pub mod docs;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod server;
pub mod types;
