//! HTTP API server for the esports arena platform.
//!
//! Exposes the wallet, coin request, notification, and tournament managers
//! from the `esports_arena` crate over a versioned REST API.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
