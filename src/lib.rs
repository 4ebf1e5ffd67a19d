//! Library entrypoint for floorwatch.
//!
//! Everything the binary wires together lives here so integration tests
//! under `tests/` can build the router and the evaluator with test doubles.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub mod controllers;
pub mod routes;

use services::{alert_store::AlertStore, price_source::PriceSource, watch_store::WatchStore};

/// Shared by every command handler. Collaborators are injected, never global.
#[derive(Clone)]
pub struct AppState {
    pub alerts: Arc<dyn AlertStore>,
    pub watches: Arc<dyn WatchStore>,
    pub prices: Arc<dyn PriceSource>,
}
