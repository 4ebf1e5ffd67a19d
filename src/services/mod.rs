pub mod db_init;
pub mod opensea;
pub mod price_source;
pub mod notifier;

pub mod alert_store;
pub mod watch_store;
pub mod memory_store;

pub mod alert_evaluator;
pub mod messages;

pub mod alerts_service;
pub mod watchlist_service;
pub mod floor_service;
