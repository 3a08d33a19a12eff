// Library for tests to access modules

pub mod aggregator;
pub mod alerts;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod logs;
pub mod metrics;
pub mod models;
pub mod overview;
pub mod routes;
pub mod transform;
pub mod version;
