pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;

// Domain data shapes shared across layers
pub mod domain;

// Layered boundaries for application ports and infrastructure adapters
pub mod app;
pub mod infra;

pub mod observability;
