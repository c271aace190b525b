pub mod app;
pub mod bootstrap;
pub mod config;
pub mod events;
pub mod server;
pub mod services;
pub mod shutdown;

pub use bootstrap::{init_foundation, init_tracing, spawn_background_tasks};
