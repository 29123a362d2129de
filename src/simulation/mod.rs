pub mod clock;
pub mod config;
pub mod engine;
pub mod history;
pub mod metrics;
pub mod processes;
pub mod scheduler;
