pub mod colors;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod loader;
pub mod sampling;
pub mod types;
