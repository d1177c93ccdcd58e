// src/infrastructure/mod.rs
pub mod config;
pub mod notehub;
pub(crate) mod wire;

pub use config::{AppConfig, FileConfig};
pub use notehub::HttpNoteGateway;
