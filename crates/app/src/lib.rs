#![forbid(unsafe_code)]

pub mod config;
pub mod logging;
pub mod server;
pub mod terminal;

pub use config::{AppConfig, ConfigError};
pub use server::{AppState, router, serve};
pub use terminal::Terminal;
