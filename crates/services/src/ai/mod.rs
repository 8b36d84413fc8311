pub mod client;

pub use client::{ModelClient, ModelConfig};
