//! Configuration management for schema resolution

pub mod config;
pub mod output;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::ResolverConfig;
pub use output::{OutputConfig, OutputFormat};
