//! Configuration management for Planvoice.

mod settings;

pub use settings::{Config, InteractActions, SanitizerConfig};
