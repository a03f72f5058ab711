// Lab Sheet Generator - Formatted lab sheet documents for course modules
//
// This is the library crate containing the core business logic and data
// structures. A presentation layer sits on top of it and consumes the
// state events it emits.

pub mod config;
pub mod logging;
pub mod models;
pub mod paths;
pub mod services;
pub mod state;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigStore};
pub use models::{AppState, Configuration, Module, SheetType, StudentInfo};
pub use services::{GenerationDispatcher, GenerationError, GenerationRequest, SheetGenerator};
pub use state::{StateChange, StateManager};
pub use validation::{ValidationError, Validator};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
