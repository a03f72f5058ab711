//! Data models for the lab sheet generator.
//!
//! This module contains all the core data structures used throughout the application:
//! - [`AppState`]: Runtime state mirrored by the presentation layer
//! - [`Configuration`]: Persisted configuration loaded from `config.json`
//! - [`StudentInfo`] / [`Module`] / [`SheetType`]: Pieces of that configuration
//! - [`VersionedConfig`] / [`ConfigV1`]: Historic schema shapes and migration
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: Config structs derive `Serialize`/`Deserialize` for JSON persistence
//! - **Cloneable**: AppState is wrapped in `Arc<RwLock<>>` by [`StateManager`](crate::state::StateManager) for thread-safe access
//! - **Immutable**: State updates go through StateManager's `update()` method to ensure consistency

pub mod app_state;
pub mod config;

pub use app_state::AppState;
pub use config::{
    ConfigV1, Configuration, Module, ModuleV1, SheetType, StudentInfo, VersionedConfig,
    CURRENT_CONFIG_VERSION,
};
