//! Configuration for shotvault: the per-task convention table and transcoder
//! settings, loaded once from TOML at process start into immutable structures
//! the engine takes by reference.

/// File loading and path resolution
pub mod loader;

/// Raw serde models, validation, and conversion into engine types
pub mod models;

pub use loader::{CONFIG_ENV_VAR, load, resolve_config_path};
pub use models::{ConfigError, FfmpegSettings, PublishConfig, RawConfig, RawTaskConvention};
