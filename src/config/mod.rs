use crate::models::{Configuration, Module, StudentInfo, VersionedConfig, CURRENT_CONFIG_VERSION};
use crate::paths::{self, PathError, CONFIG_FILE_NAME};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Errors from loading, saving, or mutating the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but is not a readable configuration. Surfaced to the
    /// caller instead of being replaced with defaults, so legacy data is
    /// never silently lost.
    #[error("Configuration file {path} is corrupt: {source}")]
    Corrupt {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to access {path}: {source}")]
    Filesystem {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("A module with code {0} already exists")]
    DuplicateCode(String),

    #[error("No module with code {0}")]
    NotFound(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Store for the persisted JSON configuration.
///
/// Owns the location of `config.json`, the schema migration performed at
/// load time, and the module CRUD rules (case-insensitive code uniqueness).
/// All mutating operations persist immediately; saves are atomic
/// (temp file + rename) so a crash mid-save never leaves a partial file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: Utf8PathBuf,
    config_file: Utf8PathBuf,
    default_output_dir: Utf8PathBuf,
}

impl ConfigStore {
    /// Create a ConfigStore rooted at the given directory, with an explicit
    /// default output directory. The directory is created if missing.
    pub fn with_output_dir<P, Q>(config_dir: P, default_output_dir: Q) -> Result<Self, ConfigError>
    where
        P: AsRef<Utf8Path>,
        Q: AsRef<Utf8Path>,
    {
        let config_dir = config_dir.as_ref().to_path_buf();
        paths::ensure_dir(&config_dir)?;

        Ok(Self {
            config_file: config_dir.join(CONFIG_FILE_NAME),
            config_dir,
            default_output_dir: default_output_dir.as_ref().to_path_buf(),
        })
    }

    /// Create a ConfigStore rooted at the given directory, using the
    /// platform Documents folder as the default output directory.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let default_output_dir = paths::default_output_dir()?;
        Self::with_output_dir(config_dir, default_output_dir)
    }

    /// Create a ConfigStore at the platform config directory.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        Self::new(paths::config_dir()?)
    }

    /// Whether the application has never been configured.
    pub fn is_first_run(&self) -> bool {
        !self.config_file.exists()
    }

    /// Load the configuration.
    ///
    /// A missing file yields a fresh default configuration at the current
    /// schema version. An older schema is migrated and the migrated result
    /// is persisted before returning. An unparseable file is a
    /// [`ConfigError::Corrupt`].
    pub fn load(&self) -> Result<Configuration, ConfigError> {
        if !self.config_file.exists() {
            tracing::info!(
                "No configuration at {}, starting with defaults",
                self.config_file
            );
            return Ok(self.default_config());
        }

        let text =
            fs::read_to_string(&self.config_file).map_err(|source| ConfigError::Filesystem {
                path: self.config_file.clone(),
                source,
            })?;

        let versioned =
            VersionedConfig::from_json(&text).map_err(|source| ConfigError::Corrupt {
                path: self.config_file.clone(),
                source,
            })?;

        let needs_persist = !versioned.is_current();
        let config = versioned.migrate(&self.default_output_dir);

        if needs_persist {
            tracing::info!(
                "Migrated configuration to schema version {}",
                CURRENT_CONFIG_VERSION
            );
            self.save(&config)?;
        } else {
            tracing::info!("Loaded configuration from {}", self.config_file);
        }

        Ok(config)
    }

    /// Save the configuration atomically.
    ///
    /// Writes to a sibling temp file first and renames it over the target,
    /// so a crash mid-save cannot leave a truncated `config.json`.
    pub fn save(&self, config: &Configuration) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config).map_err(ConfigError::Serialize)?;

        let temp_path = self.config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));
        fs::write(&temp_path, json).map_err(|source| ConfigError::Filesystem {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &self.config_file).map_err(|source| ConfigError::Filesystem {
            path: self.config_file.clone(),
            source,
        })?;

        tracing::info!("Saved configuration to {}", self.config_file);
        Ok(())
    }

    /// Add a module and persist.
    ///
    /// Rejects codes already present in the list (case-insensitive); the
    /// module list is left unchanged on rejection.
    pub fn add_module(
        &self,
        config: &mut Configuration,
        module: Module,
    ) -> Result<(), ConfigError> {
        if config.modules.iter().any(|m| m.code_matches(&module.code)) {
            return Err(ConfigError::DuplicateCode(module.code));
        }

        tracing::info!("Adding module {} ({})", module.name, module.code);
        config.modules.push(module);
        self.save(config)
    }

    /// Replace the module with the given code and persist.
    ///
    /// The replacement may change the code, as long as the new code does not
    /// collide with any other module.
    pub fn update_module(
        &self,
        config: &mut Configuration,
        code: &str,
        new_module: Module,
    ) -> Result<(), ConfigError> {
        let index = config
            .modules
            .iter()
            .position(|m| m.code_matches(code))
            .ok_or_else(|| ConfigError::NotFound(code.to_string()))?;

        let collides = config
            .modules
            .iter()
            .enumerate()
            .any(|(i, m)| i != index && m.code_matches(&new_module.code));
        if collides {
            return Err(ConfigError::DuplicateCode(new_module.code));
        }

        tracing::info!("Updating module {}", code);
        config.modules[index] = new_module;
        self.save(config)
    }

    /// Remove the module with the given code and persist.
    pub fn remove_module(&self, config: &mut Configuration, code: &str) -> Result<(), ConfigError> {
        let index = config
            .modules
            .iter()
            .position(|m| m.code_matches(code))
            .ok_or_else(|| ConfigError::NotFound(code.to_string()))?;

        tracing::info!("Removing module {}", code);
        config.modules.remove(index);
        self.save(config)
    }

    /// Resolve the output directory for a module: its dedicated path when
    /// set, otherwise the global output directory.
    pub fn resolve_output_path(&self, config: &Configuration, module: &Module) -> Utf8PathBuf {
        module
            .output_path
            .clone()
            .unwrap_or_else(|| config.global_output_dir.clone())
    }

    /// Fresh configuration used on first run.
    fn default_config(&self) -> Configuration {
        Configuration::new(
            StudentInfo {
                name: String::new(),
                id: String::new(),
            },
            self.default_output_dir.clone(),
        )
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the configuration file path.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }
}
