//! # Stencil Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for stencil, handling loading,
//! merging, validation, and access to configuration data. It supports a multi-level
//! configuration approach that combines defaults, user settings, and project-specific
//! overrides.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Configuration is loaded from multiple sources in order of precedence
//! - Paths are validated and expanded (e.g., `~` to home directory)
//! - Configuration is validated for correctness before use
//! - Structured data models ensure type safety
//!
//! Configuration sources (in order of precedence):
//! 1. `STENCIL_BLUEPRINTS_DIR` environment variable (built-in blueprint directory only)
//! 2. Project-specific `.stencil.toml` in the start directory or its ancestors
//! 3. User-specific `~/.config/stencil/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```rust
//! let cfg = config::load_config_from(&project_root)?;
//!
//! // Bundled blueprint directory and extra lookup paths
//! let builtin_dir = &cfg.blueprints.directory;
//! let extra = &cfg.blueprints.lookup_paths;
//!
//! // Pod layout defaults for `stencil generate`
//! let use_pods = cfg.generate.pod();
//! ```
//!
use crate::core::error::{StencilError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Environment variable that overrides the bundled blueprint directory.
pub const BLUEPRINTS_DIR_ENV: &str = "STENCIL_BLUEPRINTS_DIR";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub blueprints: BlueprintsConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Where blueprints are looked up (`stencil generate`, `stencil blueprint ...`).
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BlueprintsConfig {
    /// Directory holding the bundled blueprints (can use ~). Searched last.
    #[serde(default = "default_blueprint_dir")]
    pub directory: String,
    /// Extra directories searched before the bundled one, in order.
    #[serde(default)]
    pub lookup_paths: Vec<String>,
}

impl Default for BlueprintsConfig {
    fn default() -> Self {
        BlueprintsConfig {
            directory: default_blueprint_dir(),
            lookup_paths: Vec::new(),
        }
    }
}

/// Defaults applied to `stencil generate` / `stencil destroy`.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Use the pod layout. `None` when the file leaves it unset, so a project
    /// can turn off what the user config turned on.
    #[serde(default)]
    pub pod: Option<bool>,
    /// Directory (relative to the app root) that pods are grouped under.
    #[serde(default)]
    pub pod_path: String,
    /// Extra ignore patterns merged into the default ignore list.
    #[serde(default)]
    pub ignored_files: Vec<String>,
}

impl GenerateConfig {
    /// Whether the pod layout is on by default (off when unset).
    pub fn pod(&self) -> bool {
        self.pod.unwrap_or(false)
    }
}

fn default_blueprint_dir() -> String {
    // Bundled blueprints ship next to the crate manifest.
    concat!(env!("CARGO_MANIFEST_DIR"), "/blueprints").to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".stencil.toml";

/// Loads user and project configuration, searching for `.stencil.toml` from `start`.
pub fn load_config_from(start: &Path) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config(start)?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    if let Ok(dir) = std::env::var(BLUEPRINTS_DIR_ENV) {
        if !dir.is_empty() {
            info!("Using blueprint directory from {}: {}", BLUEPRINTS_DIR_ENV, dir);
            merged_config.blueprints.directory = dir;
        }
    }
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Stencil", "stencil") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start: &Path) -> Result<Option<Config>> {
    if let Some(project_config_path) = find_project_config_path(start) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.stencil.toml) found in start directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path: &Path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => return None,
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.blueprints.directory = if project_cfg.blueprints.directory != default_blueprint_dir() {
        project_cfg.blueprints.directory
    } else {
        user.blueprints.directory
    };
    // Project lookup paths are searched before the user's.
    merged.blueprints.lookup_paths = project_cfg
        .blueprints
        .lookup_paths
        .into_iter()
        .chain(user.blueprints.lookup_paths)
        .collect();
    merged.generate.pod = project_cfg.generate.pod.or(user.generate.pod);
    merged.generate.pod_path = if !project_cfg.generate.pod_path.is_empty() {
        project_cfg.generate.pod_path
    } else {
        user.generate.pod_path
    };
    merged.generate.ignored_files = user
        .generate
        .ignored_files
        .into_iter()
        .chain(project_cfg.generate.ignored_files)
        .collect();
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    debug!("Expanding paths in configuration...");
    config.blueprints.directory = shellexpand::tilde(&config.blueprints.directory).into_owned();
    for lookup in &mut config.blueprints.lookup_paths {
        *lookup = shellexpand::tilde(lookup).into_owned();
        debug!("Expanded lookup path: {}", lookup);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let bp_dir = PathBuf::from(&config.blueprints.directory);
    if !bp_dir.exists() {
        warn!(
            "Configured blueprint directory '{}' does not exist.",
            bp_dir.display()
        );
    } else if !bp_dir.is_dir() {
        return Err(anyhow!(StencilError::Config(format!(
            "Configured blueprint path '{}' exists but is not a directory.",
            bp_dir.display()
        ))));
    }
    let pod_path = Path::new(&config.generate.pod_path);
    if pod_path.is_absolute()
        || pod_path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(anyhow!(StencilError::Config(format!(
            "pod_path '{}' must be a relative path inside the app directory.",
            config.generate.pod_path
        ))));
    }
    for pattern in &config.generate.ignored_files {
        glob::Pattern::new(pattern).map_err(|e| {
            anyhow!(StencilError::Config(format!(
                "Invalid ignore pattern '{}': {}",
                pattern, e
            )))
        })?;
    }
    info!("Configuration validation successful.");
    Ok(())
}
