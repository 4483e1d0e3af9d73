//! # Blueprint Path Mapping
//!
//! File: cli/src/core/blueprint/path_mapper.rs
//!
//! ## Overview
//!
//! Maps a template-relative path such as `__root__/__path__/__name__.js` to the
//! destination path inside the project (`app/modules/foo-bar.js`).
//!
//! Mapping happens in three steps:
//! 1. exact-match lookup in the rename table (`gitignore` -> `.gitignore`),
//! 2. substitution of every `__token__` with the value registered for it,
//! 3. normalisation of the result (empty and `.` segments dropped).
//!
//! A token without a registered value, or a mapped path that escapes the
//! project (`..`), is a `TemplateConfiguration` error: the blueprint is broken.
//!
//! Ignore-list filtering is not part of mapping. The template enumeration in
//! `template.rs` drops ignored files before they ever reach the mapper.
//!
//! There is no shared mutable state: every run builds its own
//! `PathMappingConfig` (e.g. `for_update()` returns a new config with the
//! extra ignore patterns merged in).
//!
use crate::core::error::{StencilError, Result};
use anyhow::anyhow;
use glob::Pattern;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Token name (including the surrounding underscores) to substituted value.
pub type FileMapTokens = BTreeMap<String, String>;

/// Ignore patterns applied to every blueprint.
pub const DEFAULT_IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Extra ignore patterns merged in by update mode.
pub const UPDATE_IGNORED_FILES: &[&str] = &[".gitkeep"];

/// Template names that cannot be stored under their real name in a
/// blueprint (a literal `.gitignore` would be honoured by git itself).
pub const DEFAULT_RENAMED_FILES: &[(&str, &str)] = &[("gitignore", ".gitignore")];

/// Rename table and ignore list for one mapping run.
#[derive(Debug, Clone)]
pub struct PathMappingConfig {
    renamed_files: BTreeMap<String, String>,
    ignored_files: Vec<Pattern>,
}

impl PathMappingConfig {
    /// Builds a config, validating the rename table and compiling the ignore globs.
    pub fn new<R, I, S>(renamed_files: R, ignored_files: I) -> Result<Self>
    where
        R: IntoIterator<Item = (String, String)>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = PathMappingConfig {
            renamed_files: BTreeMap::new(),
            ignored_files: Vec::new(),
        };
        for (from, to) in renamed_files {
            validate_rename(&from, &to)?;
            config.renamed_files.insert(from, to);
        }
        config.add_ignored(ignored_files)?;
        Ok(config)
    }

    /// The rename table and ignore list every blueprint starts from.
    pub fn standard() -> Result<Self> {
        Self::new(
            DEFAULT_RENAMED_FILES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string())),
            DEFAULT_IGNORED_FILES.iter(),
        )
    }

    /// Returns a copy with `extra` merged into the ignore list.
    pub fn with_ignored<I, S>(&self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merged = self.clone();
        merged.add_ignored(extra)?;
        Ok(merged)
    }

    /// Config used when re-running a blueprint over an existing project.
    pub fn for_update(&self) -> Result<Self> {
        self.with_ignored(UPDATE_IGNORED_FILES.iter())
    }

    fn add_ignored<I, S>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in patterns {
            let raw = raw.as_ref();
            let pattern = Pattern::new(raw).map_err(|e| {
                anyhow!(StencilError::TemplateConfiguration {
                    path: PathBuf::from(raw),
                    message: format!("invalid ignore pattern: {}", e),
                })
            })?;
            if !self.ignored_files.iter().any(|p| p.as_str() == raw) {
                self.ignored_files.push(pattern);
            }
        }
        Ok(())
    }

    /// Whether a template-relative path (`/`-separated) is on the ignore list.
    ///
    /// Patterns without a `/` are matched against the basename only, so
    /// `.DS_Store` ignores the file in every directory.
    pub fn is_ignored(&self, template_relative_path: &str) -> bool {
        let basename = template_relative_path
            .rsplit('/')
            .next()
            .unwrap_or(template_relative_path);
        self.ignored_files.iter().any(|pattern| {
            if pattern.as_str().contains('/') {
                pattern.matches(template_relative_path)
            } else {
                pattern.matches(basename)
            }
        })
    }

    pub fn renamed(&self, template_relative_path: &str) -> Option<&str> {
        self.renamed_files
            .get(template_relative_path)
            .map(String::as_str)
    }
}

fn validate_rename(from: &str, to: &str) -> Result<()> {
    let problem = if from.is_empty() {
        Some("rename source is empty")
    } else if to.is_empty() {
        Some("rename target is empty")
    } else if Path::new(to).is_absolute() {
        Some("rename target must be relative")
    } else if to.split('/').any(|segment| segment == "..") {
        Some("rename target must not contain '..'")
    } else {
        None
    };
    match problem {
        Some(message) => Err(anyhow!(StencilError::TemplateConfiguration {
            path: PathBuf::from(from),
            message: format!("{} (-> '{}')", message, to),
        })),
        None => Ok(()),
    }
}

/// Maps template-relative paths to destination-relative paths.
#[derive(Debug, Clone)]
pub struct PathMapper {
    config: PathMappingConfig,
    token_pattern: Regex,
}

impl PathMapper {
    pub fn new(config: PathMappingConfig) -> Result<Self> {
        let token_pattern = Regex::new(r"__[A-Za-z][A-Za-z0-9]*__")?;
        Ok(PathMapper {
            config,
            token_pattern,
        })
    }

    pub fn config(&self) -> &PathMappingConfig {
        &self.config
    }

    /// Maps one template path. Pure: identical input yields identical output.
    pub fn map_path(&self, template_relative_path: &str, tokens: &FileMapTokens) -> Result<String> {
        let renamed = self
            .config
            .renamed(template_relative_path)
            .unwrap_or(template_relative_path);

        let mut unresolved: Vec<String> = Vec::new();
        let substituted = self.token_pattern.replace_all(renamed, |caps: &Captures| {
            let token = &caps[0];
            match tokens.get(token) {
                Some(value) => value.clone(),
                None => {
                    unresolved.push(token.to_string());
                    token.to_string()
                }
            }
        });

        if let Some(token) = unresolved.first() {
            return Err(anyhow!(StencilError::TemplateConfiguration {
                path: PathBuf::from(template_relative_path),
                message: format!("unresolved path token '{}'", token),
            }));
        }

        let segments: Vec<&str> = substituted
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();
        if segments.iter().any(|segment| *segment == "..") {
            return Err(anyhow!(StencilError::TemplateConfiguration {
                path: PathBuf::from(template_relative_path),
                message: format!("mapped path '{}' escapes the project", substituted),
            }));
        }
        if segments.is_empty() {
            return Err(anyhow!(StencilError::TemplateConfiguration {
                path: PathBuf::from(template_relative_path),
                message: "mapped path is empty".to_string(),
            }));
        }
        Ok(segments.join("/"))
    }
}
