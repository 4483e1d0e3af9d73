//! # Blueprint Registry
//!
//! File: cli/src/core/blueprint/registry.rs
//!
//! ## Overview
//!
//! Resolves a blueprint name to a blueprint directory. Sources are searched
//! in order and the first match wins:
//!
//! 1. `<project root>/blueprints`
//! 2. `--lookup-path` directories, then `blueprints.lookup_paths` from config
//! 3. the built-in directory (`blueprints.directory`, overridable with
//!    `STENCIL_BLUEPRINTS_DIR`)
//!
//! A directory counts as a blueprint if it contains a `files/` directory or a
//! `blueprint.toml`. A source directory that does not exist is simply empty.
//!
use crate::core::blueprint::{Blueprint, BLUEPRINT_MANIFEST, TEMPLATE_DIR};
use crate::core::config::Config;
use crate::core::error::{StencilError, Result};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One place blueprints are looked up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSource {
    /// Short label for listings: `project`, `lookup path`, `built-in`.
    pub label: String,
    pub path: PathBuf,
}

impl LookupSource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        LookupSource {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// A blueprint as shown by `blueprint list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintEntry {
    pub name: String,
    pub description: String,
    /// Shadowed by a blueprint of the same name in an earlier source.
    pub overridden: bool,
}

/// All blueprints found in one source.
#[derive(Debug, Clone)]
pub struct BlueprintSource {
    pub source: LookupSource,
    pub blueprints: Vec<BlueprintEntry>,
}

#[derive(Debug, Clone)]
pub struct BlueprintRegistry {
    sources: Vec<LookupSource>,
}

impl BlueprintRegistry {
    pub fn new(sources: Vec<LookupSource>) -> Self {
        BlueprintRegistry { sources }
    }

    /// Builds the standard search order for a project.
    pub fn from_config(project_root: &Path, config: &Config, extra_lookup_paths: &[PathBuf]) -> Self {
        let mut sources = vec![LookupSource::new("project", project_root.join("blueprints"))];
        sources.extend(
            extra_lookup_paths
                .iter()
                .map(|path| LookupSource::new("lookup path", path.clone())),
        );
        sources.extend(
            config
                .blueprints
                .lookup_paths
                .iter()
                .map(|path| LookupSource::new("lookup path", PathBuf::from(path))),
        );
        sources.push(LookupSource::new(
            "built-in",
            PathBuf::from(&config.blueprints.directory),
        ));
        BlueprintRegistry::new(sources)
    }

    pub fn sources(&self) -> &[LookupSource] {
        &self.sources
    }

    /// Loads the first blueprint called `name`.
    ///
    /// # Errors
    ///
    /// `UnknownBlueprint` if no source has it; configuration errors from
    /// loading its `blueprint.toml`.
    pub fn lookup(&self, name: &str) -> Result<Blueprint> {
        if !is_plain_name(name) {
            return Err(StencilError::UnknownBlueprint {
                name: name.to_string(),
            }
            .into());
        }
        for source in &self.sources {
            let candidate = source.path.join(name);
            debug!("Looking for blueprint '{}' in {}", name, candidate.display());
            if is_blueprint_dir(&candidate) {
                return Blueprint::load(name, &candidate, &source.label);
            }
        }
        Err(StencilError::UnknownBlueprint {
            name: name.to_string(),
        }
        .into())
    }

    /// Every source with the blueprints it holds, in search order.
    pub fn list(&self) -> Result<Vec<BlueprintSource>> {
        let mut seen = HashSet::new();
        let mut listing = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let mut blueprints = Vec::new();
            for name in blueprint_names(&source.path)? {
                let dir = source.path.join(&name);
                let description = match Blueprint::load(&name, &dir, &source.label) {
                    Ok(blueprint) => blueprint.description().to_string(),
                    Err(e) => {
                        warn!("Could not load blueprint '{}': {:#}", name, e);
                        format!("(invalid {}: {:#})", BLUEPRINT_MANIFEST, e)
                    }
                };
                let overridden = !seen.insert(name.clone());
                blueprints.push(BlueprintEntry {
                    name,
                    description,
                    overridden,
                });
            }
            listing.push(BlueprintSource {
                source: source.clone(),
                blueprints,
            });
        }
        Ok(listing)
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\')
}

fn is_blueprint_dir(dir: &Path) -> bool {
    dir.is_dir() && (dir.join(TEMPLATE_DIR).is_dir() || dir.join(BLUEPRINT_MANIFEST).is_file())
}

/// Sorted names of the blueprint directories directly below `dir`.
fn blueprint_names(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StencilError::file_system(dir, e).into()),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StencilError::file_system(dir, e))?;
        let path = entry.path();
        if !is_blueprint_dir(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::kind_of;
    use tempfile::tempdir;

    fn blueprint(root: &Path, name: &str, description: &str) {
        let dir = root.join(name);
        fs::create_dir_all(dir.join("files")).unwrap();
        fs::write(
            dir.join(BLUEPRINT_MANIFEST),
            format!("description = \"{}\"\n", description),
        )
        .unwrap();
    }

    fn registry(project: &Path, builtin: &Path) -> BlueprintRegistry {
        BlueprintRegistry::new(vec![
            LookupSource::new("project", project),
            LookupSource::new("built-in", builtin),
        ])
    }

    #[test]
    fn test_first_source_wins() -> Result<()> {
        let project = tempdir()?;
        let builtin = tempdir()?;
        blueprint(builtin.path(), "module", "built-in module");
        blueprint(project.path(), "module", "project module");
        blueprint(builtin.path(), "in-repo-addon", "addon");

        let reg = registry(project.path(), builtin.path());
        let found = reg.lookup("module")?;
        assert_eq!(found.description(), "project module");
        assert_eq!(found.source_label(), "project");
        assert_eq!(reg.lookup("in-repo-addon")?.source_label(), "built-in");
        Ok(())
    }

    #[test]
    fn test_unknown_blueprint() -> Result<()> {
        let project = tempdir()?;
        let builtin = tempdir()?;
        // A directory without files/ or blueprint.toml is not a blueprint.
        fs::create_dir_all(builtin.path().join("notes"))?;

        let reg = registry(project.path(), builtin.path());
        for name in ["missing", "notes", "../escape", ""] {
            let err = reg.lookup(name).unwrap_err();
            assert!(
                matches!(kind_of(&err), Some(StencilError::UnknownBlueprint { .. })),
                "{}",
                name
            );
        }
        Ok(())
    }

    #[test]
    fn test_list_marks_overridden() -> Result<()> {
        let project = tempdir()?;
        let builtin = tempdir()?;
        blueprint(project.path(), "module", "mine");
        blueprint(builtin.path(), "module", "stock");
        blueprint(builtin.path(), "addon", "stock addon");

        let listing = registry(project.path(), builtin.path()).list()?;
        assert_eq!(listing.len(), 2);
        assert_eq!(
            listing[0].blueprints,
            vec![BlueprintEntry {
                name: "module".into(),
                description: "mine".into(),
                overridden: false
            }]
        );
        let builtin_entries: Vec<_> = listing[1]
            .blueprints
            .iter()
            .map(|e| (e.name.as_str(), e.overridden))
            .collect();
        assert_eq!(builtin_entries, vec![("addon", false), ("module", true)]);
        Ok(())
    }

    #[test]
    fn test_from_config_search_order() {
        let mut config = Config::default();
        config.blueprints.directory = "/opt/stencil/blueprints".to_string();
        config.blueprints.lookup_paths = vec!["/shared/blueprints".to_string()];
        let reg = BlueprintRegistry::from_config(
            Path::new("/work/app"),
            &config,
            &[PathBuf::from("/cli/blueprints")],
        );
        let paths: Vec<_> = reg.sources().iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/work/app/blueprints"),
                PathBuf::from("/cli/blueprints"),
                PathBuf::from("/shared/blueprints"),
                PathBuf::from("/opt/stencil/blueprints"),
            ]
        );
    }
}
