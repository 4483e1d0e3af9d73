//! # package.json Manifest Editing
//!
//! File: cli/src/core/blueprint/manifest.rs
//!
//! ## Overview
//!
//! The `in-repo-addon` blueprint registers the generated addon in the host
//! project's `package.json`:
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "ember-addon": { "paths": ["lib/foo-bar"] }
//! }
//! ```
//!
//! - the `paths` array is kept sorted and free of duplicates;
//! - removing an entry that is not there is a no-op;
//! - an emptied `paths` array (and an emptied `ember-addon` object) is dropped.
//!
//! Key order in the rest of the document is preserved and the file is
//! rewritten pretty-printed with a trailing newline. These functions are
//! synchronous because they run inside blueprint hooks.
//!
use crate::core::error::{StencilError, Result};
use anyhow::{anyhow, Context};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILENAME: &str = "package.json";
const ADDON_KEY: &str = "ember-addon";
const PATHS_KEY: &str = "paths";

fn manifest_path(project_root: &Path) -> PathBuf {
    project_root.join(MANIFEST_FILENAME)
}

/// Reads and parses `package.json`; `Ok(None)` if the file does not exist.
fn read_manifest(path: &Path) -> Result<Option<Map<String, Value>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(anyhow!(StencilError::file_system(path, e))),
    };
    match serde_json::from_str::<Value>(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?
    {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(StencilError::Manifest(format!(
            "{} must contain a JSON object",
            path.display()
        ))
        .into()),
    }
}

fn write_manifest(path: &Path, manifest: &Map<String, Value>) -> Result<()> {
    let mut text = serde_json::to_string_pretty(manifest)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    text.push('\n');
    fs::write(path, text).map_err(|e| anyhow!(StencilError::file_system(path, e)))?;
    debug!("Updated {}", path.display());
    Ok(())
}

/// The `name` field of the project's `package.json`, if there is one.
pub fn package_name(project_root: &Path) -> Result<Option<String>> {
    Ok(read_manifest(&manifest_path(project_root))?
        .and_then(|manifest| manifest.get("name").and_then(Value::as_str).map(str::to_string)))
}

/// The `ember-addon.paths` entries, in file order.
#[cfg(test)]
pub fn addon_paths(project_root: &Path) -> Result<Vec<String>> {
    let Some(manifest) = read_manifest(&manifest_path(project_root))? else {
        return Ok(Vec::new());
    };
    Ok(manifest
        .get(ADDON_KEY)
        .and_then(|addon| addon.get(PATHS_KEY))
        .and_then(Value::as_array)
        .map(|paths| paths.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default())
}

/// Adds `entry` to `ember-addon.paths`. Returns whether the file changed.
///
/// # Errors
///
/// `Manifest` if there is no `package.json` or it has an unexpected shape.
pub fn add_addon_path(project_root: &Path, entry: &str) -> Result<bool> {
    let path = manifest_path(project_root);
    let mut manifest = read_manifest(&path)?.ok_or_else(|| {
        StencilError::Manifest(format!(
            "no {} in {}; an in-repo addon needs a host project",
            MANIFEST_FILENAME,
            project_root.display()
        ))
    })?;

    let addon = manifest
        .entry(ADDON_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| StencilError::Manifest(format!("'{}' must be an object", ADDON_KEY)))?;
    let mut paths = string_entries(addon.get(PATHS_KEY))?;
    if paths.iter().any(|p| p == entry) {
        debug!("{} already lists {}", MANIFEST_FILENAME, entry);
        return Ok(false);
    }
    paths.push(entry.to_string());
    paths.sort();
    paths.dedup();
    addon.insert(
        PATHS_KEY.to_string(),
        Value::Array(paths.into_iter().map(Value::String).collect()),
    );

    write_manifest(&path, &manifest)?;
    Ok(true)
}

/// Removes `entry` from `ember-addon.paths`. Returns whether the file changed.
pub fn remove_addon_path(project_root: &Path, entry: &str) -> Result<bool> {
    let path = manifest_path(project_root);
    let Some(mut manifest) = read_manifest(&path)? else {
        return Ok(false);
    };
    let Some(addon) = manifest.get_mut(ADDON_KEY).and_then(Value::as_object_mut) else {
        return Ok(false);
    };

    let mut paths = string_entries(addon.get(PATHS_KEY))?;
    let before = paths.len();
    paths.retain(|p| p != entry);
    if paths.len() == before {
        return Ok(false);
    }

    if paths.is_empty() {
        addon.remove(PATHS_KEY);
    } else {
        addon.insert(
            PATHS_KEY.to_string(),
            Value::Array(paths.into_iter().map(Value::String).collect()),
        );
    }
    if addon.is_empty() {
        manifest.remove(ADDON_KEY);
    }

    write_manifest(&path, &manifest)?;
    Ok(true)
}

fn string_entries(value: Option<&Value>) -> Result<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    anyhow!(StencilError::Manifest(format!(
                        "'{}.{}' must only contain strings",
                        ADDON_KEY, PATHS_KEY
                    )))
                })
            })
            .collect(),
        Some(_) => Err(StencilError::Manifest(format!(
            "'{}.{}' must be an array",
            ADDON_KEY, PATHS_KEY
        ))
        .into()),
    }
}
