//! # Template Tree Enumeration
//!
//! File: cli/src/core/blueprint/template.rs
//!
//! Walks a blueprint's `files/` directory and lists the template files in a
//! stable order (sorted by file name at every level). Ignored files are
//! dropped here, before path mapping. Directories themselves produce nothing:
//! they are recreated on demand when files are written.
//!
use crate::core::blueprint::path_mapper::PathMappingConfig;
use crate::core::error::{StencilError, Result};
use anyhow::anyhow;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One file inside a blueprint's template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// `/`-separated path relative to the template root, tokens included.
    pub template_relative_path: String,
    pub absolute_source_path: PathBuf,
}

/// Lists the regular files below `template_root` in enumeration order.
///
/// A missing template root yields an empty list (a blueprint may consist of
/// hooks only). Any other walk failure is a `FileSystem` error.
pub fn enumerate_templates(template_root: &Path, config: &PathMappingConfig) -> Result<Vec<TemplateFile>> {
    if !template_root.exists() {
        debug!("No template directory at {}", template_root.display());
        return Ok(Vec::new());
    }

    let mut templates = Vec::new();
    for entry_result in WalkDir::new(template_root).sort_by_file_name() {
        let entry = entry_result.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| template_root.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop in template tree"));
            anyhow!(StencilError::file_system(path, source))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(template_root)
            .map_err(|e| anyhow!("Template '{}' is outside its root: {}", entry.path().display(), e))?;
        let template_relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if config.is_ignored(&template_relative_path) {
            debug!("Ignoring template file: {}", template_relative_path);
            continue;
        }

        templates.push(TemplateFile {
            template_relative_path,
            absolute_source_path: entry.path().to_path_buf(),
        });
    }
    Ok(templates)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_enumerates_in_stable_order_and_skips_ignored() -> Result<()> {
        let dir = tempdir()?;
        touch(dir.path(), "__root__/__path__/__name__.js");
        touch(dir.path(), "__root__/templates/__name__.hbs");
        touch(dir.path(), "__root__/.DS_Store");
        touch(dir.path(), "README.md");
        fs::create_dir_all(dir.path().join("empty/dir"))?;

        let config = PathMappingConfig::standard()?;
        let listed: Vec<String> = enumerate_templates(dir.path(), &config)?
            .into_iter()
            .map(|t| t.template_relative_path)
            .collect();

        assert_eq!(
            listed,
            vec![
                "README.md",
                "__root__/__path__/__name__.js",
                "__root__/templates/__name__.hbs",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_missing_root_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let config = PathMappingConfig::standard()?;
        assert!(enumerate_templates(&dir.path().join("files"), &config)?.is_empty());
        Ok(())
    }
}
