//! # FileInfo: the per-file record of an install or uninstall run
//!
//! File: cli/src/core/blueprint/file_info.rs
//!
//! ## Overview
//!
//! A `FileInfo` is created for every mapped template file at the start of a
//! run and flows through classification, conflict resolution, planning and
//! commit. It is discarded when the run ends.
//!
//! ## Invariants
//!
//! `set_action` enforces the legal combinations of `Resolution` and `Action`:
//!
//! | action      | required resolution                 |
//! |-------------|-------------------------------------|
//! | `Write`     | `None`                              |
//! | `Skip`      | `Identical` or `Confirm`            |
//! | `Overwrite` | `Confirm`                           |
//! | `Edit`      | `Confirm`                           |
//! | `Remove`    | any (uninstall does not classify)   |
//!
//! Rendered content is memoized: the renderer runs at most once per FileInfo.
//!
use crate::core::error::{StencilError, Result};
use crate::core::templating::{TemplateRenderer, TemplateVariables};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// How a destination file relates to the file the blueprint would write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Destination absent: fresh create.
    None,
    /// Destination holds exactly the rendered bytes.
    Identical,
    /// Destination differs: a decision is needed.
    Confirm,
}

/// The final operation decided for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Write,
    Skip,
    Overwrite,
    /// Merged content from an edit session was kept.
    Edit,
    Remove,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Write => "write",
            Action::Skip => "skip",
            Action::Overwrite => "overwrite",
            Action::Edit => "edit",
            Action::Remove => "remove",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct FileInfo {
    template_variables: Arc<TemplateVariables>,
    source_path: PathBuf,
    destination_path: PathBuf,
    display_path: String,
    action: Option<Action>,
    resolution: Option<Resolution>,
    rendered_content: OnceLock<Vec<u8>>,
    edited_content: Option<Vec<u8>>,
}

impl FileInfo {
    pub fn new(
        template_variables: Arc<TemplateVariables>,
        source_path: PathBuf,
        destination_path: PathBuf,
        display_path: String,
    ) -> Self {
        FileInfo {
            template_variables,
            source_path,
            destination_path,
            display_path,
            action: None,
            resolution: None,
            rendered_content: OnceLock::new(),
            edited_content: None,
        }
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Renders the template on first use and returns the cached bytes afterwards.
    pub fn rendered_content(&self, renderer: &dyn TemplateRenderer) -> Result<&[u8]> {
        if let Some(content) = self.rendered_content.get() {
            return Ok(content.as_slice());
        }
        let content = renderer.render(&self.source_path, &self.template_variables)?;
        Ok(self.rendered_content.get_or_init(|| content).as_slice())
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = Some(resolution);
    }

    /// Merged content produced by an edit session, if one succeeded.
    pub fn edited_content(&self) -> Option<&[u8]> {
        self.edited_content.as_deref()
    }

    pub fn record_edit(&mut self, merged: Vec<u8>) {
        self.edited_content = Some(merged);
    }

    /// Finalizes the action, rejecting combinations the resolution does not allow.
    pub fn set_action(&mut self, action: Action) -> Result<()> {
        let allowed = match (action, self.resolution) {
            (Action::Remove, _) => Ok(()),
            (_, None) => Err("the file has not been classified yet"),
            (Action::Write, Some(Resolution::None)) => Ok(()),
            (Action::Write, Some(_)) => Err("the destination already exists"),
            (Action::Skip, Some(Resolution::Identical | Resolution::Confirm)) => Ok(()),
            (Action::Skip, Some(Resolution::None)) => Err("there is nothing to skip"),
            (Action::Overwrite | Action::Edit, Some(Resolution::Confirm)) => Ok(()),
            (Action::Overwrite | Action::Edit, Some(_)) => {
                Err("only a conflicting file can be overwritten or edited")
            }
        };
        allowed.map_err(|reason| StencilError::InvalidTransition {
            path: self.display_path.clone(),
            action: action.to_string(),
            reason: reason.to_string(),
        })?;
        self.action = Some(action);
        Ok(())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRenderer {
        calls: AtomicUsize,
    }

    impl TemplateRenderer for CountingRenderer {
        fn render(&self, _path: &Path, variables: &TemplateVariables) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(variables
                .get("camelizedModuleName")
                .cloned()
                .unwrap_or_default()
                .into_bytes())
        }
    }

    fn info() -> FileInfo {
        let mut vars = TemplateVariables::new();
        vars.insert("camelizedModuleName".into(), "fooBar".into());
        FileInfo::new(
            Arc::new(vars),
            PathBuf::from("/bp/files/__name__.js"),
            PathBuf::from("/project/foo-bar.js"),
            "foo-bar.js".into(),
        )
    }

    #[test]
    fn test_rendered_content_is_memoized() {
        let renderer = CountingRenderer {
            calls: AtomicUsize::new(0),
        };
        let file = info();
        assert_eq!(file.rendered_content(&renderer).unwrap(), b"fooBar");
        assert_eq!(file.rendered_content(&renderer).unwrap(), b"fooBar");
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_action_requires_resolution() {
        let mut file = info();
        let err = file.set_action(Action::Write).unwrap_err();
        assert!(err.to_string().contains("not been classified"));
        assert_eq!(file.action(), None);
    }

    #[test]
    fn test_action_resolution_matrix() {
        let cases = [
            (Resolution::None, Action::Write, true),
            (Resolution::None, Action::Skip, false),
            (Resolution::None, Action::Overwrite, false),
            (Resolution::Identical, Action::Skip, true),
            (Resolution::Identical, Action::Write, false),
            (Resolution::Identical, Action::Overwrite, false),
            (Resolution::Confirm, Action::Overwrite, true),
            (Resolution::Confirm, Action::Skip, true),
            (Resolution::Confirm, Action::Edit, true),
            (Resolution::Confirm, Action::Write, false),
        ];
        for (resolution, action, ok) in cases {
            let mut file = info();
            file.set_resolution(resolution);
            assert_eq!(
                file.set_action(action).is_ok(),
                ok,
                "{:?} -> {:?}",
                resolution,
                action
            );
        }
    }

    #[test]
    fn test_remove_needs_no_resolution() {
        let mut file = info();
        file.set_action(Action::Remove).unwrap();
        assert_eq!(file.action(), Some(Action::Remove));
    }
}
