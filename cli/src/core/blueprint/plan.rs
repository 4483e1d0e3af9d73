//! # Install Plan
//!
//! File: cli/src/core/blueprint/plan.rs
//!
//! ## Overview
//!
//! An `InstallPlan` is the ordered list of `FileInfo`s with their final
//! actions, ready to hand to the committer. Order is enumeration order and is
//! never changed after construction.
//!
//! ## Action derivation (install)
//!
//! | resolution  | action                                   |
//! |-------------|------------------------------------------|
//! | `None`      | `Write`                                  |
//! | `Identical` | `Skip`                                   |
//! | `Confirm`   | the `ConflictDecision` made for the file |
//!
//! Uninstall marks every file `Remove` without classifying anything.
//!
use crate::core::blueprint::file_info::{Action, FileInfo, Resolution};
use crate::core::error::{StencilError, Result};
use std::collections::HashMap;

/// The outcome of one conflict prompt: which file, which action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictDecision {
    /// Index into the plan's file list.
    pub index: usize,
    pub action: Action,
}

#[derive(Debug)]
pub struct InstallPlan {
    files: Vec<FileInfo>,
}

impl InstallPlan {
    /// Finalizes install actions for classified files.
    ///
    /// # Errors
    ///
    /// - `UnplannedAction` if a conflicting file has no decision.
    /// - `InvalidTransition` if a decision is illegal for the file's resolution.
    pub fn for_install(mut files: Vec<FileInfo>, decisions: &[ConflictDecision]) -> Result<Self> {
        let decided: HashMap<usize, Action> = decisions.iter().map(|d| (d.index, d.action)).collect();

        for (index, file) in files.iter_mut().enumerate() {
            let action = match file.resolution() {
                Some(Resolution::None) => Action::Write,
                Some(Resolution::Identical) => Action::Skip,
                Some(Resolution::Confirm) => match decided.get(&index) {
                    Some(action) => *action,
                    None => {
                        return Err(StencilError::UnplannedAction {
                            path: file.display_path().to_string(),
                        }
                        .into())
                    }
                },
                None => {
                    return Err(StencilError::UnplannedAction {
                        path: file.display_path().to_string(),
                    }
                    .into())
                }
            };
            file.set_action(action)?;
        }
        Ok(InstallPlan { files })
    }

    /// Marks every file for removal.
    pub fn for_uninstall(mut files: Vec<FileInfo>) -> Result<Self> {
        for file in files.iter_mut() {
            file.set_action(Action::Remove)?;
        }
        Ok(InstallPlan { files })
    }

    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files that will be created or replaced on commit.
    pub fn pending_writes(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.action(), Some(Action::Write | Action::Overwrite)))
            .count()
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::kind_of;
    use crate::core::templating::TemplateVariables;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn file(name: &str, resolution: Option<Resolution>) -> FileInfo {
        let mut info = FileInfo::new(
            Arc::new(TemplateVariables::new()),
            PathBuf::from(format!("/bp/files/{}", name)),
            PathBuf::from(format!("/project/{}", name)),
            name.to_string(),
        );
        if let Some(resolution) = resolution {
            info.set_resolution(resolution);
        }
        info
    }

    #[test]
    fn test_install_actions_follow_resolution_and_decisions() {
        let files = vec![
            file("a.js", Some(Resolution::None)),
            file("b.js", Some(Resolution::Identical)),
            file("c.js", Some(Resolution::Confirm)),
            file("d.js", Some(Resolution::Confirm)),
        ];
        let decisions = [
            ConflictDecision { index: 3, action: Action::Skip },
            ConflictDecision { index: 2, action: Action::Overwrite },
        ];
        let plan = InstallPlan::for_install(files, &decisions).unwrap();
        let actions: Vec<_> = plan.files().iter().map(|f| (f.display_path(), f.action())).collect();
        assert_eq!(
            actions,
            vec![
                ("a.js", Some(Action::Write)),
                ("b.js", Some(Action::Skip)),
                ("c.js", Some(Action::Overwrite)),
                ("d.js", Some(Action::Skip)),
            ]
        );
        assert_eq!(plan.pending_writes(), 2);
    }

    #[test]
    fn test_undecided_conflict_is_unplanned() {
        let files = vec![file("a.js", Some(Resolution::Confirm))];
        let err = InstallPlan::for_install(files, &[]).unwrap_err();
        assert!(matches!(kind_of(&err), Some(StencilError::UnplannedAction { path }) if path == "a.js"));
    }

    #[test]
    fn test_illegal_decision_is_rejected() {
        let files = vec![file("a.js", Some(Resolution::Identical))];
        let decisions = [ConflictDecision { index: 0, action: Action::Overwrite }];
        // Identical files ignore decisions and are always skipped.
        let plan = InstallPlan::for_install(files, &decisions).unwrap();
        assert_eq!(plan.files()[0].action(), Some(Action::Skip));

        let files = vec![file("b.js", Some(Resolution::Confirm))];
        let decisions = [ConflictDecision { index: 0, action: Action::Write }];
        let err = InstallPlan::for_install(files, &decisions).unwrap_err();
        assert!(matches!(kind_of(&err), Some(StencilError::InvalidTransition { .. })));
    }

    #[test]
    fn test_uninstall_marks_everything_remove() {
        let plan = InstallPlan::for_uninstall(vec![file("a.js", None), file("b.js", None)]).unwrap();
        assert!(plan.files().iter().all(|f| f.action() == Some(Action::Remove)));
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.pending_writes(), 0);
    }
}
