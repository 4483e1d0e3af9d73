//! # Integration Test Helpers
//!
//! File: cli/tests/common.rs
//!
//! `Project` is a throwaway host project (a temp dir with a `package.json`)
//! plus an isolated user config directory. `Project::cmd` runs the `stencil`
//! binary inside it against the bundled blueprints.
//!
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

pub fn stencil_cmd() -> Command {
    Command::cargo_bin("stencil").expect("Failed to find stencil binary for testing")
}

/// The blueprints shipped with the crate.
pub fn builtin_blueprints() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("blueprints")
}

pub struct Project {
    dir: TempDir,
    config_home: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempdir().expect("Failed to create project dir");
        let config_home = tempdir().expect("Failed to create config dir");
        fs::write(
            dir.path().join("package.json"),
            "{\n  \"name\": \"my-app\",\n  \"version\": \"0.0.0\"\n}\n",
        )
        .expect("Failed to write package.json");
        Project { dir, config_home }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = stencil_cmd();
        cmd.current_dir(self.path())
            .env("STENCIL_BLUEPRINTS_DIR", builtin_blueprints())
            .env("XDG_CONFIG_HOME", self.config_home.path())
            .env("HOME", self.config_home.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }
}
