//! # Blueprint Engine
//!
//! File: cli/src/core/blueprint/mod.rs
//!
//! ## Overview
//!
//! A blueprint is a directory:
//!
//! ```text
//! module/
//! ├── blueprint.toml            (optional)
//! └── files/
//!     └── __root__/__path__/__name__.js
//! ```
//!
//! `install` renders its `files/` tree into a project and `uninstall` removes
//! what it would have created. Both run the same pipeline:
//!
//! 1. `registry` resolves the blueprint name to a directory
//! 2. `template` enumerates the template tree, `path_mapper` maps each path
//! 3. `classifier` compares each destination with the rendered content
//! 4. `resolver` asks about every conflict, one at a time
//! 5. `plan` fixes the action of every file
//! 6. `committer` mutates the filesystem and prints a status line per file
//!
//! `hooks` run around the commit (`before_install`, `after_uninstall`, ...).
//!
//! ## blueprint.toml
//!
//! ```toml
//! description = "A plain ES module"
//! hooks = "default"            # or "in-repo-addon"
//! prune_empty_dirs = true      # remove directories emptied by uninstall
//!
//! [locals]                     # extra template variables
//! framework = "ember"
//!
//! [tokens]                     # extra path tokens
//! __styles__ = "styles"
//! ```
//!
//! Nothing is recorded between runs, so pruning cannot tell a directory the
//! install created from one that was already there: any directory left empty
//! by `uninstall` is removed, up to but excluding the project root. Keep a
//! placeholder such as `.gitkeep` in directories that must survive, or set
//! `prune_empty_dirs = false`.
//!
pub mod classifier;
pub mod committer;
pub mod file_info;
pub mod hooks;
pub mod manifest;
pub mod path_mapper;
pub mod plan;
pub mod registry;
pub mod resolver;
pub mod template;

use crate::core::error::{StencilError, Result};
use crate::core::templating::{
    dasherize, to_camel_case, to_pascal_case, to_snake_case, TemplateVariables,
};
use anyhow::{anyhow, Context};
use chrono::{Datelike, Local};
use classifier::classify_all;
use committer::{CommitSummary, Committer};
use file_info::FileInfo;
use hooks::{BlueprintHooks, DefaultHooks, HookContext, HooksBuilder, InRepoAddonHooks};
use path_mapper::{FileMapTokens, PathMapper, PathMappingConfig};
use plan::InstallPlan;
use regex::Regex;
use resolver::{InteractiveResolver, Prompter};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use template::enumerate_templates;
use tracing::{debug, info, warn};

/// Name of the optional per-blueprint settings file.
pub const BLUEPRINT_MANIFEST: &str = "blueprint.toml";
/// Directory holding a blueprint's template tree.
pub const TEMPLATE_DIR: &str = "files";

/// Which built-in hooks a blueprint runs.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HooksPreset {
    #[default]
    Default,
    InRepoAddon,
}

impl fmt::Display for HooksPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HooksPreset::Default => "default",
            HooksPreset::InRepoAddon => "in-repo-addon",
        })
    }
}

/// Contents of `blueprint.toml`.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BlueprintManifest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hooks: HooksPreset,
    #[serde(default = "default_prune_empty_dirs")]
    pub prune_empty_dirs: bool,
    #[serde(default)]
    pub locals: BTreeMap<String, String>,
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

fn default_prune_empty_dirs() -> bool {
    true
}

impl Default for BlueprintManifest {
    fn default() -> Self {
        BlueprintManifest {
            description: String::new(),
            hooks: HooksPreset::Default,
            prune_empty_dirs: default_prune_empty_dirs(),
            locals: BTreeMap::new(),
            tokens: BTreeMap::new(),
        }
    }
}

/// Options shared by install and uninstall.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub pod: bool,
    /// Directory pods are grouped under (`generate.pod_path`).
    pub pod_path: String,
    pub in_repo_addon: Option<String>,
    pub dummy: bool,
    pub dry_run: bool,
    /// Re-running over an existing project: `.gitkeep` placeholders are ignored.
    pub update: bool,
    /// `--var KEY=VALUE` overrides, applied last.
    pub vars: Vec<(String, String)>,
    /// Extra ignore patterns (`generate.ignored_files`).
    pub ignored_files: Vec<String>,
}

/// Where and for what a blueprint runs.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub project_root: &'a Path,
    pub entity_name: &'a str,
    pub options: &'a InstallOptions,
}

/// Checks the entity name given on the command line.
///
/// Allowed: letters, digits, `-`, `_`, `.` and `/` as a separator; must start
/// with a letter; no empty, `.` or `..` segments.
pub fn validate_entity_name(name: &str) -> Result<()> {
    let problem = if name.is_empty() {
        Some("the name must not be empty".to_string())
    } else if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        Some("the name must start with a letter".to_string())
    } else if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
    {
        Some(format!("'{}' is not allowed in a name", bad))
    } else if name
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        Some("path segments must not be empty, '.' or '..'".to_string())
    } else {
        None
    };
    match problem {
        Some(message) => Err(StencilError::Validation(format!("Invalid name '{}': {}", name, message)).into()),
        None => Ok(()),
    }
}

/// A resolved blueprint: its directory, settings and hooks.
pub struct Blueprint {
    name: String,
    root: PathBuf,
    source_label: String,
    manifest: BlueprintManifest,
    hooks: Box<dyn BlueprintHooks>,
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("source_label", &self.source_label)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

impl Blueprint {
    /// Loads the blueprint in `root`, reading `blueprint.toml` if present.
    pub fn load(name: &str, root: &Path, source_label: &str) -> Result<Self> {
        let manifest_path = root.join(BLUEPRINT_MANIFEST);
        let manifest = match fs::read_to_string(&manifest_path) {
            Ok(content) => toml::from_str::<BlueprintManifest>(&content).map_err(|e| {
                anyhow!(StencilError::TemplateConfiguration {
                    path: manifest_path.clone(),
                    message: e.to_string(),
                })
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BlueprintManifest::default(),
            Err(e) => return Err(anyhow!(StencilError::file_system(&manifest_path, e))),
        };
        validate_tokens(&manifest_path, &manifest.tokens)?;

        let hooks = build_hooks(&manifest);
        debug!("Loaded blueprint '{}' from {}", name, root.display());
        Ok(Blueprint {
            name: name.to_string(),
            root: root.to_path_buf(),
            source_label: source_label.to_string(),
            manifest,
            hooks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn description(&self) -> &str {
        &self.manifest.description
    }

    pub fn manifest(&self) -> &BlueprintManifest {
        &self.manifest
    }

    pub fn template_root(&self) -> PathBuf {
        self.root.join(TEMPLATE_DIR)
    }

    fn hook_context<'a>(&'a self, target: &Target<'a>) -> HookContext<'a> {
        HookContext {
            project_root: target.project_root,
            blueprint_name: &self.name,
            entity_name: target.entity_name,
            options: target.options,
        }
    }

    /// The path mapping configuration for a run with `options`.
    pub fn mapping_config(&self, options: &InstallOptions) -> Result<PathMappingConfig> {
        let config = PathMappingConfig::standard()?.with_ignored(&options.ignored_files)?;
        if options.update {
            config.for_update()
        } else {
            Ok(config)
        }
    }

    /// Variables handed to every template of this run.
    ///
    /// Later sources win: derived names, `fileMap_*`, `[locals]`, hook locals,
    /// then `--var` overrides.
    pub fn template_variables(&self, target: &Target<'_>, tokens: &FileMapTokens) -> Result<TemplateVariables> {
        let ctx = self.hook_context(target);
        let dasherized = ctx.dasherized_module_name();
        let flat = dasherized.replace('/', "-");
        let package = package_name(target.project_root);
        let now = Local::now();

        let mut vars = TemplateVariables::new();
        vars.insert("dasherizedModuleName".to_string(), dasherized.clone());
        vars.insert("classifiedModuleName".to_string(), to_pascal_case(&flat));
        vars.insert("camelizedModuleName".to_string(), to_camel_case(&flat));
        vars.insert("decamelizedModuleName".to_string(), to_snake_case(&dasherized));
        vars.insert("dasherizedPackageName".to_string(), dasherize(&package));
        vars.insert("blueprintName".to_string(), self.name.clone());
        vars.insert("current_year".to_string(), now.year().to_string());
        vars.insert("current_date".to_string(), now.format("%Y-%m-%d").to_string());
        for (token, value) in tokens {
            vars.insert(format!("fileMap_{}", token.trim_matches('_')), value.clone());
        }
        vars.extend(self.manifest.locals.clone());
        vars.extend(self.hooks.locals(&ctx)?);
        vars.extend(target.options.vars.iter().cloned());
        Ok(vars)
    }

    /// Enumerates and maps the template tree into one FileInfo per file.
    ///
    /// # Errors
    ///
    /// `TemplateConfiguration` for unresolved tokens, escaping paths, or two
    /// templates mapping to the same destination.
    pub fn file_infos(&self, target: &Target<'_>) -> Result<Vec<FileInfo>> {
        let ctx = self.hook_context(target);
        let tokens = self.hooks.file_map_tokens(&ctx);
        let variables = Arc::new(self.template_variables(target, &tokens)?);
        let mapping = self.mapping_config(target.options)?;
        let mapper = PathMapper::new(mapping)?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for template in enumerate_templates(&self.template_root(), mapper.config())? {
            let mapped = mapper.map_path(&template.template_relative_path, &tokens)?;
            if !seen.insert(mapped.clone()) {
                return Err(StencilError::TemplateConfiguration {
                    path: PathBuf::from(&template.template_relative_path),
                    message: format!("another template already maps to '{}'", mapped),
                }
                .into());
            }
            let destination = target.project_root.join(&mapped);
            files.push(FileInfo::new(
                variables.clone(),
                template.absolute_source_path,
                destination,
                mapped,
            ));
        }
        debug!("Blueprint '{}' maps {} files", self.name, files.len());
        Ok(files)
    }

    /// Installs the blueprint into the target project.
    pub async fn install<P: Prompter, W: Write>(
        &self,
        target: &Target<'_>,
        prompter: &mut P,
        committer: &mut Committer<'_, W>,
    ) -> Result<CommitSummary> {
        validate_entity_name(target.entity_name)?;
        let dry_run = target.options.dry_run;
        let ctx = self.hook_context(target);
        info!(
            "Installing blueprint '{}' for '{}'{}",
            self.name,
            target.entity_name,
            if dry_run { " (dry run)" } else { "" }
        );

        self.hooks.before_install(&ctx).context("before_install hook failed")?;

        let mut files = self.file_infos(target)?;
        let renderer = committer.renderer();
        classify_all(&mut files, renderer).await?;
        let decisions = InteractiveResolver::new(prompter, renderer, dry_run)
            .resolve_all(&mut files)
            .await?;
        let plan = InstallPlan::for_install(files, &decisions)?;
        info!("{} of {} files to write", plan.pending_writes(), plan.len());

        let summary = committer.commit(&plan, dry_run).await?;
        let destinations = destinations(&plan);
        self.hooks
            .after_install(&ctx, &destinations)
            .context("after_install hook failed")?;
        Ok(summary)
    }

    /// Removes every file the blueprint would create for the target.
    ///
    /// Files are removed by template membership: a destination that was
    /// edited after generation is removed all the same.
    pub async fn uninstall<W: Write>(
        &self,
        target: &Target<'_>,
        committer: &mut Committer<'_, W>,
    ) -> Result<CommitSummary> {
        validate_entity_name(target.entity_name)?;
        let ctx = self.hook_context(target);
        info!("Uninstalling blueprint '{}' for '{}'", self.name, target.entity_name);

        self.hooks
            .before_uninstall(&ctx)
            .context("before_uninstall hook failed")?;

        let plan = InstallPlan::for_uninstall(self.file_infos(target)?)?;
        if plan.is_empty() {
            warn!("Blueprint '{}' has no template files to remove", self.name);
        }
        let summary = committer.commit(&plan, target.options.dry_run).await?;
        let destinations = destinations(&plan);
        self.hooks
            .after_uninstall(&ctx, &destinations)
            .context("after_uninstall hook failed")?;
        Ok(summary)
    }
}

fn destinations(plan: &InstallPlan) -> Vec<PathBuf> {
    plan.files()
        .iter()
        .map(|f| f.destination_path().to_path_buf())
        .collect()
}

fn build_hooks(manifest: &BlueprintManifest) -> Box<dyn BlueprintHooks> {
    let mut builder = match manifest.hooks {
        HooksPreset::Default => HooksBuilder::new(DefaultHooks),
        HooksPreset::InRepoAddon => HooksBuilder::new(InRepoAddonHooks),
    };
    if !manifest.tokens.is_empty() {
        let extra = manifest.tokens.clone();
        builder = builder.file_map_tokens(move |_, tokens| {
            tokens.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        });
    }
    if manifest.prune_empty_dirs {
        builder = builder.after_uninstall(hooks::prune_emptied_dirs);
    }
    Box::new(builder.build())
}

fn validate_tokens(manifest_path: &Path, tokens: &BTreeMap<String, String>) -> Result<()> {
    let token_pattern = Regex::new(r"^__[A-Za-z][A-Za-z0-9]*__$")?;
    for name in tokens.keys() {
        if !token_pattern.is_match(name) {
            return Err(StencilError::TemplateConfiguration {
                path: manifest_path.to_path_buf(),
                message: format!("token '{}' must look like __word__", name),
            }
            .into());
        }
    }
    Ok(())
}

/// `package.json` name, falling back to the project directory name when the
/// file is missing, has no name or cannot be read.
fn package_name(project_root: &Path) -> String {
    match manifest::package_name(project_root) {
        Ok(Some(name)) => return name,
        Ok(None) => {}
        Err(e) => warn!(
            "Ignoring unreadable {} for the package name: {:#}",
            manifest::MANIFEST_FILENAME,
            e
        ),
    }
    project_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::kind_of;
    use crate::core::templating::TeraRenderer;
    use resolver::{Policy, PolicyPrompter};
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A `component`-like blueprint with a script, a template and a test.
    fn component_blueprint(root: &Path) -> Blueprint {
        let bp = root.join("component");
        write(
            &bp.join("blueprint.toml"),
            "description = \"A component\"\n[locals]\nauthor = \"stencil\"\n",
        );
        write(
            &bp.join("files/__root__/__path__/__name__.js"),
            "export default class <%= classifiedModuleName %> {}\n",
        );
        write(
            &bp.join("files/__root__/templates/__path__/__name__.hbs"),
            "<div class=\"<%= dasherizedModuleName %>\"></div>\n",
        );
        write(
            &bp.join("files/tests/__test__.js"),
            "// <%= author %>: <%= fileMap_root %>/<%= fileMap_path %>\n",
        );
        Blueprint::load("component", &bp, "built-in").unwrap()
    }

    async fn run_install(bp: &Blueprint, target: &Target<'_>) -> Result<String> {
        let mut prompter = PolicyPrompter::new(Policy::SkipAll);
        let mut committer = Committer::new(&TeraRenderer, Vec::new(), false);
        bp.install(target, &mut prompter, &mut committer).await?;
        Ok(String::from_utf8(committer.into_inner())?)
    }

    async fn run_uninstall(bp: &Blueprint, target: &Target<'_>) -> Result<String> {
        let mut committer = Committer::new(&TeraRenderer, Vec::new(), false);
        bp.uninstall(target, &mut committer).await?;
        Ok(String::from_utf8(committer.into_inner())?)
    }

    #[test]
    fn test_validate_entity_name() {
        for ok in ["foo", "fooBar", "blog/post", "x-1.2_b"] {
            assert!(validate_entity_name(ok).is_ok(), "{}", ok);
        }
        for bad in ["", "1foo", "-foo", "foo bar", "foo//bar", "foo/../bar", "foo/", "/foo", "foo/./bar", "café"] {
            let err = validate_entity_name(bad).unwrap_err();
            assert!(matches!(kind_of(&err), Some(StencilError::Validation(_))), "{}", bad);
        }
    }

    #[test]
    fn test_template_variables() -> Result<()> {
        let dir = tempdir()?;
        let bp = component_blueprint(dir.path());
        let project = dir.path().join("my-app");
        write(&project.join("package.json"), r#"{"name":"MyApp"}"#);
        let options = InstallOptions {
            vars: vec![("author".to_string(), "override".to_string())],
            ..Default::default()
        };
        let target = Target {
            project_root: &project,
            entity_name: "blog/fancyPost",
            options: &options,
        };
        let ctx = bp.hook_context(&target);
        let tokens = bp.hooks.file_map_tokens(&ctx);
        let vars = bp.template_variables(&target, &tokens)?;

        let get = |k: &str| vars.get(k).map(String::as_str);
        assert_eq!(get("dasherizedModuleName"), Some("blog/fancy-post"));
        assert_eq!(get("classifiedModuleName"), Some("BlogFancyPost"));
        assert_eq!(get("camelizedModuleName"), Some("blogFancyPost"));
        assert_eq!(get("decamelizedModuleName"), Some("blog/fancy_post"));
        assert_eq!(get("dasherizedPackageName"), Some("my-app"));
        assert_eq!(get("blueprintName"), Some("component"));
        assert_eq!(get("fileMap_path"), Some("components"));
        assert_eq!(get("author"), Some("override"));
        Ok(())
    }

    #[test]
    fn test_malformed_package_json_falls_back_to_dir_name() -> Result<()> {
        let dir = tempdir()?;
        let bp = component_blueprint(dir.path());
        let project = dir.path().join("broken-app");
        write(&project.join("package.json"), "{ \"name\": ");
        let options = InstallOptions::default();
        let target = Target {
            project_root: &project,
            entity_name: "foo",
            options: &options,
        };
        let ctx = bp.hook_context(&target);
        let tokens = bp.hooks.file_map_tokens(&ctx);
        let vars = bp.template_variables(&target, &tokens)?;
        assert_eq!(vars.get("dasherizedPackageName").map(String::as_str), Some("broken-app"));

        write(&project.join("package.json"), "[]");
        let vars = bp.template_variables(&target, &tokens)?;
        assert_eq!(vars.get("dasherizedPackageName").map(String::as_str), Some("broken-app"));
        Ok(())
    }

    #[test]
    fn test_file_infos_map_destinations() -> Result<()> {
        let dir = tempdir()?;
        let bp = component_blueprint(dir.path());
        let project = dir.path().join("app-root");
        let options = InstallOptions::default();
        let target = Target {
            project_root: &project,
            entity_name: "fooBar",
            options: &options,
        };
        let displays: Vec<String> = bp
            .file_infos(&target)?
            .iter()
            .map(|f| f.display_path().to_string())
            .collect();
        assert_eq!(
            displays,
            vec![
                "app/components/foo-bar.js",
                "app/templates/components/foo-bar.hbs",
                "tests/foo-bar-test.js",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_manifest_settings() -> Result<()> {
        let dir = tempdir()?;
        let bp = dir.path().join("addon");
        write(
            &bp.join("blueprint.toml"),
            "hooks = \"in-repo-addon\"\nprune_empty_dirs = false\n[tokens]\n__styles__ = \"styles\"\n",
        );
        let loaded = Blueprint::load("addon", &bp, "project")?;
        assert_eq!(loaded.manifest().hooks, HooksPreset::InRepoAddon);
        assert!(!loaded.manifest().prune_empty_dirs);

        write(&bp.join("blueprint.toml"), "[tokens]\nstyles = \"x\"\n");
        let err = Blueprint::load("addon", &bp, "project").unwrap_err();
        assert!(matches!(kind_of(&err), Some(StencilError::TemplateConfiguration { .. })));

        write(&bp.join("blueprint.toml"), "descripton = \"typo\"\n");
        assert!(Blueprint::load("addon", &bp, "project").is_err());
        Ok(())
    }

    #[test]
    fn test_duplicate_destination_rejected() -> Result<()> {
        let dir = tempdir()?;
        let bp = dir.path().join("dup");
        write(&bp.join("files/__name__.js"), "a");
        write(&bp.join("files/foo.js"), "b");
        let loaded = Blueprint::load("dup", &bp, "project")?;
        let options = InstallOptions::default();
        let project = dir.path().join("p");
        let target = Target {
            project_root: &project,
            entity_name: "foo",
            options: &options,
        };
        let err = loaded.file_infos(&target).unwrap_err();
        assert!(err.to_string().contains("already maps to 'foo.js'"));
        Ok(())
    }

    #[tokio::test]
    async fn test_install_then_uninstall_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let bp = component_blueprint(dir.path());
        let project = dir.path().join("project");
        write(&project.join("app/app.js"), "// existing\n");
        let options = InstallOptions::default();
        let target = Target {
            project_root: &project,
            entity_name: "fooBar",
            options: &options,
        };

        let out = run_install(&bp, &target).await?;
        assert_eq!(
            out,
            "  create app/components/foo-bar.js\n  create app/templates/components/foo-bar.hbs\n  create tests/foo-bar-test.js\n"
        );
        assert_eq!(
            fs::read_to_string(project.join("app/components/foo-bar.js"))?,
            "export default class FooBar {}\n"
        );
        assert_eq!(
            fs::read_to_string(project.join("tests/foo-bar-test.js"))?,
            "// stencil: app/components\n"
        );

        // A second install finds everything identical.
        let out = run_install(&bp, &target).await?;
        assert!(out.lines().all(|l| l.starts_with("  identical ")), "{}", out);

        let out = run_uninstall(&bp, &target).await?;
        assert_eq!(out.lines().count(), 3);
        assert!(out.lines().all(|l| l.starts_with("  remove ")));
        assert!(!project.join("app/components").exists());
        assert!(!project.join("app/templates").exists());
        assert!(!project.join("tests").exists());
        assert!(project.join("app/app.js").exists());

        // Uninstalling again is harmless.
        run_uninstall(&bp, &target).await?;
        assert!(project.join("app/app.js").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_uninstall_prunes_only_empty_dirs() -> Result<()> {
        let dir = tempdir()?;
        let bp = component_blueprint(dir.path());
        let project = dir.path().join("project");
        fs::create_dir_all(project.join("app/components"))?;
        write(&project.join("tests/.gitkeep"), "");
        let options = InstallOptions::default();
        let target = Target {
            project_root: &project,
            entity_name: "foo",
            options: &options,
        };

        run_install(&bp, &target).await?;
        run_uninstall(&bp, &target).await?;
        assert!(!project.join("app").exists());
        assert!(project.join("tests/.gitkeep").exists());

        fs::create_dir_all(project.join("app/components"))?;
        write(&dir.path().join("component/blueprint.toml"), "prune_empty_dirs = false\n[locals]\nauthor = \"stencil\"\n");
        let keep = Blueprint::load("component", &dir.path().join("component"), "built-in")?;
        run_install(&keep, &target).await?;
        run_uninstall(&keep, &target).await?;
        assert!(project.join("app/components").is_dir());
        assert!(!project.join("app/components/foo.js").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_dry_run_install_touches_nothing() -> Result<()> {
        let dir = tempdir()?;
        let bp = component_blueprint(dir.path());
        let project = dir.path().join("project");
        fs::create_dir_all(&project)?;
        let options = InstallOptions {
            dry_run: true,
            ..Default::default()
        };
        let target = Target {
            project_root: &project,
            entity_name: "fooBar",
            options: &options,
        };
        let out = run_install(&bp, &target).await?;
        assert_eq!(out.lines().count(), 3);
        assert!(fs::read_dir(&project)?.next().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_mode_ignores_gitkeep() -> Result<()> {
        let dir = tempdir()?;
        let bp_root = dir.path().join("keep");
        write(&bp_root.join("files/app/styles/.gitkeep"), "");
        write(&bp_root.join("files/app/__name__.js"), "x\n");
        let bp = Blueprint::load("keep", &bp_root, "project")?;
        let project = dir.path().join("project");

        let options = InstallOptions {
            update: true,
            ..Default::default()
        };
        let target = Target {
            project_root: &project,
            entity_name: "foo",
            options: &options,
        };
        let out = run_install(&bp, &target).await?;
        assert_eq!(out, "  create app/foo.js\n");
        Ok(())
    }
}
