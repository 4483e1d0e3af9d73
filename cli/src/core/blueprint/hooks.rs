//! # Blueprint Hooks
//!
//! File: cli/src/core/blueprint/hooks.rs
//!
//! ## Overview
//!
//! Hooks let a blueprint customise a run without touching the engine:
//!
//! - `file_map_tokens`: the `__token__` values used for path mapping;
//! - `locals`: extra template variables;
//! - `before_install` / `after_install` / `before_uninstall` / `after_uninstall`:
//!   side effects around the commit.
//!
//! Every method has a default, so a blueprint only implements what it changes.
//!
//! ## Composition
//!
//! There is no inheritance between blueprints. `HooksBuilder` takes a base
//! implementation and stacks per-hook overrides on top of it; an override
//! runs after the base hook (and after earlier overrides for the same hook).
//!
//! ```rust
//! let hooks = HooksBuilder::new(InRepoAddonHooks)
//!     .after_uninstall(prune_emptied_dirs)
//!     .build();
//! ```
//!
//! Hooks that mutate the project skip the mutation in a dry run.
//!
use crate::common::fs::io;
use crate::core::blueprint::manifest;
use crate::core::blueprint::path_mapper::FileMapTokens;
use crate::core::blueprint::InstallOptions;
use crate::core::error::Result;
use crate::core::templating::{dasherize, TemplateVariables};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a hook may look at.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    pub project_root: &'a Path,
    pub blueprint_name: &'a str,
    /// The entity name exactly as given on the command line.
    pub entity_name: &'a str,
    pub options: &'a InstallOptions,
}

impl HookContext<'_> {
    pub fn dasherized_module_name(&self) -> String {
        dasherize(self.entity_name)
    }
}

pub trait BlueprintHooks: Send + Sync {
    fn file_map_tokens(&self, ctx: &HookContext<'_>) -> FileMapTokens {
        default_file_map_tokens(ctx)
    }

    fn locals(&self, _ctx: &HookContext<'_>) -> Result<TemplateVariables> {
        Ok(TemplateVariables::new())
    }

    fn before_install(&self, _ctx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// `files` are the destination paths of the committed plan.
    fn after_install(&self, _ctx: &HookContext<'_>, _files: &[PathBuf]) -> Result<()> {
        Ok(())
    }

    fn before_uninstall(&self, _ctx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// `files` are the destination paths that were removed.
    fn after_uninstall(&self, _ctx: &HookContext<'_>, _files: &[PathBuf]) -> Result<()> {
        Ok(())
    }
}

/// The standard `__name__`, `__path__`, `__root__` and `__test__` tokens.
///
/// - `__name__`: dasherized entity name, or the blueprint name for pods
/// - `__path__`: pluralized blueprint name, or `<pod_path>/<entity>` for pods
/// - `__root__`: `app`, `tests/dummy/app` (`--dummy`) or `lib/<addon>/addon`
///   (`--in-repo-addon`)
/// - `__test__`: `<entity>-test`
pub fn default_file_map_tokens(ctx: &HookContext<'_>) -> FileMapTokens {
    let options = ctx.options;
    let dasherized = ctx.dasherized_module_name();

    let (name, path) = if options.pod {
        let pod_dir = if options.pod_path.is_empty() {
            dasherized.clone()
        } else {
            format!("{}/{}", options.pod_path.trim_end_matches('/'), dasherized)
        };
        (ctx.blueprint_name.to_string(), pod_dir)
    } else {
        (dasherized.clone(), pluralize(ctx.blueprint_name))
    };

    let root = match (&options.in_repo_addon, options.dummy) {
        (Some(addon), _) => format!("lib/{}/addon", dasherize(addon)),
        (None, true) => "tests/dummy/app".to_string(),
        (None, false) => "app".to_string(),
    };

    let mut tokens = FileMapTokens::new();
    tokens.insert("__name__".to_string(), name);
    tokens.insert("__path__".to_string(), path);
    tokens.insert("__root__".to_string(), root);
    tokens.insert("__test__".to_string(), format!("{}-test", dasherized));
    tokens
}

fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Hooks for blueprints that need nothing special.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl BlueprintHooks for DefaultHooks {}

/// Registers / unregisters `lib/<name>` in `package.json` `ember-addon.paths`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InRepoAddonHooks;

impl InRepoAddonHooks {
    fn addon_path(ctx: &HookContext<'_>) -> String {
        format!("lib/{}", ctx.dasherized_module_name())
    }
}

impl BlueprintHooks for InRepoAddonHooks {
    fn file_map_tokens(&self, ctx: &HookContext<'_>) -> FileMapTokens {
        // The addon directory is always named after the entity, pods or not.
        let mut tokens = default_file_map_tokens(ctx);
        tokens.insert("__name__".to_string(), ctx.dasherized_module_name());
        tokens
    }

    fn locals(&self, ctx: &HookContext<'_>) -> Result<TemplateVariables> {
        let mut locals = TemplateVariables::new();
        locals.insert("addonPath".to_string(), Self::addon_path(ctx));
        Ok(locals)
    }

    fn after_install(&self, ctx: &HookContext<'_>, _files: &[PathBuf]) -> Result<()> {
        let entry = Self::addon_path(ctx);
        if ctx.options.dry_run {
            debug!("Dry run: not adding {} to {}", entry, manifest::MANIFEST_FILENAME);
            return Ok(());
        }
        if manifest::add_addon_path(ctx.project_root, &entry)? {
            info!("Added {} to {} ember-addon.paths", entry, manifest::MANIFEST_FILENAME);
        }
        Ok(())
    }

    fn after_uninstall(&self, ctx: &HookContext<'_>, _files: &[PathBuf]) -> Result<()> {
        let entry = Self::addon_path(ctx);
        if ctx.options.dry_run {
            debug!("Dry run: not removing {} from {}", entry, manifest::MANIFEST_FILENAME);
            return Ok(());
        }
        if manifest::remove_addon_path(ctx.project_root, &entry)? {
            info!("Removed {} from {} ember-addon.paths", entry, manifest::MANIFEST_FILENAME);
        }
        Ok(())
    }
}

/// Removes directories left empty by an uninstall, never above the project root.
///
/// Directories that were already empty before the install are removed too.
pub fn prune_emptied_dirs(ctx: &HookContext<'_>, files: &[PathBuf]) -> Result<()> {
    if ctx.options.dry_run {
        return Ok(());
    }
    let mut parents: Vec<&Path> = files.iter().filter_map(|f| f.parent()).collect();
    // Deepest first, so a parent is only looked at after all its children.
    parents.sort_by(|a, b| {
        b.components()
            .count()
            .cmp(&a.components().count())
            .then_with(|| a.cmp(b))
    });
    parents.dedup();

    let mut pruned = 0;
    for dir in parents {
        pruned += io::prune_empty_dirs(dir, ctx.project_root)?;
    }
    debug!("Pruned {} empty directories", pruned);
    Ok(())
}

type TokensHook = Box<dyn Fn(&HookContext<'_>, &mut FileMapTokens) + Send + Sync>;
type LocalsHook = Box<dyn Fn(&HookContext<'_>, &mut TemplateVariables) -> Result<()> + Send + Sync>;
type LifecycleHook = Box<dyn Fn(&HookContext<'_>) -> Result<()> + Send + Sync>;
type FilesHook = Box<dyn Fn(&HookContext<'_>, &[PathBuf]) -> Result<()> + Send + Sync>;

/// Stacks per-hook overrides on top of a base implementation.
pub struct HooksBuilder {
    base: Box<dyn BlueprintHooks>,
    tokens: Vec<TokensHook>,
    locals: Vec<LocalsHook>,
    before_install: Vec<LifecycleHook>,
    after_install: Vec<FilesHook>,
    before_uninstall: Vec<LifecycleHook>,
    after_uninstall: Vec<FilesHook>,
}

impl HooksBuilder {
    pub fn new(base: impl BlueprintHooks + 'static) -> Self {
        Self::from_boxed(Box::new(base))
    }

    pub fn from_boxed(base: Box<dyn BlueprintHooks>) -> Self {
        HooksBuilder {
            base,
            tokens: Vec::new(),
            locals: Vec::new(),
            before_install: Vec::new(),
            after_install: Vec::new(),
            before_uninstall: Vec::new(),
            after_uninstall: Vec::new(),
        }
    }

    /// Adjusts the token map after the base has produced it.
    pub fn file_map_tokens(
        mut self,
        hook: impl Fn(&HookContext<'_>, &mut FileMapTokens) + Send + Sync + 'static,
    ) -> Self {
        self.tokens.push(Box::new(hook));
        self
    }

    pub fn locals(
        mut self,
        hook: impl Fn(&HookContext<'_>, &mut TemplateVariables) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.locals.push(Box::new(hook));
        self
    }

    pub fn before_install(
        mut self,
        hook: impl Fn(&HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.before_install.push(Box::new(hook));
        self
    }

    pub fn after_install(
        mut self,
        hook: impl Fn(&HookContext<'_>, &[PathBuf]) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_install.push(Box::new(hook));
        self
    }

    pub fn before_uninstall(
        mut self,
        hook: impl Fn(&HookContext<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.before_uninstall.push(Box::new(hook));
        self
    }

    pub fn after_uninstall(
        mut self,
        hook: impl Fn(&HookContext<'_>, &[PathBuf]) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.after_uninstall.push(Box::new(hook));
        self
    }

    pub fn build(self) -> ComposedHooks {
        ComposedHooks { inner: self }
    }
}

/// The result of `HooksBuilder::build`.
pub struct ComposedHooks {
    inner: HooksBuilder,
}

impl BlueprintHooks for ComposedHooks {
    fn file_map_tokens(&self, ctx: &HookContext<'_>) -> FileMapTokens {
        let mut tokens = self.inner.base.file_map_tokens(ctx);
        for hook in &self.inner.tokens {
            hook(ctx, &mut tokens);
        }
        tokens
    }

    fn locals(&self, ctx: &HookContext<'_>) -> Result<TemplateVariables> {
        let mut locals = self.inner.base.locals(ctx)?;
        for hook in &self.inner.locals {
            hook(ctx, &mut locals)?;
        }
        Ok(locals)
    }

    fn before_install(&self, ctx: &HookContext<'_>) -> Result<()> {
        self.inner.base.before_install(ctx)?;
        self.inner.before_install.iter().try_for_each(|hook| hook(ctx))
    }

    fn after_install(&self, ctx: &HookContext<'_>, files: &[PathBuf]) -> Result<()> {
        self.inner.base.after_install(ctx, files)?;
        self.inner.after_install.iter().try_for_each(|hook| hook(ctx, files))
    }

    fn before_uninstall(&self, ctx: &HookContext<'_>) -> Result<()> {
        self.inner.base.before_uninstall(ctx)?;
        self.inner.before_uninstall.iter().try_for_each(|hook| hook(ctx))
    }

    fn after_uninstall(&self, ctx: &HookContext<'_>, files: &[PathBuf]) -> Result<()> {
        self.inner.base.after_uninstall(ctx, files)?;
        self.inner.after_uninstall.iter().try_for_each(|hook| hook(ctx, files))
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn ctx<'a>(root: &'a Path, blueprint: &'a str, entity: &'a str, options: &'a InstallOptions) -> HookContext<'a> {
        HookContext {
            project_root: root,
            blueprint_name: blueprint,
            entity_name: entity,
            options,
        }
    }

    fn token<'t>(tokens: &'t FileMapTokens, key: &str) -> &'t str {
        tokens.get(key).map(String::as_str).unwrap_or("<missing>")
    }

    #[test]
    fn test_default_tokens_classic_layout() {
        let options = InstallOptions::default();
        let tokens = default_file_map_tokens(&ctx(Path::new("/p"), "component", "blogPost", &options));
        assert_eq!(token(&tokens, "__name__"), "blog-post");
        assert_eq!(token(&tokens, "__path__"), "components");
        assert_eq!(token(&tokens, "__root__"), "app");
        assert_eq!(token(&tokens, "__test__"), "blog-post-test");

        let tokens = default_file_map_tokens(&ctx(Path::new("/p"), "modules", "foo", &options));
        assert_eq!(token(&tokens, "__path__"), "modules");
    }

    #[test]
    fn test_default_tokens_pod_layout() {
        let options = InstallOptions {
            pod: true,
            pod_path: "pods".to_string(),
            ..Default::default()
        };
        let tokens = default_file_map_tokens(&ctx(Path::new("/p"), "component", "foo-bar", &options));
        assert_eq!(token(&tokens, "__name__"), "component");
        assert_eq!(token(&tokens, "__path__"), "pods/foo-bar");
    }

    #[test]
    fn test_default_tokens_root_variants() {
        let addon = InstallOptions {
            in_repo_addon: Some("my-addon".to_string()),
            ..Default::default()
        };
        let tokens = default_file_map_tokens(&ctx(Path::new("/p"), "module", "foo", &addon));
        assert_eq!(token(&tokens, "__root__"), "lib/my-addon/addon");

        let dummy = InstallOptions {
            dummy: true,
            ..Default::default()
        };
        let tokens = default_file_map_tokens(&ctx(Path::new("/p"), "module", "foo", &dummy));
        assert_eq!(token(&tokens, "__root__"), "tests/dummy/app");
    }

    #[test]
    fn test_overrides_run_after_base_in_order() -> Result<()> {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        struct LoggingBase(Arc<Mutex<Vec<String>>>);
        impl BlueprintHooks for LoggingBase {
            fn before_install(&self, _ctx: &HookContext<'_>) -> Result<()> {
                self.0.lock().unwrap().push("base".to_string());
                Ok(())
            }
        }

        let first = log.clone();
        let second = log.clone();
        let hooks = HooksBuilder::new(LoggingBase(log.clone()))
            .before_install(move |_| {
                first.lock().unwrap().push("first".to_string());
                Ok(())
            })
            .before_install(move |_| {
                second.lock().unwrap().push("second".to_string());
                Ok(())
            })
            .file_map_tokens(|_, tokens| {
                tokens.insert("__styles__".to_string(), "styles".to_string());
            })
            .build();

        let options = InstallOptions::default();
        let c = ctx(Path::new("/p"), "module", "foo", &options);
        hooks.before_install(&c)?;
        assert_eq!(*log.lock().unwrap(), vec!["base", "first", "second"]);

        let tokens = hooks.file_map_tokens(&c);
        assert_eq!(token(&tokens, "__styles__"), "styles");
        assert_eq!(token(&tokens, "__name__"), "foo");
        Ok(())
    }

    #[test]
    fn test_in_repo_addon_hooks_update_manifest() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("package.json"), r#"{"name":"host"}"#)?;
        let options = InstallOptions {
            pod: true,
            ..Default::default()
        };
        let c = ctx(dir.path(), "in-repo-addon", "FooBar", &options);

        let tokens = InRepoAddonHooks.file_map_tokens(&c);
        assert_eq!(token(&tokens, "__name__"), "foo-bar");
        assert_eq!(InRepoAddonHooks.locals(&c)?.get("addonPath").map(String::as_str), Some("lib/foo-bar"));

        InRepoAddonHooks.after_install(&c, &[])?;
        assert_eq!(manifest::addon_paths(dir.path())?, vec!["lib/foo-bar"]);
        InRepoAddonHooks.after_uninstall(&c, &[])?;
        assert!(manifest::addon_paths(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_in_repo_addon_hooks_respect_dry_run() -> Result<()> {
        let dir = tempdir()?;
        let json = r#"{"name":"host"}"#;
        fs::write(dir.path().join("package.json"), json)?;
        let options = InstallOptions {
            dry_run: true,
            ..Default::default()
        };
        InRepoAddonHooks.after_install(&ctx(dir.path(), "in-repo-addon", "foo", &options), &[])?;
        assert_eq!(fs::read_to_string(dir.path().join("package.json"))?, json);
        Ok(())
    }

    #[test]
    fn test_prune_emptied_dirs() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("app/components/blog"))?;
        fs::create_dir_all(root.join("app/templates/components"))?;
        fs::write(root.join("app/router.js"), "")?;

        let options = InstallOptions::default();
        let removed = vec![
            root.join("app/components/blog/post.js"),
            root.join("app/templates/components/blog-post.hbs"),
        ];
        prune_emptied_dirs(&ctx(root, "component", "blog/post", &options), &removed)?;

        assert!(!root.join("app/components").exists());
        assert!(!root.join("app/templates").exists());
        assert!(root.join("app/router.js").exists());
        Ok(())
    }
}
