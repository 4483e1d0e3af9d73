//! # Stencil Template System
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! This module implements the template rendering used by the blueprint engine.
//! The engine itself treats rendering as an opaque, pure function:
//! `render(template path, variables) -> bytes`. Everything that knows about the
//! template language lives here.
//!
//! ## Architecture
//!
//! - `TemplateRenderer`: the trait the engine depends on
//! - `TeraRenderer`: evaluates `<%= expr %>` tags in UTF-8 files with the Tera
//!   engine and passes anything that is not valid UTF-8 (images, fonts,
//!   archives) through untouched. Text outside the tags is never interpreted,
//!   so Handlebars templates keep their `{{ }}` blocks.
//! - Naming helpers (`dasherize`, `to_camel_case`, ...) used to derive the
//!   module-name variables exposed to templates
//!
//! ## Examples
//!
//! ```rust
//! let mut vars = TemplateVariables::new();
//! vars.insert("camelizedModuleName".to_string(), "fooBar".to_string());
//!
//! let bytes = TeraRenderer.render(Path::new("files/__name__.js"), &vars)?;
//! ```
//!
use crate::core::error::{StencilError, Result};
use anyhow::{anyhow, Context};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::Tera;
use tracing::debug;

/// Variables handed to the template engine. Insertion order is irrelevant.
pub type TemplateVariables = HashMap<String, String>;

/// Renders one template file with a set of variables.
///
/// Implementations must be deterministic: the engine memoizes the result per
/// file and compares it byte-for-byte against files already on disk.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template_path: &Path, variables: &TemplateVariables) -> Result<Vec<u8>>;
}

/// Opening delimiter of an interpolation tag.
const TAG_OPEN: &str = "<%=";
/// Closing delimiter of an interpolation tag.
const TAG_CLOSE: &str = "%>";

/// Tera-backed renderer with a raw passthrough for binary files.
///
/// Only `<%= expr %>` tags are rendered; `expr` is a Tera expression, so
/// filters work (`<%= name | upper %>`). Everything outside the tags, including
/// Handlebars `{{ }}` blocks, is copied verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraRenderer;

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template_path: &Path, variables: &TemplateVariables) -> Result<Vec<u8>> {
        let raw = fs::read(template_path).map_err(|e| {
            anyhow!(StencilError::file_system(template_path, e))
                .context("Failed to read template file")
        })?;

        let text = match String::from_utf8(raw) {
            Ok(text) => text,
            Err(not_utf8) => {
                debug!(
                    "Passing binary template through unrendered: {}",
                    template_path.display()
                );
                return Ok(not_utf8.into_bytes());
            }
        };

        let context = tera::Context::from_serialize(variables).map_err(|e| {
            anyhow!(StencilError::Template { source: e })
                .context("Failed to create Tera context from map")
        })?;
        let rendered = render_tags(&text, &context)
            .map_err(|e| anyhow!(StencilError::Template { source: e }))
            .with_context(|| {
                format!(
                    "Tera rendering failed for template file '{}'",
                    template_path.display()
                )
            })?;
        Ok(rendered.into_bytes())
    }
}

/// Replaces every `<%= expr %>` in `text` with `expr` evaluated by Tera.
fn render_tags(text: &str, context: &tera::Context) -> std::result::Result<String, tera::Error> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(TAG_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + TAG_OPEN.len()..];
        let end = after_open.find(TAG_CLOSE).ok_or_else(|| {
            tera::Error::msg(format!("Unclosed '{}' tag at byte {}", TAG_OPEN, text.len() - rest.len() + start))
        })?;
        let expr = after_open[..end].trim();
        if expr.is_empty() {
            return Err(tera::Error::msg(format!("Empty '{} {}' tag", TAG_OPEN, TAG_CLOSE)));
        }
        out.push_str(&Tera::one_off(&format!("{{{{ {} }}}}", expr), context, false)?);
        rest = &after_open[end + TAG_CLOSE.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

// --- Case Conversion Helpers ---
// Used to derive `dasherizedModuleName`, `camelizedModuleName` and friends
// from the entity name given on the command line.

/// Converts camelCase / PascalCase / snake_case input into lower_snake_case,
/// inserting an underscore at every lower-to-upper boundary.
pub fn decamelize(input: &str) -> String {
    let mut result = String::with_capacity(input.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in input.chars() {
        if c.is_ascii_uppercase() && prev_lower_or_digit {
            result.push('_');
        }
        prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts input into kebab-case (`fooBar`, `foo_bar`, `foo bar` -> `foo-bar`).
/// Path separators are preserved.
pub fn dasherize(input: &str) -> String {
    decamelize(input).replace(|c: char| c == '_' || c == ' ', "-")
}

/// Converts a kebab-case or snake_case string to snake_case.
pub fn to_snake_case(input: &str) -> String {
    input.replace('-', "_").to_lowercase()
}

/// Converts a kebab-case or snake_case string to camelCase.
pub fn to_camel_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut capitalize_next = false;
    let mut first_word_char = true;

    for c in input.chars() {
        if c == '-' || c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
            first_word_char = false;
        } else if first_word_char {
            result.push(c.to_ascii_lowercase());
            first_word_char = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts a kebab-case or snake_case string to PascalCase (aka UpperCamelCase).
pub fn to_pascal_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut capitalize_next = true;

    for c in input.chars() {
        if c == '-' || c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}
