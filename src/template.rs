//! Template storage, substitution context and rendering.
//! Templates are bundled into the binary and rendered with MiniJinja,
//! using `{{ NAME }}` placeholders looked up in a flat [`SubstitutionContext`].

use std::io::Write;

use indexmap::IndexMap;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::{Error, Result};

/// Placeholder carrying the module identifier.
pub const MODULE_KEY: &str = "MODULE";
/// Placeholder carrying the server port.
pub const PORT_KEY: &str = "PORT";

static EMBEDDED: [(&str, &str); 4] = [
    ("app.go.tmpl", include_str!("../templates/app.go.tmpl")),
    ("router.go.tmpl", include_str!("../templates/router.go.tmpl")),
    ("serverConfig.go.tmpl", include_str!("../templates/serverConfig.go.tmpl")),
    ("logger.go.tmpl", include_str!("../templates/logger.go.tmpl")),
];

/// Read-only keyed store of template source text.
pub trait TemplateStore {
    /// Returns the raw source for `id`, or `None` when it is not bundled.
    fn get(&self, id: &str) -> Option<&str>;
}

/// Templates compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Identifiers of every bundled template.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(id, _)| *id)
    }
}

impl TemplateStore for EmbeddedTemplates {
    fn get(&self, id: &str) -> Option<&str> {
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == id)
            .map(|(_, source)| *source)
    }
}

impl TemplateStore for IndexMap<String, String> {
    fn get(&self, id: &str) -> Option<&str> {
        IndexMap::get(self, id).map(String::as_str)
    }
}

/// Flat, ordered mapping from placeholder name to replacement text.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubstitutionContext {
    values: IndexMap<String, String>,
}

impl SubstitutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a placeholder value.
    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Parses `source` and checks that every placeholder it references is
    /// present in `context`.
    ///
    /// # Errors
    /// * `Error::TemplateSyntaxError` on malformed syntax or an unknown placeholder
    fn compile(&self, name: &str, source: &str, context: &SubstitutionContext) -> Result<()>;

    /// Renders `source` and streams the output into `out`.
    fn render_to(
        &self,
        name: &str,
        source: &str,
        context: &SubstitutionContext,
        out: &mut dyn Write,
    ) -> Result<()>;

    /// Renders `source` into a string.
    fn render(&self, name: &str, source: &str, context: &SubstitutionContext) -> Result<String> {
        let mut buf = Vec::new();
        self.render_to(name, source, context, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::NonUtf8Output {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// MiniJinja-based template rendering engine.
///
/// Literal text passes through untouched, including the final newline.
/// Placeholders not present in the context are rejected at compile time.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }

    /// Clones the base environment and registers `source` under `name`.
    fn environment_with(&self, name: &str, source: &str) -> Result<Environment<'static>> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), source.to_string())
            .map_err(|e| syntax_error(name, e))?;
        Ok(env)
    }
}

fn syntax_error(name: &str, err: minijinja::Error) -> Error {
    Error::TemplateSyntaxError {
        name: name.to_string(),
        reason: err.to_string(),
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn compile(&self, name: &str, source: &str, context: &SubstitutionContext) -> Result<()> {
        let env = self.environment_with(name, source)?;
        let tmpl = env.get_template(name).map_err(|e| syntax_error(name, e))?;

        let mut unknown: Vec<_> = tmpl
            .undeclared_variables(false)
            .into_iter()
            .filter(|var| !context.contains(var))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort();
        Err(Error::TemplateSyntaxError {
            name: name.to_string(),
            reason: format!("unknown placeholder(s): {}", unknown.join(", ")),
        })
    }

    fn render_to(
        &self,
        name: &str,
        source: &str,
        context: &SubstitutionContext,
        out: &mut dyn Write,
    ) -> Result<()> {
        let env = self.environment_with(name, source)?;
        let tmpl = env.get_template(name).map_err(|e| syntax_error(name, e))?;
        let rendered = tmpl.render(context).map_err(Error::MinijinjaError)?;
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}
