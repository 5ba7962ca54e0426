use super::registry::{HelperObject, HelperSet};
use crate::error::{GenError, Result};
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment};
use std::sync::Arc;
use tracing::debug;

/// Compiles templates once and renders them many times.
///
/// Holds its own engine environment populated from an explicit
/// [`HelperSet`]. Generated output is source code, so auto-escaping is off.
pub struct TemplateRenderer {
    env: Environment<'static>,
    helpers: Vec<String>,
}

impl std::fmt::Debug for TemplateRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateRenderer")
            .field("helpers", &self.helpers)
            .finish_non_exhaustive()
    }
}

impl TemplateRenderer {
    #[must_use]
    pub fn new(helpers: &HelperSet) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        for (name, helper) in helpers.iter() {
            debug!(helper = name, "registering helper");
            env.add_global(
                name.to_string(),
                Value::from_object(HelperObject::new(name, Arc::clone(helper))),
            );
        }
        TemplateRenderer {
            env,
            helpers: helpers.names().into_iter().map(str::to_string).collect(),
        }
    }

    /// Whether template `id` has already been compiled.
    #[must_use]
    pub fn is_compiled(&self, id: &str) -> bool {
        self.env.get_template(id).is_ok()
    }

    /// Compile `source` under `id`. Recompiling an existing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::TemplateCompile`] naming `id` on syntax errors.
    pub fn compile(&mut self, id: &str, source: String) -> Result<()> {
        if self.is_compiled(id) {
            return Ok(());
        }
        debug!(template = id, "compiling template");
        self.env
            .add_template_owned(id.to_string(), source)
            .map_err(|source| GenError::TemplateCompile {
                template: id.to_string(),
                source,
            })
    }

    /// Handle to a compiled template.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::TemplateCompile`] if `id` was never compiled.
    pub fn template(&self, id: &str) -> Result<CompiledTemplate<'_>> {
        if !self.is_compiled(id) {
            return Err(GenError::TemplateCompile {
                template: id.to_string(),
                source: minijinja::Error::new(
                    minijinja::ErrorKind::TemplateNotFound,
                    "template was not compiled",
                ),
            });
        }
        Ok(CompiledTemplate {
            env: &self.env,
            id: id.to_string(),
        })
    }
}

/// A compiled template ready to be invoked.
pub struct CompiledTemplate<'r> {
    env: &'r Environment<'static>,
    id: String,
}

impl CompiledTemplate<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render against `context`. `item` names what is being rendered and is
    /// only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::TemplateRender`] if the engine or a helper fails.
    pub fn render(&self, context: Value, item: &str) -> Result<String> {
        let render_error = |source| GenError::TemplateRender {
            template: self.id.clone(),
            item: item.to_string(),
            source,
        };
        let template = self.env.get_template(&self.id).map_err(render_error)?;
        template.render(context).map_err(render_error)
    }
}
