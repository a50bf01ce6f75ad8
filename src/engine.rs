//! The template engine doing the actual work, as seen from the layout
//! machinery.

use std::path::Path;

use anyhow::Result;

use crate::scope::TemplateScope;

/// A template engine rendering files. It is expected to offer the
/// scope's methods (`layout`, `block`, `script`, `stylesheet`, and
/// name lookup via `get`) to the templates it runs. Errors are passed
/// on to the caller of the render as they are.
pub trait TemplateEngine {
    /// Run the template at `path`, returning its output.
    fn render_file(&self, path: &Path, scope: &mut TemplateScope) -> Result<String>;

    /// Compile the template at `path` without running it, returning
    /// the compiled form as source code.
    fn compile(&self, path: &Path, scope: &mut TemplateScope) -> Result<String>;
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for &E {
    fn render_file(&self, path: &Path, scope: &mut TemplateScope) -> Result<String> {
        (**self).render_file(path, scope)
    }

    fn compile(&self, path: &Path, scope: &mut TemplateScope) -> Result<String> {
        (**self).compile(path, scope)
    }
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for Box<E> {
    fn render_file(&self, path: &Path, scope: &mut TemplateScope) -> Result<String> {
        (**self).render_file(path, scope)
    }

    fn compile(&self, path: &Path, scope: &mut TemplateScope) -> Result<String> {
        (**self).compile(path, scope)
    }
}
