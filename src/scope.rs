//! What a template sees while it is being rendered.

use std::{borrow::Cow, path::Path};

use serde_json::Value;

use crate::{block::{Block, BlockStore, SCRIPTS, STYLESHEETS},
            options::{Locals, Settings, LayoutFile, BODY_KEY}};

/// The result of looking up a bare name from within a template.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'s> {
    Value(&'s Value),
    Block(&'s Block),
    Blocks(&'s BlockStore),
}

impl<'s> Lookup<'s> {
    /// The text to interpolate into a template. Strings as is (no
    /// escaping), `null` as nothing, other JSON values as JSON. The
    /// whole block store has no sensible text form and gives the empty
    /// string.
    pub fn to_text(&self) -> Cow<'s, str> {
        match *self {
            Lookup::Value(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Lookup::Value(Value::Null) => Cow::Borrowed(""),
            Lookup::Value(v) => Cow::Owned(v.to_string()),
            Lookup::Block(b) => Cow::Owned(b.to_string()),
            Lookup::Blocks(_) => Cow::Borrowed(""),
        }
    }
}

/// Per render step: read-only access to the locals and settings, the
/// block store shared by the whole render chain, and the slot where
/// a `layout()` call is recorded. Engines get a `&mut` to this and
/// expose its methods as template functions.
pub struct TemplateScope<'s> {
    locals: &'s Locals,
    settings: &'s Settings,
    filename: Option<&'s Path>,
    blocks: &'s mut BlockStore,
    layout: Option<LayoutFile>,
}

impl<'s> TemplateScope<'s> {
    pub fn new(
        locals: &'s Locals,
        settings: &'s Settings,
        filename: Option<&'s Path>,
        blocks: &'s mut BlockStore,
    ) -> Self {
        TemplateScope { locals, settings, filename, blocks, layout: None }
    }

    /// Resolve a bare name as used in a template: `blocks`, `scripts`
    /// and `stylesheets` are the block machinery, everything else comes
    /// from the locals.
    pub fn get(&self, name: &str) -> Option<Lookup<'_>> {
        match name {
            "blocks" => Some(Lookup::Blocks(&*self.blocks)),
            SCRIPTS => Some(Lookup::Block(self.blocks.scripts())),
            STYLESHEETS => Some(Lookup::Block(self.blocks.stylesheets())),
            _ => self.locals.get(name).map(Lookup::Value),
        }
    }

    pub fn local(&self, name: &str) -> Option<&'s Value> {
        self.locals.get(name)
    }

    pub fn locals(&self) -> &'s Locals {
        self.locals
    }

    /// The output of the template this one is the layout for.
    pub fn body(&self) -> Option<&'s str> {
        self.locals.get(BODY_KEY).and_then(Value::as_str)
    }

    pub fn settings(&self) -> &'s Settings {
        self.settings
    }

    /// Cache key hint; `None` when rendering a layout.
    pub fn filename(&self) -> Option<&'s Path> {
        self.filename
    }

    /// Declare the layout for the template being rendered. Takes
    /// effect once it has finished; the last call wins.
    pub fn layout(&mut self, view: impl Into<LayoutFile>) {
        self.layout = Some(view.into());
    }

    pub fn declared_layout(&self) -> Option<&LayoutFile> {
        self.layout.as_ref()
    }

    pub fn into_declared_layout(self) -> Option<LayoutFile> {
        self.layout
    }

    pub fn block(&mut self, name: &str, html: Option<&str>) -> &mut Block {
        self.blocks.block_with(name, html)
    }

    pub fn script(&mut self, path: &str, typ: Option<&str>) -> &mut Block {
        self.blocks.script(path, typ)
    }

    pub fn stylesheet(&mut self, path: &str, media: Option<&str>) -> &mut Block {
        self.blocks.stylesheet(path, media)
    }

    pub fn blocks(&self) -> &BlockStore {
        &*self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut BlockStore {
        &mut *self.blocks
    }

    pub fn scripts(&self) -> &Block {
        self.blocks.scripts()
    }

    pub fn stylesheets(&self) -> &Block {
        self.blocks.stylesheets()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn t_lookup() {
        let mut locals = Locals::new();
        locals.insert("title".into(), json!("Hi"));
        locals.insert("n".into(), json!(3));
        locals.insert("none".into(), Value::Null);
        locals.insert(BODY_KEY.into(), json!("<p>x</p>"));
        // locals can't shadow the block machinery
        locals.insert("scripts".into(), json!("shadowed"));
        let settings = Settings::default();
        let mut blocks = BlockStore::new();
        let mut scope = TemplateScope::new(&locals, &settings, None, &mut blocks);

        scope.script("/app.js", None);
        scope.block("head", Some("<meta>")).prepend("<title>");

        let text = |scope: &TemplateScope, name| scope.get(name).map(|l| l.to_text().into_owned());
        assert_eq!(text(&scope, "title").as_deref(), Some("Hi"));
        assert_eq!(text(&scope, "n").as_deref(), Some("3"));
        assert_eq!(text(&scope, "none").as_deref(), Some(""));
        assert_eq!(text(&scope, "missing"), None);
        assert_eq!(text(&scope, "scripts").as_deref(),
                   Some("<script src=\"/app.js\"></script>"));
        assert_eq!(text(&scope, "stylesheets").as_deref(), Some(""));
        assert!(matches!(scope.get("blocks"), Some(Lookup::Blocks(_))));
        assert_eq!(scope.body(), Some("<p>x</p>"));
        assert_eq!(scope.blocks().get("head").map(|b| b.to_string()).as_deref(),
                   Some("<title>\n<meta>"));
    }

    #[test]
    fn t_declared_layout() {
        let locals = Locals::new();
        let settings = Settings::default();
        let mut blocks = BlockStore::new();
        let mut scope = TemplateScope::new(&locals, &settings, None, &mut blocks);
        assert_eq!(scope.declared_layout(), None);
        scope.layout("one");
        scope.layout("two");
        assert_eq!(scope.into_declared_layout(), Some(LayoutFile::from("two")));
    }
}
