//! Named lists of HTML fragments that templates push up into their
//! layouts (scripts, stylesheets, anything else).

use std::fmt::{self, Display};

use indexmap::IndexMap;
use itertools::Itertools;
use kstring::KString;

/// Name of the block `script` writes into.
pub const SCRIPTS: &str = "scripts";
/// Name of the block `stylesheet` writes into.
pub const STYLESHEETS: &str = "stylesheets";

static EMPTY_BLOCK: Block = Block::new();

/// An ordered list of HTML fragments, serialized by joining them with
/// newlines. The fragments are preserialized HTML, nothing is escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    html: Vec<String>,
}

impl Block {
    pub const fn new() -> Self {
        Block { html: Vec::new() }
    }

    pub fn append(&mut self, more: impl Into<String>) -> &mut Self {
        self.html.push(more.into());
        self
    }

    pub fn prepend(&mut self, more: impl Into<String>) -> &mut Self {
        self.html.insert(0, more.into());
        self
    }

    /// Drop all fragments collected so far, leaving just `instead`.
    pub fn replace(&mut self, instead: impl Into<String>) -> &mut Self {
        self.html.clear();
        self.html.push(instead.into());
        self
    }

    pub fn fragments(&self) -> &[String] {
        &self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    /// Append a `<script>` tag for `path`; does nothing if `path` is
    /// empty. The `type` attribute is only added for a non-empty
    /// `typ`. NOTE: there is no space before the `type` attribute;
    /// existing layouts/tests depend on the exact string, keep it.
    pub fn write_script(&mut self, path: &str, typ: Option<&str>) -> &mut Self {
        if !path.is_empty() {
            self.append(format!("<script src=\"{path}\"{}></script>",
                                attribute_clause("type", typ)));
        }
        self
    }

    /// Append a `<link rel="stylesheet">` tag for `path`, same rules
    /// as `write_script`.
    pub fn write_stylesheet(&mut self, path: &str, media: Option<&str>) -> &mut Self {
        if !path.is_empty() {
            self.append(format!("<link rel=\"stylesheet\" href=\"{path}\"{} />",
                                attribute_clause("media", media)));
        }
        self
    }
}

fn attribute_clause(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => format!("{name}=\"{value}\""),
        _ => String::new(),
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.html.iter().join("\n"))
    }
}


/// All blocks of one top-level render, by name, in the order they
/// were first referenced. `scripts` and `stylesheets` always exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStore {
    blocks: IndexMap<KString, Block>,
}

impl Default for BlockStore {
    fn default() -> Self {
        let mut blocks = IndexMap::new();
        blocks.insert(KString::from_static(SCRIPTS), Block::new());
        blocks.insert(KString::from_static(STYLESHEETS), Block::new());
        BlockStore { blocks }
    }
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The block with the given name, created empty if it doesn't
    /// exist yet. Never fails.
    pub fn block(&mut self, name: &str) -> &mut Block {
        self.blocks.entry(KString::from_ref(name)).or_default()
    }

    /// `block` plus appending `html` to it unless that is absent or
    /// empty; this is what templates call as `block(name, html)`.
    pub fn block_with(&mut self, name: &str, html: Option<&str>) -> &mut Block {
        let block = self.block(name);
        match html {
            Some(html) if !html.is_empty() => block.append(html),
            _ => block,
        }
    }

    /// Look up without creating.
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    pub fn scripts(&self) -> &Block {
        self.get(SCRIPTS).unwrap_or(&EMPTY_BLOCK)
    }

    pub fn stylesheets(&self) -> &Block {
        self.get(STYLESHEETS).unwrap_or(&EMPTY_BLOCK)
    }

    pub fn script(&mut self, path: &str, typ: Option<&str>) -> &mut Block {
        self.block(SCRIPTS).write_script(path, typ)
    }

    pub fn stylesheet(&mut self, path: &str, media: Option<&str>) -> &mut Block {
        self.block(STYLESHEETS).write_stylesheet(path, media)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Block)> {
        self.blocks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
