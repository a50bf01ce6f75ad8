//! A minimal template engine, enough to drive layouts from the
//! command line and in tests. Tags are `{{...}}`:
//!
//! - `{{name}}`: the value of `name` (see `TemplateScope::get`), not
//!   escaped; unknown names give nothing
//! - `{{layout main}}`: use view `main` as the layout; `{{layout}}`
//!   uses the default layout
//! - `{{script /app.js}}`, `{{script /app.js module}}`
//! - `{{stylesheet /app.css}}`, `{{stylesheet /print.css print}}`
//! - `{{block head <meta charset="utf-8">}}`: append to block `head`
//! - `{{block head}}`: output block `head`
//!
//! There is no escaping of `{{`, and a tag can't contain `}}`.

use std::path::Path;

use anyhow::{Result, Context, anyhow, bail};

use crate::{engine::TemplateEngine,
            scope::TemplateScope,
            view_fs::ViewFs};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Name(String),
    Layout(Option<String>),
    Script { path: String, typ: Option<String> },
    Stylesheet { path: String, media: Option<String> },
    Block { name: String, html: Option<String> },
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.into())
    }
}

/// Up to two whitespace separated words.
fn path_and_attribute(directive: &str, args: &str) -> Result<(String, Option<String>)> {
    let mut words = args.split_whitespace();
    let path = words.next().unwrap_or("").into();
    let attribute = words.next().map(String::from);
    if words.next().is_some() {
        bail!("{directive}: too many arguments in {args:?}")
    }
    Ok((path, attribute))
}

impl Segment {
    fn from_tag(tag: &str) -> Result<Self> {
        let (word, args) = match tag.split_once(char::is_whitespace) {
            Some((word, args)) => (word, args.trim()),
            None => (tag, ""),
        };
        Ok(match word {
            "" => bail!("empty tag"),
            "layout" => {
                if args.contains(char::is_whitespace) {
                    bail!("layout: expecting at most one view name, got {args:?}")
                }
                Segment::Layout(non_empty(args))
            }
            "script" => {
                let (path, typ) = path_and_attribute(word, args)?;
                Segment::Script { path, typ }
            }
            "stylesheet" => {
                let (path, media) = path_and_attribute(word, args)?;
                Segment::Stylesheet { path, media }
            }
            "block" => {
                let (name, html) = match args.split_once(char::is_whitespace) {
                    Some((name, html)) => (name, html.trim()),
                    None => (args, ""),
                };
                if name.is_empty() {
                    bail!("block: missing name")
                }
                Segment::Block { name: name.into(), html: non_empty(html) }
            }
            name => {
                if !args.is_empty() {
                    bail!("unknown directive {name:?}")
                }
                Segment::Name(name.into())
            }
        })
    }
}

pub fn parse(src: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = src;
    let mut offset = 0;
    while let Some(start) = rest.find(OPEN) {
        if start > 0 {
            segments.push(Segment::Text(rest[..start].into()));
        }
        let after = &rest[start + OPEN.len()..];
        let end = after.find(CLOSE).ok_or_else(
            || anyhow!("unterminated {OPEN:?} at byte {}", offset + start))?;
        segments.push(Segment::from_tag(after[..end].trim()).with_context(
            || anyhow!("in tag at byte {}", offset + start))?);
        let consumed = start + OPEN.len() + end + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest.into()));
    }
    Ok(segments)
}

pub fn run(segments: &[Segment], scope: &mut TemplateScope) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(s) => out.push_str(s),
            Segment::Name(name) =>
                if let Some(value) = scope.get(name) {
                    out.push_str(&value.to_text())
                },
            Segment::Layout(Some(view)) => scope.layout(view.as_str()),
            Segment::Layout(None) => scope.layout(true),
            Segment::Script { path, typ } => {
                scope.script(path, typ.as_deref());
            }
            Segment::Stylesheet { path, media } => {
                scope.stylesheet(path, media.as_deref());
            }
            Segment::Block { name, html: Some(html) } => {
                scope.block(name, Some(html));
            }
            Segment::Block { name, html: None } => {
                let block = scope.block(name, None);
                out.push_str(&block.to_string());
            }
        }
    }
    out
}


/// Reads templates via a `ViewFs`; no caching.
#[derive(Debug, Clone, Default)]
pub struct MiniEngine<F: ViewFs> {
    fs: F,
}

impl<F: ViewFs> MiniEngine<F> {
    pub fn new(fs: F) -> Self {
        MiniEngine { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn load(&self, path: &Path) -> Result<Vec<Segment>> {
        let src = self.fs.read_to_string(path)?;
        parse(&src).with_context(|| anyhow!("parsing template {:?}", path))
    }
}

impl<F: ViewFs> TemplateEngine for MiniEngine<F> {
    fn render_file(&self, path: &Path, scope: &mut TemplateScope) -> Result<String> {
        let segments = self.load(path)?;
        Ok(run(&segments, scope))
    }

    /// One segment per line, in `Debug` form.
    fn compile(&self, path: &Path, _scope: &mut TemplateScope) -> Result<String> {
        let mut out = String::new();
        for segment in self.load(path)? {
            out.push_str(&format!("{segment:?}\n"));
        }
        Ok(out)
    }
}
