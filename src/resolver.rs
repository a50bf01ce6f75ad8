//! Rendering a template, then the layout it declares with the result
//! as `body`, then that layout's layout, and so on.

use std::{path::{Path, PathBuf},
          sync::atomic::AtomicBool};

use anyhow::Result;
use serde_json::Value;

use crate::{block::BlockStore,
            def_boxed_thiserror,
            engine::TemplateEngine,
            options::{RenderOptions, Settings, LayoutFile, LayoutRef, BODY_KEY},
            path::join_normalized,
            scope::TemplateScope,
            view_fs::ViewFs,
            trace_layout, warn};

/// Enables `trace_layout!` output.
pub static DO_TRACE_LAYOUT: AtomicBool = AtomicBool::new(false);

def_boxed_thiserror!(LayoutError, pub enum LayoutErrorKind {
    #[error("more than {max} nested layouts rendering {leaf:?}, chain: {chain:?}")]
    DepthExceeded {
        max: usize,
        leaf: PathBuf,
        /// The layouts rendered, and then the one that was refused
        chain: Vec<PathBuf>,
    },
});

/// The outcome of one render step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// What the template passed to `layout()`, if anything.
    pub layout: Option<LayoutFile>,
}

/// The layouts entered during one render. Only kept when there is a
/// limit; an unlimited chain may never end.
struct Chain {
    max: Option<usize>,
    paths: Vec<PathBuf>,
}

impl Chain {
    fn new(max: Option<usize>) -> Self {
        Chain { max, paths: Vec::new() }
    }

    fn enter(&mut self, layout: &Path, leaf: &Path) -> Result<(), LayoutError> {
        let max = match self.max {
            Some(max) => max,
            None => return Ok(()),
        };
        self.paths.push(layout.to_path_buf());
        if self.paths.len() > max {
            return Err(LayoutErrorKind::DepthExceeded {
                max,
                leaf: leaf.to_path_buf(),
                chain: std::mem::take(&mut self.paths),
            }.into());
        }
        Ok(())
    }
}

pub struct Layouts<E: TemplateEngine, F: ViewFs> {
    engine: E,
    fs: F,
}

impl<E: TemplateEngine, F: ViewFs> Layouts<E, F> {
    pub fn new(engine: E, fs: F) -> Self {
        Layouts { engine, fs }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Render the template at `path`, wrapped in its layouts. Uses
    /// the block store in `options.blocks`, creating it if missing; it
    /// is left there afterwards, also on errors. Errors from the
    /// engine are returned unchanged.
    pub fn render_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &mut RenderOptions
    ) -> Result<String>
    {
        let mut blocks = options.blocks.take().unwrap_or_default();
        let result = self.render_chain(path.as_ref(), options, &mut blocks);
        options.blocks = Some(blocks);
        result
    }

    /// `render_file` for callers that want the result delivered to a
    /// continuation.
    pub fn render_file_cb<P: AsRef<Path>>(
        &self,
        path: P,
        options: &mut RenderOptions,
        callback: impl FnOnce(Result<String>),
    ) {
        callback(self.render_file(path, options))
    }

    /// Compile the template at `path` with the same scope a render
    /// would get, returning the engine's compiled source. Layouts are
    /// not involved.
    pub fn compile<P: AsRef<Path>>(
        &self,
        path: P,
        options: &mut RenderOptions
    ) -> Result<String>
    {
        let mut blocks = options.blocks.take().unwrap_or_default();
        let result = {
            let mut scope = TemplateScope::new(&options.locals,
                                               &options.settings,
                                               options.filename.as_deref(),
                                               &mut blocks);
            self.engine.compile(path.as_ref(), &mut scope)
        };
        options.blocks = Some(blocks);
        result
    }

    /// Run the engine on one file, collecting what it declared as its
    /// layout.
    pub fn render_step(
        &self,
        path: &Path,
        options: &RenderOptions,
        blocks: &mut BlockStore,
    ) -> Result<Rendered>
    {
        let mut scope = TemplateScope::new(&options.locals,
                                           &options.settings,
                                           options.filename.as_deref(),
                                           blocks);
        let html = self.engine.render_file(path, &mut scope)?;
        Ok(Rendered { html, layout: scope.into_declared_layout() })
    }

    fn render_chain(
        &self,
        leaf: &Path,
        options: &mut RenderOptions,
        blocks: &mut BlockStore,
    ) -> Result<String>
    {
        let mut path = leaf.to_path_buf();
        let mut chain = Chain::new(options.max_layout_depth);
        loop {
            let Rendered { html, layout } = self.render_step(&path, options, blocks)?;

            // Consuming the declarations here is what ends the loop
            // once no template asks for another layout.
            let layout = match options.take_layout_file(layout)
                .as_ref()
                .and_then(LayoutFile::to_layout_ref)
            {
                Some(layout) => layout,
                None => return Ok(html),
            };

            let layout_path = self.resolve_layout_path(&layout, &options.settings);
            // The engine must not use the leaf's cache entry for the layout
            options.filename = None;

            chain.enter(&layout_path, leaf)?;
            trace_layout!("{:?} -> layout {:?} ({:?})", path, layout, layout_path);

            options.locals.insert(BODY_KEY.into(), Value::String(html));
            path = layout_path;
        }
    }

    /// The file to render for `layout`: the layout name (see
    /// `Settings::layout_name`) below the first view root where it
    /// exists. If it exists in none of them, the candidate below the
    /// last root is returned anyway (or the bare name if there are no
    /// roots) and rendering it will give the engine's error.
    pub fn resolve_layout_path(&self, layout: &LayoutRef, settings: &Settings) -> PathBuf {
        let name = settings.layout_name(layout);
        let mut candidate = PathBuf::from(&name);
        for root in &settings.views {
            candidate = join_normalized(root, &name);
            if self.fs.exists(&candidate) {
                return candidate;
            }
        }
        if !settings.views.is_empty() {
            warn!("layout {name:?} not found in view roots {:?}, trying {candidate:?}",
                  settings.views);
        }
        candidate
    }
}
