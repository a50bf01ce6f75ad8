//! Layouts and content blocks for a file based template engine.
//!
//! A template declares a layout (`layout("main")`), gets rendered,
//! then the layout is rendered with the template's output as `body`,
//! and so on until a template declares no further layout. Along the
//! way, all templates can add HTML fragments to named blocks
//! (`script("/app.js")`, `block("head", "<meta ...>")`) which any of
//! the layouts can output.
//!
//! The template engine itself is plugged in via `TemplateEngine`;
//! `mini_engine` has a tiny one.

pub mod warn;
pub mod boxed_error;
pub mod util;
pub mod path;
pub mod block;
pub mod options;
pub mod scope;
pub mod engine;
pub mod view_fs;
pub mod resolver;
pub mod mini_engine;

pub use block::{Block, BlockStore};
pub use engine::TemplateEngine;
pub use options::{RenderOptions, Settings, LayoutFile};
pub use resolver::{Layouts, LayoutError, LayoutErrorKind, Rendered};
pub use scope::TemplateScope;
pub use view_fs::{ViewFs, StdFs, MemoryFs};
