//! What a caller hands to a render: locals, view settings, layout
//! declarations. Field names on the serde side are the ones Express
//! style apps use (`settings.views`, `settings["view engine"]`,
//! `_layoutFile`), so existing option JSON can be read as is.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use anyhow::{Result, Context, anyhow};
use kstring::KString;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{block::BlockStore,
            path::with_default_extension,
            util::{getenv, my_read_to_string}};

/// Template-visible names.
pub type Locals = Map<String, Value>;

/// Key in `Locals` (and the options) declaring a layout.
pub const LAYOUT_FILE_KEY: &str = "_layoutFile";
/// Key in `Locals` under which a layout receives the previous output.
pub const BODY_KEY: &str = "body";
pub const DEFAULT_VIEW_ENGINE: &str = "ejs";

pub const ENV_VIEWS: &str = "ALAYOUT_VIEWS";
pub const ENV_VIEW_ENGINE: &str = "ALAYOUT_VIEW_ENGINE";


/// A layout declaration as found in `_layoutFile` or given to the
/// `layout` template function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutFile {
    /// `true`: the default layout, `/layout.<ext>`; `false`: none
    Flag(bool),
    /// A view name; the empty string means none
    View(String),
}

/// A layout declaration that actually asks for a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutRef {
    Default,
    View(String),
}

impl LayoutFile {
    /// Interpret a JSON value from `locals` or the options. `null`
    /// counts as a (negative) declaration, thus stops the lookup of
    /// lower-priority declarations.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(b) => LayoutFile::Flag(*b),
            Value::String(s) => LayoutFile::View(s.clone()),
            Value::Null => LayoutFile::Flag(false),
            v => LayoutFile::View(v.to_string()),
        }
    }

    pub fn to_layout_ref(&self) -> Option<LayoutRef> {
        match self {
            LayoutFile::Flag(true) => Some(LayoutRef::Default),
            LayoutFile::Flag(false) => None,
            LayoutFile::View(s) if s.is_empty() => None,
            LayoutFile::View(s) => Some(LayoutRef::View(s.clone())),
        }
    }
}

impl From<bool> for LayoutFile {
    fn from(b: bool) -> Self {
        LayoutFile::Flag(b)
    }
}

impl From<&str> for LayoutFile {
    fn from(s: &str) -> Self {
        LayoutFile::View(s.into())
    }
}

impl From<String> for LayoutFile {
    fn from(s: String) -> Self {
        LayoutFile::View(s)
    }
}


// ------------------------------------------------------------------

/// Any JSON value, read the same way as `locals._layoutFile`.
fn layout_file_value<'de, D>(deserializer: D) -> Result<Option<LayoutFile>, D::Error>
where D: Deserializer<'de>
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(LayoutFile::from_value(&value)))
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where D: Deserializer<'de>
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(PathBuf),
        Many(Vec<PathBuf>),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(p) => vec![p],
        OneOrMany::Many(ps) => ps,
    })
}

/// Where layouts are looked up, and what file extension they
/// have.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// View roots, searched in this order.
    #[serde(default, deserialize_with = "one_or_many")]
    pub views: Vec<PathBuf>,
    #[serde(rename = "view engine", default)]
    pub view_engine: Option<KString>,
}

impl Settings {
    pub fn new<P: Into<PathBuf>>(views: impl IntoIterator<Item = P>,
                                 view_engine: Option<&str>) -> Self {
        Settings {
            views: views.into_iter().map(Into::into).collect(),
            view_engine: view_engine.map(KString::from_ref),
        }
    }

    /// Read `ALAYOUT_VIEWS` (a path list with the platform's
    /// separator, like `PATH`) and `ALAYOUT_VIEW_ENGINE`; both are
    /// optional.
    pub fn from_env() -> Result<Self> {
        let views = match getenv(ENV_VIEWS)? {
            Some(s) => std::env::split_paths(&s).collect(),
            None => Vec::new(),
        };
        let view_engine = getenv(ENV_VIEW_ENGINE)?.map(KString::from_string);
        Ok(Settings { views, view_engine })
    }

    /// The engine name, `ejs` if not set or empty.
    pub fn view_engine(&self) -> &str {
        match &self.view_engine {
            Some(e) if !e.is_empty() => e.as_str(),
            _ => DEFAULT_VIEW_ENGINE,
        }
    }

    /// `"." + view_engine()`
    pub fn default_extension(&self) -> String {
        format!(".{}", self.view_engine())
    }

    /// The layout name before looking at the view roots: the default
    /// layout is `/layout.<ext>`, other names get the extension
    /// appended if they don't already have it.
    pub fn layout_name(&self, layout: &LayoutRef) -> String {
        let ext = self.default_extension();
        match layout {
            LayoutRef::Default => format!("{MAIN_SEPARATOR}layout{ext}"),
            LayoutRef::View(name) => with_default_extension(name, &ext),
        }
    }
}


// ------------------------------------------------------------------

/// Options for one top-level render call. The call mutates them:
/// layout declarations are consumed, `body` is set for layouts, and
/// the block store is created if missing and left in `blocks`
/// afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderOptions {
    #[serde(default)]
    pub locals: Locals,
    #[serde(default)]
    pub settings: Settings,
    /// App wide default layout; `locals._layoutFile` takes precedence.
    #[serde(rename = "_layoutFile", default, deserialize_with = "layout_file_value")]
    pub layout_file: Option<LayoutFile>,
    /// Passed on to the engine (which may key its cache on it);
    /// cleared before rendering a layout.
    #[serde(default)]
    pub filename: Option<PathBuf>,
    /// Fail with `LayoutErrorKind::DepthExceeded` instead of rendering
    /// more than this many layouts. Unlimited if `None`, which means
    /// a layout declaring itself never terminates.
    #[serde(default)]
    pub max_layout_depth: Option<usize>,
    #[serde(skip)]
    pub blocks: Option<BlockStore>,
}

impl RenderOptions {
    pub fn new(settings: Settings) -> Self {
        RenderOptions {
            settings,
            ..Default::default()
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).with_context(
            || anyhow!("parsing render options from JSON"))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = my_read_to_string(path)?;
        serde_json::from_str(&s).with_context(
            || anyhow!("parsing render options from {:?}", path))
    }

    pub fn set_local(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.locals.insert(name.into(), value.into());
        self
    }

    /// Sets the app wide default layout.
    pub fn set_layout_file(&mut self, layout: impl Into<LayoutFile>) -> &mut Self {
        self.layout_file = Some(layout.into());
        self
    }

    /// The layout declaration in effect after a render step, then
    /// clears all declarations so the next step does not pick the same
    /// one up again. `declared` (what the template itself asked for via
    /// `layout()`) wins over `locals._layoutFile`, which wins over the
    /// app wide `_layoutFile`.
    pub fn take_layout_file(&mut self, declared: Option<LayoutFile>) -> Option<LayoutFile> {
        let from_locals = self.locals.remove(LAYOUT_FILE_KEY)
            .map(|v| LayoutFile::from_value(&v));
        let from_options = self.layout_file.take();
        declared.or(from_locals).or(from_options)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn t_layout_name() {
        let settings = Settings::default();
        assert_eq!(settings.view_engine(), "ejs");
        assert_eq!(settings.layout_name(&LayoutRef::Default),
                   format!("{MAIN_SEPARATOR}layout.ejs"));
        assert_eq!(settings.layout_name(&LayoutRef::View("main".into())), "main.ejs");
        let settings = Settings::new(["/views"], Some("hbs"));
        assert_eq!(settings.layout_name(&LayoutRef::View("main.ejs".into())),
                   "main.ejs.hbs");
        assert_eq!(settings.layout_name(&LayoutRef::View("main.hbs".into())),
                   "main.hbs");
        // empty engine name falls back to the default
        let settings = Settings::new(Vec::<PathBuf>::new(), Some(""));
        assert_eq!(settings.default_extension(), ".ejs");
    }

    #[test]
    fn t_layout_file_truthiness() {
        assert_eq!(LayoutFile::from(true).to_layout_ref(), Some(LayoutRef::Default));
        assert_eq!(LayoutFile::from(false).to_layout_ref(), None);
        assert_eq!(LayoutFile::from("").to_layout_ref(), None);
        assert_eq!(LayoutFile::from("main").to_layout_ref(),
                   Some(LayoutRef::View("main".into())));
        assert_eq!(LayoutFile::from_value(&Value::Null), LayoutFile::Flag(false));
    }

    #[test]
    fn t_deserialize() {
        let options = RenderOptions::from_json_str(r#"{
            "locals": { "title": "Hi", "_layoutFile": "main" },
            "settings": { "views": "/views", "view engine": "html" },
            "_layoutFile": true,
            "max_layout_depth": 4
        }"#).unwrap();
        assert_eq!(options.settings.views, [PathBuf::from("/views")]);
        assert_eq!(options.settings.default_extension(), ".html");
        assert_eq!(options.layout_file, Some(LayoutFile::Flag(true)));
        assert_eq!(options.locals["title"], json!("Hi"));
        assert_eq!(options.max_layout_depth, Some(4));
        assert!(options.blocks.is_none());

        let options = RenderOptions::from_json_str(
            r#"{ "settings": { "views": ["/a", "/b"] } }"#).unwrap();
        assert_eq!(options.settings.views, [PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(options.settings.view_engine, None);
        assert!(options.locals.is_empty());

        assert!(RenderOptions::from_json_str(r#"{ "settings": 3 }"#).is_err());

        // read like the same value in locals
        for (json, expected) in [(r#"{ "_layoutFile": 3 }"#, LayoutFile::from("3")),
                                 (r#"{ "_layoutFile": null }"#, LayoutFile::Flag(false)),
                                 (r#"{ "_layoutFile": "main" }"#, LayoutFile::from("main"))] {
            let options = RenderOptions::from_json_str(json).unwrap();
            let value: Value = serde_json::from_str::<Value>(json).unwrap()
                [LAYOUT_FILE_KEY].clone();
            assert_eq!(LayoutFile::from_value(&value), expected);
            assert_eq!(options.layout_file, Some(expected));
        }
        assert_eq!(RenderOptions::from_json_str("{}").unwrap().layout_file, None);
    }

    #[test]
    fn t_take_layout_file() {
        let mut options = RenderOptions::default();
        options.set_layout_file("app");
        options.set_local(LAYOUT_FILE_KEY, "local");
        assert_eq!(options.take_layout_file(Some("declared".into())),
                   Some(LayoutFile::from("declared")));
        // all cleared
        assert_eq!(options.take_layout_file(None), None);

        options.set_layout_file("app");
        options.set_local(LAYOUT_FILE_KEY, "local");
        assert_eq!(options.take_layout_file(None), Some(LayoutFile::from("local")));

        options.set_layout_file("app");
        assert_eq!(options.take_layout_file(None), Some(LayoutFile::from("app")));

        // an explicit false in locals shadows the app wide default
        options.set_layout_file("app");
        options.set_local(LAYOUT_FILE_KEY, false);
        assert_eq!(options.take_layout_file(None), Some(LayoutFile::Flag(false)));
        assert_eq!(options.layout_file, None);
    }
}
