use std::{io::Write, path::PathBuf};

use anyhow::{Result, bail};
use clap::Parser as ClapParser;
use kstring::KString;
use alayout::{mini_engine::MiniEngine,
              options::{RenderOptions, Settings},
              resolver::{Layouts, DO_TRACE_LAYOUT},
              util::parse_assignment,
              view_fs::StdFs};

#[derive(clap::Parser, Debug)]
/// Render a template file wrapped in its layouts, printing the result
/// to stdout. View roots and the view engine default to the
/// ALAYOUT_VIEWS and ALAYOUT_VIEW_ENGINE env vars.
struct Args {
    /// Action, one of "render" or "compile" (print the compiled
    /// template instead of running it; no layouts).
    #[clap(required(true))]
    action: String,

    /// The template to render.
    #[clap(required(true))]
    file: PathBuf,

    /// Read options (locals, settings, _layoutFile) from this JSON
    /// file; the other options given here override its settings.
    #[clap(long)]
    options: Option<PathBuf>,

    /// A view root to look for layouts in; can be given multiple
    /// times, searched in the given order.
    #[clap(long)]
    views: Vec<PathBuf>,

    /// The view engine, i.e. file extension of layouts.
    #[clap(long)]
    engine: Option<String>,

    /// A template variable as name=value, value being JSON or else a
    /// string; can be given multiple times.
    #[clap(long)]
    local: Vec<String>,

    /// Default layout, "true" for the standard one.
    #[clap(long)]
    layout: Option<String>,

    /// Fail if layouts nest deeper than this.
    #[clap(long)]
    max_depth: Option<usize>,

    /// Show each layout step on stderr.
    #[clap(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    DO_TRACE_LAYOUT.store(args.trace, std::sync::atomic::Ordering::SeqCst);

    let mut options = match &args.options {
        Some(path) => RenderOptions::from_json_file(path)?,
        None => RenderOptions::new(Settings::from_env()?),
    };
    if !args.views.is_empty() {
        options.settings.views = args.views.clone();
    }
    if let Some(engine) = &args.engine {
        options.settings.view_engine = Some(KString::from_ref(engine));
    }
    for assignment in &args.local {
        let (name, value) = parse_assignment(assignment)?;
        options.set_local(&name, value);
    }
    match args.layout.as_deref() {
        Some("true") => { options.set_layout_file(true); }
        Some("false") => { options.set_layout_file(false); }
        Some(view) => { options.set_layout_file(view); }
        None => (),
    }
    if args.max_depth.is_some() {
        options.max_layout_depth = args.max_depth;
    }
    options.filename = Some(args.file.clone());

    let layouts = Layouts::new(MiniEngine::new(StdFs), StdFs);
    let out = match &*args.action {
        "render" => layouts.render_file(&args.file, &mut options)?,
        "compile" => layouts.compile(&args.file, &mut options)?,
        _ => bail!("unknown action {:?}, expecting \"render\" or \"compile\"",
                   args.action),
    };
    let mut outp = std::io::stdout().lock();
    outp.write_all(out.as_bytes())?;
    outp.flush()?;
    Ok(())
}
