//! Command-line reader for plain text.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Restore typography, reading progress and bookmarks from the cache.
//! - Paginate the text and print the requested page(s).

mod cache;

use crate::cache::{
    TypographyOverride, load_bookmarks, load_progress, load_typography, save_bookmarks,
    save_progress, save_typography,
};
use anyhow::{Context, Result, anyhow, bail};
use pager_core::ReaderSession;
use pager_core::config::load_config;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: leaf-pager <path-to-text> [--page N] [--font-size N] \
[--width W] [--height H] [--bookmark] [--all | --json]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Page,
    All,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    source: PathBuf,
    /// One-based, as shown to the reader.
    page: Option<usize>,
    font_size: Option<u32>,
    width: Option<f32>,
    height: Option<f32>,
    /// Toggle the bookmark on the page shown.
    toggle_bookmark: bool,
    output: OutputMode,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if !args.source.exists() {
        return Err(anyhow!("File not found: {}", args.source.display()));
    }

    let mut config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        level = %config.log_level,
        font_size = config.font_size,
        "Loaded configuration"
    );
    let cache_dir = PathBuf::from(&config.cache_dir);

    if let Some(typography) = load_typography(&cache_dir, &args.source) {
        info!(
            font_size = typography.font_size,
            line_height = typography.line_height,
            "Loaded per-source typography from cache"
        );
        config.font_size = typography.font_size;
        config.line_height = typography.line_height;
    }
    let progress = load_progress(&cache_dir, &args.source);
    if let Some(progress) = &progress {
        info!(page = progress.position, "Resuming from cached page");
    }

    let mut session = ReaderSession::load(&args.source, config, progress)
        .context("Failed to open source text")?;
    session.restore_bookmarks(load_bookmarks(&cache_dir, &args.source));
    apply_args(&mut session, &args);

    match args.output {
        OutputMode::Page => print_current_page(&session),
        OutputMode::All => print_all_pages(&session),
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(&session.snapshot())
                .context("Failed to serialize snapshot")?;
            println!("{json}");
        }
    }

    save_progress(&cache_dir, &args.source, &session.to_progress());
    save_bookmarks(&cache_dir, &args.source, session.bookmarks());
    save_typography(
        &cache_dir,
        &args.source,
        &TypographyOverride {
            font_size: session.config.font_size,
            line_height: session.config.line_height,
        },
    );
    Ok(())
}

fn apply_args(session: &mut ReaderSession, args: &CliArgs) {
    if args.width.is_some() || args.height.is_some() {
        let metrics = session.metrics();
        session.resize_viewport(
            args.width.unwrap_or(metrics.viewport_width),
            args.height.unwrap_or(metrics.viewport_height),
        );
    }
    if let Some(font_size) = args.font_size {
        session.set_typography(font_size, None);
    }
    if let Some(page) = args.page {
        session.set_page(page.saturating_sub(1));
    }
    if args.toggle_bookmark {
        let bookmarked = session.toggle_bookmark();
        info!(page = session.current_page + 1, bookmarked, "Toggled bookmark");
    }
}

fn print_current_page(session: &ReaderSession) {
    if session.page_count() == 0 {
        warn!(source = %session.source_name(), "Nothing to show");
        return;
    }
    let snapshot = session.snapshot();
    println!(
        "{} | Page {} of {} ({:.0}%){}",
        snapshot.source_name,
        snapshot.current_page + 1,
        snapshot.total_pages,
        snapshot.progress_pct,
        if snapshot.is_bookmarked { " [bookmarked]" } else { "" }
    );
    println!();
    println!("{}", snapshot.page_text);
}

fn print_all_pages(session: &ReaderSession) {
    let total = session.page_count();
    for (idx, page) in session.pages().iter().enumerate() {
        println!("--- Page {} of {total} ---", idx + 1);
        println!("{page}");
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut source = None;
    let mut page = None;
    let mut font_size = None;
    let mut width = None;
    let mut height = None;
    let mut toggle_bookmark = false;
    let mut output = OutputMode::Page;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--page" => page = Some(parse_value(&arg, args.next())?),
            "--font-size" => font_size = Some(parse_value(&arg, args.next())?),
            "--width" => width = Some(parse_value(&arg, args.next())?),
            "--height" => height = Some(parse_value(&arg, args.next())?),
            "--bookmark" => toggle_bookmark = true,
            "--all" => output = OutputMode::All,
            "--json" => output = OutputMode::Json,
            flag if flag.starts_with("--") => bail!("Unknown option {flag}\n{USAGE}"),
            _ if source.is_none() => source = Some(PathBuf::from(&arg)),
            _ => bail!("Unexpected argument {arg}\n{USAGE}"),
        }
    }

    Ok(CliArgs {
        source: source.ok_or_else(|| anyhow!(USAGE))?,
        page,
        font_size,
        width,
        height,
        toggle_bookmark,
        output,
    })
}

fn parse_value<T>(flag: &str, value: Option<String>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = value.ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))?;
    value
        .parse()
        .map_err(|err| anyhow!("Invalid value {value:?} for {flag}: {err}"))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    // An explicit RUST_LOG wins over the config file.
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
