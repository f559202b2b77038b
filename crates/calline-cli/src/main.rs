//! `calline` — dump the content lines of an iCalendar stream as JSON.
//!
//! # Usage
//!
//! ```
//! calline invite.ics
//! cat invite.ics | calline --strict-crlf
//! calline --config calline.toml --keep-going broken.ics
//! ```
//!
//! Each field is written to stdout as one JSON object per line:
//! `{"name":"SUMMARY","params":{},"value":"Team sync"}`.

use std::{
  fs::File,
  io::{self, BufWriter, Read, Write},
  path::PathBuf,
};

use anyhow::{Context, Result, bail};
use calline_core::{LineEndings, ReaderOptions};
use clap::Parser;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "calline", version, about = "Print iCalendar content lines as JSON")]
struct Args {
  /// Input file; reads stdin when omitted or `-`.
  #[arg(value_name = "INPUT")]
  input: Option<PathBuf>,

  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Reject lines terminated by a bare LF instead of CRLF.
  #[arg(long)]
  strict_crlf: bool,

  /// Report malformed lines and carry on instead of stopping at the first.
  #[arg(short, long)]
  keep_going: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Settings merged from the config file and `CALLINE_*` variables.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct Settings {
  line_endings: LineEndings,
  keep_going:   bool,
}

fn load_settings(args: &Args) -> Result<Settings> {
  let mut builder = config::Config::builder();
  if let Some(path) = &args.config {
    builder = builder.add_source(config::File::from(path.clone()).required(true));
  }
  let mut settings: Settings = builder
    .add_source(config::Environment::with_prefix("CALLINE"))
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("failed to deserialise settings")?;

  // CLI flags override config file and environment.
  if args.strict_crlf {
    settings.line_endings = LineEndings::Strict;
  }
  settings.keep_going |= args.keep_going;
  Ok(settings)
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
  match path {
    Some(p) if p.as_os_str() != "-" => {
      let file = File::open(p)
        .with_context(|| format!("failed to open {}", p.display()))?;
      Ok(Box::new(file))
    }
    _ => Ok(Box::new(io::stdin().lock())),
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let settings = load_settings(&args)?;
  tracing::debug!(?settings, "loaded settings");

  let options = ReaderOptions {
    line_endings: settings.line_endings,
  };
  let input = open_input(args.input.as_ref())?;

  let stdout = io::stdout();
  let mut out = BufWriter::new(stdout.lock());
  let rejected = run(input, options, settings.keep_going, &mut out)?;

  if rejected > 0 {
    bail!("{rejected} malformed content line(s)");
  }
  Ok(())
}

/// Write every field of `input` to `out` as one JSON object per line.
///
/// Returns how many lines were rejected. Without `keep_going` the first
/// rejected line is an error; a fatal read error always is.
fn run(
  input: impl Read,
  options: ReaderOptions,
  keep_going: bool,
  out: &mut impl Write,
) -> Result<usize> {
  let mut rejected = 0usize;

  for result in calline_core::fields_with(input, options) {
    match result {
      Ok(field) => {
        serde_json::to_writer(&mut *out, &field)
          .context("failed to write field")?;
        writeln!(out)?;
      }
      Err(err) if err.is_fatal() => {
        out.flush()?;
        return Err(err).context("failed to read input");
      }
      Err(err) => {
        tracing::warn!("{err}");
        if !keep_going {
          out.flush()?;
          return Err(err).context("malformed content line");
        }
        rejected += 1;
      }
    }
  }
  out.flush()?;
  Ok(rejected)
}
