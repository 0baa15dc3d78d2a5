mod checks;
mod commands;
mod core;
mod ledger;
mod metadata;
mod release;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use crate::core::context::ProjectContext;
use crate::core::error::{FolioError, FolioResult, print_error};
use crate::release::DocType;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Release generated documents atomically: archive, publish, record, commit
#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Show debug logs on stderr (RUST_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build and release a document, rolling back on failure
  Release {
    /// Document type to release
    #[arg(short = 't', long = "type", value_enum)]
    doc_type: DocType,
    /// Release message (default: "Update <type> - <timestamp>")
    #[arg(short, long)]
    message: Option<String>,
    /// Release even when the source directory has no changes
    #[arg(short, long)]
    force: bool,
  },

  /// Print the version label of the published document
  Version {
    /// Document type to inspect
    #[arg(short = 't', long = "type", value_enum)]
    doc_type: DocType,
  },

  /// Run health checks and diagnostics
  Doctor {
    /// Run thorough checks (includes ledger network tests)
    #[arg(long)]
    thorough: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Diagnostics go to stderr; stdout is reserved for progress lines and `--json`
fn init_tracing(verbose: bool) {
  let level = if verbose { Level::DEBUG } else { Level::WARN };
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  tracing_subscriber::registry()
    .with(env_filter)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .try_init()
    .ok();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(1);
    }
  };

  // doctor reports on a missing or broken folio.toml instead of failing on it
  let result = match cli.command {
    Commands::Doctor { thorough, json } => commands::run_doctor(&project_root, thorough, json),
    Commands::Release {
      doc_type,
      message,
      force,
    } => with_project(&project_root, |ctx| commands::run_release(ctx, doc_type, message, force)),
    Commands::Version { doc_type } => with_project(&project_root, |ctx| commands::run_version(ctx, doc_type)),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Load folio.toml once and hand the context to a command
fn with_project<F>(project_root: &Path, command: F) -> FolioResult<()>
where
  F: FnOnce(&ProjectContext) -> FolioResult<()>,
{
  let ctx = ProjectContext::build(project_root)?;
  command(&ctx)
}

fn handle_error(err: FolioError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
