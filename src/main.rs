mod app;
mod cache;
mod config;
mod controller;
mod debounce;
mod event;
mod mutation;
mod notes;
mod notify;
mod query;
mod state;
mod ui;
mod validation;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "notehub")]
#[command(about = "A terminal client for the NoteHub notes API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/notehub/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Start with this search text
  #[arg(short, long, default_value = "")]
  search: String,

  /// Start on this page
  #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
  page: u32,
}

/// Log to a daily file; stdout belongs to the TUI.
///
/// Filter comes from NOTEHUB_LOG, default `notehub=info`. The returned guard
/// flushes the writer on drop.
fn init_logging() -> Option<WorkerGuard> {
  let dir = dirs::data_dir()?.join("notehub").join("logs");
  std::fs::create_dir_all(&dir).ok()?;

  let filter = EnvFilter::try_from_env("NOTEHUB_LOG").unwrap_or_else(|_| "notehub=info".into());
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, "notehub.log"));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false),
    )
    .init();
  Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_logging();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Missing token is a startup error, never a per-request one
  let client = notes::NotesClient::new(&config)?;
  tracing::info!(
    host = client.host(),
    per_page = config.api.per_page,
    envelope = ?config.api.response_envelope,
    "client ready"
  );

  let mut app = app::App::new(Arc::new(client), &config, &args.search, args.page);
  app.run().await?;

  Ok(())
}
