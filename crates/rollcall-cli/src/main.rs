//! `rollcall`: terminal attendance client.
//!
//! # Usage
//!
//! ```
//! rollcall --url http://localhost:5000
//! rollcall --config ~/.config/rollcall/config.toml --scan-device /dev/hidraw0
//! ```

mod app;
mod client;
mod scanner;
mod ui;

use std::{
  fs::File,
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::ApiClient;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use rollcall_core::store::AttendanceStore;
use scanner::{COOLDOWN, DevicePath, REOPEN_DELAY, ScanFeed};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:5000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "rollcall", about = "Terminal attendance client for Rollcall")]
struct Args {
  /// Path to a TOML config file (url, scan_device).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the rollcall server (default: http://localhost:5000).
  #[arg(long, env = "ROLLCALL_URL")]
  url: Option<String>,

  /// Device node, FIFO or file a scanner writes decoded IDs to, one per line.
  #[arg(long, value_name = "PATH")]
  scan_device: Option<PathBuf>,

  /// Write logs to this file. Nothing is logged otherwise.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:         Option<String>,
  #[serde(default)]
  scan_device: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // The terminal belongs to the UI, so logs only ever go to a file.
  if let Some(path) = &args.log_file {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  }

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or(file_cfg.url)
    .unwrap_or_else(|| DEFAULT_URL.to_string());
  let scan_device = args.scan_device.or(file_cfg.scan_device);

  tracing::info!(%base_url, "starting client");
  let client = ApiClient::new(base_url)?;
  let mut app = App::new(Arc::new(client));

  let mut feed = scan_device.map(|path| {
    tracing::info!(device = %path.display(), "scan feed enabled");
    ScanFeed::spawn(DevicePath(path), COOLDOWN, REOPEN_DELAY)
  });

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Never fails: an unreachable server switches to the demo dataset.
  app.load_data().await;

  let run_result = run_event_loop(&mut terminal, &mut app, feed.as_mut()).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<S: AttendanceStore>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
  mut feed: Option<&mut ScanFeed>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }

    if let Some(feed) = feed.as_deref_mut() {
      app.poll_feed(feed).await;
    }

    app.tick(Instant::now());
  }

  Ok(())
}
