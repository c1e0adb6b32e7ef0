//! External scan feed: a barcode reader or camera decoder that writes one
//! decoded value per line to a device node, FIFO or file.
//!
//! The feed is a lazy, endless stream. A background task reads lines from the
//! source and forwards them over a channel into the same entry point as
//! manual entry. When the source ends or fails it is reopened after a short
//! delay. A value identical to the previous one is dropped while it is still
//! inside the cooldown window, so a card held in front of the reader is not
//! submitted over and over.

use std::{
  future::Future,
  io,
  path::PathBuf,
  time::{Duration, Instant},
};

use tokio::{
  io::{AsyncBufReadExt as _, AsyncRead, BufReader},
  sync::mpsc,
  task::JoinHandle,
};

/// Window in which a repeated value is treated as the same physical scan.
pub const COOLDOWN: Duration = Duration::from_millis(1500);

/// Delay before reopening a source that ended or failed.
pub const REOPEN_DELAY: Duration = Duration::from_secs(1);

/// Something that can be (re)opened to produce a line-oriented reader.
pub trait ScanSource: Send + 'static {
  type Reader: AsyncRead + Unpin + Send;

  fn open(&mut self) -> impl Future<Output = io::Result<Self::Reader>> + Send;

  /// Label used in log messages.
  fn describe(&self) -> String;
}

/// A path opened read-only on every (re)start.
pub struct DevicePath(pub PathBuf);

impl ScanSource for DevicePath {
  type Reader = tokio::fs::File;

  async fn open(&mut self) -> io::Result<tokio::fs::File> {
    tokio::fs::File::open(&self.0).await
  }

  fn describe(&self) -> String { self.0.display().to_string() }
}

/// Receiving half of a running scan feed. Dropping it stops the reader task.
pub struct ScanFeed {
  rx:   mpsc::Receiver<String>,
  task: JoinHandle<()>,
}

impl ScanFeed {
  /// Start reading `source` in the background.
  pub fn spawn<S: ScanSource>(source: S, cooldown: Duration, reopen_delay: Duration) -> Self {
    let (tx, rx) = mpsc::channel(32);
    let task = tokio::spawn(pump(source, tx, cooldown, reopen_delay));
    Self { rx, task }
  }

  /// The next decoded value, if one is waiting. Never blocks.
  pub fn try_next(&mut self) -> Option<String> { self.rx.try_recv().ok() }

  /// A feed driven by hand through the returned sender.
  #[cfg(test)]
  pub(crate) fn manual() -> (mpsc::Sender<String>, Self) {
    let (tx, rx) = mpsc::channel(32);
    (tx, Self { rx, task: tokio::spawn(async {}) })
  }
}

impl Drop for ScanFeed {
  fn drop(&mut self) { self.task.abort(); }
}

async fn pump<S: ScanSource>(
  mut source: S,
  tx: mpsc::Sender<String>,
  cooldown: Duration,
  reopen_delay: Duration,
) {
  let mut last: Option<(String, Instant)> = None;

  loop {
    match source.open().await {
      Ok(reader) => {
        tracing::info!(source = %source.describe(), "scan source opened");
        let mut lines = BufReader::new(reader).lines();
        loop {
          match lines.next_line().await {
            Ok(Some(line)) => {
              let value = line.trim().to_owned();
              if value.is_empty() {
                continue;
              }
              let now = Instant::now();
              if let Some((prev, at)) = &last
                && *prev == value
                && now.duration_since(*at) < cooldown
              {
                tracing::trace!(%value, "repeat inside cooldown dropped");
                continue;
              }
              last = Some((value.clone(), now));
              if tx.send(value).await.is_err() {
                return;
              }
            }
            Ok(None) => {
              tracing::debug!(source = %source.describe(), "scan source ended");
              break;
            }
            Err(e) => {
              tracing::warn!(source = %source.describe(), error = %e, "scan source read failed");
              break;
            }
          }
        }
      }
      Err(e) => {
        tracing::warn!(source = %source.describe(), error = %e, "cannot open scan source");
      }
    }

    if tx.is_closed() {
      return;
    }
    tokio::time::sleep(reopen_delay).await;
  }
}
