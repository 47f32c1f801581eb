use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

const SUCCESS_TTL: Duration = Duration::from_secs(2);
const ERROR_TTL: Duration = Duration::from_secs(4);
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Success,
  Error,
}

/// A transient toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub level: Level,
  pub message: String,
  expires_at: Instant,
}

/// Newest-first queue of toasts that expire on their own
#[derive(Debug, Default)]
pub struct Notifications {
  toasts: VecDeque<Toast>,
}

impl Notifications {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn success(&mut self, message: impl Into<String>, now: Instant) {
    let message = message.into();
    tracing::info!(%message, "toast");
    self.push(Level::Success, message, now + SUCCESS_TTL);
  }

  pub fn error(&mut self, message: impl Into<String>, now: Instant) {
    let message = message.into();
    tracing::warn!(%message, "error toast");
    self.push(Level::Error, message, now + ERROR_TTL);
  }

  fn push(&mut self, level: Level, message: String, expires_at: Instant) {
    self.toasts.push_front(Toast {
      level,
      message,
      expires_at,
    });
    self.toasts.truncate(MAX_VISIBLE);
  }

  /// Drop expired toasts
  pub fn prune(&mut self, now: Instant) {
    self.toasts.retain(|t| t.expires_at > now);
  }

  pub fn iter(&self) -> impl Iterator<Item = &Toast> {
    self.toasts.iter()
  }

  pub fn is_empty(&self) -> bool {
    self.toasts.is_empty()
  }

  /// Most recent toast, if any
  pub fn latest(&self) -> Option<&Toast> {
    self.toasts.front()
  }
}
