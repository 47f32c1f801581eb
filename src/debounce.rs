use std::time::Duration;
use tokio::time::Instant;

/// Holds back a fast-changing value until it has been quiet for `delay`.
///
/// Deadline based rather than timer based: the caller pushes values and
/// polls with the current time, so there is never more than one pending
/// value and nothing to cancel.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Schedule `value`, replacing whatever was pending and restarting the clock.
  pub fn push(&mut self, value: T, now: Instant) {
    self.pending = Some((value, now + self.delay));
  }

  /// Take the pending value once its quiet period has elapsed.
  pub fn poll(&mut self, now: Instant) -> Option<T> {
    match &self.pending {
      Some((_, due)) if now >= *due => self.pending.take().map(|(v, _)| v),
      _ => None,
    }
  }
}
