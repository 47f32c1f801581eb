use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use super::key::QueryKey;
use crate::notes::types::NotePage;

#[derive(Debug, Clone)]
struct CacheEntry {
  page: NotePage,
  fetched_at: Instant,
  last_used: Instant,
  invalidated: bool,
}

/// Result of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
  /// Within the freshness window and not invalidated
  Fresh(&'a NotePage),
  /// Usable as a placeholder, but must be refetched
  Stale(&'a NotePage),
  Miss,
}

impl<'a> Lookup<'a> {
  pub fn page(&self) -> Option<&'a NotePage> {
    match self {
      Lookup::Fresh(p) | Lookup::Stale(p) => Some(p),
      Lookup::Miss => None,
    }
  }

  pub fn is_fresh(&self) -> bool {
    matches!(self, Lookup::Fresh(_))
  }
}

/// In-memory page cache owned by the notes query
#[derive(Debug)]
pub struct QueryCache {
  entries: HashMap<QueryKey, CacheEntry>,
  /// How long before a cached page is considered stale
  stale_time: Duration,
  /// How long an unused page is kept around
  gc_time: Duration,
}

impl QueryCache {
  pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
    Self {
      entries: HashMap::new(),
      stale_time,
      gc_time,
    }
  }

  /// Look up a page, marking it as recently used.
  pub fn get(&mut self, key: &QueryKey, now: Instant) -> Lookup<'_> {
    let stale_time = self.stale_time;
    match self.entries.get_mut(key) {
      Some(entry) => {
        entry.last_used = now;
        if !entry.invalidated && now.saturating_duration_since(entry.fetched_at) < stale_time {
          Lookup::Fresh(&entry.page)
        } else {
          Lookup::Stale(&entry.page)
        }
      }
      None => Lookup::Miss,
    }
  }

  /// Read a page without touching its usage time or freshness.
  #[cfg(test)]
  pub fn peek(&self, key: &QueryKey) -> Option<&NotePage> {
    self.entries.get(key).map(|e| &e.page)
  }

  pub fn is_fresh(&self, key: &QueryKey, now: Instant) -> bool {
    self.entries.get(key).is_some_and(|e| {
      !e.invalidated && now.saturating_duration_since(e.fetched_at) < self.stale_time
    })
  }

  /// Store a freshly fetched page, replacing any previous entry.
  pub fn put(&mut self, key: QueryKey, page: NotePage, now: Instant) {
    self.insert(key, page, now, false);
  }

  /// Store a page that was fetched before the last invalidation.
  pub fn put_stale(&mut self, key: QueryKey, page: NotePage, now: Instant) {
    self.insert(key, page, now, true);
  }

  fn insert(&mut self, key: QueryKey, page: NotePage, now: Instant, invalidated: bool) {
    tracing::trace!(%key, notes = page.notes.len(), invalidated, "cache put");
    self.entries.insert(
      key,
      CacheEntry {
        page,
        fetched_at: now,
        last_used: now,
        invalidated,
      },
    );
  }

  /// Mark every entry stale. Values stay available as placeholders.
  pub fn invalidate_all(&mut self) {
    tracing::debug!(entries = self.entries.len(), "cache invalidated");
    for entry in self.entries.values_mut() {
      entry.invalidated = true;
    }
  }

  /// Drop entries unused for longer than the retention window.
  /// `keep` is never dropped. Returns how many entries went away.
  pub fn prune(&mut self, now: Instant, keep: &QueryKey) -> usize {
    let gc_time = self.gc_time;
    let before = self.entries.len();
    self
      .entries
      .retain(|key, entry| key == keep || now.saturating_duration_since(entry.last_used) <= gc_time);
    before - self.entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
