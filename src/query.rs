//! Async fetch path for note pages, in the spirit of TanStack Query.
//!
//! `NotesQuery` owns the page cache and answers three questions for the
//! view: what to show for the active key, whether a fetch is running, and
//! whether the last fetch failed.
//!
//! Rules:
//! - at most one network call per key at a time (single-flight);
//! - every landed result is cached, but only a result for the *active* key
//!   changes what is shown (last-key-wins);
//! - while the active key has no usable entry, the previously shown page
//!   stays visible as a placeholder;
//! - a result that was in flight across an invalidation is cached as stale
//!   and, if its key is still active, triggers one follow-up fetch.
//!
//! Fetches run on spawned tasks and report back over a channel drained by
//! `poll()`, which the UI calls on every tick.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::cache::{Lookup, QueryCache, QueryKey};
use crate::notes::client::NotesApi;
use crate::notes::error::ApiError;
use crate::notes::types::NotePage;

/// What the note list should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState<'a> {
  /// Nothing to show yet
  Loading,
  /// Nothing to show and the last fetch failed
  Failed(&'a str),
  /// The active page loaded and has no notes
  Empty,
  /// Notes to show; `placeholder` means they belong to another key or are
  /// being refreshed
  Notes {
    page: &'a NotePage,
    placeholder: bool,
  },
}

#[derive(Debug, Clone)]
struct Shown {
  key: QueryKey,
  page: NotePage,
}

struct FetchDone {
  key: QueryKey,
  generation: u64,
  result: Result<NotePage, ApiError>,
}

pub struct NotesQuery<A: NotesApi> {
  api: Arc<A>,
  cache: QueryCache,
  active: QueryKey,
  shown: Option<Shown>,
  /// Keys with a call on the wire, and the cache generation it started in
  in_flight: HashMap<QueryKey, u64>,
  /// Bumped by every invalidation
  generation: u64,
  error: Option<String>,
  tx: mpsc::UnboundedSender<FetchDone>,
  rx: mpsc::UnboundedReceiver<FetchDone>,
}

impl<A: NotesApi> NotesQuery<A> {
  /// Create the query and start loading `initial`.
  ///
  /// Must be called from within a tokio runtime.
  pub fn new(api: Arc<A>, cache: QueryCache, initial: QueryKey, now: Instant) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut query = Self {
      api,
      cache,
      active: initial,
      shown: None,
      in_flight: HashMap::new(),
      generation: 0,
      error: None,
      tx,
      rx,
    };
    query.load_active(now);
    query
  }

  pub fn active_key(&self) -> &QueryKey {
    &self.active
  }

  /// Switch to `key`. No-op if it is already active.
  pub fn activate(&mut self, key: QueryKey, now: Instant) {
    if key == self.active {
      return;
    }
    tracing::debug!(from = %self.active, to = %key, "active key changed");
    self.active = key;
    self.error = None;
    self.load_active(now);
  }

  fn load_active(&mut self, now: Instant) {
    let (page, fresh) = match self.cache.get(&self.active, now) {
      Lookup::Fresh(p) => (Some(p.clone()), true),
      Lookup::Stale(p) => (Some(p.clone()), false),
      Lookup::Miss => (None, false),
    };
    if let Some(page) = page {
      self.shown = Some(Shown {
        key: self.active.clone(),
        page,
      });
    }
    if fresh {
      tracing::trace!(key = %self.active, "served from cache");
    } else {
      self.start_fetch();
    }
  }

  /// Fetch the active key even if the cached page is fresh.
  pub fn refetch(&mut self) {
    self.start_fetch();
  }

  /// Mark every cached page stale and refetch the active one.
  pub fn invalidate_all(&mut self) {
    self.generation += 1;
    self.cache.invalidate_all();
    self.start_fetch();
  }

  fn start_fetch(&mut self) {
    let key = self.active.clone();
    if self.in_flight.contains_key(&key) {
      // Either already current, or outdated and will be followed up on landing
      tracing::trace!(%key, "fetch already in flight");
      return;
    }

    self.in_flight.insert(key.clone(), self.generation);
    let generation = self.generation;
    let future = self.api.fetch_notes(&key);
    let tx = self.tx.clone();
    tracing::debug!(%key, generation, "fetch started");

    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the query may have been dropped
      let _ = tx.send(FetchDone {
        key,
        generation,
        result,
      });
    });
  }

  /// Apply every fetch that has landed since the last call.
  ///
  /// Returns the failures of fetches for the active key, so the caller
  /// can surface them.
  pub fn poll(&mut self, now: Instant) -> Vec<ApiError> {
    let mut errors = Vec::new();
    while let Ok(done) = self.rx.try_recv() {
      if let Some(err) = self.apply(done, now) {
        errors.push(err);
      }
    }
    errors
  }

  fn apply(&mut self, done: FetchDone, now: Instant) -> Option<ApiError> {
    let FetchDone {
      key,
      generation,
      result,
    } = done;
    self.in_flight.remove(&key);
    let outdated = generation != self.generation;
    let is_active = key == self.active;

    match result {
      Ok(page) => {
        if outdated {
          self.cache.put_stale(key.clone(), page.clone(), now);
        } else {
          self.cache.put(key.clone(), page.clone(), now);
        }
        if !is_active {
          tracing::trace!(%key, "result for abandoned key cached, not shown");
          return None;
        }
        self.shown = Some(Shown { key, page });
        self.error = None;
        if outdated {
          self.start_fetch();
        }
        None
      }
      Err(err) => {
        if !is_active {
          tracing::debug!(%key, error = %err, "fetch for abandoned key failed");
          return None;
        }
        if outdated {
          self.start_fetch();
          return None;
        }
        tracing::warn!(%key, error = %err, "fetch failed");
        self.error = Some(err.to_string());
        Some(err)
      }
    }
  }

  pub fn is_fetching(&self) -> bool {
    self.in_flight.contains_key(&self.active)
  }

  /// Whether any key, active or not, has a call on the wire
  pub fn has_in_flight(&self) -> bool {
    !self.in_flight.is_empty()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Page count of whatever is on screen, for the pagination control
  pub fn total_pages(&self) -> u32 {
    self.shown.as_ref().map(|s| s.page.total_pages).unwrap_or(0)
  }

  /// Page count reported for the active key itself, not a placeholder
  pub fn active_total_pages(&self) -> Option<u32> {
    self
      .shown
      .as_ref()
      .filter(|s| s.key == self.active)
      .map(|s| s.page.total_pages)
  }

  pub fn display_state(&self) -> DisplayState<'_> {
    match &self.shown {
      Some(shown) if !shown.page.is_empty() => {
        // Another key's page after the active fetch failed is just old data
        let waiting = shown.key != self.active && self.error.is_none();
        DisplayState::Notes {
          page: &shown.page,
          placeholder: waiting || self.is_fetching(),
        }
      }
      Some(shown) if shown.key == self.active => DisplayState::Empty,
      _ => match &self.error {
        Some(e) => DisplayState::Failed(e),
        None => DisplayState::Loading,
      },
    }
  }

  /// Drop cached pages that have not been used for a while.
  pub fn prune(&mut self, now: Instant) {
    let removed = self.cache.prune(now, &self.active);
    if removed > 0 {
      tracing::debug!(removed, "pruned cached pages");
    }
  }

  pub fn cache(&self) -> &QueryCache {
    &self.cache
  }

  /// Poll until nothing is in flight.
  #[cfg(test)]
  pub async fn settle(&mut self) -> Vec<ApiError> {
    let mut errors = Vec::new();
    for _ in 0..1000 {
      errors.extend(self.poll(Instant::now()));
      if self.in_flight.is_empty() {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    errors
  }

  /// Poll until a result for `key` has landed.
  #[cfg(test)]
  pub async fn settle_key(&mut self, key: &QueryKey) -> Vec<ApiError> {
    let mut errors = Vec::new();
    for _ in 0..1000 {
      errors.extend(self.poll(Instant::now()));
      if !self.in_flight.contains_key(key) {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    errors
  }
}
