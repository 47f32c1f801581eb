use std::time::Duration;
use tokio::time::Instant;

use crate::cache::QueryKey;
use crate::debounce::Debouncer;

/// Search, paging and modal state of the notes screen.
///
/// `search` follows the input box keystroke by keystroke; `debounced_search`
/// only catches up after a quiet period and is what the active query key is
/// built from.
#[derive(Debug, Clone)]
pub struct ViewState {
  search: String,
  debounced_search: String,
  page: u32,
  modal_open: bool,
  debouncer: Debouncer<String>,
}

impl ViewState {
  pub fn new(debounce: Duration) -> Self {
    Self::with_initial("", 1, debounce)
  }

  /// Start with a search and page already applied (no debounce)
  pub fn with_initial(search: &str, page: u32, debounce: Duration) -> Self {
    Self {
      search: search.to_string(),
      debounced_search: search.to_string(),
      page: page.max(1),
      modal_open: false,
      debouncer: Debouncer::new(debounce),
    }
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  pub fn debounced_search(&self) -> &str {
    &self.debounced_search
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn modal_open(&self) -> bool {
    self.modal_open
  }

  pub fn query_key(&self) -> QueryKey {
    QueryKey::new(&self.debounced_search, self.page)
  }

  /// Update the visible search text and (re)schedule the debounced copy.
  pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
    let text = text.into();
    self.search = text.clone();
    self.debouncer.push(text, now);
  }

  /// Advance the debounce clock. Returns true if `debounced_search` changed.
  pub fn tick(&mut self, now: Instant) -> bool {
    let Some(settled) = self.debouncer.poll(now) else {
      return false;
    };
    if settled == self.debounced_search {
      return false;
    }
    tracing::debug!(search = %settled, "search settled");
    self.debounced_search = settled;
    if self.page != 1 {
      self.page = 1;
    }
    true
  }

  /// Jump to a page. Out-of-range pages are left to the API, which answers
  /// with an empty list; the controller moves back once that result lands.
  pub fn set_page(&mut self, page: u32) {
    self.page = page.max(1);
  }

  /// Move forward, staying within `total_pages`. Returns true if moved.
  pub fn next_page(&mut self, total_pages: u32) -> bool {
    if self.page < total_pages.max(1) {
      self.page += 1;
      true
    } else {
      false
    }
  }

  /// Move back, staying at or above 1. Returns true if moved.
  pub fn prev_page(&mut self) -> bool {
    if self.page > 1 {
      self.page -= 1;
      true
    } else {
      false
    }
  }

  pub fn open_modal(&mut self) {
    self.modal_open = true;
  }

  pub fn close_modal(&mut self) {
    self.modal_open = false;
  }
}
