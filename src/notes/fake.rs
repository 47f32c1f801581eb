//! In-memory `NotesApi` used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Notify;

use super::client::NotesApi;
use super::error::ApiError;
use super::types::{Deleted, NewNote, Note, NotePage, Tag};
use crate::cache::QueryKey;

const PER_PAGE: usize = 12;

#[derive(Default)]
struct State {
  notes: Vec<Note>,
  next_id: usize,
  fetches: Vec<QueryKey>,
  fetch_error: Option<ApiError>,
  create_error: Option<ApiError>,
  delete_error: Option<ApiError>,
  gates: HashMap<Option<String>, Arc<Notify>>,
}

#[derive(Clone, Default)]
pub struct FakeNotes {
  state: Arc<Mutex<State>>,
  creates: Arc<AtomicUsize>,
  deletes: Arc<AtomicUsize>,
}

pub fn note(id: &str, title: &str, tag: Tag) -> Note {
  let now = Utc::now();
  Note {
    id: id.to_string(),
    title: title.to_string(),
    content: format!("{} content", title),
    tag,
    created_at: now,
    updated_at: now,
  }
}

impl FakeNotes {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_notes(notes: Vec<Note>) -> Self {
    let fake = Self::new();
    fake.state.lock().unwrap().notes = notes;
    fake
  }

  /// Every key fetched so far, in order
  pub fn fetches(&self) -> Vec<QueryKey> {
    self.state.lock().unwrap().fetches.clone()
  }

  pub fn fetch_count(&self) -> usize {
    self.state.lock().unwrap().fetches.len()
  }

  pub fn fetches_for(&self, search: Option<&str>) -> usize {
    self
      .state
      .lock()
      .unwrap()
      .fetches
      .iter()
      .filter(|k| k.search() == search)
      .count()
  }

  pub fn create_count(&self) -> usize {
    self.creates.load(Ordering::SeqCst)
  }

  pub fn delete_count(&self) -> usize {
    self.deletes.load(Ordering::SeqCst)
  }

  pub fn fail_fetches(&self, err: Option<ApiError>) {
    self.state.lock().unwrap().fetch_error = err;
  }

  pub fn fail_next_create(&self, err: ApiError) {
    self.state.lock().unwrap().create_error = Some(err);
  }

  pub fn fail_next_delete(&self, err: ApiError) {
    self.state.lock().unwrap().delete_error = Some(err);
  }

  /// Hold fetches for `search` until `release` is called
  pub fn hold(&self, search: Option<&str>) {
    self
      .state
      .lock()
      .unwrap()
      .gates
      .insert(search.map(String::from), Arc::new(Notify::new()));
  }

  pub fn release(&self, search: Option<&str>) {
    let gate = self
      .state
      .lock()
      .unwrap()
      .gates
      .remove(&search.map(String::from));
    if let Some(gate) = gate {
      gate.notify_one();
    }
  }

  fn page_for(&self, key: &QueryKey) -> Result<NotePage, ApiError> {
    let state = self.state.lock().unwrap();
    if let Some(err) = &state.fetch_error {
      return Err(err.clone());
    }
    let needle = key.search().map(str::to_lowercase);
    let matching: Vec<&Note> = state
      .notes
      .iter()
      .filter(|n| match &needle {
        Some(s) => n.title.to_lowercase().contains(s) || n.content.to_lowercase().contains(s),
        None => true,
      })
      .collect();
    let total_pages = matching.len().div_ceil(PER_PAGE) as u32;
    let start = (key.page().saturating_sub(1) as usize) * PER_PAGE;
    let notes = matching
      .into_iter()
      .skip(start)
      .take(PER_PAGE)
      .cloned()
      .collect();
    Ok(NotePage {
      notes,
      total_pages,
      current_page: key.page(),
    })
  }
}

impl NotesApi for FakeNotes {
  fn fetch_notes(&self, key: &QueryKey) -> BoxFuture<'static, Result<NotePage, ApiError>> {
    let fake = self.clone();
    let key = key.clone();
    let gate = {
      let mut state = self.state.lock().unwrap();
      state.fetches.push(key.clone());
      state.gates.get(&key.search().map(String::from)).cloned()
    };
    async move {
      if let Some(gate) = gate {
        gate.notified().await;
      }
      fake.page_for(&key)
    }
    .boxed()
  }

  fn create_note(&self, new: NewNote) -> BoxFuture<'static, Result<Note, ApiError>> {
    self.creates.fetch_add(1, Ordering::SeqCst);
    let state = self.state.clone();
    async move {
      let mut state = state.lock().unwrap();
      if let Some(err) = state.create_error.take() {
        return Err(err);
      }
      state.next_id += 1;
      let mut created = note(&format!("new-{}", state.next_id), &new.title, new.tag);
      created.content = new.content;
      state.notes.insert(0, created.clone());
      Ok(created)
    }
    .boxed()
  }

  fn delete_note(&self, id: &str) -> BoxFuture<'static, Result<Deleted, ApiError>> {
    self.deletes.fetch_add(1, Ordering::SeqCst);
    let state = self.state.clone();
    let id = id.to_string();
    async move {
      let mut state = state.lock().unwrap();
      if let Some(err) = state.delete_error.take() {
        return Err(err);
      }
      let before = state.notes.len();
      state.notes.retain(|n| n.id != id);
      if state.notes.len() == before {
        return Err(ApiError::NotFound(format!("note {}", id)));
      }
      Ok(Deleted {
        id,
        message: Some("Note deleted".into()),
      })
    }
    .boxed()
  }
}
