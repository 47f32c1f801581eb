//! Create and delete flows.
//!
//! Calls run on spawned tasks; `poll()` settles them on the UI tick. Every
//! success invalidates the page cache (which refetches the visible page)
//! and raises a toast. Failures only raise a toast: the create form keeps
//! its contents and the list keeps the note, since nothing is removed
//! optimistically.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::config::FormConfig;
use crate::notes::client::NotesApi;
use crate::notes::error::ApiError;
use crate::notes::types::{Deleted, Note, NoteDraft};
use crate::notify::Notifications;
use crate::query::NotesQuery;
use crate::state::ViewState;
use crate::validation::{validate, FieldError};

/// The create form: what the user typed plus the last validation result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
  pub draft: NoteDraft,
  pub errors: Vec<FieldError>,
}

/// Outcome of asking for a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
  /// Request is on the wire
  Started,
  /// Rejected locally; nothing was sent
  Invalid,
  /// A mutation of the same kind is still running
  Busy,
}

enum Done {
  Created(Result<Note, ApiError>),
  Deleted {
    id: String,
    result: Result<Deleted, ApiError>,
  },
}

/// Everything a settled mutation may touch
pub struct Effects<'a, A: NotesApi> {
  pub query: &'a mut NotesQuery<A>,
  pub view: &'a mut ViewState,
  pub form: &'a mut CreateForm,
  pub notices: &'a mut Notifications,
}

pub struct MutationCoordinator<A: NotesApi> {
  api: Arc<A>,
  rules: FormConfig,
  creating: bool,
  /// Id of the note being deleted
  deleting: Option<String>,
  /// Id waiting for the user to confirm
  awaiting_confirmation: Option<String>,
  tx: mpsc::UnboundedSender<Done>,
  rx: mpsc::UnboundedReceiver<Done>,
}

impl<A: NotesApi> MutationCoordinator<A> {
  pub fn new(api: Arc<A>, rules: FormConfig) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      api,
      rules,
      creating: false,
      deleting: None,
      awaiting_confirmation: None,
      tx,
      rx,
    }
  }

  pub fn is_creating(&self) -> bool {
    self.creating
  }

  pub fn deleting(&self) -> Option<&str> {
    self.deleting.as_deref()
  }

  /// Validate the form and, if it passes, send it.
  ///
  /// Validation errors are written back into the form.
  pub fn submit_create(&mut self, form: &mut CreateForm) -> Submit {
    if self.creating {
      return Submit::Busy;
    }
    let note = match validate(&form.draft, &self.rules) {
      Ok(note) => note,
      Err(errors) => {
        tracing::debug!(errors = errors.len(), "create rejected by validation");
        form.errors = errors;
        return Submit::Invalid;
      }
    };
    form.errors.clear();

    self.creating = true;
    tracing::info!(title = %note.title, tag = %note.tag, "creating note");
    let future = self.api.create_note(note);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let _ = tx.send(Done::Created(future.await));
    });
    Submit::Started
  }

  /// Ask for confirmation before deleting `id`.
  ///
  /// Returns false while another delete is running.
  pub fn request_delete(&mut self, id: impl Into<String>) -> bool {
    if self.deleting.is_some() {
      return false;
    }
    self.awaiting_confirmation = Some(id.into());
    true
  }

  pub fn awaiting_confirmation(&self) -> Option<&str> {
    self.awaiting_confirmation.as_deref()
  }

  pub fn cancel_delete(&mut self) {
    self.awaiting_confirmation = None;
  }

  /// Send the delete the user just confirmed.
  pub fn confirm_delete(&mut self) -> Submit {
    if self.deleting.is_some() {
      return Submit::Busy;
    }
    let Some(id) = self.awaiting_confirmation.take() else {
      return Submit::Invalid;
    };

    tracing::info!(%id, "deleting note");
    self.deleting = Some(id.clone());
    let future = self.api.delete_note(&id);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let result = future.await;
      let _ = tx.send(Done::Deleted { id, result });
    });
    Submit::Started
  }

  pub fn is_pending(&self) -> bool {
    self.creating || self.deleting.is_some()
  }

  /// Settle every mutation that has finished since the last call.
  pub fn poll(&mut self, mut fx: Effects<'_, A>, now: Instant) {
    while let Ok(done) = self.rx.try_recv() {
      match done {
        Done::Created(Ok(note)) => {
          self.creating = false;
          tracing::info!(id = %note.id, "note created");
          fx.query.invalidate_all();
          *fx.form = CreateForm::default();
          fx.view.close_modal();
          fx.notices.success("Note created!", now);
        }
        Done::Created(Err(err)) => {
          self.creating = false;
          fx.notices.error(format!("Failed to create note: {}", err), now);
        }
        Done::Deleted { id, result } => {
          self.deleting = None;
          match result {
            Ok(deleted) => {
              tracing::info!(id = %deleted.id, message = ?deleted.message, "note deleted");
              fx.query.invalidate_all();
              fx.notices.success("Note deleted!", now);
            }
            Err(err) => {
              tracing::warn!(%id, error = %err, "delete failed");
              fx.notices.error(format!("Failed to delete note: {}", err), now);
            }
          }
        }
      }
    }
  }
}
