//! Serde-deserializable types matching NoteHub API responses.
//!
//! Deployments disagree on response envelopes (`{note}` vs a bare note on
//! create, `{message}` vs `{message, note}` vs a bare note on delete). All of
//! that is resolved here so the rest of the crate only sees `Note`,
//! `NotePage` and `Deleted`.

use serde::Deserialize;

use super::error::ApiError;
use super::types::{Deleted, Note, NotePage};
use crate::config::ResponseEnvelope;

// ============================================================================
// List endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotesResponse {
  #[serde(default)]
  pub notes: Vec<Note>,
  #[serde(default)]
  pub total_pages: u32,
  pub current_page: Option<u32>,
}

impl ApiNotesResponse {
  /// Convert into a page, pinning `current_page` to the requested page.
  pub fn into_page(self, requested_page: u32) -> NotePage {
    if let Some(reported) = self.current_page {
      if reported != requested_page {
        tracing::warn!(
          requested_page,
          reported,
          "server reported a different current page"
        );
      }
    }
    NotePage {
      notes: self.notes,
      total_pages: self.total_pages,
      current_page: requested_page,
    }
  }
}

// ============================================================================
// Create / delete envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
struct WrappedNote {
  note: Note,
}

#[derive(Debug, Deserialize)]
struct DeleteMessage {
  message: String,
  note: Option<Note>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnyCreated {
  Wrapped(WrappedNote),
  Bare(Note),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnyDeleted {
  Message(DeleteMessage),
  Bare(Note),
}

/// Error body shape used by the API for 4xx/5xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  pub message: Option<String>,
}

fn decode<T: for<'de> Deserialize<'de>>(body: &[u8], what: &str) -> Result<T, ApiError> {
  serde_json::from_slice(body).map_err(|e| ApiError::Decode(format!("{}: {}", what, e)))
}

pub fn decode_page(body: &[u8], requested_page: u32) -> Result<NotePage, ApiError> {
  let response: ApiNotesResponse = decode(body, "notes list")?;
  Ok(response.into_page(requested_page))
}

pub fn decode_created(body: &[u8], envelope: ResponseEnvelope) -> Result<Note, ApiError> {
  match envelope {
    ResponseEnvelope::Wrapped => decode::<WrappedNote>(body, "created note").map(|w| w.note),
    ResponseEnvelope::Bare => decode::<Note>(body, "created note"),
    ResponseEnvelope::Auto => match decode::<AnyCreated>(body, "created note")? {
      AnyCreated::Wrapped(w) => Ok(w.note),
      AnyCreated::Bare(note) => Ok(note),
    },
  }
}

pub fn decode_deleted(
  body: &[u8],
  id: &str,
  envelope: ResponseEnvelope,
) -> Result<Deleted, ApiError> {
  let from_message = |m: DeleteMessage| Deleted {
    id: m.note.map(|n| n.id).unwrap_or_else(|| id.to_string()),
    message: Some(m.message),
  };
  let from_note = |n: Note| Deleted {
    id: n.id,
    message: None,
  };

  match envelope {
    ResponseEnvelope::Wrapped => decode::<DeleteMessage>(body, "delete response").map(from_message),
    ResponseEnvelope::Bare => decode::<Note>(body, "deleted note").map(from_note),
    ResponseEnvelope::Auto => {
      // Some deployments answer 204 with no body
      if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Deleted {
          id: id.to_string(),
          message: None,
        });
      }
      match decode::<AnyDeleted>(body, "delete response")? {
        AnyDeleted::Message(m) => Ok(from_message(m)),
        AnyDeleted::Bare(n) => Ok(from_note(n)),
      }
    }
  }
}

/// Pull a human-readable message out of an error body.
pub fn error_message(body: &[u8]) -> String {
  if let Ok(ApiErrorBody {
    message: Some(message),
  }) = serde_json::from_slice::<ApiErrorBody>(body)
  {
    return message;
  }
  let text = String::from_utf8_lossy(body);
  let text = text.trim();
  if text.chars().count() > 200 {
    let cut: String = text.chars().take(200).collect();
    format!("{}...", cut)
  } else {
    text.to_string()
  }
}
