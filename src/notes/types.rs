use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of note tags accepted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
  Todo,
  Work,
  Personal,
  Meeting,
  Shopping,
}

impl Tag {
  pub const ALL: [Tag; 5] = [
    Tag::Todo,
    Tag::Work,
    Tag::Personal,
    Tag::Meeting,
    Tag::Shopping,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Tag::Todo => "Todo",
      Tag::Work => "Work",
      Tag::Personal => "Personal",
      Tag::Meeting => "Meeting",
      Tag::Shopping => "Shopping",
    }
  }

  /// Next tag in display order, wrapping around
  pub fn next(self) -> Tag {
    let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Self::ALL[(idx + 1) % Self::ALL.len()]
  }

  /// Previous tag in display order, wrapping around
  pub fn prev(self) -> Tag {
    let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
    Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A note as stored by the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub content: String,
  pub tag: Tag,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One page of notes for a given query key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePage {
  pub notes: Vec<Note>,
  pub total_pages: u32,
  /// Always the page that was requested
  pub current_page: u32,
}

impl NotePage {
  pub fn is_empty(&self) -> bool {
    self.notes.is_empty()
  }
}

/// Validated payload for creating a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
  pub title: String,
  pub content: String,
  pub tag: Tag,
}

/// Editable state of the create form, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
  pub title: String,
  pub content: String,
  pub tag: Option<Tag>,
}

/// Normalized confirmation of a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deleted {
  pub id: String,
  pub message: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tag_wire_names_are_exact() {
    assert_eq!(serde_json::from_str::<Tag>("\"Meeting\"").unwrap(), Tag::Meeting);
    assert!(serde_json::from_str::<Tag>("\"meeting\"").is_err());
    assert!(serde_json::from_str::<Tag>("\"Urgent\"").is_err());
  }

  #[test]
  fn test_tag_cycle_wraps() {
    assert_eq!(Tag::Shopping.next(), Tag::Todo);
    assert_eq!(Tag::Todo.prev(), Tag::Shopping);
    assert_eq!(Tag::Work.next().prev(), Tag::Work);
  }

  #[test]
  fn test_note_deserializes_camel_case() {
    let note: Note = serde_json::from_str(
      r#"{"id":"65f1","title":"Buy milk","content":"2 litres","tag":"Shopping",
          "createdAt":"2025-01-10T09:00:00Z","updatedAt":"2025-01-11T09:00:00.000Z"}"#,
    )
    .unwrap();
    assert_eq!(note.id, "65f1");
    assert_eq!(note.tag, Tag::Shopping);
    assert!(note.updated_at > note.created_at);
  }

  #[test]
  fn test_note_rejects_unknown_tag() {
    let result: Result<Note, _> = serde_json::from_str(
      r#"{"id":"1","title":"x","content":"","tag":"Urgent",
          "createdAt":"2025-01-10T09:00:00Z","updatedAt":"2025-01-10T09:00:00Z"}"#,
    );
    assert!(result.is_err());
  }
}
