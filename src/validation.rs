use std::fmt;

use crate::config::FormConfig;
use crate::notes::types::{NewNote, NoteDraft};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 50;
pub const CONTENT_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Title,
  Content,
  Tag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
  pub field: Field,
  pub message: String,
}

impl FieldError {
  fn new(field: Field, message: impl Into<String>) -> Self {
    Self {
      field,
      message: message.into(),
    }
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

/// Check a draft against the form rules and build the payload.
///
/// Title and content are trimmed before checking and sending. Lengths are
/// counted in characters, not bytes.
pub fn validate(draft: &NoteDraft, rules: &FormConfig) -> Result<NewNote, Vec<FieldError>> {
  let mut errors = Vec::new();

  let title = draft.title.trim();
  let title_len = title.chars().count();
  if title_len == 0 {
    errors.push(FieldError::new(Field::Title, "Title is required"));
  } else if title_len < TITLE_MIN {
    errors.push(FieldError::new(
      Field::Title,
      format!("Title must be at least {} characters", TITLE_MIN),
    ));
  } else if title_len > TITLE_MAX {
    errors.push(FieldError::new(
      Field::Title,
      format!("Title must be at most {} characters", TITLE_MAX),
    ));
  }

  let content = draft.content.trim();
  if content.chars().count() > CONTENT_MAX {
    errors.push(FieldError::new(
      Field::Content,
      format!("Content must be at most {} characters", CONTENT_MAX),
    ));
  } else if rules.content_required && content.is_empty() {
    errors.push(FieldError::new(Field::Content, "Content is required"));
  }

  if draft.tag.is_none() {
    errors.push(FieldError::new(Field::Tag, "Tag is required"));
  }

  match draft.tag {
    Some(tag) if errors.is_empty() => Ok(NewNote {
      title: title.to_string(),
      content: content.to_string(),
      tag,
    }),
    _ => Err(errors),
  }
}
