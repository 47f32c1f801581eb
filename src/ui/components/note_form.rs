use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::mutation::CreateForm;
use crate::notes::types::{NoteDraft, Tag};
use crate::ui::renderfns::{centered_rect, tag_color};
use crate::validation::Field;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Events the form reports to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
  Submit,
  Close,
}

const FIELDS: [Field; 3] = [Field::Title, Field::Content, Field::Tag];

/// Key handling and drawing for the create modal.
///
/// Text lives in the inputs (they own the cursors) and is copied into the
/// controller's draft after every edit, so validation always sees what is
/// on screen.
#[derive(Debug, Clone)]
pub struct NoteForm {
  focus: Field,
  title: TextInput,
  content: TextInput,
}

impl Default for NoteForm {
  fn default() -> Self {
    Self {
      focus: Field::Title,
      title: TextInput::new(),
      content: TextInput::multiline(),
    }
  }
}

impl NoteForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }

  fn step_focus(&mut self, forward: bool) {
    let idx = FIELDS.iter().position(|f| *f == self.focus).unwrap_or(0);
    let next = if forward {
      (idx + 1) % FIELDS.len()
    } else {
      (idx + FIELDS.len() - 1) % FIELDS.len()
    };
    self.focus = FIELDS[next];
  }

  pub fn handle_key(&mut self, key: KeyEvent, draft: &mut NoteDraft) -> KeyResult<FormEvent> {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.step_focus(true);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.step_focus(false);
        return KeyResult::Handled;
      }
      _ => {}
    }

    if self.focus == Field::Tag {
      return match key.code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
          draft.tag = Some(draft.tag.map(Tag::next).unwrap_or(Tag::ALL[0]));
          KeyResult::Handled
        }
        KeyCode::Left | KeyCode::Char('h') => {
          draft.tag = Some(draft.tag.map(Tag::prev).unwrap_or(Tag::ALL[Tag::ALL.len() - 1]));
          KeyResult::Handled
        }
        KeyCode::Enter => KeyResult::Event(FormEvent::Submit),
        KeyCode::Esc => KeyResult::Event(FormEvent::Close),
        _ => KeyResult::Handled,
      };
    }

    let input = match self.focus {
      Field::Title => &mut self.title,
      _ => &mut self.content,
    };
    match input.handle_key(key) {
      InputResult::Submitted => KeyResult::Event(FormEvent::Submit),
      InputResult::Cancelled => KeyResult::Event(FormEvent::Close),
      InputResult::Changed => {
        draft.title = self.title.value().to_string();
        draft.content = self.content.value().to_string();
        KeyResult::Handled
      }
      InputResult::Moved | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, form: &CreateForm, submitting: bool) {
    let area = centered_rect(area, 64, 17);
    frame.render_widget(Clear, area);

    let title = if submitting {
      " New note (creating...) "
    } else {
      " New note "
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Title
        Constraint::Min(3),    // Content
        Constraint::Length(3), // Tag
        Constraint::Length(1), // Hints
      ])
      .split(inner);

    self.render_text_field(frame, chunks[0], Field::Title, &self.title, form);
    self.render_text_field(frame, chunks[1], Field::Content, &self.content, form);
    self.render_tag_field(frame, chunks[2], form);

    let hints = Line::from(vec![
      Span::styled("<tab>", Style::default().fg(Color::Cyan)),
      Span::styled(" field  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<←/→>", Style::default().fg(Color::Cyan)),
      Span::styled(" tag  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<enter>", Style::default().fg(Color::Cyan)),
      Span::styled(" create  ", Style::default().fg(Color::DarkGray)),
      Span::styled("<esc>", Style::default().fg(Color::Cyan)),
      Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[3]);
  }

  fn field_block(&self, field: Field, label: &'static str, form: &CreateForm) -> Block<'static> {
    let error = form.errors.iter().find(|e| e.field == field);
    let color = if error.is_some() {
      Color::Red
    } else if self.focus == field {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let mut block = Block::default()
      .title(format!(" {} ", label))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(color));
    if let Some(error) = error {
      block = block.title_bottom(Line::styled(
        format!(" {} ", error.message),
        Style::default().fg(Color::Red),
      ));
    }
    block
  }

  fn render_text_field(
    &self,
    frame: &mut Frame,
    area: Rect,
    field: Field,
    input: &TextInput,
    form: &CreateForm,
  ) {
    let label = match field {
      Field::Title => "Title",
      _ => "Content",
    };
    let mut text = input.value().to_string();
    if self.focus == field {
      text.push('_');
    }
    let paragraph = Paragraph::new(text)
      .wrap(Wrap { trim: false })
      .block(self.field_block(field, label, form));
    frame.render_widget(paragraph, area);
  }

  fn render_tag_field(&self, frame: &mut Frame, area: Rect, form: &CreateForm) {
    let mut spans = Vec::new();
    for tag in Tag::ALL {
      let selected = form.draft.tag == Some(tag);
      let style = if selected {
        Style::default().fg(Color::Black).bg(tag_color(tag)).bold()
      } else {
        Style::default().fg(tag_color(tag))
      };
      spans.push(Span::styled(format!(" {} ", tag), style));
      spans.push(Span::raw(" "));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(self.field_block(Field::Tag, "Tag", form));
    frame.render_widget(paragraph, area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_text(form: &mut NoteForm, draft: &mut NoteDraft, text: &str) {
    for c in text.chars() {
      form.handle_key(key(KeyCode::Char(c)), draft);
    }
  }

  #[test]
  fn test_typing_fills_draft_fields() {
    let mut form = NoteForm::new();
    let mut draft = NoteDraft::default();
    type_text(&mut form, &mut draft, "Milk");
    form.handle_key(key(KeyCode::Tab), &mut draft);
    type_text(&mut form, &mut draft, "2 liters");
    assert_eq!(draft.title, "Milk");
    assert_eq!(draft.content, "2 liters");
    assert_eq!(form.focus, Field::Content);
  }

  #[test]
  fn test_tag_cycles_from_none() {
    let mut form = NoteForm::new();
    let mut draft = NoteDraft::default();
    form.handle_key(key(KeyCode::BackTab), &mut draft);
    assert_eq!(form.focus, Field::Tag);

    form.handle_key(key(KeyCode::Right), &mut draft);
    assert_eq!(draft.tag, Some(Tag::Todo));
    form.handle_key(key(KeyCode::Right), &mut draft);
    assert_eq!(draft.tag, Some(Tag::Work));
    form.handle_key(key(KeyCode::Left), &mut draft);
    form.handle_key(key(KeyCode::Left), &mut draft);
    assert_eq!(draft.tag, Some(Tag::Shopping));
  }

  #[test]
  fn test_tag_keys_do_not_type_into_text() {
    let mut form = NoteForm::new();
    let mut draft = NoteDraft::default();
    form.handle_key(key(KeyCode::BackTab), &mut draft);
    type_text(&mut form, &mut draft, "hl");
    assert_eq!(draft.title, "");
  }

  #[test]
  fn test_enter_and_escape_report_events() {
    let mut form = NoteForm::new();
    let mut draft = NoteDraft::default();
    assert_eq!(
      form.handle_key(key(KeyCode::Enter), &mut draft),
      KeyResult::Event(FormEvent::Submit)
    );
    form.handle_key(key(KeyCode::Tab), &mut draft);
    form.handle_key(key(KeyCode::Tab), &mut draft);
    assert_eq!(
      form.handle_key(key(KeyCode::Esc), &mut draft),
      KeyResult::Event(FormEvent::Close)
    );
  }

  #[test]
  fn test_reset_clears_inputs_and_focus() {
    let mut form = NoteForm::new();
    let mut draft = NoteDraft::default();
    type_text(&mut form, &mut draft, "abc");
    form.handle_key(key(KeyCode::Tab), &mut draft);
    form.reset();
    assert_eq!(form.focus, Field::Title);
    assert!(form.title.is_empty());
  }
}
