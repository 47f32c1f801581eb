use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

/// Events the search box reports to the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Text changed; emitted on every keystroke (empty on cancel)
  Changed(String),
  /// Focus left the box, text kept
  Done,
}

/// Toolbar search box. Typing only reaches it while focused.
#[derive(Debug, Clone, Default)]
pub struct SearchBox {
  input: TextInput,
  focused: bool,
}

impl SearchBox {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start with text already in the box (from `--search`)
  pub fn with_value(value: &str) -> Self {
    let mut input = TextInput::new();
    input.set_value(value);
    Self {
      input,
      focused: false,
    }
  }

  pub fn is_focused(&self) -> bool {
    self.focused
  }

  pub fn value(&self) -> &str {
    self.input.value()
  }

  /// Handle a key. When unfocused only `/` is taken, to focus the box.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.focused {
      if key.code == KeyCode::Char('/') {
        self.focused = true;
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted => {
        self.focused = false;
        KeyResult::Event(SearchEvent::Done)
      }
      InputResult::Cancelled => {
        self.focused = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Changed(String::new()))
      }
      InputResult::Changed => KeyResult::Event(SearchEvent::Changed(self.value().to_string())),
      InputResult::Moved => KeyResult::Handled,
      // Swallow everything else so list keys don't fire while typing
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Spans for the header bar
  pub fn spans(&self) -> Vec<Span<'_>> {
    let accent = if self.focused {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let mut spans = vec![Span::styled("/", Style::default().fg(accent))];
    if self.input.is_empty() && !self.focused {
      spans.push(Span::styled("search", Style::default().fg(Color::DarkGray)));
    } else {
      spans.push(Span::styled(self.value(), Style::default().fg(Color::White)));
    }
    if self.focused {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    spans
  }
}
