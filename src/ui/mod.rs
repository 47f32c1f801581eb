pub mod components;
mod renderfns;
mod views;

use crate::app::{App, Mode};
use crate::notes::client::NotesApi;
use components::{draw_confirm, draw_pagination, draw_toasts};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use renderfns::{draw_footer, draw_header};

/// Main draw function
pub fn draw<A: NotesApi>(frame: &mut Frame, app: &mut App<A>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Note list
      Constraint::Length(1), // Pagination
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let controller = app.controller();
  let page = controller.view().page();
  let total_pages = controller.query().total_pages();
  draw_header(
    frame,
    chunks[0],
    app.base_url(),
    app.search(),
    page,
    total_pages,
  );
  draw_pagination(frame, chunks[2], page, total_pages);
  draw_footer(frame, chunks[3], hints(app.mode()), status(app));

  {
    let (controller, list_state) = app.list_parts();
    views::draw_note_list(
      frame,
      chunks[1],
      controller.query().display_state(),
      list_state,
      controller.mutations().deleting(),
    );
  }

  match app.mode() {
    Mode::Form => {
      let controller = app.controller();
      app.form().render(
        frame,
        chunks[1],
        controller.form(),
        controller.mutations().is_creating(),
      );
    }
    Mode::Confirm => {
      draw_confirm(frame, chunks[1], app.confirm_title().unwrap_or("this note"));
    }
    Mode::Normal | Mode::Search => {}
  }

  draw_toasts(frame, chunks[1], app.controller().notices());
}

fn hints(mode: Mode) -> &'static [(&'static str, &'static str)] {
  match mode {
    Mode::Normal => &[
      ("/", "search"),
      ("n", "new"),
      ("d", "delete"),
      ("j/k", "move"),
      ("h/l", "page"),
      ("r", "refresh"),
      ("q", "quit"),
    ],
    Mode::Search => &[("enter", "done"), ("esc", "clear")],
    Mode::Form => &[("tab", "field"), ("enter", "create"), ("esc", "cancel")],
    Mode::Confirm => &[("y", "delete"), ("n", "keep")],
  }
}

fn status<A: NotesApi>(app: &App<A>) -> Option<&'static str> {
  let controller = app.controller();
  if controller.mutations().is_creating() {
    Some("Creating...")
  } else if controller.mutations().deleting().is_some() {
    Some("Deleting...")
  } else if controller.query().is_fetching() {
    Some("Loading...")
  } else {
    None
  }
}

/// Keep the selection inside a list of `len` items
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
  } else {
    match state.selected() {
      Some(i) if i >= len => state.select(Some(len - 1)),
      None => state.select(Some(0)),
      _ => {}
    }
  }
}
