use crate::cache::QueryKey;
use crate::config::Config;
use crate::controller::NotesController;
use crate::event::{Event, EventHandler};
use crate::mutation::Submit;
use crate::notes::client::NotesApi;
use crate::notes::types::Note;
use crate::query::DisplayState;
use crate::state::ViewState;
use crate::ui;
use crate::ui::components::{FormEvent, KeyResult, NoteForm, SearchBox, SearchEvent};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const TICK_RATE: Duration = Duration::from_millis(50);

/// Input mode, derived from what is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Search,
  Form,
  Confirm,
}

/// Main application state
pub struct App<A: NotesApi> {
  controller: NotesController<A>,
  search: SearchBox,
  form: NoteForm,
  list_state: ListState,
  base_url: String,

  /// Key the selection belongs to; a new key puts the cursor back on top
  selection_key: QueryKey,

  should_quit: bool,
}

impl<A: NotesApi> App<A> {
  /// Must be called inside a tokio runtime; the first page starts loading
  /// right away.
  pub fn new(api: Arc<A>, config: &Config, search: &str, page: u32) -> Self {
    let view = ViewState::with_initial(search, page, config.query.debounce());
    let controller = NotesController::new(api, config, view, Instant::now());
    let selection_key = controller.query().active_key().clone();
    Self {
      controller,
      search: SearchBox::with_value(search),
      form: NoteForm::new(),
      list_state: ListState::default(),
      base_url: config.api.base_url.clone(),
      selection_key,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(TICK_RATE);
    tracing::info!(base_url = %self.base_url, "session started");

    let result = self.main_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    tracing::info!("session ended");
    result
  }

  async fn main_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event, Instant::now()),
        None => break,
      }
    }
    Ok(())
  }

  pub fn handle_event(&mut self, event: Event, now: Instant) {
    if let Event::Key(key) = event {
      self.handle_key(key, now);
    }
    // Every event advances the clock, so typing never starves the debounce
    self.controller.tick(now);

    if !self.controller.view().modal_open() {
      self.form.reset();
    }
    let active = self.controller.query().active_key();
    if *active != self.selection_key {
      self.selection_key = active.clone();
      self.list_state.select(Some(0));
    }
    let len = match self.controller.query().display_state() {
      DisplayState::Notes { page, .. } => page.notes.len(),
      _ => 0,
    };
    ui::ensure_valid_selection(&mut self.list_state, len);
  }

  pub fn mode(&self) -> Mode {
    if self.controller.mutations().awaiting_confirmation().is_some() {
      Mode::Confirm
    } else if self.controller.view().modal_open() {
      Mode::Form
    } else if self.search.is_focused() {
      Mode::Search
    } else {
      Mode::Normal
    }
  }

  fn handle_key(&mut self, key: KeyEvent, now: Instant) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode() {
      Mode::Confirm => self.handle_confirm_key(key),
      Mode::Form => self.handle_form_key(key),
      Mode::Search | Mode::Normal => match self.search.handle_key(key) {
        KeyResult::Event(SearchEvent::Changed(text)) => self.controller.set_search(text, now),
        KeyResult::Event(SearchEvent::Done) | KeyResult::Handled => {}
        KeyResult::NotHandled => self.handle_normal_key(key, now),
      },
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent, now: Instant) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,

      KeyCode::Down | KeyCode::Char('j') => self.list_state.select_next(),
      KeyCode::Up | KeyCode::Char('k') => self.list_state.select_previous(),

      KeyCode::Right | KeyCode::Char('l') => self.controller.next_page(now),
      KeyCode::Left | KeyCode::Char('h') => self.controller.prev_page(now),

      KeyCode::Char('r') => self.controller.refresh(),
      KeyCode::Char('n') => {
        self.form.reset();
        self.controller.open_modal();
      }
      KeyCode::Char('d') => {
        if let Some(id) = self.selected_note().map(|n| n.id.clone()) {
          if !self.controller.request_delete(id) {
            tracing::debug!("delete already running, ignoring request");
          }
        }
      }
      _ => {}
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    match self
      .form
      .handle_key(key, &mut self.controller.form_mut().draft)
    {
      KeyResult::Event(FormEvent::Submit) => match self.controller.submit_create() {
        Submit::Started | Submit::Invalid => {}
        Submit::Busy => tracing::debug!("create already running"),
      },
      KeyResult::Event(FormEvent::Close) => {
        self.controller.close_modal();
        self.form.reset();
      }
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
        self.controller.confirm_delete();
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
        self.controller.cancel_delete();
      }
      _ => {}
    }
  }

  /// Note under the cursor, if the list is showing notes
  pub fn selected_note(&self) -> Option<&Note> {
    let DisplayState::Notes { page, .. } = self.controller.query().display_state() else {
      return None;
    };
    page.notes.get(self.list_state.selected()?)
  }

  /// Title of the note waiting for delete confirmation
  pub fn confirm_title(&self) -> Option<&str> {
    let id = self.controller.mutations().awaiting_confirmation()?;
    match self.controller.query().display_state() {
      DisplayState::Notes { page, .. } => page
        .notes
        .iter()
        .find(|n| n.id == id)
        .map(|n| n.title.as_str()),
      _ => None,
    }
  }

  pub fn controller(&self) -> &NotesController<A> {
    &self.controller
  }

  pub fn search(&self) -> &SearchBox {
    &self.search
  }

  pub fn form(&self) -> &NoteForm {
    &self.form
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Split borrow for drawing the list with its selection
  pub fn list_parts(&mut self) -> (&NotesController<A>, &mut ListState) {
    (&self.controller, &mut self.list_state)
  }

  #[cfg(test)]
  async fn settle(&mut self) {
    self.controller.settle().await;
    self.handle_event(Event::Tick, Instant::now());
  }
}
