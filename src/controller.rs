use std::sync::Arc;
use tokio::time::Instant;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::mutation::{CreateForm, Effects, MutationCoordinator, Submit};
use crate::notes::client::NotesApi;
use crate::notify::Notifications;
use crate::query::NotesQuery;
use crate::state::ViewState;

/// One session of the notes screen.
///
/// Owns the view state, the notes query (and through it the page cache),
/// the mutation coordinator and the toast queue. The UI calls `tick` on
/// every loop iteration; all other methods are direct user intents.
pub struct NotesController<A: NotesApi> {
  view: ViewState,
  query: NotesQuery<A>,
  mutations: MutationCoordinator<A>,
  form: CreateForm,
  notices: Notifications,
}

impl<A: NotesApi> NotesController<A> {
  /// Must be called from within a tokio runtime; the first page starts
  /// loading immediately.
  pub fn new(api: Arc<A>, config: &Config, view: ViewState, now: Instant) -> Self {
    let cache = QueryCache::new(config.query.stale_time(), config.query.gc_time());
    let query = NotesQuery::new(api.clone(), cache, view.query_key(), now);
    let mutations = MutationCoordinator::new(api, config.form.clone());
    Self {
      view,
      query,
      mutations,
      form: CreateForm::default(),
      notices: Notifications::new(),
    }
  }

  pub fn view(&self) -> &ViewState {
    &self.view
  }

  pub fn query(&self) -> &NotesQuery<A> {
    &self.query
  }

  pub fn mutations(&self) -> &MutationCoordinator<A> {
    &self.mutations
  }

  pub fn notices(&self) -> &Notifications {
    &self.notices
  }

  pub fn form(&self) -> &CreateForm {
    &self.form
  }

  pub fn form_mut(&mut self) -> &mut CreateForm {
    &mut self.form
  }

  pub fn set_search(&mut self, text: impl Into<String>, now: Instant) {
    self.view.set_search(text, now);
  }

  pub fn set_page(&mut self, page: u32, now: Instant) {
    self.view.set_page(page);
    self.sync(now);
  }

  pub fn next_page(&mut self, now: Instant) {
    if self.view.next_page(self.query.total_pages()) {
      self.sync(now);
    }
  }

  pub fn prev_page(&mut self, now: Instant) {
    if self.view.prev_page() {
      self.sync(now);
    }
  }

  pub fn refresh(&mut self) {
    self.query.refetch();
  }

  pub fn open_modal(&mut self) {
    self.view.open_modal();
  }

  /// Close the create form, discarding what was typed
  pub fn close_modal(&mut self) {
    self.view.close_modal();
    self.form = CreateForm::default();
  }

  pub fn submit_create(&mut self) -> Submit {
    self.mutations.submit_create(&mut self.form)
  }

  pub fn request_delete(&mut self, id: impl Into<String>) -> bool {
    self.mutations.request_delete(id)
  }

  pub fn confirm_delete(&mut self) -> Submit {
    self.mutations.confirm_delete()
  }

  pub fn cancel_delete(&mut self) {
    self.mutations.cancel_delete();
  }

  /// Drive timers and apply everything that landed since the last tick.
  pub fn tick(&mut self, now: Instant) {
    self.view.tick(now);
    self.sync(now);

    for err in self.query.poll(now) {
      self
        .notices
        .error(format!("Failed to load notes: {}", err), now);
    }
    self.clamp_page(now);

    self.mutations.poll(
      Effects {
        query: &mut self.query,
        view: &mut self.view,
        form: &mut self.form,
        notices: &mut self.notices,
      },
      now,
    );

    self.notices.prune(now);
    self.query.prune(now);
  }

  /// Pull the page back inside `[1, max(total_pages, 1)]` once the active
  /// key reports fewer pages, e.g. after the last note of the last page was
  /// deleted.
  fn clamp_page(&mut self, now: Instant) {
    let Some(total) = self.query.active_total_pages() else {
      return;
    };
    let last = total.max(1);
    if self.view.page() > last {
      tracing::debug!(page = self.view.page(), last, "page beyond last, moving back");
      self.view.set_page(last);
      self.sync(now);
    }
  }

  fn sync(&mut self, now: Instant) {
    self.query.activate(self.view.query_key(), now);
  }

  /// Tick until no fetch or mutation is outstanding.
  #[cfg(test)]
  pub async fn settle(&mut self) {
    for _ in 0..1000 {
      self.tick(Instant::now());
      if !self.query.has_in_flight() && !self.mutations.is_pending() {
        break;
      }
      tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::QueryKey;
  use crate::notes::error::ApiError;
  use crate::notes::fake::{note, FakeNotes};
  use crate::notes::types::{Note, NoteDraft, Tag};
  use crate::notify::Level;
  use crate::query::DisplayState;
  use crate::validation::Field;
  use std::time::Duration;

  fn controller(fake: &FakeNotes) -> NotesController<FakeNotes> {
    controller_at(fake, ViewState::new(Duration::from_millis(500)))
  }

  fn controller_at(fake: &FakeNotes, view: ViewState) -> NotesController<FakeNotes> {
    NotesController::new(
      Arc::new(fake.clone()),
      &Config::default(),
      view,
      Instant::now(),
    )
  }

  fn shown_ids(c: &NotesController<FakeNotes>) -> Vec<String> {
    match c.query().display_state() {
      DisplayState::Notes { page, .. } => page.notes.iter().map(|n| n.id.clone()).collect(),
      _ => Vec::new(),
    }
  }

  fn many_notes(n: usize) -> Vec<Note> {
    (1..=n)
      .map(|i| note(&i.to_string(), &format!("note {}", i), Tag::Todo))
      .collect()
  }

  fn valid_draft() -> NoteDraft {
    NoteDraft {
      title: "Dentist".into(),
      content: "Tuesday 10:00".into(),
      tag: Some(Tag::Personal),
    }
  }

  #[tokio::test]
  async fn test_rapid_typing_issues_one_fetch_for_last_text() {
    let fake = FakeNotes::with_notes(many_notes(3));
    let mut c = controller(&fake);
    c.settle().await;
    assert_eq!(fake.fetch_count(), 1);

    let t0 = Instant::now();
    c.set_search("a", t0);
    c.set_search("ab", t0 + Duration::from_millis(100));
    c.tick(t0 + Duration::from_millis(300));
    c.tick(t0 + Duration::from_millis(599));
    assert_eq!(fake.fetch_count(), 1);

    c.tick(t0 + Duration::from_millis(600));
    c.settle().await;

    assert_eq!(fake.fetches_for(Some("a")), 0);
    assert_eq!(fake.fetches_for(Some("ab")), 1);
    assert_eq!(fake.fetch_count(), 2);
  }

  #[tokio::test]
  async fn test_search_resets_page() {
    let fake = FakeNotes::with_notes(many_notes(40));
    let mut c = controller(&fake);
    c.settle().await;
    c.set_page(3, Instant::now());
    c.settle().await;
    assert_eq!(c.view().page(), 3);

    let t0 = Instant::now();
    c.set_search("note 1", t0);
    c.tick(t0 + Duration::from_millis(500));

    assert_eq!(c.view().page(), 1);
    assert_eq!(c.query().active_key(), &QueryKey::new("note 1", 1));
  }

  #[tokio::test]
  async fn test_empty_search_result_shows_empty_state() {
    let fake = FakeNotes::with_notes(many_notes(3));
    let mut c = controller_at(
      &fake,
      ViewState::with_initial("meeting", 1, Duration::from_millis(500)),
    );
    c.settle().await;

    assert_eq!(c.query().display_state(), DisplayState::Empty);
    assert!(c.notices().is_empty());
  }

  #[tokio::test]
  async fn test_next_page_is_bounded_by_total_pages() {
    let fake = FakeNotes::with_notes(many_notes(20));
    let mut c = controller(&fake);
    c.settle().await;
    assert_eq!(c.query().total_pages(), 2);

    c.next_page(Instant::now());
    c.settle().await;
    c.next_page(Instant::now());
    assert_eq!(c.view().page(), 2);
    assert_eq!(shown_ids(&c).len(), 8);
  }

  #[tokio::test]
  async fn test_out_of_range_page_is_not_an_error_and_moves_back() {
    let fake = FakeNotes::with_notes(many_notes(3));
    let mut c = controller(&fake);
    c.settle().await;
    c.set_page(9, Instant::now());
    assert_eq!(c.view().page(), 9);
    c.settle().await;

    assert!(fake.fetches().contains(&QueryKey::new("", 9)));
    assert_eq!(c.query().error(), None);
    assert!(c.notices().is_empty());
    assert_eq!(c.view().page(), 1);
    assert_eq!(shown_ids(&c), vec!["1", "2", "3"]);
  }

  #[tokio::test]
  async fn test_deleting_last_note_on_last_page_moves_back() {
    let fake = FakeNotes::with_notes(many_notes(13));
    let mut c = controller(&fake);
    c.settle().await;
    c.set_page(2, Instant::now());
    c.settle().await;
    assert_eq!(shown_ids(&c), vec!["13"]);

    assert!(c.request_delete("13"));
    c.confirm_delete();
    c.settle().await;

    assert_eq!(c.query().total_pages(), 1);
    assert_eq!(c.view().page(), 1);
    assert_eq!(c.query().active_key(), &QueryKey::new("", 1));
    assert_eq!(shown_ids(&c).len(), 12);
    assert!(!shown_ids(&c).contains(&"13".to_string()));
  }

  #[tokio::test]
  async fn test_empty_search_stays_on_page_one() {
    let fake = FakeNotes::with_notes(many_notes(3));
    let mut c = controller_at(
      &fake,
      ViewState::with_initial("nothing matches", 1, Duration::from_millis(500)),
    );
    c.settle().await;
    assert_eq!(c.query().display_state(), DisplayState::Empty);
    assert_eq!(c.view().page(), 1);
  }

  #[tokio::test]
  async fn test_fetch_failure_raises_error_toast() {
    let fake = FakeNotes::with_notes(many_notes(3));
    fake.fail_fetches(Some(ApiError::Network("connection refused".into())));
    let mut c = controller(&fake);
    c.settle().await;

    let toast = c.notices().latest().unwrap();
    assert_eq!(toast.level, Level::Error);
    assert!(toast.message.starts_with("Failed to load notes"));
    assert!(matches!(c.query().display_state(), DisplayState::Failed(_)));
  }

  #[tokio::test]
  async fn test_create_invalidates_and_new_note_appears() {
    let fake = FakeNotes::with_notes(many_notes(3));
    let mut c = controller(&fake);
    c.settle().await;

    // Warm a second key so we can check it goes stale too
    let t0 = Instant::now();
    c.set_search("note", t0);
    c.tick(t0 + Duration::from_millis(500));
    c.settle().await;
    c.set_search("", Instant::now());
    c.tick(Instant::now() + Duration::from_millis(500));
    c.settle().await;
    let fetches_before = fake.fetch_count();

    c.open_modal();
    c.form_mut().draft = valid_draft();
    assert_eq!(c.submit_create(), Submit::Started);
    c.settle().await;

    assert_eq!(fake.create_count(), 1);
    assert!(!c.view().modal_open());
    assert_eq!(c.form(), &CreateForm::default());
    assert_eq!(c.notices().latest().map(|t| t.level), Some(Level::Success));

    // The visible page was refetched and holds the new note
    assert_eq!(fake.fetch_count(), fetches_before + 1);
    assert_eq!(shown_ids(&c).first().map(String::as_str), Some("new-1"));
    // Every other cached key must be refetched on next use
    assert!(!c
      .query()
      .cache()
      .is_fresh(&QueryKey::new("note", 1), Instant::now()));
  }

  #[tokio::test]
  async fn test_invalid_create_makes_no_network_call() {
    let fake = FakeNotes::new();
    let mut c = controller(&fake);
    c.settle().await;

    c.open_modal();
    c.form_mut().draft = NoteDraft {
      title: "ab".into(),
      ..valid_draft()
    };
    assert_eq!(c.submit_create(), Submit::Invalid);
    c.settle().await;

    assert_eq!(fake.create_count(), 0);
    assert!(c.view().modal_open());
    let fields: Vec<Field> = c.form().errors.iter().map(|e| e.field).collect();
    assert_eq!(fields, vec![Field::Title]);
  }

  #[tokio::test]
  async fn test_failed_create_keeps_modal_and_draft() {
    let fake = FakeNotes::with_notes(many_notes(1));
    let mut c = controller(&fake);
    c.settle().await;
    let fetches_before = fake.fetch_count();

    fake.fail_next_create(ApiError::Server {
      status: 500,
      message: "db down".into(),
    });
    c.open_modal();
    c.form_mut().draft = valid_draft();
    assert_eq!(c.submit_create(), Submit::Started);
    c.settle().await;

    assert!(c.view().modal_open());
    assert_eq!(c.form().draft, valid_draft());
    assert_eq!(c.notices().latest().map(|t| t.level), Some(Level::Error));
    assert_eq!(fake.fetch_count(), fetches_before);
  }

  #[tokio::test]
  async fn test_second_create_while_pending_is_ignored() {
    let fake = FakeNotes::new();
    let mut c = controller(&fake);
    c.settle().await;
    c.open_modal();
    c.form_mut().draft = valid_draft();

    assert_eq!(c.submit_create(), Submit::Started);
    assert_eq!(c.submit_create(), Submit::Busy);
    c.settle().await;
    assert_eq!(fake.create_count(), 1);
  }

  #[tokio::test]
  async fn test_delete_requires_confirmation() {
    let fake = FakeNotes::with_notes(many_notes(2));
    let mut c = controller(&fake);
    c.settle().await;

    assert_eq!(c.confirm_delete(), Submit::Invalid);
    assert!(c.request_delete("1"));
    assert_eq!(c.mutations().awaiting_confirmation(), Some("1"));
    c.cancel_delete();
    assert_eq!(c.confirm_delete(), Submit::Invalid);
    c.settle().await;

    assert_eq!(fake.delete_count(), 0);
    assert_eq!(shown_ids(&c), vec!["1", "2"]);
  }

  #[tokio::test]
  async fn test_deleted_note_never_reappears() {
    let fake = FakeNotes::with_notes(many_notes(30));
    let mut c = controller(&fake);
    c.settle().await;
    c.set_page(2, Instant::now());
    c.settle().await;
    assert!(shown_ids(&c).contains(&"15".to_string()));

    assert!(c.request_delete("15"));
    assert_eq!(c.confirm_delete(), Submit::Started);
    c.settle().await;

    assert_eq!(c.notices().latest().map(|t| t.level), Some(Level::Success));
    for page in 1..=3 {
      c.set_page(page, Instant::now());
      c.settle().await;
      assert!(!shown_ids(&c).contains(&"15".to_string()), "page {}", page);
    }
  }

  #[tokio::test]
  async fn test_failed_delete_leaves_list_unchanged() {
    let fake = FakeNotes::with_notes(many_notes(2));
    let mut c = controller(&fake);
    c.settle().await;
    let fetches_before = fake.fetch_count();

    fake.fail_next_delete(ApiError::NotFound("note 2".into()));
    c.request_delete("2");
    c.confirm_delete();
    c.settle().await;

    assert_eq!(shown_ids(&c), vec!["1", "2"]);
    assert_eq!(fake.fetch_count(), fetches_before);
    let toast = c.notices().latest().unwrap();
    assert_eq!(toast.level, Level::Error);
    assert!(toast.message.starts_with("Failed to delete note"));
  }

  #[tokio::test]
  async fn test_close_modal_discards_draft() {
    let fake = FakeNotes::new();
    let mut c = controller(&fake);
    c.open_modal();
    c.form_mut().draft.title = "half typed".into();
    c.close_modal();
    assert!(!c.view().modal_open());
    assert_eq!(c.form().draft, NoteDraft::default());
  }
}
