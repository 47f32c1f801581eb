use crate::cache::QueryKey;
use crate::config::{ApiConfig, Config, ResponseEnvelope};
use crate::notes::api_types::{decode_created, decode_deleted, decode_page, error_message};
use crate::notes::error::ApiError;
use crate::notes::types::{Deleted, NewNote, Note, NotePage};
use color_eyre::{eyre::eyre, Result};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::time::Duration;
use url::Url;

/// The three calls the rest of the app makes against the notes API.
///
/// Futures are `'static` so they can be spawned onto the runtime and
/// outlive the borrow of the implementor.
pub trait NotesApi: Send + Sync + 'static {
  fn fetch_notes(&self, key: &QueryKey) -> BoxFuture<'static, Result<NotePage, ApiError>>;

  fn create_note(&self, note: NewNote) -> BoxFuture<'static, Result<Note, ApiError>>;

  fn delete_note(&self, id: &str) -> BoxFuture<'static, Result<Deleted, ApiError>>;
}

/// NoteHub REST client
#[derive(Clone)]
pub struct NotesClient {
  http: reqwest::Client,
  base: Url,
  per_page: u32,
  envelope: ResponseEnvelope,
}

impl NotesClient {
  /// Build the client from config and the token in the environment.
  ///
  /// A missing token fails here, at startup, rather than per request.
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::get_api_token()?;
    Self::with_token(&config.api, &token)
  }

  pub fn with_token(api: &ApiConfig, token: &str) -> Result<Self> {
    let base = Url::parse(&api.base_url)
      .map_err(|e| eyre!("Invalid API base URL {}: {}", api.base_url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("API base URL {} cannot carry a path", api.base_url));
    }

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
      .map_err(|_| eyre!("API token contains characters not allowed in a header"))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(api.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base,
      per_page: api.per_page,
      envelope: api.response_envelope,
    })
  }

  /// Host part of the base URL, for the header bar
  pub fn host(&self) -> &str {
    self.base.host_str().unwrap_or("")
  }

  /// Fetch one page of notes, optionally filtered by search text
  pub async fn fetch_notes(&self, page: u32, search: Option<&str>) -> Result<NotePage, ApiError> {
    let mut params = vec![
      ("page", page.to_string()),
      ("perPage", self.per_page.to_string()),
    ];
    if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
      params.push(("search", search.to_string()));
    }

    tracing::debug!(page, search = ?search, "GET notes");
    let response = self.http.get(self.base.clone()).query(&params).send().await?;
    let body = read_body(response).await?;
    decode_page(&body, page)
  }

  /// Create a note from an already validated payload
  pub async fn create_note(&self, note: &NewNote) -> Result<Note, ApiError> {
    tracing::debug!(title = %note.title, tag = %note.tag, "POST note");
    let response = self
      .http
      .post(self.base.clone())
      .json(note)
      .send()
      .await?;
    let body = read_body(response).await?;
    decode_created(&body, self.envelope)
  }

  /// Delete a note by id
  pub async fn delete_note(&self, id: &str) -> Result<Deleted, ApiError> {
    tracing::debug!(id, "DELETE note");
    let response = self.http.delete(self.note_url(id)).send().await?;
    let body = read_body(response).await?;
    decode_deleted(&body, id, self.envelope)
  }

  fn note_url(&self, id: &str) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push(id);
    }
    url
  }
}

/// Read the body, turning non-2xx statuses into `ApiError`
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
  let status = response.status();
  let body = response.bytes().await?;
  if !status.is_success() {
    let err = ApiError::from_status(status, error_message(&body));
    tracing::warn!(%status, error = %err, "notes API call failed");
    return Err(err);
  }
  Ok(body.to_vec())
}

impl NotesApi for NotesClient {
  fn fetch_notes(&self, key: &QueryKey) -> BoxFuture<'static, Result<NotePage, ApiError>> {
    let client = self.clone();
    let key = key.clone();
    async move { NotesClient::fetch_notes(&client, key.page(), key.search()).await }.boxed()
  }

  fn create_note(&self, note: NewNote) -> BoxFuture<'static, Result<Note, ApiError>> {
    let client = self.clone();
    async move { NotesClient::create_note(&client, &note).await }.boxed()
  }

  fn delete_note(&self, id: &str) -> BoxFuture<'static, Result<Deleted, ApiError>> {
    let client = self.clone();
    let id = id.to_string();
    async move { NotesClient::delete_note(&client, &id).await }.boxed()
  }
}
