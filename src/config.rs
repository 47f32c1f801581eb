use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api/notes";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub query: QueryConfig,
  #[serde(default)]
  pub form: FormConfig,
}

/// Which response envelope the deployment uses for create and delete
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseEnvelope {
  /// Accept either shape
  #[default]
  Auto,
  /// `{note}` on create, `{message, note?}` on delete
  Wrapped,
  /// Bare note object on both
  Bare,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  pub per_page: u32,
  pub timeout_secs: u64,
  pub response_envelope: ResponseEnvelope,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      per_page: 12,
      timeout_secs: 15,
      response_envelope: ResponseEnvelope::Auto,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
  /// How long a fetched page counts as fresh
  pub stale_time_secs: u64,
  /// How long an unused page stays in the cache
  pub gc_time_secs: u64,
  /// Quiet period before a search is applied
  pub debounce_ms: u64,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      stale_time_secs: 60,
      gc_time_secs: 300,
      debounce_ms: 500,
    }
  }
}

impl QueryConfig {
  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_time_secs)
  }

  pub fn gc_time(&self) -> Duration {
    Duration::from_secs(self.gc_time_secs)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
  /// Older deployments accept notes without content
  pub content_required: bool,
}

impl Default for FormConfig {
  fn default() -> Self {
    Self {
      content_required: true,
    }
  }
}

impl Config {
  /// Load configuration.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./notehub.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/notehub/config.yaml
  ///
  /// Falls back to defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };
    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("notehub.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("notehub").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file deserializes to null
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  fn validate(&self) -> Result<()> {
    url::Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid api.base_url '{}': {}", self.api.base_url, e))?;
    if self.api.per_page == 0 {
      return Err(eyre!("api.per_page must be at least 1"));
    }
    Ok(())
  }

  /// Get the NoteHub API token from environment variables.
  ///
  /// Checks NOTEHUB_TOKEN first, then VITE_NOTEHUB_TOKEN as fallback.
  pub fn get_api_token() -> Result<String> {
    std::env::var("NOTEHUB_TOKEN")
      .or_else(|_| std::env::var("VITE_NOTEHUB_TOKEN"))
      .ok()
      .filter(|t| !t.trim().is_empty())
      .ok_or_else(|| {
        eyre!("NoteHub API token not found. Set NOTEHUB_TOKEN or VITE_NOTEHUB_TOKEN environment variable.")
      })
  }
}
