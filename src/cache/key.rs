use std::fmt;

/// Cache key for one page of a notes listing.
///
/// Search text is trimmed and blank text collapses to `None`, so `""`,
/// `"  "` and no search at all are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
  search: Option<String>,
  page: u32,
}

impl QueryKey {
  pub fn new(search: &str, page: u32) -> Self {
    Self::from_parts(Some(search), page)
  }

  pub fn from_parts(search: Option<&str>, page: u32) -> Self {
    let search = search
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(String::from);
    Self { search, page }
  }

  pub fn search(&self) -> Option<&str> {
    self.search.as_deref()
  }

  pub fn page(&self) -> u32 {
    self.page
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.search {
      Some(s) => write!(f, "notes '{}' p{}", s, self.page),
      None => write!(f, "notes p{}", self.page),
    }
  }
}
