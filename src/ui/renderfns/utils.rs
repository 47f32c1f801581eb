use crate::notes::types::Tag;
use chrono::{DateTime, Utc};
use ratatui::prelude::{Color, Rect};

/// Truncate to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// First line of a note body, for the list preview
pub fn preview(content: &str) -> &str {
  content.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}

pub fn tag_color(tag: Tag) -> Color {
  match tag {
    Tag::Todo => Color::Yellow,
    Tag::Work => Color::Blue,
    Tag::Personal => Color::Magenta,
    Tag::Meeting => Color::Cyan,
    Tag::Shopping => Color::Green,
  }
}

/// Short age of a timestamp: "just now", "5m ago", "3h ago", "2d ago",
/// then the date
pub fn format_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let secs = (now - at).num_seconds().max(0);
  match secs {
    0..=59 => "just now".to_string(),
    60..=3_599 => format!("{}m ago", secs / 60),
    3_600..=86_399 => format!("{}h ago", secs / 3_600),
    86_400..=604_799 => format!("{}d ago", secs / 86_400),
    _ => at.format("%Y-%m-%d").to_string(),
  }
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect::new(
    area.x + (area.width - width) / 2,
    area.y + (area.height - height) / 2,
    width,
    height,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars() {
    assert_eq!(truncate("купити молоко", 9), "купити...");
  }

  #[test]
  fn test_preview_skips_blank_lines() {
    assert_eq!(preview("\n  \n  first line\nsecond"), "first line");
    assert_eq!(preview(""), "");
  }

  #[test]
  fn test_tag_colors_are_distinct() {
    let colors: std::collections::HashSet<_> = Tag::ALL.iter().map(|t| tag_color(*t)).collect();
    assert_eq!(colors.len(), Tag::ALL.len());
  }

  #[test]
  fn test_format_age() {
    let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
    assert_eq!(format_age(now - Duration::seconds(10), now), "just now");
    assert_eq!(format_age(now - Duration::minutes(5), now), "5m ago");
    assert_eq!(format_age(now - Duration::hours(3), now), "3h ago");
    assert_eq!(format_age(now - Duration::days(2), now), "2d ago");
    assert_eq!(format_age(now - Duration::days(30), now), "2024-04-10");
    // Clock skew: future timestamps read as now
    assert_eq!(format_age(now + Duration::minutes(1), now), "just now");
  }

  #[test]
  fn test_centered_rect_fits_small_area() {
    let area = Rect::new(0, 0, 20, 4);
    assert_eq!(centered_rect(area, 64, 17), area);
    assert_eq!(centered_rect(Rect::new(0, 0, 100, 40), 60, 10), Rect::new(20, 15, 60, 10));
  }
}
