use crate::ui::components::SearchBox;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar: app name, API host, search box and page position
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  base_url: &str,
  search: &SearchBox,
  page: u32,
  total_pages: u32,
) {
  let host = extract_domain(base_url);

  let mut spans = vec![
    Span::styled(" notehub ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
  ];
  spans.extend(search.spans());
  spans.push(Span::raw(" "));
  spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
  if total_pages > 0 {
    spans.push(Span::styled(
      format!(" page {}/{} ", page, total_pages),
      Style::default().fg(Color::Yellow).bold(),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Host (and port) of the API base URL
fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extract_domain() {
    assert_eq!(
      extract_domain("https://notehub-public.goit.study/api/notes"),
      "notehub-public.goit.study"
    );
    assert_eq!(extract_domain("http://localhost:8080/notes"), "localhost:8080");
    assert_eq!(extract_domain("notes.example.com"), "notes.example.com");
  }
}
