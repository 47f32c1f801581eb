use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with key hints for the current mode
pub fn draw_footer(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], status: Option<&str>) {
  let mut spans = vec![Span::raw(" ")];

  for (i, (key, action)) in hints.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(format!("<{}>", key), Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(format!(" {}", action), Style::default().fg(Color::DarkGray)));
  }

  if let Some(status) = status {
    spans.push(Span::styled("   │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(status.to_string(), Style::default().fg(Color::Yellow)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
