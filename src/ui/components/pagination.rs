use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Pages shown around the current one
const RANGE: u32 = 5;
/// Pages always shown at each end
const MARGIN: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
  Page(u32),
  Gap,
}

/// Page buttons to show for `current` of `total`, with gaps where pages are
/// skipped. Empty when there is a single page or none.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
  if total <= 1 {
    return Vec::new();
  }
  let current = current.clamp(1, total);

  let mut start = current.saturating_sub(RANGE / 2).max(1);
  let end = start.saturating_add(RANGE - 1).min(total);
  start = end.saturating_sub(RANGE - 1).max(1);

  // At most 2 * MARGIN + RANGE pages, whatever the server says `total` is
  let mut pages: Vec<u32> = (1..=MARGIN)
    .chain(start..=end)
    .chain(total - MARGIN + 1..=total)
    .collect();
  pages.sort_unstable();
  pages.dedup();

  let mut items = Vec::new();
  let mut prev = 0;
  for p in pages {
    match p - prev - 1 {
      0 => {}
      // A gap of one page is just that page
      1 => items.push(PageItem::Page(prev + 1)),
      _ => items.push(PageItem::Gap),
    }
    items.push(PageItem::Page(p));
    prev = p;
  }
  items
}

/// Draw `← 1 … 4 [5] 6 … 9 →`. Draws nothing for a single page.
pub fn draw_pagination(frame: &mut Frame, area: Rect, current: u32, total: u32) {
  let items = page_items(current, total);
  if items.is_empty() {
    return;
  }

  let arrow = |enabled: bool| {
    if enabled {
      Style::default().fg(Color::Cyan)
    } else {
      Style::default().fg(Color::DarkGray)
    }
  };

  let mut spans = vec![Span::styled("← ", arrow(current > 1))];
  for item in items {
    match item {
      PageItem::Page(p) if p == current => {
        spans.push(Span::styled(
          format!("[{}]", p),
          Style::default().fg(Color::Yellow).bold(),
        ));
      }
      PageItem::Page(p) => spans.push(Span::raw(format!(" {} ", p))),
      PageItem::Gap => spans.push(Span::styled(" … ", Style::default().fg(Color::DarkGray))),
    }
  }
  spans.push(Span::styled(" →", arrow(current < total)));

  let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
  frame.render_widget(paragraph, area);
}
