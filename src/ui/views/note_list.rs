use crate::query::DisplayState;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_age, preview, tag_color, truncate};
use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Draw the note list for whatever the query currently shows.
///
/// `deleting` marks the note whose delete is on the wire.
pub fn draw_note_list(
  frame: &mut Frame,
  area: Rect,
  state: DisplayState<'_>,
  list_state: &mut ListState,
  deleting: Option<&str>,
) {
  let title = match state {
    DisplayState::Loading => " Notes (loading...) ".to_string(),
    DisplayState::Failed(_) => " Notes (error) ".to_string(),
    DisplayState::Empty => " Notes (0) ".to_string(),
    DisplayState::Notes {
      page,
      placeholder: true,
    } => format!(" Notes ({}) (updating...) ", page.notes.len()),
    DisplayState::Notes { page, .. } => format!(" Notes ({}) ", page.notes.len()),
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let page = match state {
    DisplayState::Notes { page, .. } => page,
    other => {
      let (content, color) = match other {
        DisplayState::Loading => ("Loading notes...".to_string(), Color::DarkGray),
        DisplayState::Failed(e) => (
          format!("Failed to load notes: {}. Press 'r' to retry.", e),
          Color::Red,
        ),
        _ => ("No notes found.".to_string(), Color::DarkGray),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }
  };

  ensure_valid_selection(list_state, page.notes.len());

  let now = Utc::now();
  let width = area.width.saturating_sub(4) as usize;
  let items: Vec<ListItem> = page
    .notes
    .iter()
    .map(|note| {
      let mut header = vec![
        Span::styled(
          format!("{:<10}", note.tag.as_str()),
          Style::default().fg(tag_color(note.tag)),
        ),
        Span::styled(
          truncate(&note.title, 50),
          Style::default().fg(Color::White).bold(),
        ),
        Span::raw("  "),
        Span::styled(
          format_age(note.updated_at, now),
          Style::default().fg(Color::DarkGray),
        ),
      ];
      if deleting == Some(note.id.as_str()) {
        header.push(Span::styled("  Deleting...", Style::default().fg(Color::Red)));
      }
      let body = Line::from(Span::styled(
        format!("{:10}{}", "", truncate(preview(&note.content), width.saturating_sub(12))),
        Style::default().fg(Color::Gray),
      ));
      ListItem::new(vec![Line::from(header), body])
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  frame.render_stateful_widget(list, area, list_state);
}
