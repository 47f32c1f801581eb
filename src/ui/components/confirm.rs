use crate::ui::renderfns::{centered_rect, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Draw the delete confirmation prompt over the list
pub fn draw_confirm(frame: &mut Frame, area: Rect, note_title: &str) {
  let area = centered_rect(area, 48, 5);
  frame.render_widget(Clear, area);

  let block = Block::default()
    .title(" Delete this note? ")
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let width = area.width.saturating_sub(4) as usize;
  let lines = vec![
    Line::from(Span::styled(
      truncate(note_title, width),
      Style::default().fg(Color::White).bold(),
    )),
    Line::from(vec![
      Span::styled("<y>", Style::default().fg(Color::Cyan)),
      Span::styled(" delete   ", Style::default().fg(Color::DarkGray)),
      Span::styled("<n>", Style::default().fg(Color::Cyan)),
      Span::styled(" keep", Style::default().fg(Color::DarkGray)),
    ]),
  ];

  let paragraph = Paragraph::new(lines)
    .alignment(Alignment::Center)
    .block(block);
  frame.render_widget(paragraph, area);
}
