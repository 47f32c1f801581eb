use crate::notify::{Level, Notifications};
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const TOAST_WIDTH: u16 = 48;

/// Stack live toasts in the top-right corner, newest on top
pub fn draw_toasts(frame: &mut Frame, area: Rect, notices: &Notifications) {
  let width = TOAST_WIDTH.min(area.width);
  let x = area.x + area.width - width;
  let mut y = area.y;

  for toast in notices.iter() {
    if y + 3 > area.y + area.height {
      break;
    }
    let (color, icon) = match toast.level {
      Level::Success => (Color::Green, "✓"),
      Level::Error => (Color::Red, "✗"),
    };
    let rect = Rect::new(x, y, width, 3);
    frame.render_widget(Clear, rect);

    let text = truncate(&toast.message, width.saturating_sub(6) as usize);
    let paragraph = Paragraph::new(Line::from(vec![
      Span::styled(format!("{} ", icon), Style::default().fg(color).bold()),
      Span::raw(text),
    ]))
    .block(
      Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color)),
    );
    frame.render_widget(paragraph, rect);
    y += 3;
  }
}
