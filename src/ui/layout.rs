//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into content and a one-line status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    // Session status
    let session_status = match &app.state.session {
        Some(session) => Span::styled(
            format!(" ● {} ", session.user.email),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled(" ○ signed out ", Style::default().fg(Color::Gray)),
    };
    spans.push(session_status);

    // View-specific hints
    spans.push(Span::styled(
        get_view_hints(&app.state.current_view),
        Style::default().fg(Color::Gray),
    ));

    // Status message
    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Backend and quit hint on the right
    let right = format!(" {} · ^C:quit ", app.backend_label);
    let width = (right.chars().count() as u16).min(area.width);
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(width),
        width,
        ..area
    };
    let right_widget =
        Paragraph::new(right).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(right_widget, right_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::Menu => "j/k:nav  Enter:select  q:quit".to_string(),
        View::Form(_) => format!("Tab:next  Enter/{SUBMIT_SHORTCUT}:continue  Esc:back"),
        View::Dashboard => "j/k:bookings  b:book  a:address  m:menu".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormKind;

    #[test]
    fn test_layout_reserves_bottom_line() {
        let (content, status) = create_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(content.height, 23);
        assert_eq!(status.y, 23);
        assert_eq!(status.height, 1);
    }

    #[test]
    fn test_form_hints_mention_submit_shortcut() {
        let hints = get_view_hints(&View::Form(FormKind::Login));
        assert!(hints.contains(SUBMIT_SHORTCUT));
    }
}
