//! Main menu view

use crate::api::{DEMO_EMAIL, DEMO_INVITATION, DEMO_PASSWORD};
use crate::app::App;
use crate::ui::components::{render_menu_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const MENU_WIDTH: u16 = 36;

/// Draw the menu
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Home Services ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = app.state.menu_entries();
    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(entries.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Length(4));

    let [column] = Layout::horizontal([Constraint::Length(MENU_WIDTH)])
        .flex(Flex::Center)
        .areas(inner);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .flex(Flex::Center)
        .split(column);

    let heading = match &app.state.session {
        Some(session) => format!("Hello, {}", session.user.full_name),
        None => "Book cleaning, laundry and more".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            heading,
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );

    for (index, entry) in entries.iter().enumerate() {
        render_menu_button(
            frame,
            chunks[index + 1],
            entry.label(),
            index == app.state.menu_selected,
        );
    }

    if app.backend_label == "offline demo" && !app.state.is_signed_in() {
        let hint = vec![
            Line::from(""),
            Line::from(format!("Demo: {DEMO_EMAIL} / {DEMO_PASSWORD}")),
            Line::from(format!("Admin invitation: {DEMO_INVITATION}")),
        ];
        if let Some(area) = chunks.last() {
            frame.render_widget(
                Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
                *area,
            );
        }
    }
}
