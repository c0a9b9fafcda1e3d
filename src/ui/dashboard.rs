//! Signed-in dashboard: profile, saved addresses and bookings

use crate::app::App;
use crate::state::booking::{format_price, format_slot, service, service_icon};
use crate::ui::widgets::render_titled_list;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = &app.state.session else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Profile
            Constraint::Length(app.state.addresses.len().clamp(1, 5) as u16 + 2),
            Constraint::Min(3), // Bookings
        ])
        .split(area);

    let mut name_line = vec![Span::styled(
        session.user.full_name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.state.is_admin() {
        name_line.push(Span::styled(
            "  [admin]",
            Style::default().fg(Color::Magenta),
        ));
    }
    let profile = Paragraph::new(vec![
        Line::from(name_line),
        Line::from(Span::styled(
            session.user.email.clone(),
            Style::default().fg(Color::Gray),
        )),
    ])
    .block(
        Block::default()
            .title(" Account ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(profile, chunks[0]);

    let addresses: Vec<ListItem> = app
        .state
        .addresses
        .iter()
        .map(|address| {
            let mut spans = vec![
                Span::styled(
                    format!("{:<10}", address.label),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(
                    " {}, {} {}",
                    address.street, address.city, address.postal_code
                )),
            ];
            if address.is_default {
                spans.push(Span::styled(" ★ default", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    render_titled_list(
        frame,
        chunks[1],
        "Addresses",
        addresses,
        None,
        "No saved addresses. Press a to add one.",
    );

    let bookings: Vec<ListItem> = app
        .state
        .bookings
        .iter()
        .map(|booking| {
            let name = service(&booking.service).map_or(booking.service.as_str(), |s| s.name);
            let rooms = if booking.rooms == 1 {
                "1 room".to_string()
            } else {
                format!("{} rooms", booking.rooms)
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", service_icon(&booking.service))),
                Span::styled(
                    format!("{name:<20}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {} ", format_slot(booking.date, &booking.time_slot))),
                Span::styled(format!("· {rooms} "), Style::default().fg(Color::Gray)),
                Span::styled(
                    format_price(booking.price_cents),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();
    let selected = (!app.state.bookings.is_empty()).then_some(app.state.booking_selected);
    render_titled_list(
        frame,
        chunks[2],
        "Bookings",
        bookings,
        selected,
        "No bookings yet. Press b to book a service.",
    );
}
