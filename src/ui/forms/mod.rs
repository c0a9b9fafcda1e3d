//! Form page rendering
//!
//! Layout:
//! +------------------------------------------+
//! | Title · Step n of m                      |
//! | [banner when the last submission failed] |
//! | field                                    |
//! |  error or hint                           |
//! | ...                                      |
//! | form summary (price, cooldown)           |
//! | [ submit / next ]                        |
//! | help                                     |
//! +------------------------------------------+

mod field_renderer;

use crate::app::{ActiveForm, App};
use crate::platform::{CLEAR_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::booking::{estimate_price_cents, format_price};
use crate::state::{FormKind, FormStore, MAX_ROOMS};
use crate::ui::components::{render_button, ButtonState, BUTTON_HEIGHT};
use field_renderer::{draw_banner, draw_field, draw_help_text, field_height};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// Draw the open form
pub fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };
    let controller = &form.controller;
    let store = controller.store();
    let step = controller.current_step();
    let total = controller.sequencer().total_steps();

    let title = if total > 1 {
        format!(" {} · Step {step} of {total} ", form.kind.title())
    } else {
        format!(" {} ", form.kind.title())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let step_fields: Vec<_> = store
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.step == step)
        .collect();
    let summary = form_summary(form, app);

    let mut constraints = Vec::new();
    if store.submission_error().is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.extend(
        step_fields
            .iter()
            .map(|(_, f)| Constraint::Length(field_height(f))),
    );
    if summary.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .horizontal_margin(1)
        .split(inner);
    let mut slot = chunks.iter().copied();

    if let Some(message) = store.submission_error() {
        if let Some(area) = slot.next() {
            draw_banner(frame, area, message);
        }
    }

    for (index, field) in &step_fields {
        if let Some(area) = slot.next() {
            let is_active = store.active_field_index() == *index;
            draw_field(frame, area, field, is_active, store.error(&field.name));
        }
    }

    if let Some(line) = summary {
        if let Some(area) = slot.next() {
            frame.render_widget(Paragraph::new(line), area);
        }
    }

    if let Some(area) = slot.next() {
        let button_area = Rect {
            width: area.width.min(28),
            ..area
        };
        let (label, state) = if controller.is_submitting() {
            ("Submitting…".to_string(), ButtonState::Busy)
        } else if controller.sequencer().is_final() {
            (form.kind.submit_label().to_string(), ButtonState::Selected)
        } else {
            ("Next →".to_string(), ButtonState::Selected)
        };
        render_button(frame, button_area, &label, state);
    }

    if let Some(help_area) = chunks.last() {
        let confirm = if controller.sequencer().is_final() {
            "submit"
        } else {
            "next step"
        };
        let back = if controller.is_submitting() {
            "cancel"
        } else if step > 1 {
            "back"
        } else {
            "close"
        };
        draw_help_text(
            frame,
            *help_area,
            &[
                ("Tab", "next field"),
                ("Enter", confirm),
                (SUBMIT_SHORTCUT, confirm),
                (CLEAR_SHORTCUT, "clear"),
                ("Esc", back),
            ],
        );
    }
}

/// Extra line shown above the button for some forms
fn form_summary(form: &ActiveForm, app: &App) -> Option<Line<'static>> {
    match form.kind {
        FormKind::Booking => Some(price_line(form.controller.store())),
        FormKind::ForgotPassword => {
            let now = Instant::now();
            let cooldown = &app.state.resend_cooldown;
            cooldown.is_active(now).then(|| {
                Line::from(Span::styled(
                    format!(
                        "You can request another code in {}s",
                        cooldown.remaining_secs(now)
                    ),
                    Style::default().fg(Color::Yellow),
                ))
            })
        }
        _ => None,
    }
}

fn price_line(store: &FormStore) -> Line<'static> {
    let estimate = store
        .text("rooms")
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|rooms| (1..=MAX_ROOMS).contains(rooms))
        .and_then(|rooms| estimate_price_cents(store.text("service"), rooms));
    let value = match estimate {
        Some(cents) => Span::styled(format_price(cents), Style::default().fg(Color::Green)),
        None => Span::styled("-", Style::default().fg(Color::DarkGray)),
    };
    Line::from(vec![
        Span::styled("Estimated price: ", Style::default().fg(Color::DarkGray)),
        value,
    ])
}
