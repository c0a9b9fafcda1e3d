//! Field rendering utilities for forms

use crate::state::{password_strength, FieldKind, FormField, PasswordStrength, Rule};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows taken by a single-line field box
pub const FIELD_HEIGHT: u16 = 3;
/// Rows taken by a multiline field box
pub const MULTILINE_HEIGHT: u16 = 5;

/// Rows a field needs, including the line under it for its error or hint
pub fn field_height(field: &FormField) -> u16 {
    let body = if field.is_multiline() {
        MULTILINE_HEIGHT
    } else {
        FIELD_HEIGHT
    };
    body + 1
}

/// Draw a form field using FormField from the domain layer
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    is_active: bool,
    error: Option<&str>,
) {
    let body_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let note_area = Rect {
        y: area.y + body_area.height,
        height: area.height.min(1),
        ..area
    };

    let border_color = match (error.is_some(), is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display_value = field.display_value();
    let display_str = if display_value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display_value
    };

    let takes_text = matches!(
        field.kind,
        FieldKind::Text | FieldKind::Secret | FieldKind::Multiline
    );
    let cursor = if is_active && takes_text { "▌" } else { "" };

    let content = if field.is_multiline() {
        let mut lines: Vec<Line> = display_str
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    cursor,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_str, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let title = if field.is_required() {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), body_area);

    if let Some(note) = field_note(field, error) {
        frame.render_widget(Paragraph::new(note), note_area);
    }
}

/// The line shown under a field: its error, else a password strength meter
fn field_note<'a>(field: &FormField, error: Option<&'a str>) -> Option<Line<'a>> {
    if let Some(message) = error {
        return Some(Line::from(Span::styled(
            format!(" ✗ {message}"),
            Style::default().fg(Color::Red),
        )));
    }
    // Only fields that enforce a minimum length are new passwords
    let shows_strength = matches!(field.kind, FieldKind::Secret)
        && field.rules.iter().any(|r| matches!(r, Rule::MinLength(_)))
        && !field.as_text().is_empty();
    if !shows_strength {
        return None;
    }
    let strength = password_strength(field.as_text());
    Some(Line::from(vec![
        Span::styled(" Strength: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            strength.label(),
            Style::default()
                .fg(strength_color(strength))
                .add_modifier(Modifier::BOLD),
        ),
    ]))
}

fn strength_color(strength: PasswordStrength) -> Color {
    match strength {
        PasswordStrength::Weak => Color::Red,
        PasswordStrength::Fair => Color::Yellow,
        PasswordStrength::Good => Color::Green,
        PasswordStrength::Strong => Color::LightGreen,
    }
}

/// Draw the banner for a failed submission
pub fn draw_banner(frame: &mut Frame, area: Rect, message: &str) {
    let banner = Paragraph::new(Line::from(vec![
        Span::styled("⚠ ", Style::default().fg(Color::Red)),
        Span::styled(message, Style::default().fg(Color::White)),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

/// Draw help text as key/description pairs
pub fn draw_help_text(frame: &mut Frame, area: Rect, keys: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, description) in keys {
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(": {description}  ")));
    }
    let help = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_password(value: &str) -> FormField {
        FormField::secret("password", "Password")
            .with_value(value)
            .with_rules(vec![Rule::Required, Rule::MinLength(8)])
    }

    #[test]
    fn test_error_takes_precedence_over_strength() {
        let field = new_password("abc");
        let note = field_note(&field, Some("Password must be at least 8 characters"));
        let text: String = note.unwrap().spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("at least 8 characters"));
    }

    #[test]
    fn test_strength_only_for_filled_new_password() {
        assert!(field_note(&new_password(""), None).is_none());

        let login = FormField::secret("password", "Password").with_value("abc");
        assert!(field_note(&login, None).is_none());

        assert!(field_note(&new_password("abc"), None).is_some());
    }

    #[test]
    fn test_field_height_includes_note_line() {
        let text = FormField::text("city", "City").with_rules(vec![Rule::Required]);
        assert_eq!(field_height(&text), FIELD_HEIGHT + 1);
        assert_eq!(
            field_height(&FormField::multiline("notes", "Notes")),
            MULTILINE_HEIGHT + 1
        );
    }
}
