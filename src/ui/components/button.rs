//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Visual state of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Normal,
    Selected,
    /// Shown while the action it triggers is running
    Busy,
    Disabled,
}

impl ButtonState {
    fn border_style(self) -> Style {
        match self {
            Self::Selected => Style::default().fg(Color::Cyan),
            Self::Busy => Style::default().fg(Color::Yellow),
            Self::Normal | Self::Disabled => Style::default().fg(Color::DarkGray),
        }
    }

    fn text_style(self) -> Style {
        match self {
            Self::Selected => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Self::Busy => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            Self::Disabled => Style::default().fg(Color::DarkGray),
            Self::Normal => Style::default(),
        }
    }
}

/// Render a generic button with border
pub fn render_button(frame: &mut Frame, area: Rect, content: &str, state: ButtonState) {
    let paragraph = Paragraph::new(format!(" {content} ")).style(state.text_style());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(state.border_style());

    frame.render_widget(paragraph.block(block), area);
}

/// Render a menu button with a selection marker
pub fn render_menu_button(frame: &mut Frame, area: Rect, label: &str, is_selected: bool) {
    let (content, state) = if is_selected {
        (format!("▶ {label}"), ButtonState::Selected)
    } else {
        (format!("  {label}"), ButtonState::Normal)
    };
    render_button(frame, area, &content, state);
}
