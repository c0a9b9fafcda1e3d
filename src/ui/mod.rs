//! UI module for rendering the TUI

mod components;
mod dashboard;
mod forms;
mod layout;
mod menu;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match &app.state.current_view {
        View::Menu => menu::draw(frame, main_area, app),
        View::Form(_) => forms::draw_form(frame, main_area, app),
        View::Dashboard => dashboard::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error modal on top of everything
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.pending_errors());
    }
}
