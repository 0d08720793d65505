//! UI module for rendering the TUI

mod components;
mod contact;
mod forms;
mod home;
mod layout;

pub use home::HomeContent;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    match app.state.current_view {
        View::Home => home::draw(frame, main_area, app),
        View::Contact => contact::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Error dialog overlays everything else
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message);
    }
}
