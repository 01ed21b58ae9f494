use crate::app::App;
use noteboard_core::presenter::{Content, Loading};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{
    render_busy_overlay, render_confirm, render_empty_state, render_form, render_header,
    render_help_screen, render_loading_page, render_notes, render_status_bar, render_toasts,
};

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Overlays (drawn last)
    if app.loading == Loading::Busy {
        render_busy_overlay(frame, app, size);
    }
    if let Some(form) = &app.form {
        render_form(frame, form, size);
    }
    if let Some(request) = &app.confirm {
        render_confirm(frame, request, size);
    }
    if app.help_open {
        render_help_screen(frame, app, size);
    }
    render_toasts(frame, app, size);
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    if let Loading::Page { message } = &app.loading {
        render_loading_page(frame, app, message, area);
        return;
    }
    match &app.frame.content {
        Content::Notes(_) => render_notes(frame, app, area),
        Content::Empty { heading, description } => {
            render_empty_state(frame, app, heading, description, area)
        }
    }
}
