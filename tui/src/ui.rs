mod layout;
mod widgets;

pub use layout::render;
pub use widgets::{
    render_busy_overlay,
    render_confirm,
    render_empty_state,
    render_form,
    render_header,
    render_help_screen,
    render_loading_page,
    render_notes,
    render_status_bar,
    render_toasts,
};
