use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use noteboard_core::models::View;
use std::time::Duration;

use crate::app::App;
use crate::config::key_matches;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    Key(KeyEvent),
    /// Nothing arrived within the tick rate
    Tick,
    Mouse(MouseEvent),
}

/// Event handler for the terminal
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Mouse(m) => return Ok(Event::Mouse(m)),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // A pending confirmation blocks everything else
    if app.confirm.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.answer_confirm(true),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer_confirm(false),
            _ => {}
        }
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) || key_matches(&app.config.keymap.help, &key) {
            app.close_help();
        }
        return;
    }

    if app.form.is_some() {
        handle_form_input(key, app);
        return;
    }

    let keymap = app.config.keymap.clone();
    if key_matches(&keymap.quit, &key) {
        app.quit();
    } else if key_matches(&keymap.help, &key) {
        app.open_help();
    } else if key_matches(&keymap.select_up, &key) || key.code == KeyCode::Char('k') {
        app.select_up();
    } else if key_matches(&keymap.select_down, &key) || key.code == KeyCode::Char('j') {
        app.select_down();
    } else if key_matches(&keymap.show_active, &key) {
        app.switch_view(View::Active);
    } else if key_matches(&keymap.show_archived, &key) {
        app.switch_view(View::Archived);
    } else if key_matches(&keymap.toggle_view, &key) {
        app.toggle_view();
    } else if key.code == KeyCode::Esc {
        app.dismiss_toast();
    } else if app.is_busy() {
        // mutating keys wait until the current request is done
    } else if key_matches(&keymap.new_note, &key) {
        app.open_form();
    } else if key_matches(&keymap.toggle_archive, &key) {
        app.toggle_archive_selected();
    } else if key_matches(&keymap.delete, &key) {
        app.delete_selected();
    } else if key_matches(&keymap.reload, &key) {
        app.reload();
    }
}

/// Keys while the add-note form is open
fn handle_form_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.close_form();
            return;
        }
        KeyCode::Enter if !key.modifiers.contains(KeyModifiers::ALT) => {
            app.submit_form();
            return;
        }
        _ => {}
    }
    let Some(form) = &mut app.form else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => form.focus_next(),
        KeyCode::Enter => form.input('\n'),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => {
            // AltGr arrives as CONTROL+ALT
            if !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
                form.input(c);
            }
        }
        _ => {}
    }
}

/// Mouse wheel moves the selection
pub fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    if app.form.is_some() || app.confirm.is_some() || app.help_open {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_up(),
        MouseEventKind::ScrollDown => app.select_down(),
        _ => {}
    }
}
