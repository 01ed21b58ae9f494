use crate::app::App;
use crate::form::{CounterLevel, NoteForm};
use crate::presenter::ConfirmRequest;
use noteboard_core::models::{Note, View};
use noteboard_core::presenter::NotificationKind;
use noteboard_core::validation::Field;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PREVIEW_LINES: usize = 3;
const TOAST_WIDTH: u16 = 44;

/// A rect of the given size centred in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cut `text` to at most `max_width` columns, marking the cut with an ellipsis
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Render the header with app name and view tabs
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(34)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(" Noteboard ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("| "),
        Span::styled("Notes App", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let selected = match app.frame.view {
        View::Active => 0,
        View::Archived => 1,
    };
    let tabs = Tabs::new(vec![View::Active.to_string(), View::Archived.to_string()])
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, chunks[1]);
}

fn note_item(note: &Note, width: usize) -> ListItem<'static> {
    let (badge, badge_color) = if note.archived {
        (" Archived ", Color::Magenta)
    } else {
        (" Active ", Color::Green)
    };
    let title_width = width.saturating_sub(badge.width() + 1);

    let mut lines = vec![Line::from(vec![
        Span::styled(truncate(&note.title, title_width), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(badge, Style::default().fg(Color::Black).bg(badge_color)),
    ])];

    let body: Vec<&str> = note.body.lines().collect();
    for (i, line) in body.iter().take(PREVIEW_LINES).enumerate() {
        let more = i + 1 == PREVIEW_LINES && body.len() > PREVIEW_LINES;
        let text = if more {
            truncate(&format!("{}…", line), width)
        } else {
            truncate(line, width)
        };
        lines.push(Line::from(Span::raw(text)));
    }
    lines.push(Line::from(Span::styled(
        note.display_date(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    ListItem::new(Text::from(lines))
}

/// Render the notes of the current view as cards
pub fn render_notes(frame: &mut Frame, app: &App, area: Rect) {
    let notes = app.notes();
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = notes.iter().map(|n| note_item(n, width)).collect();

    let mut state = ListState::default();
    if !notes.is_empty() {
        state.select(Some(app.selected));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ({}) ", app.frame.view, notes.len())),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("▌ ");
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_empty_state(frame: &mut Frame, app: &App, heading: &str, description: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.frame.view));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(heading.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(description.to_string(), Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, centered_rect(inner.width, 3, inner));
}

/// Full-page loading indicator shown in place of the note list
pub fn render_loading_page(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.frame.view));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled(app.spinner(), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::raw(message.to_string()),
    ]);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_rect(inner.width, 1, inner));
}

pub fn render_busy_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(24, 3, area);
    let paragraph = Paragraph::new(format!("{} Working...", app.spinner()))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn counter_line(form: &NoteForm, field: Field) -> Line<'static> {
    let (len, max, level) = form.counter(field);
    let color = match level {
        CounterLevel::Normal => Color::DarkGray,
        CounterLevel::Warning => Color::Yellow,
        CounterLevel::Error => Color::Red,
    };
    let error = form
        .error(field)
        .map(|e| e.to_string())
        .unwrap_or_default();
    Line::from(vec![
        Span::styled(error, Style::default().fg(Color::Red)),
        Span::raw(" "),
        Span::styled(format!("{}/{}", len, max), Style::default().fg(color)),
    ])
    .alignment(Alignment::Right)
}

fn field_block(form: &NoteForm, field: Field, title: &str) -> Block<'static> {
    let color = if form.error(field).is_some() {
        Color::Red
    } else if form.focus == field {
        Color::Yellow
    } else {
        Color::White
    };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(color))
}

/// Render the add-note form
pub fn render_form(frame: &mut Frame, form: &NoteForm, area: Rect) {
    let popup = centered_rect(72, 20, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Add New Note ")
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title input
            Constraint::Length(1), // title counter
            Constraint::Min(3),    // body input
            Constraint::Length(1), // body counter
            Constraint::Length(1), // hints
        ])
        .split(inner);

    let title = Paragraph::new(form.title.as_str()).block(field_block(form, Field::Title, "Title"));
    frame.render_widget(title, chunks[0]);
    frame.render_widget(Paragraph::new(counter_line(form, Field::Title)), chunks[1]);

    let body = Paragraph::new(form.body.as_str())
        .block(field_block(form, Field::Body, "Body"))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[2]);
    frame.render_widget(Paragraph::new(counter_line(form, Field::Body)), chunks[3]);

    let hints = Paragraph::new(" [Tab:Switch field] [Alt+Enter:New line] [Enter:Save] [Esc:Cancel] ")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hints, chunks[4]);

    // cursor at the end of the focused input
    let (input, text) = match form.focus {
        Field::Title => (chunks[0], form.title.as_str()),
        Field::Body => (chunks[2], form.body.as_str()),
    };
    let row = text.matches('\n').count() as u16;
    let col = text.rsplit('\n').next().unwrap_or("").width() as u16;
    let max_x = input.x + input.width.saturating_sub(2);
    let max_y = input.y + input.height.saturating_sub(2);
    frame.set_cursor((input.x + 1 + col).min(max_x), (input.y + 1 + row).min(max_y));
}

pub fn render_confirm(frame: &mut Frame, request: &ConfirmRequest, area: Rect) {
    let popup = centered_rect(60, 6, area);
    let text = vec![
        Line::from(request.message.clone()),
        Line::from(""),
        Line::from(Span::styled("[y:Yes, delete]  [n:Cancel]", Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" {} ", request.title))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

/// Stack the live toasts in the top-right corner, newest at the bottom
pub fn render_toasts(frame: &mut Frame, app: &App, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + 1;
    for toast in &app.toasts {
        let n = &toast.notification;
        let height = 4;
        if y + height > area.y + area.height {
            break;
        }
        let color = match n.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Info => Color::Cyan,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Error => Color::Red,
        };
        let rect = Rect::new(area.x + area.width - width, y, width, height);
        let paragraph = Paragraph::new(n.message.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", n.title))
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, rect);
        frame.render_widget(paragraph, rect);
        y += height;
    }
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keys = &app.config.keymap;
    let archive_hint = match app.frame.view {
        View::Active => "Archive",
        View::Archived => "Unarchive",
    };
    let status_text = format!(
        " {} notes | [{}:New] [{}:{}] [{}:Delete] [{}:Switch view] [{}:Reload] [{}:Help] [{}:Quit] ",
        app.notes().len(),
        keys.new_note,
        keys.toggle_archive,
        archive_hint,
        keys.delete,
        keys.toggle_view,
        keys.reload,
        keys.help,
        keys.quit,
    );

    let status_bar = Paragraph::new(status_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the help screen overlay
pub fn render_help_screen(frame: &mut Frame, app: &App, size: Rect) {
    let keys = &app.config.keymap;
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
    };
    let entry = |key: &str, action: &str| Line::from(format!("{:<13}{}", key, action));

    let help_text = vec![
        Line::from(""),
        heading("Notes"),
        entry(&format!("{}/{}", keys.select_up, keys.select_down), "Move selection"),
        entry(&keys.new_note, "Add a note"),
        entry(&keys.toggle_archive, "Archive or unarchive the selected note"),
        entry(&keys.delete, "Delete the selected note"),
        entry(&keys.reload, "Reload from the server"),
        Line::from(""),
        heading("Views"),
        entry(&keys.show_active, "Active notes"),
        entry(&keys.show_archived, "Archived notes"),
        entry(&keys.toggle_view, "Switch view"),
        Line::from(""),
        heading("Form"),
        entry("Tab", "Switch between title and body"),
        entry("Alt+Enter", "New line in the body"),
        entry("Enter", "Save the note"),
        entry("Esc", "Close without saving"),
        Line::from(""),
        heading("Interface"),
        entry("Esc", "Dismiss the oldest notification"),
        entry(&keys.help, "Show this help"),
        entry(&keys.quit, "Quit application"),
        Line::from(""),
        Line::from(Span::styled("Press 'Esc' to close", Style::default().fg(Color::DarkGray))),
    ];

    let popup_area = centered_rect(64, help_text.len() as u16 + 2, size);
    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help - Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}
