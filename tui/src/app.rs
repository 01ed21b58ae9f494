use crate::config::Config;
use crate::form::NoteForm;
use crate::presenter::{ConfirmRequest, UiEvent};
use noteboard_core::controller::Intent;
use noteboard_core::models::{Note, View};
use noteboard_core::presenter::{Content, Loading, Notification, NotificationKind, RenderFrame};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TryRecvError};

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A notification on screen until `expires_at`
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

/// Application state
///
/// Holds only what the controller last sent; every change to notes goes out
/// as an [`Intent`].
pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub frame: RenderFrame,
    pub loading: Loading,
    pub selected: usize,
    pub form: Option<NoteForm>,
    pub confirm: Option<ConfirmRequest>,
    pub toasts: Vec<Toast>,
    pub help_open: bool,
    pub spinner_frame: usize,
    /// Intents sent and intents the controller has finished with
    sent: u64,
    settled: u64,
    /// `sent` count of the last mutating intent
    pending_until: u64,
    intents: mpsc::UnboundedSender<Intent>,
    events: mpsc::UnboundedReceiver<UiEvent>,
}

impl App {
    pub fn new(
        config: Config,
        intents: mpsc::UnboundedSender<Intent>,
        events: mpsc::UnboundedReceiver<UiEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            config,
            frame: RenderFrame {
                view: View::Active,
                content: Content::Notes(Vec::new()),
            },
            loading: Loading::Hidden,
            selected: 0,
            form: None,
            confirm: None,
            toasts: Vec::new(),
            help_open: false,
            spinner_frame: 0,
            sent: 0,
            settled: 0,
            pending_until: 0,
            intents,
            events,
        }
    }

    /// Apply everything the controller sent since the last call
    pub fn pump(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.should_quit {
                        tracing::warn!("Controller stopped, quitting");
                    }
                    self.should_quit = true;
                    break;
                }
            }
        }
    }

    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Render(frame) => {
                if frame.view != self.frame.view {
                    self.selected = 0;
                }
                self.frame = frame;
                self.clamp_selection();
            }
            UiEvent::Loading(loading) => self.loading = loading,
            UiEvent::Notify(notification) => self.push_toast(notification),
            UiEvent::Invalid(error) => match &mut self.form {
                Some(form) => form.show_errors(&error),
                None => self.push_toast(Notification::warning(error.to_string())),
            },
            UiEvent::Confirm(request) => {
                // only one question at a time; a second one is declined
                if let Some(previous) = self.confirm.replace(request) {
                    previous.answer(false);
                }
            }
            UiEvent::Settled => self.settled += 1,
        }
    }

    fn push_toast(&mut self, notification: Notification) {
        let lifetime = Duration::from_millis(self.config.ui.toast_ms);
        let lifetime = if notification.kind == NotificationKind::Error {
            lifetime * 2
        } else {
            lifetime
        };
        self.toasts.push(Toast {
            notification,
            expires_at: Instant::now() + lifetime,
        });
    }

    /// Called on every tick of the event loop
    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        let now = Instant::now();
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// A request is running, or a mutating intent has not been handled yet
    pub fn is_busy(&self) -> bool {
        self.loading != Loading::Hidden || self.settled < self.pending_until
    }

    pub fn notes(&self) -> &[Note] {
        self.frame.notes()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes().get(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.notes().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if self.selected + 1 < self.notes().len() {
            self.selected += 1;
        }
    }

    fn send(&mut self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            tracing::warn!("Controller is gone, quitting");
            self.should_quit = true;
            return;
        }
        self.sent += 1;
    }

    /// Send an intent that changes notes; further ones wait until it settles
    fn send_mutation(&mut self, intent: Intent) {
        self.send(intent);
        self.pending_until = self.sent;
    }

    pub fn open_form(&mut self) {
        if self.form.is_none() {
            self.form = Some(NoteForm::new());
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the form if it validates; otherwise keep it open with messages
    pub fn submit_form(&mut self) {
        if self.is_busy() {
            return;
        }
        let Some(form) = &mut self.form else {
            return;
        };
        if let Some(new_note) = form.submit() {
            self.form = None;
            self.send_mutation(Intent::AddNote {
                title: new_note.title,
                body: new_note.body,
            });
        }
    }

    pub fn toggle_archive_selected(&mut self) {
        if self.is_busy() {
            return;
        }
        if let Some(note) = self.selected_note() {
            let intent = Intent::ToggleArchive {
                id: note.id.clone(),
                archived: !note.archived,
            };
            self.send_mutation(intent);
        }
    }

    pub fn delete_selected(&mut self) {
        if self.is_busy() || self.confirm.is_some() {
            return;
        }
        if let Some(note) = self.selected_note() {
            let intent = Intent::DeleteNote { id: note.id.clone() };
            self.send_mutation(intent);
        }
    }

    pub fn answer_confirm(&mut self, confirmed: bool) {
        if let Some(request) = self.confirm.take() {
            request.answer(confirmed);
        }
    }

    pub fn switch_view(&mut self, view: View) {
        self.send(Intent::SwitchView(view));
    }

    pub fn toggle_view(&mut self) {
        self.switch_view(self.frame.view.other());
    }

    pub fn reload(&mut self) {
        if !self.is_busy() {
            self.send_mutation(Intent::Reload);
        }
    }

    /// Drop the oldest toast
    pub fn dismiss_toast(&mut self) {
        if !self.toasts.is_empty() {
            self.toasts.remove(0);
        }
    }

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
        if let Some(request) = self.confirm.take() {
            request.answer(false);
        }
    }
}
