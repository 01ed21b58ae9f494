use async_trait::async_trait;
use noteboard_core::presenter::{Loading, Notification, Presenter, RenderFrame};
use noteboard_core::ValidationError;
use tokio::sync::{mpsc, oneshot};

/// Controller output, delivered to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    Render(RenderFrame),
    Loading(Loading),
    Notify(Notification),
    Invalid(ValidationError),
    Confirm(ConfirmRequest),
    /// One intent has been fully handled
    Settled,
}

/// A pending yes/no question; the controller waits until it is answered.
#[derive(Debug)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    reply: oneshot::Sender<bool>,
}

impl ConfirmRequest {
    pub fn answer(self, confirmed: bool) {
        if self.reply.send(confirmed).is_err() {
            tracing::debug!("Controller stopped before the confirmation was answered");
        }
    }
}

/// [`Presenter`] that forwards everything over a channel to the TUI.
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    events: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelPresenter {
    pub fn new(events: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { events }
    }

    /// A presenter together with the receiving end for the UI loop
    pub fn connect() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("UI is gone, dropping event");
        }
    }
}

#[async_trait]
impl Presenter for ChannelPresenter {
    fn render(&self, frame: RenderFrame) {
        self.send(UiEvent::Render(frame));
    }

    fn loading(&self, loading: Loading) {
        self.send(UiEvent::Loading(loading));
    }

    fn notify(&self, notification: Notification) {
        self.send(UiEvent::Notify(notification));
    }

    fn report_invalid(&self, error: &ValidationError) {
        self.send(UiEvent::Invalid(error.clone()));
    }

    async fn confirm(&self, message: &str, title: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        self.send(UiEvent::Confirm(ConfirmRequest {
            title: title.to_string(),
            message: message.to_string(),
            reply,
        }));
        // an unanswered question counts as "no"
        answer.await.unwrap_or(false)
    }

    fn settled(&self) {
        self.send(UiEvent::Settled);
    }
}
