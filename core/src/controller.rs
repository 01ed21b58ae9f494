use tokio::sync::mpsc;

use crate::error::Result;
use crate::models::{Note, View};
use crate::presenter::{Content, Loading, Notification, Presenter, RenderFrame};
use crate::remote::NoteStore;
use crate::validation::validate_note;

const LOADING_MESSAGE: &str = "Loading notes...";
const LOAD_FAILED: &str = "Failed to load notes";
const DELETE_CONFIRM_TITLE: &str = "Confirm Note Deletion";
const DELETE_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this note? This action cannot be undone.";

/// A user intent routed from the presentation layer to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddNote { title: String, body: String },
    /// `archived == true` moves the note into the archive
    ToggleArchive { id: String, archived: bool },
    DeleteNote { id: String },
    SwitchView(View),
    Reload,
}

/// Result of an operation that may legitimately do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The target id is not in the collection the UI expected; stale UI
    NotFound,
    /// The user declined the confirmation
    Cancelled,
}

/// Keeps the active and archived collections in step with the remote store.
///
/// Every operation that calls the store either applies exactly one local
/// mutation after the call succeeds, or leaves both collections untouched.
pub struct NoteController<S, P> {
    store: S,
    presenter: P,
    active: Vec<Note>,
    archived: Vec<Note>,
    view: View,
}

impl<S: NoteStore, P: Presenter> NoteController<S, P> {
    pub fn new(store: S, presenter: P) -> Self {
        Self {
            store,
            presenter,
            active: Vec::new(),
            archived: Vec::new(),
            view: View::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn active(&self) -> &[Note] {
        &self.active
    }

    pub fn archived(&self) -> &[Note] {
        &self.archived
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Fetch both collections concurrently and replace local state.
    ///
    /// Both requests must succeed; on failure the collections keep whatever
    /// they held before.
    pub async fn load(&mut self) -> Result<()> {
        self.presenter.loading(Loading::Page {
            message: LOADING_MESSAGE.to_string(),
        });
        let result = tokio::try_join!(self.store.list_active(), self.store.list_archived());
        self.presenter.loading(Loading::Hidden);

        match result {
            Ok((active, archived)) => {
                tracing::info!(
                    "Loaded {} active and {} archived notes",
                    active.len(),
                    archived.len()
                );
                self.active = active;
                self.archived = archived;
                self.render();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Failed to load notes: {}", err);
                self.presenter.notify(Notification::error(
                    "Failed to load notes. Check your internet connection.",
                    "Could Not Load Data",
                ));
                if self.active.is_empty() && self.archived.is_empty() {
                    self.presenter.render(RenderFrame {
                        view: self.view,
                        content: Content::Empty {
                            heading: LOAD_FAILED.to_string(),
                            description: LOAD_FAILED.to_string(),
                        },
                    });
                } else {
                    // keep showing what is still held
                    self.render();
                }
                Err(err.into())
            }
        }
    }

    /// Validate and create a note; on success it goes to the front of the
    /// active collection.
    pub async fn add_note(&mut self, title: &str, body: &str) -> Result<Note> {
        let new_note = match validate_note(title, body) {
            Ok(new_note) => new_note,
            Err(err) => {
                tracing::debug!("Rejected new note: {}", err);
                self.presenter.report_invalid(&err);
                return Err(err.into());
            }
        };

        self.presenter.loading(Loading::Busy);
        let result = self.store.create(&new_note).await;
        self.presenter.loading(Loading::Hidden);

        match result {
            Ok(note) => {
                tracing::info!("Created note {}", note.id);
                self.active.insert(0, note.clone());
                self.render();
                self.presenter
                    .notify(Notification::success("Note added successfully!"));
                Ok(note)
            }
            Err(err) => {
                tracing::warn!("Failed to add note: {}", err);
                self.presenter.notify(Notification::error(
                    "Failed to add note. Please try again.",
                    "Could Not Add Note",
                ));
                Err(err.into())
            }
        }
    }

    /// Move a note between the collections. `archived == true` moves it from
    /// active to archived, `false` moves it back.
    pub async fn toggle_archive(&mut self, id: &str, archived: bool) -> Result<Outcome> {
        let source = if archived { &self.active } else { &self.archived };
        let Some(index) = source.iter().position(|n| n.id == id) else {
            tracing::debug!("Note {} not in the expected collection, ignoring", id);
            return Ok(Outcome::NotFound);
        };

        self.presenter.loading(Loading::Busy);
        let result = if archived {
            self.store.archive(id).await
        } else {
            self.store.unarchive(id).await
        };
        self.presenter.loading(Loading::Hidden);

        if let Err(err) = result {
            tracing::warn!("Failed to change archive state of {}: {}", id, err);
            self.presenter.notify(Notification::error(
                "Failed to change the note's archive status.",
                "Could Not Archive",
            ));
            return Err(err.into());
        }

        // `index` still holds: nothing else can touch the collections
        let (source, destination) = if archived {
            (&mut self.active, &mut self.archived)
        } else {
            (&mut self.archived, &mut self.active)
        };
        let mut note = source.remove(index);
        note.archived = archived;
        destination.insert(0, note);

        tracing::info!(
            "Note {} {}",
            id,
            if archived { "archived" } else { "unarchived" }
        );
        self.render();
        self.presenter.notify(Notification::info(if archived {
            "Note archived"
        } else {
            "Note moved out of the archive"
        }));
        Ok(Outcome::Applied)
    }

    /// Delete a note after the user confirms.
    pub async fn delete_note(&mut self, id: &str) -> Result<Outcome> {
        if !self
            .presenter
            .confirm(DELETE_CONFIRM_MESSAGE, DELETE_CONFIRM_TITLE)
            .await
        {
            tracing::debug!("Deletion of {} cancelled", id);
            return Ok(Outcome::Cancelled);
        }

        self.presenter.loading(Loading::Busy);
        let result = self.store.delete(id).await;
        self.presenter.loading(Loading::Hidden);

        match result {
            Ok(()) => {
                // either collection may hold it if the UI was stale
                self.active.retain(|n| n.id != id);
                self.archived.retain(|n| n.id != id);
                tracing::info!("Deleted note {}", id);
                self.render();
                self.presenter
                    .notify(Notification::success("Note deleted successfully!"));
                Ok(Outcome::Applied)
            }
            Err(err) => {
                tracing::warn!("Failed to delete note {}: {}", id, err);
                self.presenter.notify(Notification::error(
                    "Failed to delete note. Please try again.",
                    "Could Not Delete Note",
                ));
                Err(err.into())
            }
        }
    }

    pub fn switch_view(&mut self, view: View) {
        self.view = view;
        self.render();
    }

    /// Notes of the current view, newest first. Ties keep stored order.
    pub fn visible_notes(&self) -> Vec<&Note> {
        let collection = match self.view {
            View::Active => &self.active,
            View::Archived => &self.archived,
        };
        let mut notes: Vec<&Note> = collection.iter().collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes
    }

    /// What the presentation should show for the current state
    pub fn frame(&self) -> RenderFrame {
        let notes = self.visible_notes();
        let content = if notes.is_empty() {
            let (heading, description) = match self.view {
                View::Active => (
                    "No active notes yet",
                    "Start by adding your first note!",
                ),
                View::Archived => (
                    "No archived notes yet",
                    "Archived notes will appear here.",
                ),
            };
            Content::Empty {
                heading: heading.to_string(),
                description: description.to_string(),
            }
        } else {
            Content::Notes(notes.into_iter().cloned().collect())
        };
        RenderFrame {
            view: self.view,
            content,
        }
    }

    fn render(&self) {
        self.presenter.render(self.frame());
    }

    /// Apply one intent. Failures have already been shown to the user.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::AddNote { title, body } => self.add_note(&title, &body).await.map(|_| ()),
            Intent::ToggleArchive { id, archived } => {
                self.toggle_archive(&id, archived).await.map(|_| ())
            }
            Intent::DeleteNote { id } => self.delete_note(&id).await.map(|_| ()),
            Intent::SwitchView(view) => {
                self.switch_view(view);
                Ok(())
            }
            Intent::Reload => self.load().await,
        }
    }
}

/// Load, then apply intents one at a time until the sending side hangs up.
/// Returns the controller so callers can inspect the final state.
pub async fn run<S: NoteStore, P: Presenter>(
    mut controller: NoteController<S, P>,
    mut intents: mpsc::UnboundedReceiver<Intent>,
) -> NoteController<S, P> {
    if let Err(err) = controller.load().await {
        tracing::debug!("Initial load failed: {}", err);
    }

    while let Some(intent) = intents.recv().await {
        tracing::debug!("Handling {:?}", intent);
        if let Err(err) = controller.dispatch(intent).await {
            tracing::debug!("Intent failed: {}", err);
        }
        controller.presenter.settled();
    }

    tracing::info!("Intent channel closed, controller stopping");
    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, RequestError, ValidationError};
    use crate::models::NewNote;
    use crate::presenter::NotificationKind;
    use crate::remote::RequestResult;
    use crate::validation::Field;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Op {
        ListActive,
        ListArchived,
        Get,
        Create,
        Archive,
        Unarchive,
        Delete,
    }

    /// In-memory stand-in for the notes service with per-operation failures.
    #[derive(Default)]
    struct FakeStore {
        notes: Mutex<Vec<Note>>,
        failing: Mutex<HashSet<Op>>,
        calls: Mutex<Vec<Op>>,
        clock: AtomicI64,
    }

    impl FakeStore {
        fn with_notes(notes: Vec<Note>) -> Self {
            Self {
                notes: Mutex::new(notes),
                clock: AtomicI64::new(1_000),
                ..Default::default()
            }
        }

        fn fail(&self, op: Op) {
            self.failing.lock().unwrap().insert(op);
        }

        fn recover(&self, op: Op) {
            self.failing.lock().unwrap().remove(&op);
        }

        fn calls(&self) -> Vec<Op> {
            self.calls.lock().unwrap().clone()
        }

        fn enter(&self, op: Op) -> RequestResult<()> {
            self.calls.lock().unwrap().push(op);
            if self.failing.lock().unwrap().contains(&op) {
                return Err(RequestError::new(Some(500), format!("{:?} failed", op)));
            }
            Ok(())
        }

        fn set_archived(&self, id: &str, archived: bool) -> RequestResult<()> {
            let mut notes = self.notes.lock().unwrap();
            let note = notes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| RequestError::new(Some(404), "Note not found"))?;
            note.archived = archived;
            Ok(())
        }
    }

    #[async_trait]
    impl NoteStore for FakeStore {
        async fn list_active(&self) -> RequestResult<Vec<Note>> {
            self.enter(Op::ListActive)?;
            Ok(self.notes.lock().unwrap().iter().filter(|n| !n.archived).cloned().collect())
        }

        async fn list_archived(&self) -> RequestResult<Vec<Note>> {
            self.enter(Op::ListArchived)?;
            Ok(self.notes.lock().unwrap().iter().filter(|n| n.archived).cloned().collect())
        }

        async fn get(&self, id: &str) -> RequestResult<Note> {
            self.enter(Op::Get)?;
            self.notes
                .lock()
                .unwrap()
                .iter()
                .find(|n| n.id == id)
                .cloned()
                .ok_or_else(|| RequestError::new(Some(404), "Note not found"))
        }

        async fn create(&self, new_note: &NewNote) -> RequestResult<Note> {
            self.enter(Op::Create)?;
            let tick = self.clock.fetch_add(1, Ordering::SeqCst);
            let note = Note {
                id: format!("created-{}", tick),
                title: new_note.title.clone(),
                body: new_note.body.clone(),
                created_at: at(tick),
                archived: false,
            };
            self.notes.lock().unwrap().push(note.clone());
            Ok(note)
        }

        async fn archive(&self, id: &str) -> RequestResult<()> {
            self.enter(Op::Archive)?;
            self.set_archived(id, true)
        }

        async fn unarchive(&self, id: &str) -> RequestResult<()> {
            self.enter(Op::Unarchive)?;
            self.set_archived(id, false)
        }

        async fn delete(&self, id: &str) -> RequestResult<()> {
            self.enter(Op::Delete)?;
            self.notes.lock().unwrap().retain(|n| n.id != id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        frames: Mutex<Vec<RenderFrame>>,
        loading: Mutex<Vec<Loading>>,
        notifications: Mutex<Vec<Notification>>,
        invalid: Mutex<Vec<ValidationError>>,
        confirm_answer: AtomicBool,
        confirmations: Mutex<Vec<String>>,
        settled: AtomicI64,
    }

    impl RecordingPresenter {
        fn last_frame(&self) -> Option<RenderFrame> {
            self.frames.lock().unwrap().last().cloned()
        }

        fn last_notification(&self) -> Option<Notification> {
            self.notifications.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Presenter for RecordingPresenter {
        fn render(&self, frame: RenderFrame) {
            self.frames.lock().unwrap().push(frame);
        }

        fn loading(&self, loading: Loading) {
            self.loading.lock().unwrap().push(loading);
        }

        fn notify(&self, notification: Notification) {
            self.notifications.lock().unwrap().push(notification);
        }

        fn report_invalid(&self, error: &ValidationError) {
            self.invalid.lock().unwrap().push(error.clone());
        }

        async fn confirm(&self, _message: &str, title: &str) -> bool {
            self.confirmations.lock().unwrap().push(title.to_string());
            self.confirm_answer.load(Ordering::SeqCst)
        }

        fn settled(&self) {
            self.settled.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn at(offset_secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 7, 28, 10, 0, 0).unwrap() + Duration::seconds(offset_secs)
    }

    fn note(id: &str, offset_secs: i64, archived: bool) -> Note {
        Note {
            id: id.to_string(),
            title: format!("Title {}", id),
            body: format!("Body of note {}", id),
            created_at: at(offset_secs),
            archived,
        }
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    fn assert_disjoint<S: NoteStore, P: Presenter>(controller: &NoteController<S, P>) {
        let active: HashSet<&str> = controller.active().iter().map(|n| n.id.as_str()).collect();
        let archived: HashSet<&str> = controller.archived().iter().map(|n| n.id.as_str()).collect();
        assert!(active.is_disjoint(&archived));
        assert_eq!(active.len(), controller.active().len());
        assert_eq!(archived.len(), controller.archived().len());
    }

    async fn loaded() -> NoteController<FakeStore, RecordingPresenter> {
        let store = FakeStore::with_notes(vec![
            note("n1", 10, false),
            note("n2", 30, false),
            note("n3", 20, false),
            note("a1", 5, true),
            note("a2", 15, true),
        ]);
        let mut controller = NoteController::new(store, RecordingPresenter::default());
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_load_replaces_collections() {
        let controller = loaded().await;

        assert_eq!(ids(controller.active()), vec!["n1", "n2", "n3"]);
        assert_eq!(ids(controller.archived()), vec!["a1", "a2"]);
        assert_disjoint(&controller);

        let frame = controller.presenter().last_frame().unwrap();
        assert_eq!(frame.view, View::Active);
        assert_eq!(ids(frame.notes()), vec!["n2", "n3", "n1"]);

        let loading = controller.presenter().loading.lock().unwrap().clone();
        assert!(matches!(loading.first(), Some(Loading::Page { .. })));
        assert_eq!(loading.last(), Some(&Loading::Hidden));
    }

    #[tokio::test]
    async fn test_load_failure_populates_nothing() {
        let store = FakeStore::with_notes(vec![note("n1", 10, false), note("a1", 5, true)]);
        store.fail(Op::ListArchived);
        let mut controller = NoteController::new(store, RecordingPresenter::default());

        let result = controller.load().await;

        assert!(matches!(result, Err(Error::Request(_))));
        assert!(controller.active().is_empty());
        assert!(controller.archived().is_empty());
        let notification = controller.presenter().last_notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        let frame = controller.presenter().last_frame().unwrap();
        assert!(matches!(frame.content, Content::Empty { ref heading, .. } if heading == LOAD_FAILED));
    }

    #[tokio::test]
    async fn test_reload_failure_keeps_previous_state() {
        let mut controller = loaded().await;
        let before = controller.presenter().last_frame().unwrap();
        controller.store().fail(Op::ListActive);

        assert!(controller.load().await.is_err());

        assert_eq!(ids(controller.active()), vec!["n1", "n2", "n3"]);
        assert_eq!(ids(controller.archived()), vec!["a1", "a2"]);
        assert_eq!(controller.presenter().last_frame().unwrap(), before);
        let notification = controller.presenter().last_notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_add_note_goes_to_front_of_active() {
        let mut controller = loaded().await;

        let created = controller
            .add_note("  My Title ", "A sufficiently long body text")
            .await
            .unwrap();

        assert_eq!(created.title, "My Title");
        assert_eq!(controller.active()[0].id, created.id);
        assert_eq!(controller.active().len(), 4);
        assert_eq!(controller.visible_notes()[0].id, created.id);
        assert_eq!(
            controller.presenter().last_notification().map(|n| n.kind),
            Some(NotificationKind::Success)
        );
        assert_disjoint(&controller);
    }

    #[tokio::test]
    async fn test_add_note_rejects_short_title_without_calling_store() {
        let mut controller = loaded().await;
        let calls_before = controller.store().calls().len();

        let err = match controller.add_note("ab", "short body").await {
            Err(Error::Validation(err)) => err,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert!(err.for_field(Field::Title).is_some());
        assert!(err.for_field(Field::Body).is_none());
        assert_eq!(controller.store().calls().len(), calls_before);
        assert_eq!(controller.presenter().invalid.lock().unwrap().len(), 1);
        assert_eq!(controller.active().len(), 3);
    }

    #[tokio::test]
    async fn test_add_note_rejects_short_body_without_calling_store() {
        let mut controller = loaded().await;

        let err = match controller.add_note("Valid Title", "123456789").await {
            Err(Error::Validation(err)) => err,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert!(err.for_field(Field::Title).is_none());
        assert!(err.for_field(Field::Body).is_some());
        assert!(!controller.store().calls().contains(&Op::Create));
    }

    #[tokio::test]
    async fn test_add_note_failure_leaves_state() {
        let mut controller = loaded().await;
        controller.store().fail(Op::Create);
        let before = controller.active().to_vec();
        let frames_before = controller.presenter().frames.lock().unwrap().len();

        assert!(controller
            .add_note("My Title", "A sufficiently long body text")
            .await
            .is_err());

        assert_eq!(controller.active(), before.as_slice());
        assert_eq!(controller.presenter().frames.lock().unwrap().len(), frames_before);
        assert_eq!(
            controller.presenter().last_notification().map(|n| n.kind),
            Some(NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn test_archive_moves_to_front_of_archived() {
        let mut controller = loaded().await;

        let outcome = controller.toggle_archive("n1", true).await.unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(ids(controller.active()), vec!["n2", "n3"]);
        assert_eq!(ids(controller.archived()), vec!["n1", "a1", "a2"]);
        assert!(controller.archived()[0].archived);
        assert_eq!(
            controller.presenter().last_notification().map(|n| n.kind),
            Some(NotificationKind::Info)
        );
        assert_disjoint(&controller);
    }

    #[tokio::test]
    async fn test_archive_failure_leaves_both_collections() {
        let mut controller = loaded().await;
        controller.store().fail(Op::Archive);
        let active = controller.active().to_vec();
        let archived = controller.archived().to_vec();

        assert!(controller.toggle_archive("n1", true).await.is_err());

        assert_eq!(controller.active(), active.as_slice());
        assert_eq!(controller.archived(), archived.as_slice());
    }

    #[tokio::test]
    async fn test_unarchive_moves_to_front_of_active() {
        let mut controller = loaded().await;

        controller.toggle_archive("a2", false).await.unwrap();

        assert_eq!(ids(controller.active()), vec!["a2", "n1", "n2", "n3"]);
        assert!(!controller.active()[0].archived);
        assert_eq!(ids(controller.archived()), vec!["a1"]);
        assert_eq!(controller.store().calls().last(), Some(&Op::Unarchive));
    }

    #[tokio::test]
    async fn test_toggle_stale_id_is_noop() {
        let mut controller = loaded().await;
        let calls_before = controller.store().calls().len();

        // a1 is already archived, so it is not in the source collection
        let outcome = controller.toggle_archive("a1", true).await.unwrap();
        assert_eq!(outcome, Outcome::NotFound);
        let outcome = controller.toggle_archive("missing", false).await.unwrap();
        assert_eq!(outcome, Outcome::NotFound);

        assert_eq!(controller.store().calls().len(), calls_before);
        assert_eq!(ids(controller.archived()), vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_delete_declined_makes_no_call() {
        let mut controller = loaded().await;

        let outcome = controller.delete_note("n2").await.unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert!(!controller.store().calls().contains(&Op::Delete));
        assert!(controller.active().iter().any(|n| n.id == "n2"));
        assert_eq!(
            controller.presenter().confirmations.lock().unwrap().as_slice(),
            [DELETE_CONFIRM_TITLE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_confirmed_removes_note() {
        let mut controller = loaded().await;
        controller.presenter().confirm_answer.store(true, Ordering::SeqCst);

        assert_eq!(controller.delete_note("a1").await.unwrap(), Outcome::Applied);
        assert_eq!(controller.delete_note("n2").await.unwrap(), Outcome::Applied);

        assert_eq!(ids(controller.active()), vec!["n1", "n3"]);
        assert_eq!(ids(controller.archived()), vec!["a2"]);
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_state() {
        let mut controller = loaded().await;
        controller.presenter().confirm_answer.store(true, Ordering::SeqCst);
        controller.store().fail(Op::Delete);

        assert!(controller.delete_note("n2").await.is_err());
        assert_eq!(ids(controller.active()), vec!["n1", "n2", "n3"]);

        controller.store().recover(Op::Delete);
        assert_eq!(controller.delete_note("n2").await.unwrap(), Outcome::Applied);
        assert_eq!(ids(controller.active()), vec!["n1", "n3"]);
    }

    #[tokio::test]
    async fn test_switch_view_is_idempotent() {
        let mut controller = loaded().await;
        let active = controller.active().to_vec();
        let archived = controller.archived().to_vec();

        controller.switch_view(View::Active);
        controller.switch_view(View::Active);

        assert_eq!(controller.view(), View::Active);
        assert_eq!(controller.active(), active.as_slice());
        assert_eq!(controller.archived(), archived.as_slice());

        controller.switch_view(View::Archived);
        let frame = controller.presenter().last_frame().unwrap();
        assert_eq!(frame.view, View::Archived);
        assert_eq!(ids(frame.notes()), vec!["a2", "a1"]);
    }

    #[tokio::test]
    async fn test_visible_notes_sorted_and_stable() {
        let store = FakeStore::with_notes(vec![
            note("old", 1, false),
            note("tie-first", 50, false),
            note("new", 99, false),
            note("tie-second", 50, false),
        ]);
        let mut controller = NoteController::new(store, RecordingPresenter::default());
        controller.load().await.unwrap();

        let visible: Vec<&str> = controller.visible_notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(visible, vec!["new", "tie-first", "tie-second", "old"]);
        // stored order untouched
        assert_eq!(ids(controller.active()), vec!["old", "tie-first", "new", "tie-second"]);
    }

    #[tokio::test]
    async fn test_empty_view_renders_empty_state() {
        let mut controller = NoteController::new(FakeStore::default(), RecordingPresenter::default());
        controller.load().await.unwrap();
        controller.switch_view(View::Archived);

        let frame = controller.presenter().last_frame().unwrap();
        assert!(matches!(frame.content, Content::Empty { .. }));
        assert!(frame.notes().is_empty());
    }

    #[tokio::test]
    async fn test_run_applies_intents_in_order() {
        let controller = NoteController::new(
            FakeStore::with_notes(vec![note("n1", 10, false)]),
            RecordingPresenter::default(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Intent::AddNote {
            title: "Groceries".to_string(),
            body: "Milk, eggs and bread".to_string(),
        })
        .unwrap();
        tx.send(Intent::ToggleArchive { id: "n1".to_string(), archived: true }).unwrap();
        tx.send(Intent::AddNote { title: "x".to_string(), body: "y".to_string() }).unwrap();
        tx.send(Intent::SwitchView(View::Archived)).unwrap();
        drop(tx);

        let controller = run(controller, rx).await;

        assert_eq!(controller.view(), View::Archived);
        assert_eq!(controller.active().len(), 1);
        assert_eq!(controller.active()[0].title, "Groceries");
        assert_eq!(ids(controller.archived()), vec!["n1"]);
        assert_eq!(controller.presenter().invalid.lock().unwrap().len(), 1);
        assert_disjoint(&controller);
    }

    #[tokio::test]
    async fn test_run_settles_every_intent() {
        let controller = NoteController::new(
            FakeStore::with_notes(vec![note("n1", 10, false)]),
            RecordingPresenter::default(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        // stale id, declined delete and a rejected note still settle
        tx.send(Intent::ToggleArchive { id: "gone".to_string(), archived: true }).unwrap();
        tx.send(Intent::DeleteNote { id: "n1".to_string() }).unwrap();
        tx.send(Intent::AddNote { title: "x".to_string(), body: "y".to_string() }).unwrap();
        tx.send(Intent::Reload).unwrap();
        drop(tx);

        let controller = run(controller, rx).await;

        assert_eq!(controller.presenter().settled.load(Ordering::SeqCst), 4);
        assert_eq!(ids(controller.active()), vec!["n1"]);
    }

    #[tokio::test]
    async fn test_disjoint_across_mixed_operations() {
        let mut controller = loaded().await;
        controller.presenter().confirm_answer.store(true, Ordering::SeqCst);

        controller.toggle_archive("n1", true).await.unwrap();
        assert_disjoint(&controller);
        controller.toggle_archive("n1", false).await.unwrap();
        assert_disjoint(&controller);
        controller.store().fail(Op::Archive);
        let _ = controller.toggle_archive("n3", true).await;
        assert_disjoint(&controller);
        controller.delete_note("a2").await.unwrap();
        assert_disjoint(&controller);
        controller.add_note("Another one", "With a body long enough").await.unwrap();
        assert_disjoint(&controller);

        // local state mirrors the store after the session
        controller.load().await.unwrap();
        assert_disjoint(&controller);
        assert_eq!(controller.active().len() + controller.archived().len(), 5);
    }
}
