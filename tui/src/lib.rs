pub mod app;
pub mod config;
pub mod event;
pub mod form;
pub mod presenter;
pub mod ui;

pub use app::App;
pub use config::{load_config, Config};
pub use event::{handle_key_event, handle_mouse_event, Event, EventHandler};
pub use presenter::{ChannelPresenter, UiEvent};
