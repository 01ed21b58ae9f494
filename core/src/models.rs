mod envelope;
mod note;
mod view;

pub use envelope::{Envelope, Status};
pub use note::{NewNote, Note};
pub use view::View;

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Format a timestamp the way note cards show it, e.g. `17 October 2026, 14:05`
pub fn format_date<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    datetime.format("%-d %B %Y, %H:%M").to_string()
}
