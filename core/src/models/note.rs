use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::format_date;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Note {
    /// Creation time in the local timezone, formatted for display
    pub fn display_date(&self) -> String {
        format_date(&self.created_at.with_timezone(&Local))
    }
}

/// Payload of a create request; ids and timestamps come from the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub body: String,
}
