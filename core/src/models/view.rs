use std::fmt;

/// Which collection the presentation is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Active,
    Archived,
}

impl View {
    pub fn other(self) -> Self {
        match self {
            View::Active => View::Archived,
            View::Archived => View::Active,
        }
    }

    /// Whether notes shown in this view carry `archived == true`
    pub fn is_archived(self) -> bool {
        matches!(self, View::Archived)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Active => write!(f, "Active Notes"),
            View::Archived => write!(f, "Archived Notes"),
        }
    }
}
