use serde::{Deserialize, Serialize};

/// A genre-like label that can be attached to any number of movies.
///
/// `id == 0` means the category has not been persisted yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier
    pub id: i64,

    /// Unique display name
    pub name: String,
}

impl Category {
    /// Create an unsaved category
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    /// Rebuild a persisted category from its stored fields
    pub fn with_id(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }
}

/// Identity is the store id. Two unsaved categories never compare equal.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.is_saved() && self.id == other.id
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
