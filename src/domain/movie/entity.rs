use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

/// A movie file in the private collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Movie {
    /// Store-assigned identifier, 0 until saved
    pub id: i64,

    /// Title
    pub name: String,

    /// Public IMDB rating, 0 to 10
    pub imdb_rating: f64,

    /// The owner's own rating, absent until rated
    pub personal_rating: Option<f64>,

    /// Path to the media file on disk
    pub file_link: String,

    /// Last time the movie was launched, absent if never played
    pub last_view: Option<DateTime<Utc>>,

    /// Attached categories, ordered by name, no duplicate ids
    pub categories: Vec<Category>,
}

impl Movie {
    /// Create an unsaved, unrated, never played movie
    pub fn new(name: impl Into<String>, imdb_rating: f64, file_link: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            imdb_rating,
            personal_rating: None,
            file_link: file_link.into(),
            last_view: None,
            categories: Vec::new(),
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }

    /// Attach a category, keeping the list ordered by name.
    /// A category already attached is ignored: same id for saved
    /// categories, same name for unsaved ones.
    pub fn add_category(&mut self, category: Category) {
        if self.categories.iter().any(|existing| same_category(existing, &category)) {
            return;
        }
        let pos = self
            .categories
            .partition_point(|existing| existing.name <= category.name);
        self.categories.insert(pos, category);
    }

    pub fn remove_category(&mut self, category: &Category) {
        self.categories.retain(|existing| !same_category(existing, category));
    }

    /// Replace all categories, re-establishing name order and id uniqueness
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories.clear();
        for category in categories {
            self.add_category(category);
        }
    }

    /// Case-insensitive membership check by category name
    pub fn has_category(&self, category_name: &str) -> bool {
        let wanted = category_name.to_lowercase();
        self.categories
            .iter()
            .any(|c| c.name.to_lowercase() == wanted)
    }

    /// Category names joined with ", ", empty when there are none
    pub fn categories_joined(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn categories_display(&self) -> String {
        if self.categories.is_empty() {
            "No categories".to_string()
        } else {
            self.categories_joined()
        }
    }

    pub fn personal_rating_display(&self) -> String {
        match self.personal_rating {
            Some(rating) => format!("{:.1}", rating),
            None => "Not rated".to_string(),
        }
    }
}

// Unsaved categories all carry id 0, so they are told apart by name
fn same_category(a: &Category, b: &Category) -> bool {
    if a.is_saved() || b.is_saved() {
        a == b
    } else {
        a.name == b.name
    }
}

/// Identity is the store id. Two unsaved movies never compare equal.
impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.is_saved() && self.id == other.id
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1})", self.name, self.imdb_rating)
    }
}
