// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// MOVIE EVENTS
// ============================================================================

/// Emitted after a movie and its categories were stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: i64,
    pub name: String,
}

impl MovieCreated {
    pub fn new(movie_id: i64, name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
            name,
        }
    }
}

impl DomainEvent for MovieCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MovieCreated" }
}

/// Emitted when any stored field of a movie changed, ratings included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: i64,
}

impl MovieUpdated {
    pub fn new(movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
        }
    }
}

impl DomainEvent for MovieUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MovieUpdated" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: i64,
}

impl MovieDeleted {
    pub fn new(movie_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
        }
    }
}

impl DomainEvent for MovieDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MovieDeleted" }
}

/// Emitted after the external player was launched and the view recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePlayed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub movie_id: i64,
    pub file_link: String,
    pub viewed_at: DateTime<Utc>,
}

impl MoviePlayed {
    pub fn new(movie_id: i64, file_link: String, viewed_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            movie_id,
            file_link,
            viewed_at,
        }
    }
}

impl DomainEvent for MoviePlayed {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "MoviePlayed" }
}

// ============================================================================
// CATEGORY EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: i64,
    pub name: String,
}

impl CategoryCreated {
    pub fn new(category_id: i64, name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            category_id,
            name,
        }
    }
}

impl DomainEvent for CategoryCreated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CategoryCreated" }
}

/// Emitted on rename. Movies carrying the category see the new name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: i64,
    pub name: String,
}

impl CategoryUpdated {
    pub fn new(category_id: i64, name: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            category_id,
            name,
        }
    }
}

impl DomainEvent for CategoryUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CategoryUpdated" }
}

/// Emitted after a category and all of its associations were removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub category_id: i64,
}

impl CategoryDeleted {
    pub fn new(category_id: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            category_id,
        }
    }
}

impl DomainEvent for CategoryDeleted {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "CategoryDeleted" }
}
