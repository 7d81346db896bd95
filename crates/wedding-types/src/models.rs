use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A well-wish left by a guest. `id` and `created_at` are assigned by the
/// store and only ever come back from a persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub id: i64,
    pub name: String,
    pub wish_text: String,
    pub created_at: DateTime<Utc>,
}

/// An RSVP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub id: i64,
    pub name: String,
    pub attending: bool,
    pub guests_count: i64,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}
