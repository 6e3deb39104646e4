use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Job-vacancy aggregate root.
///
/// `id` is assigned by the database on insert and immutable afterwards.
/// `version` starts at 1 on insert and advances by exactly 1 per successful
/// update; it exists only for optimistic concurrency control and is never
/// mutated by clients beyond round-tripping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub posted_at: DateTime<Utc>,
    pub location: String,
    pub version: i32,
}

impl Vacancy {
    /// Builds a not-yet-persisted vacancy. `id` and `version` are zero until
    /// the repository saves it.
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
        posted_at: DateTime<Utc>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            company: company.into(),
            description: description.into(),
            posted_at,
            location: location.into(),
            version: 0,
        }
    }
}
