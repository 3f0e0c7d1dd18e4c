use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Transaction kind of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "listing", rename_all = "UPPERCASE")]
pub enum Listing {
    Rent,
    Sale,
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Listing::Rent => "RENT",
            Listing::Sale => "SALE",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "facing", rename_all = "UPPERCASE")]
pub enum Facing {
    North,
    South,
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "condition", rename_all = "UPPERCASE")]
pub enum Condition {
    Old,
    New,
    Refurnished,
}

/// A property record. Immutable after creation; there is no edit/delete
/// surface in this application.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub social_id: String,
    pub address: String,
    /// Comma-separated locality string, e.g. "Andheri West, Mumbai, MH".
    /// The city facet is derived from the segment after the last comma.
    pub city: String,
    pub state: String,
    pub postal_code: i32,
    pub price: i64,
    pub area: i32,
    pub beds: i32,
    pub baths: i32,
    pub listing: Listing,
    pub facing: Facing,
    pub condition: Condition,
    pub is_corner_plot: bool,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a property insert; identity and timestamps come from the database
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub name: String,
    pub description: String,
    pub social_id: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: i32,
    pub price: i64,
    pub area: i32,
    pub beds: i32,
    pub baths: i32,
    pub listing: Listing,
    pub facing: Facing,
    pub condition: Condition,
    pub is_corner_plot: bool,
    pub thumbnail_url: Option<String>,
}
