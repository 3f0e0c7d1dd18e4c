use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Triage status of a lead
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "lead_status", rename_all = "UPPERCASE")]
pub enum LeadStatus {
    Hot,
    #[default]
    Warm,
    Cold,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LeadStatus::Hot => "HOT",
            LeadStatus::Warm => "WARM",
            LeadStatus::Cold => "COLD",
        };
        write!(f, "{}", label)
    }
}

/// A recorded expression of interest in exactly one property
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub user_full_name: String,
    pub user_phone: String,
    pub status: LeadStatus,
    pub property_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLead {
    pub user_full_name: String,
    pub user_phone: String,
    pub status: LeadStatus,
    pub property_id: Uuid,
}
