use async_trait::async_trait;
use sqlx::PgPool;

use crate::catalog::workflow::LeadSink;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Lead, NewLead};

/// Persistent lead collection. Every lead references exactly one existing
/// property; the foreign key is enforced by the schema and surfaced as a
/// not-found error rather than a generic query failure.
pub struct LeadStore {
    pool: PgPool,
}

impl LeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn for_default_pool() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    pub async fn create(&self, lead: NewLead) -> Result<Lead, DatabaseError> {
        let result = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (user_full_name, user_phone, status, property_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&lead.user_full_name)
        .bind(&lead.user_phone)
        .bind(lead.status)
        .bind(lead.property_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23503") => {
                Err(DatabaseError::NotFound(format!(
                    "Property {} does not exist",
                    lead.property_id
                )))
            }
            Err(other) => Err(DatabaseError::Sqlx(other)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Lead>, DatabaseError> {
        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads")
            .fetch_all(&self.pool)
            .await?;

        Ok(leads)
    }
}

#[async_trait]
impl LeadSink for LeadStore {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead, DatabaseError> {
        self.create(lead).await
    }
}
