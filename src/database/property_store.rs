use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{NewProperty, Property};

/// Persistent property catalog. Exposes exactly the create/list contract the
/// rest of the application is allowed to rely on; ordering of `list` is
/// unspecified and callers must not assume stability across calls.
pub struct PropertyStore {
    pool: PgPool,
}

impl PropertyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn for_default_pool() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    pub async fn create(&self, property: NewProperty) -> Result<Property, DatabaseError> {
        let created = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties
                (name, description, social_id, address, city, state, postal_code,
                 price, area, beds, baths, listing, facing, condition,
                 is_corner_plot, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&property.name)
        .bind(&property.description)
        .bind(&property.social_id)
        .bind(&property.address)
        .bind(&property.city)
        .bind(&property.state)
        .bind(property.postal_code)
        .bind(property.price)
        .bind(property.area)
        .bind(property.beds)
        .bind(property.baths)
        .bind(property.listing)
        .bind(property.facing)
        .bind(property.condition)
        .bind(property.is_corner_plot)
        .bind(&property.thumbnail_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<Property>, DatabaseError> {
        let properties = sqlx::query_as::<_, Property>("SELECT * FROM properties")
            .fetch_all(&self.pool)
            .await?;

        Ok(properties)
    }
}
