use anyhow::Context;

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::database::models::{Condition, Facing, Listing, NewProperty};
use crate::database::property_store::PropertyStore;

/// Seed a verified staff account and a handful of properties so the
/// dashboard has something to show on a fresh database.
pub async fn handle() -> anyhow::Result<()> {
    DatabaseManager::apply_schema()
        .await
        .context("failed to apply database schema")?;

    let pool = DatabaseManager::pool().await?;

    let password_hash = auth::hash_password("estate-admin");
    sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, role, email_verified)
        VALUES ($1, $2, $3, 'ADMIN', true)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind("Admin")
    .bind("admin@estate.local")
    .bind(&password_hash)
    .execute(&pool)
    .await?;

    let store = PropertyStore::new(pool);
    for property in demo_properties() {
        store.create(property).await?;
    }

    println!("Seeded demo data (sign in as admin@estate.local / estate-admin)");
    Ok(())
}

fn demo_properties() -> Vec<NewProperty> {
    vec![
        NewProperty {
            name: "Sea Breeze Apartments".to_string(),
            description: "Two bedroom apartment five minutes from the station".to_string(),
            social_id: "@seabreeze.bandra".to_string(),
            address: "14 Hill Road, Bandra West".to_string(),
            city: "Bandra West, Mumbai".to_string(),
            state: "MH".to_string(),
            postal_code: 400050,
            price: 85000,
            area: 850,
            beds: 2,
            baths: 2,
            listing: Listing::Rent,
            facing: Facing::West,
            condition: Condition::Refurnished,
            is_corner_plot: false,
            thumbnail_url: None,
        },
        NewProperty {
            name: "Lakeside Villa".to_string(),
            description: "Independent villa overlooking the lake with a private garden".to_string(),
            social_id: "@lakeside.pune".to_string(),
            address: "7 Paud Road, Kothrud".to_string(),
            city: "Kothrud, Pune".to_string(),
            state: "MH".to_string(),
            postal_code: 411038,
            price: 18500000,
            area: 3200,
            beds: 4,
            baths: 4,
            listing: Listing::Sale,
            facing: Facing::North,
            condition: Condition::New,
            is_corner_plot: true,
            thumbnail_url: None,
        },
        NewProperty {
            name: "Garden View Flat".to_string(),
            description: "Compact one bedroom flat next to the tech park".to_string(),
            social_id: "@gardenview.blr".to_string(),
            address: "22 Outer Ring Road, Bellandur".to_string(),
            city: "Bellandur, Bengaluru".to_string(),
            state: "KA".to_string(),
            postal_code: 560103,
            price: 32000,
            area: 620,
            beds: 1,
            baths: 1,
            listing: Listing::Rent,
            facing: Facing::East,
            condition: Condition::Old,
            is_corner_plot: false,
            thumbnail_url: None,
        },
    ]
}
