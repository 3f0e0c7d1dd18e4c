use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::database::models::{Condition, Facing, Listing, NewProperty, Property};
use crate::database::property_store::PropertyStore;
use crate::middleware::response::{ApiResponse, ApiResult};

/// Property creation form. One validation policy for every entry point:
/// price floor 1500, area floor 100, beds/baths required and positive.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 5, message = "Name must be at least 5 characters."))]
    pub name: String,
    #[validate(length(min = 5, message = "Description must be at least 5 characters."))]
    pub description: String,
    #[validate(length(min = 5, message = "Social ID must be at least 5 characters."))]
    pub social_id: String,
    #[validate(length(min = 10, message = "Address must be detailed."))]
    pub address: String,
    #[validate(length(min = 2, message = "City must be at least 2 characters."))]
    pub city: String,
    #[validate(length(min = 2, message = "State must be at least 2 characters."))]
    pub state: String,
    #[validate(range(min = 10000, message = "Postal code must be at least 5 digits."))]
    pub postal_code: i32,
    #[validate(range(min = 1500, message = "Price must be at least ₹1500."))]
    pub price: i64,
    #[validate(range(min = 100, message = "Area must be at least 100 sqft."))]
    pub area: i32,
    #[validate(range(min = 1, message = "Beds is required."))]
    pub beds: i32,
    #[validate(range(min = 1, message = "Baths is required."))]
    pub baths: i32,
    pub listing: Listing,
    pub facing: Facing,
    pub condition: Condition,
    #[serde(default)]
    pub is_corner_plot: bool,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl From<CreatePropertyRequest> for NewProperty {
    fn from(request: CreatePropertyRequest) -> Self {
        NewProperty {
            name: request.name,
            description: request.description,
            social_id: request.social_id,
            address: request.address,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            price: request.price,
            area: request.area,
            beds: request.beds,
            baths: request.baths,
            listing: request.listing,
            facing: request.facing,
            condition: request.condition,
            is_corner_plot: request.is_corner_plot,
            thumbnail_url: request.thumbnail_url,
        }
    }
}

/// POST /api/properties - validate, then persist. A store failure is a
/// failure; the client never sees success for an unconfirmed write.
pub async fn create(Json(payload): Json<CreatePropertyRequest>) -> ApiResult<Property> {
    payload.validate()?;

    let store = PropertyStore::for_default_pool().await?;
    let property = store.create(payload.into()).await?;

    Ok(ApiResponse::created(property))
}

/// GET /api/properties - the full catalog, unspecified order
pub async fn list() -> ApiResult<Vec<Property>> {
    let store = PropertyStore::for_default_pool().await?;
    let properties = store.list().await?;

    Ok(ApiResponse::success(properties))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreatePropertyRequest {
        CreatePropertyRequest {
            name: "Sea Breeze Apartments".to_string(),
            description: "Two bedroom apartment close to the station".to_string(),
            social_id: "@estate.example".to_string(),
            address: "14 Hill Road, Bandra West".to_string(),
            city: "Bandra, Mumbai".to_string(),
            state: "MH".to_string(),
            postal_code: 400050,
            price: 25000,
            area: 850,
            beds: 2,
            baths: 2,
            listing: Listing::Rent,
            facing: Facing::North,
            condition: Condition::New,
            is_corner_plot: false,
            thumbnail_url: None,
        }
    }

    #[test]
    fn valid_property_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn price_below_floor_is_rejected() {
        let request = CreatePropertyRequest {
            price: 1499,
            ..valid_request()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));

        let request = CreatePropertyRequest {
            price: 1500,
            ..valid_request()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn area_below_floor_is_rejected() {
        let request = CreatePropertyRequest {
            area: 99,
            ..valid_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn beds_and_baths_are_required() {
        let request = CreatePropertyRequest {
            beds: 0,
            ..valid_request()
        };
        assert!(request.validate().is_err());

        let request = CreatePropertyRequest {
            baths: 0,
            ..valid_request()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn listing_parses_from_wire_form() {
        let parsed: Listing = serde_json::from_str("\"RENT\"").unwrap();
        assert_eq!(parsed, Listing::Rent);
        assert!(serde_json::from_str::<Listing>("\"LEASE\"").is_err());
    }
}
