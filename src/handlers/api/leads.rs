use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::database::lead_store::LeadStore;
use crate::database::models::{Lead, LeadStatus, NewLead};
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub user_full_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub user_phone: String,
    #[serde(default)]
    pub status: LeadStatus,
    pub property_id: Uuid,
}

/// POST /api/leads - validate contact fields, then record the lead against
/// the referenced property. A missing property surfaces as 404, a store
/// failure as an error; success is only reported after a confirmed write.
pub async fn create(Json(payload): Json<CreateLeadRequest>) -> ApiResult<Lead> {
    payload.validate()?;

    let store = LeadStore::for_default_pool().await?;
    let lead = store
        .create(NewLead {
            user_full_name: payload.user_full_name,
            user_phone: payload.user_phone,
            status: payload.status,
            property_id: payload.property_id,
        })
        .await?;

    Ok(ApiResponse::created(lead))
}

/// GET /api/leads - all recorded leads
pub async fn list() -> ApiResult<Vec<Lead>> {
    let store = LeadStore::for_default_pool().await?;
    let leads = store.list().await?;

    Ok(ApiResponse::success(leads))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_fields_are_required() {
        let request = CreateLeadRequest {
            user_full_name: String::new(),
            user_phone: "+91 98200 00000".to_string(),
            status: LeadStatus::Warm,
            property_id: Uuid::from_u128(1),
        };
        assert!(request.validate().is_err());

        let request = CreateLeadRequest {
            user_full_name: "Asha Patel".to_string(),
            user_phone: String::new(),
            status: LeadStatus::Hot,
            property_id: Uuid::from_u128(1),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn omitted_status_defaults_to_warm() {
        let parsed: CreateLeadRequest = serde_json::from_value(serde_json::json!({
            "user_full_name": "Asha Patel",
            "user_phone": "+91 98200 00000",
            "property_id": Uuid::from_u128(7),
        }))
        .unwrap();
        assert_eq!(parsed.status, LeadStatus::Warm);
    }

    #[test]
    fn unknown_status_is_rejected_at_parse_time() {
        let result = serde_json::from_value::<CreateLeadRequest>(serde_json::json!({
            "user_full_name": "Asha Patel",
            "user_phone": "+91 98200 00000",
            "status": "LUKEWARM",
            "property_id": Uuid::from_u128(7),
        }));
        assert!(result.is_err());
    }
}
