use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::facets::CityFacets;
use crate::catalog::filter::FilterState;
use crate::catalog::selection::Selection;
use crate::database::manager::DatabaseError;
use crate::database::models::{Lead, LeadStatus, NewLead, Property};

/// Contact form collected when a lead is captured against the selected
/// property. `status` defaults to WARM when the field is omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LeadForm {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub user_full_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub user_phone: String,
    #[serde(default)]
    pub status: LeadStatus,
}

/// Where submitted leads go. The store implements this; tests substitute a
/// recording double to observe exactly when a write is attempted.
#[async_trait]
pub trait LeadSink {
    async fn create_lead(&self, lead: NewLead) -> Result<Lead, DatabaseError>;
}

#[derive(Debug, Error)]
pub enum LeadCaptureError {
    #[error("No property selected")]
    NoSelection,
    #[error("Validation failed")]
    Invalid(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// The search-and-capture workflow: load the catalog once, narrow it with the
/// filter, select exactly one property, submit a validated contact form
/// against it.
#[derive(Debug, Clone)]
pub struct LeadCapture {
    catalog: Vec<Property>,
    facets: CityFacets,
    filter: FilterState,
    selection: Selection,
}

impl LeadCapture {
    /// Build from a catalog fetched once by the caller. An empty catalog is a
    /// valid (empty) view; no retry happens here.
    pub fn load(catalog: Vec<Property>) -> Self {
        let facets = CityFacets::derive(&catalog);
        let filter = FilterState::default_for(&facets);
        Self {
            catalog,
            facets,
            filter,
            selection: Selection::default(),
        }
    }

    pub fn facets(&self) -> &CityFacets {
        &self.facets
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the filter state wholesale. The visible view is derived, not
    /// stored, so there is nothing else to invalidate.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<Property> {
        self.filter.apply(&self.catalog)
    }

    pub fn toggle(&mut self, id: Uuid) {
        self.selection = self.selection.toggle(id);
    }

    /// Record a lead against the current selection. Requires a selection
    /// before anything else happens, validates the form before the store is
    /// touched, and clears the selection only after the write is confirmed.
    /// A store failure leaves the selection in place and propagates.
    pub async fn submit<S: LeadSink + Sync>(
        &mut self,
        form: LeadForm,
        sink: &S,
    ) -> Result<Lead, LeadCaptureError> {
        let property_id = self
            .selection
            .selected_id()
            .ok_or(LeadCaptureError::NoSelection)?;

        form.validate()?;

        let lead = sink
            .create_lead(NewLead {
                user_full_name: form.user_full_name,
                user_phone: form.user_phone,
                status: form.status,
                property_id,
            })
            .await?;

        self.selection = self.selection.clear();
        Ok(lead)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::catalog::filter::test_support::property;

    /// Records every attempted write; optionally fails them all.
    #[derive(Default)]
    struct RecordingSink {
        created: Mutex<Vec<NewLead>>,
        fail: bool,
    }

    #[async_trait]
    impl LeadSink for RecordingSink {
        async fn create_lead(&self, lead: NewLead) -> Result<Lead, DatabaseError> {
            self.created.lock().unwrap().push(lead.clone());
            if self.fail {
                return Err(DatabaseError::NotFound("gone".to_string()));
            }
            Ok(Lead {
                id: Uuid::from_u128(99),
                user_full_name: lead.user_full_name,
                user_phone: lead.user_phone,
                status: lead.status,
                property_id: lead.property_id,
                created_at: Utc::now(),
            })
        }
    }

    fn form() -> LeadForm {
        LeadForm {
            user_full_name: "Asha Patel".to_string(),
            user_phone: "+91 98200 00000".to_string(),
            status: LeadStatus::Warm,
        }
    }

    fn workflow() -> LeadCapture {
        LeadCapture::load(vec![
            property(1, "Mumbai, MH", 2000),
            property(2, "Pune, MH", 5000),
        ])
    }

    #[tokio::test]
    async fn submit_without_selection_never_reaches_store() {
        let sink = RecordingSink::default();
        let mut capture = workflow();

        let result = capture.submit(form(), &sink).await;
        assert!(matches!(result, Err(LeadCaptureError::NoSelection)));
        assert!(sink.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_store() {
        let sink = RecordingSink::default();
        let mut capture = workflow();
        capture.toggle(Uuid::from_u128(1));

        let bad = LeadForm {
            user_full_name: String::new(),
            ..form()
        };
        let result = capture.submit(bad, &sink).await;
        assert!(matches!(result, Err(LeadCaptureError::Invalid(_))));
        assert!(sink.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_submit_clears_selection() {
        let sink = RecordingSink::default();
        let mut capture = workflow();
        capture.toggle(Uuid::from_u128(2));

        let lead = capture.submit(form(), &sink).await.unwrap();
        assert_eq!(lead.property_id, Uuid::from_u128(2));
        assert_eq!(capture.selection(), Selection::Unselected);
        assert_eq!(sink.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_propagates_and_keeps_selection() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut capture = workflow();
        capture.toggle(Uuid::from_u128(1));

        let result = capture.submit(form(), &sink).await;
        assert!(matches!(result, Err(LeadCaptureError::Store(_))));
        // Not cleared: the user must not see silent success
        assert_eq!(capture.selection(), Selection::Selected(Uuid::from_u128(1)));
    }

    #[tokio::test]
    async fn default_status_is_warm() {
        let parsed: LeadForm = serde_json::from_value(serde_json::json!({
            "user_full_name": "Asha Patel",
            "user_phone": "+91 98200 00000"
        }))
        .unwrap();
        assert_eq!(parsed.status, LeadStatus::Warm);
    }

    #[test]
    fn filter_changes_recompute_visible_view() {
        let mut capture = workflow();
        assert_eq!(capture.visible().len(), 2);

        let narrowed = FilterState {
            min_price: 3000,
            ..capture.filter().clone()
        };
        capture.set_filter(narrowed);
        assert_eq!(capture.visible().len(), 1);
    }
}
