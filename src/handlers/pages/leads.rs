use askama::Template;
use axum::{
    extract::{Form, Query},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::catalog::{FilterState, LeadCapture, LeadCaptureError, LeadForm};
use crate::database::lead_store::LeadStore;
use crate::database::models::{Lead, LeadStatus, Listing, Property};
use crate::database::property_store::PropertyStore;
use crate::error::ApiError;
use crate::middleware::session::CurrentSession;

use super::{filters, html};

#[derive(Template)]
#[template(path = "leads.html")]
pub struct LeadsTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub leads: Vec<Lead>,
}

#[derive(Template)]
#[template(path = "lead_new.html")]
pub struct LeadNewTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub cities: Vec<String>,
    pub filter_id: String,
    pub filter_city: String,
    pub filter_listing: String,
    pub min_price: i64,
    pub max_price: i64,
    pub cards: Vec<PropertyCard>,
    pub selected: Option<Uuid>,
    pub error: Option<String>,
}

/// One property tile in the filtered grid, with its selection-toggle link
pub struct PropertyCard {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub price: i64,
    pub is_rent: bool,
    pub beds: i32,
    pub baths: i32,
    pub area: i32,
    pub thumbnail_url: String,
    pub selected: bool,
    pub toggle_url: String,
}

/// Filter state as it travels in the URL; absent fields mean "match all"
#[derive(Debug, Default, Deserialize)]
pub struct CaptureQuery {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub listing: String,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub selected: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct LeadSubmitForm {
    #[serde(default)]
    pub user_full_name: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default)]
    pub status: LeadStatus,
    pub selected: Option<Uuid>,
    // Hidden fields carrying the filter state through the round trip
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub listing: String,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

pub async fn index(Extension(session): Extension<CurrentSession>) -> Result<Response, ApiError> {
    let leads = LeadStore::for_default_pool().await?.list().await?;

    Ok(html(LeadsTemplate {
        user_name: session.name,
        active: "/dashboard/leads",
        leads,
    }))
}

/// GET /dashboard/leads/new - the search-and-capture view. The whole catalog
/// is loaded once per request and narrowed in memory.
pub async fn capture(
    Extension(session): Extension<CurrentSession>,
    Query(query): Query<CaptureQuery>,
) -> Result<Response, ApiError> {
    let catalog = PropertyStore::for_default_pool().await?.list().await?;
    Ok(html(render(session.name, catalog, &query, None)))
}

/// POST /dashboard/leads/new - submit the contact form against the selection.
/// Success redirects to the lead list; every failure re-renders the view with
/// the filter state intact and the selection preserved.
pub async fn submit(
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<LeadSubmitForm>,
) -> Response {
    let catalog = match PropertyStore::for_default_pool().await {
        Ok(store) => store.list().await,
        Err(db_err) => Err(db_err),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(db_err) => return ApiError::from(db_err).into_response(),
    };

    let query = CaptureQuery {
        id: form.id.clone(),
        city: form.city.clone(),
        listing: form.listing.clone(),
        min_price: form.min_price,
        max_price: form.max_price,
        selected: form.selected,
    };

    let mut workflow = build_workflow(&catalog, &query);

    let lead_store = match LeadStore::for_default_pool().await {
        Ok(store) => store,
        Err(db_err) => return ApiError::from(db_err).into_response(),
    };

    let lead_form = LeadForm {
        user_full_name: form.user_full_name,
        user_phone: form.user_phone,
        status: form.status,
    };

    match workflow.submit(lead_form, &lead_store).await {
        Ok(_lead) => Redirect::to("/dashboard/leads").into_response(),
        Err(err) => {
            let message = match err {
                LeadCaptureError::NoSelection => "Select a property before creating a lead.".to_string(),
                LeadCaptureError::Invalid(errors) => errors
                    .field_errors()
                    .values()
                    .flat_map(|violations| violations.iter())
                    .find_map(|violation| violation.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "Please check your input.".to_string()),
                LeadCaptureError::Store(db_err) => ApiError::from(db_err).message().to_string(),
            };
            html(render(session.name, catalog, &query, Some(message)))
        }
    }
}

fn build_workflow(catalog: &[Property], query: &CaptureQuery) -> LeadCapture {
    let mut workflow = LeadCapture::load(catalog.to_vec());

    let filter = FilterState {
        id: query.id.clone(),
        city: query.city.clone(),
        listing: parse_listing(&query.listing),
        min_price: query.min_price.unwrap_or(0),
        max_price: query.max_price.unwrap_or(workflow.facets().max_price),
    };
    workflow.set_filter(filter);

    if let Some(selected) = query.selected {
        workflow.toggle(selected);
    }

    workflow
}

fn render(
    user_name: String,
    catalog: Vec<Property>,
    query: &CaptureQuery,
    error: Option<String>,
) -> LeadNewTemplate {
    let workflow = build_workflow(&catalog, query);
    let filter = workflow.filter().clone();
    let selection = workflow.selection();

    let cards = workflow
        .visible()
        .into_iter()
        .map(|property| {
            let selected = selection.is_selected(property.id);
            // Clicking a selected tile clears it; clicking another replaces it
            let next_selected = if selected { None } else { Some(property.id) };
            PropertyCard {
                toggle_url: capture_url(&filter, &query.listing, next_selected),
                id: property.id,
                name: property.name,
                address: property.address,
                price: property.price,
                is_rent: property.listing == Listing::Rent,
                beds: property.beds,
                baths: property.baths,
                area: property.area,
                thumbnail_url: property
                    .thumbnail_url
                    .unwrap_or_else(|| "/static/placeholder.svg".to_string()),
                selected,
            }
        })
        .collect();

    LeadNewTemplate {
        user_name,
        active: "/dashboard/leads/new",
        cities: workflow.facets().cities.clone(),
        filter_id: filter.id.clone(),
        filter_city: filter.city.clone(),
        filter_listing: query.listing.clone(),
        min_price: filter.min_price,
        max_price: filter.max_price,
        cards,
        selected: selection.selected_id(),
        error,
    }
}

fn parse_listing(raw: &str) -> Option<Listing> {
    match raw {
        "RENT" => Some(Listing::Rent),
        "SALE" => Some(Listing::Sale),
        _ => None,
    }
}

fn capture_url(filter: &FilterState, listing_raw: &str, selected: Option<Uuid>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    if !filter.id.is_empty() {
        serializer.append_pair("id", &filter.id);
    }
    if !filter.city.is_empty() {
        serializer.append_pair("city", &filter.city);
    }
    if !listing_raw.is_empty() {
        serializer.append_pair("listing", listing_raw);
    }
    serializer.append_pair("min_price", &filter.min_price.to_string());
    serializer.append_pair("max_price", &filter.max_price.to_string());
    if let Some(id) = selected {
        serializer.append_pair("selected", &id.to_string());
    }

    format!("/dashboard/leads/new?{}", serializer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::test_support::property;

    #[test]
    fn toggle_url_round_trips_filter_state() {
        let filter = FilterState {
            id: String::new(),
            city: "Mumbai".to_string(),
            listing: Some(Listing::Rent),
            min_price: 1000,
            max_price: 50000,
        };
        let url = capture_url(&filter, "RENT", Some(Uuid::from_u128(5)));
        assert!(url.starts_with("/dashboard/leads/new?"));
        assert!(url.contains("city=Mumbai"));
        assert!(url.contains("listing=RENT"));
        assert!(url.contains("min_price=1000"));
        assert!(url.contains(&format!("selected={}", Uuid::from_u128(5))));
    }

    #[test]
    fn selected_card_links_to_clearing_url() {
        let catalog = vec![property(1, "Baner, Pune", 5000)];
        let query = CaptureQuery {
            selected: Some(Uuid::from_u128(1)),
            ..Default::default()
        };

        let view = render("Asha".to_string(), catalog, &query, None);
        assert!(view.cards[0].selected);
        assert!(!view.cards[0].toggle_url.contains("selected="));
    }

    #[test]
    fn missing_price_bounds_default_to_observed_range() {
        let catalog = vec![
            property(1, "Baner, Pune", 5000),
            property(2, "Andheri, Mumbai", 9000),
        ];
        let view = render("Asha".to_string(), catalog, &CaptureQuery::default(), None);
        assert_eq!(view.min_price, 0);
        assert_eq!(view.max_price, 9000);
        assert_eq!(view.cards.len(), 2);
    }
}
