use askama::Template;
use axum::{
    response::{Redirect, Response},
    Extension,
};

use crate::database::lead_store::LeadStore;
use crate::database::property_store::PropertyStore;
use crate::error::ApiError;
use crate::middleware::session::CurrentSession;

use super::html;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub property_count: usize,
    pub lead_count: usize,
}

/// GET / - the guard has already ensured a session; home is the dashboard
pub async fn home() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn dashboard(
    Extension(session): Extension<CurrentSession>,
) -> Result<Response, ApiError> {
    let properties = PropertyStore::for_default_pool().await?.list().await?;
    let leads = LeadStore::for_default_pool().await?.list().await?;

    Ok(html(DashboardTemplate {
        user_name: session.name,
        active: "/dashboard",
        property_count: properties.len(),
        lead_count: leads.len(),
    }))
}
