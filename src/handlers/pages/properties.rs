use askama::Template;
use axum::{
    extract::Form,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use validator::Validate;

use crate::database::models::Property;
use crate::database::property_store::PropertyStore;
use crate::error::ApiError;
use crate::handlers::api::properties::CreatePropertyRequest;
use crate::middleware::session::CurrentSession;

use super::{filters, html};

#[derive(Template)]
#[template(path = "properties.html")]
pub struct PropertiesTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub properties: Vec<Property>,
}

#[derive(Template)]
#[template(path = "property_new.html")]
pub struct PropertyNewTemplate {
    pub user_name: String,
    pub active: &'static str,
    pub errors: Vec<String>,
}

pub async fn index(Extension(session): Extension<CurrentSession>) -> Result<Response, ApiError> {
    let properties = PropertyStore::for_default_pool().await?.list().await?;

    Ok(html(PropertiesTemplate {
        user_name: session.name,
        active: "/dashboard/properties",
        properties,
    }))
}

pub async fn new_form(Extension(session): Extension<CurrentSession>) -> Response {
    html(PropertyNewTemplate {
        user_name: session.name,
        active: "/dashboard/properties/new",
        errors: Vec::new(),
    })
}

/// Form variant of property creation. Same validation policy as the API;
/// a failed insert is an error page, never a silent success.
pub async fn create(
    Extension(session): Extension<CurrentSession>,
    Form(mut form): Form<CreatePropertyRequest>,
) -> Response {
    // Browsers submit empty optional inputs as empty strings
    if form.thumbnail_url.as_deref() == Some("") {
        form.thumbnail_url = None;
    }

    if let Err(errors) = form.validate() {
        let messages = errors
            .field_errors()
            .values()
            .flat_map(|violations| violations.iter())
            .filter_map(|violation| violation.message.as_ref().map(|m| m.to_string()))
            .collect();

        return html(PropertyNewTemplate {
            user_name: session.name,
            active: "/dashboard/properties/new",
            errors: messages,
        });
    }

    let result = match PropertyStore::for_default_pool().await {
        Ok(store) => store.create(form.into()).await,
        Err(db_err) => Err(db_err),
    };

    match result {
        Ok(_created) => Redirect::to("/dashboard/properties").into_response(),
        Err(db_err) => html(PropertyNewTemplate {
            user_name: session.name,
            active: "/dashboard/properties/new",
            errors: vec![ApiError::from(db_err).message().to_string()],
        }),
    }
}
