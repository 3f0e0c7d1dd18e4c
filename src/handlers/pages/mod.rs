pub mod auth;
pub mod dashboard;
pub mod leads;
pub mod properties;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Render a template into a full HTML response. A render failure is an
/// internal error, not a panic.
pub(crate) fn html<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Indian digit grouping: last three digits, then groups of two.
/// 2500000 -> "25,00,000"
pub fn format_price(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{}{}", sign, digits);
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    let head_bytes = head.as_bytes();
    for (index, byte) in head_bytes.iter().enumerate() {
        if index > 0 && (head_bytes.len() - index) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(*byte as char);
    }

    format!("{}{},{}", sign, grouped, last_three)
}

/// Askama filters shared by the page templates
pub mod filters {
    /// `{{ property.price|rupees }}`
    pub fn rupees(amount: &i64) -> askama::Result<String> {
        Ok(super::format_price(*amount))
    }
}
