use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// CORS for the browser client. Checkout and auth calls carry a bearer
/// token, so credentials are allowed.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = match parse_origins(origins) {
        parsed if parsed.is_empty() => {
            // Credentials rule out both a wildcard and echoing the caller
            tracing::warn!("CORS: no usable origins configured, cross-origin requests are refused");
            AllowOrigin::list(Vec::new())
        }
        parsed => {
            tracing::info!(count = parsed.len(), "CORS: origins configured");
            AllowOrigin::list(parsed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

/// Keeps the origins that are valid header values, logging the rest.
fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "CORS: skipping invalid origin");
                None
            }
        })
        .collect()
}
