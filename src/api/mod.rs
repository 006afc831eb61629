pub mod cities;
pub mod countries;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod openapi;
pub mod states;
pub mod validation;

use actix_web::web;

use crate::errors::AppError;

/// Registers extractor error handlers and every route of the API.
///
/// Non-numeric path ids and malformed query strings become 422s in the common
/// error body instead of actix's plain-text 404/400.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::invalid("path", err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::invalid("query", err.to_string()).into()),
    )
    .configure(health::init_routes)
    .configure(countries::init_routes)
    .configure(states::init_routes)
    .configure(cities::init_routes);
}
