#![allow(dead_code, unused_macros)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test,
};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;

use locality::database::{schema, ConnectionManager};
use locality::AppState;

/// Fresh in-memory database with the schema applied.
///
/// A single pooled connection keeps every session on the same in-memory
/// database, so a session must never overlap another pool checkout.
pub async fn test_db() -> ConnectionManager {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("in-memory sqlite should open");
    schema::create_tables(&conn)
        .await
        .expect("schema should apply to an empty database");
    ConnectionManager::from_connection(conn)
}

pub async fn test_state() -> AppState {
    AppState::new(test_db().await, 1000)
}

pub async fn test_state_with_max_page(max_page_size: u64) -> AppState {
    AppState::new(test_db().await, max_page_size)
}

/// Builds the application the way `main` does, minus CORS and Swagger UI.
/// Needs `#[macro_use] mod common;` in the test crate.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(locality::api::middleware::RequestId)
                .app_data(actix_web::web::Data::new($state))
                .configure(locality::api::configure),
        )
        .await
    };
}

/// Status and parsed JSON body (`Value::Null` when the body is empty).
pub async fn send<S, R, B>(app: &S, req: R) -> (u16, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, body)
}

/// Field names listed in a validation error body.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
