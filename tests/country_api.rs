//! HTTP-level tests for the `/country` routes against an in-memory database.

#[macro_use]
mod common;

use actix_web::test::TestRequest;
use serde_json::json;

use common::{error_fields, send, test_state};

// ---------------------------------------------------------------------------
// Test: create, read back, delete, then the record is gone
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn brazil_lifecycle() {
    let app = test_app!(test_state().await);

    let (status, created) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brazil", "code": "BR"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["name"], "Brazil");
    assert_eq!(created["code"], "BR");
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, fetched) = send(&app, TestRequest::get().uri(&format!("/country/{}", id)).to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, TestRequest::delete().uri(&format!("/country/{}", id)).to_request()).await;
    assert_eq!(status, 204);
    assert!(body.is_null());

    let (status, body) = send(&app, TestRequest::get().uri(&format!("/country/{}", id)).to_request()).await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: input is normalized before it is stored
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn create_normalizes_name_and_code() {
    let app = test_app!(test_state().await);

    let (status, created) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "  united states of america ", "code": " us "}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["name"], "United States Of America");
    assert_eq!(created["code"], "US");
    assert_eq!(created["created_at"], created["updated_at"]);
}

// ---------------------------------------------------------------------------
// Test: duplicate code is a conflict, regardless of input casing
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn duplicate_code_returns_409() {
    let app = test_app!(test_state().await);

    let (status, _) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brazil", "code": "BR"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brasil", "code": "br"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["code"], "CONFLICT");

    let (_, list) = send(&app, TestRequest::get().uri("/country").to_request()).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: invalid payloads are 422 and name every offending field
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn invalid_payload_lists_every_field() {
    let app = test_app!(test_state().await);

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"code": 55, "capital": "Brasília"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(error_fields(&body), vec!["capital", "name", "code"]);

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "B", "code": "B R"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(error_fields(&body), vec!["name", "code"]);
}

#[actix_web::test]
async fn malformed_json_and_bad_ids_are_422() {
    let app = test_app!(test_state().await);

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request(),
    )
    .await;
    assert_eq!(status, 422);
    assert_eq!(error_fields(&body), vec!["body"]);

    let (status, body) = send(&app, TestRequest::get().uri("/country/abc").to_request()).await;
    assert_eq!(status, 422);
    assert_eq!(error_fields(&body), vec!["path"]);
}

// ---------------------------------------------------------------------------
// Test: updates
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn empty_update_returns_record_unchanged() {
    let app = test_app!(test_state().await);

    let (_, created) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brazil", "code": "BR"}))
            .to_request(),
    )
    .await;
    let uri = format!("/country/{}", created["id"]);

    let (status, updated) = send(&app, TestRequest::put().uri(&uri).set_json(json!({})).to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(updated, created);

    let (status, updated) = send(
        &app,
        TestRequest::patch()
            .uri(&uri)
            .set_json(json!({"name": null, "code": "br"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated, created);
}

#[actix_web::test]
async fn partial_update_changes_only_given_fields() {
    let app = test_app!(test_state().await);

    let (_, created) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brasil", "code": "BR"}))
            .to_request(),
    )
    .await;
    let uri = format!("/country/{}", created["id"]);

    let (status, updated) = send(
        &app,
        TestRequest::patch()
            .uri(&uri)
            .set_json(json!({"name": "brazil"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["name"], "Brazil");
    assert_eq!(updated["code"], "BR");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);

    let (_, fetched) = send(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(fetched, updated);
}

#[actix_web::test]
async fn update_to_taken_code_is_409_and_unknown_id_is_404() {
    let app = test_app!(test_state().await);

    for (name, code) in [("Brazil", "BR"), ("Argentina", "AR")] {
        send(
            &app,
            TestRequest::post()
                .uri("/country")
                .set_json(json!({"name": name, "code": code}))
                .to_request(),
        )
        .await;
    }

    let (status, _) = send(
        &app,
        TestRequest::put()
            .uri("/country/2")
            .set_json(json!({"code": "BR"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 409);

    let (status, _) = send(
        &app,
        TestRequest::put()
            .uri("/country/999")
            .set_json(json!({"name": "Chile"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 404);
}

// ---------------------------------------------------------------------------
// Test: deletes
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn second_delete_is_404() {
    let app = test_app!(test_state().await);

    let (_, created) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brazil", "code": "BR"}))
            .to_request(),
    )
    .await;
    let uri = format!("/country/{}", created["id"]);

    let (status, _) = send(&app, TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(status, 204);
    let (status, body) = send(&app, TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(status, 404);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn country_with_states_cannot_be_deleted() {
    let app = test_app!(test_state().await);

    let (_, country) = send(
        &app,
        TestRequest::post()
            .uri("/country")
            .set_json(json!({"name": "Brazil", "code": "BR"}))
            .to_request(),
    )
    .await;
    let (status, _) = send(
        &app,
        TestRequest::post()
            .uri("/state")
            .set_json(json!({"country_id": country["id"], "name": "Bahia", "code": "BA"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, 201);

    let (status, body) = send(
        &app,
        TestRequest::delete()
            .uri(&format!("/country/{}", country["id"]))
            .to_request(),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(body["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Test: listing and paging
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn list_is_ordered_and_paged() {
    let app = test_app!(common::test_state_with_max_page(2).await);

    for (name, code) in [("Brazil", "BR"), ("Argentina", "AR"), ("Chile", "CL")] {
        send(
            &app,
            TestRequest::post()
                .uri("/country")
                .set_json(json!({"name": name, "code": code}))
                .to_request(),
        )
        .await;
    }

    let (status, page) = send(&app, TestRequest::get().uri("/country?skip=1&limit=2").to_request()).await;
    assert_eq!(status, 200);
    let codes: Vec<_> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["AR", "CL"]);

    let (status, page) = send(&app, TestRequest::get().uri("/country?skip=10").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(page, json!([]));

    let (status, body) = send(&app, TestRequest::get().uri("/country?limit=3").to_request()).await;
    assert_eq!(status, 422);
    assert_eq!(error_fields(&body), vec!["limit"]);

    let (status, body) = send(&app, TestRequest::get().uri("/country?skip=-1").to_request()).await;
    assert_eq!(status, 422);
    assert_eq!(error_fields(&body), vec!["query"]);
}

// ---------------------------------------------------------------------------
// Test: health and request ids
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn health_reports_database_up() {
    let app = test_app!(test_state().await);

    let resp = actix_web::test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body, json!({"status": "ok", "database": "up"}));
}

#[actix_web::test]
async fn closed_pool_answers_with_generic_errors() {
    let state = test_state().await;
    let db = state.db.clone();
    let app = test_app!(state);
    db.close().await.unwrap();

    let (status, body) = send(&app, TestRequest::get().uri("/country").to_request()).await;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({"code": "DB_UNAVAILABLE", "message": "Database is unavailable"})
    );

    let (status, body) = send(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(status, 503);
    assert_eq!(body, json!({"status": "degraded", "database": "down"}));
}
