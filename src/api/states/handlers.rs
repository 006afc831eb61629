use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    api::{countries::PageQuery, extract::ValidJson},
    app_state::AppState,
    errors::{AppError, ErrorResponse},
    services::CrudService,
};

use super::functions::StateService;
use super::structures::{CreateState, StateFilter, StateListQuery, StateResponse, UpdateState};

#[utoipa::path(
    get,
    path = "/state",
    tag = "States",
    params(StateListQuery),
    responses(
        (status = 200, description = "States ordered by id, each with its country", body = Vec<StateResponse>),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
#[get("")]
pub async fn list_states(
    app_state: web::Data<AppState>,
    query: web::Query<StateListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = app_state.page(query.skip, query.limit)?;
    let filter = StateFilter {
        country_id: query.country_id,
    };
    let states = StateService::new(&app_state.db).list(filter, page).await?;
    Ok(HttpResponse::Ok().json(states))
}

#[utoipa::path(
    get,
    path = "/state/country/{country_id}",
    tag = "States",
    params(
        ("country_id" = i32, Path, description = "Country ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "States of the country; empty when it has none", body = Vec<StateResponse>),
        (status = 422, description = "Invalid path or query parameters", body = ErrorResponse)
    )
)]
#[get("/country/{country_id}")]
pub async fn list_states_by_country(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = app_state.page(query.skip, query.limit)?;
    let filter = StateFilter {
        country_id: Some(path.into_inner()),
    };
    let states = StateService::new(&app_state.db).list(filter, page).await?;
    Ok(HttpResponse::Ok().json(states))
}

#[utoipa::path(
    get,
    path = "/state/{id}",
    tag = "States",
    params(("id" = i32, Path, description = "State ID")),
    responses(
        (status = 200, description = "State found", body = StateResponse),
        (status = 404, description = "State not found", body = ErrorResponse)
    )
)]
#[get("/{id}")]
pub async fn get_state(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let state = StateService::new(&app_state.db).get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    post,
    path = "/state",
    tag = "States",
    request_body = CreateState,
    responses(
        (status = 201, description = "State created", body = StateResponse),
        (status = 409, description = "Name or code already used in the country", body = ErrorResponse),
        (status = 422, description = "Invalid payload or unknown country", body = ErrorResponse)
    )
)]
#[post("")]
pub async fn create_state(
    app_state: web::Data<AppState>,
    body: ValidJson<CreateState>,
) -> Result<HttpResponse, AppError> {
    let state = StateService::new(&app_state.db)
        .create(body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(state))
}

#[utoipa::path(
    put,
    path = "/state/{id}",
    tag = "States",
    params(("id" = i32, Path, description = "State ID")),
    request_body = UpdateState,
    responses(
        (status = 200, description = "State updated", body = StateResponse),
        (status = 404, description = "State not found", body = ErrorResponse),
        (status = 409, description = "Name or code already used in the country", body = ErrorResponse),
        (status = 422, description = "Invalid payload or unknown country", body = ErrorResponse)
    )
)]
#[put("/{id}")]
pub async fn update_state(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: ValidJson<UpdateState>,
) -> Result<HttpResponse, AppError> {
    let state = StateService::new(&app_state.db)
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    patch,
    path = "/state/{id}",
    tag = "States",
    params(("id" = i32, Path, description = "State ID")),
    request_body = UpdateState,
    responses(
        (status = 200, description = "State updated", body = StateResponse),
        (status = 404, description = "State not found", body = ErrorResponse),
        (status = 409, description = "Name or code already used in the country", body = ErrorResponse),
        (status = 422, description = "Invalid payload or unknown country", body = ErrorResponse)
    )
)]
#[patch("/{id}")]
pub async fn patch_state(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: ValidJson<UpdateState>,
) -> Result<HttpResponse, AppError> {
    let state = StateService::new(&app_state.db)
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(state))
}

#[utoipa::path(
    delete,
    path = "/state/{id}",
    tag = "States",
    params(("id" = i32, Path, description = "State ID")),
    responses(
        (status = 204, description = "State deleted"),
        (status = 404, description = "State not found", body = ErrorResponse),
        (status = 409, description = "State still has cities", body = ErrorResponse)
    )
)]
#[delete("/{id}")]
pub async fn delete_state(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    StateService::new(&app_state.db)
        .delete(path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/state")
            .service(list_states)
            .service(create_state)
            .service(list_states_by_country)
            .service(get_state)
            .service(update_state)
            .service(patch_state)
            .service(delete_state),
    );
}
