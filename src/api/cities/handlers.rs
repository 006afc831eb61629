use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    api::{countries::PageQuery, extract::ValidJson},
    app_state::AppState,
    errors::{AppError, ErrorResponse},
    services::CrudService,
};

use super::functions::CityService;
use super::structures::{CityFilter, CityListQuery, CityResponse, CreateCity, UpdateCity};

#[utoipa::path(
    get,
    path = "/city",
    tag = "Cities",
    params(CityListQuery),
    responses(
        (status = 200, description = "Cities ordered by id, each with its state and country", body = Vec<CityResponse>),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse)
    )
)]
#[get("")]
pub async fn list_cities(
    app_state: web::Data<AppState>,
    query: web::Query<CityListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = app_state.page(query.skip, query.limit)?;
    let filter = CityFilter {
        state_id: query.state_id,
    };
    let cities = CityService::new(&app_state.db).list(filter, page).await?;
    Ok(HttpResponse::Ok().json(cities))
}

#[utoipa::path(
    get,
    path = "/city/state/{state_id}",
    tag = "Cities",
    params(
        ("state_id" = i32, Path, description = "State ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Cities of the state; empty when it has none", body = Vec<CityResponse>),
        (status = 422, description = "Invalid path or query parameters", body = ErrorResponse)
    )
)]
#[get("/state/{state_id}")]
pub async fn list_cities_by_state(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = app_state.page(query.skip, query.limit)?;
    let filter = CityFilter {
        state_id: Some(path.into_inner()),
    };
    let cities = CityService::new(&app_state.db).list(filter, page).await?;
    Ok(HttpResponse::Ok().json(cities))
}

#[utoipa::path(
    get,
    path = "/city/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    responses(
        (status = 200, description = "City found", body = CityResponse),
        (status = 404, description = "City not found", body = ErrorResponse)
    )
)]
#[get("/{id}")]
pub async fn get_city(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let city = CityService::new(&app_state.db).get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(city))
}

#[utoipa::path(
    post,
    path = "/city",
    tag = "Cities",
    request_body = CreateCity,
    responses(
        (status = 201, description = "City created", body = CityResponse),
        (status = 409, description = "Name or code already used in the state", body = ErrorResponse),
        (status = 422, description = "Invalid payload or unknown state", body = ErrorResponse)
    )
)]
#[post("")]
pub async fn create_city(
    app_state: web::Data<AppState>,
    body: ValidJson<CreateCity>,
) -> Result<HttpResponse, AppError> {
    let city = CityService::new(&app_state.db)
        .create(body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(city))
}

#[utoipa::path(
    put,
    path = "/city/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    request_body = UpdateCity,
    responses(
        (status = 200, description = "City updated", body = CityResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 409, description = "Name or code already used in the state", body = ErrorResponse),
        (status = 422, description = "Invalid payload or unknown state", body = ErrorResponse)
    )
)]
#[put("/{id}")]
pub async fn update_city(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: ValidJson<UpdateCity>,
) -> Result<HttpResponse, AppError> {
    let city = CityService::new(&app_state.db)
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(city))
}

#[utoipa::path(
    patch,
    path = "/city/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    request_body = UpdateCity,
    responses(
        (status = 200, description = "City updated", body = CityResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 409, description = "Name or code already used in the state", body = ErrorResponse),
        (status = 422, description = "Invalid payload or unknown state", body = ErrorResponse)
    )
)]
#[patch("/{id}")]
pub async fn patch_city(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: ValidJson<UpdateCity>,
) -> Result<HttpResponse, AppError> {
    let city = CityService::new(&app_state.db)
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(city))
}

#[utoipa::path(
    delete,
    path = "/city/{id}",
    tag = "Cities",
    params(("id" = i32, Path, description = "City ID")),
    responses(
        (status = 204, description = "City deleted"),
        (status = 404, description = "City not found", body = ErrorResponse)
    )
)]
#[delete("/{id}")]
pub async fn delete_city(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    CityService::new(&app_state.db)
        .delete(path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/city")
            .service(list_cities)
            .service(create_city)
            .service(list_cities_by_state)
            .service(get_city)
            .service(update_city)
            .service(patch_city)
            .service(delete_city),
    );
}
