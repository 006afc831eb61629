use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    api::extract::ValidJson,
    app_state::AppState,
    errors::{AppError, ErrorResponse},
    services::CrudService,
};

use super::functions::CountryService;
use super::structures::{CountryResponse, CreateCountry, PageQuery, UpdateCountry};

#[utoipa::path(
    get,
    path = "/country",
    tag = "Countries",
    params(PageQuery),
    responses(
        (status = 200, description = "Countries ordered by id", body = Vec<CountryResponse>),
        (status = 422, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
#[get("")]
pub async fn list_countries(
    app_state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = app_state.page(query.skip, query.limit)?;
    let countries = CountryService::new(&app_state.db).list((), page).await?;
    Ok(HttpResponse::Ok().json(countries))
}

#[utoipa::path(
    get,
    path = "/country/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    responses(
        (status = 200, description = "Country found", body = CountryResponse),
        (status = 404, description = "Country not found", body = ErrorResponse)
    )
)]
#[get("/{id}")]
pub async fn get_country(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let country = CountryService::new(&app_state.db).get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(country))
}

#[utoipa::path(
    post,
    path = "/country",
    tag = "Countries",
    request_body = CreateCountry,
    responses(
        (status = 201, description = "Country created", body = CountryResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ErrorResponse)
    )
)]
#[post("")]
pub async fn create_country(
    app_state: web::Data<AppState>,
    body: ValidJson<CreateCountry>,
) -> Result<HttpResponse, AppError> {
    let country = CountryService::new(&app_state.db)
        .create(body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(country))
}

#[utoipa::path(
    put,
    path = "/country/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    request_body = UpdateCountry,
    responses(
        (status = 200, description = "Country updated", body = CountryResponse),
        (status = 404, description = "Country not found", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ErrorResponse)
    )
)]
#[put("/{id}")]
pub async fn update_country(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: ValidJson<UpdateCountry>,
) -> Result<HttpResponse, AppError> {
    apply_update(&app_state, path.into_inner(), body.into_inner()).await
}

#[utoipa::path(
    patch,
    path = "/country/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    request_body = UpdateCountry,
    responses(
        (status = 200, description = "Country updated", body = CountryResponse),
        (status = 404, description = "Country not found", body = ErrorResponse),
        (status = 409, description = "Code already in use", body = ErrorResponse),
        (status = 422, description = "Invalid payload", body = ErrorResponse)
    )
)]
#[patch("/{id}")]
pub async fn patch_country(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
    body: ValidJson<UpdateCountry>,
) -> Result<HttpResponse, AppError> {
    apply_update(&app_state, path.into_inner(), body.into_inner()).await
}

async fn apply_update(
    app_state: &AppState,
    id: i32,
    input: UpdateCountry,
) -> Result<HttpResponse, AppError> {
    let country = CountryService::new(&app_state.db).update(id, input).await?;
    Ok(HttpResponse::Ok().json(country))
}

#[utoipa::path(
    delete,
    path = "/country/{id}",
    tag = "Countries",
    params(("id" = i32, Path, description = "Country ID")),
    responses(
        (status = 204, description = "Country deleted"),
        (status = 404, description = "Country not found", body = ErrorResponse),
        (status = 409, description = "Country still has states", body = ErrorResponse)
    )
)]
#[delete("/{id}")]
pub async fn delete_country(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    CountryService::new(&app_state.db)
        .delete(path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/country")
            .service(list_countries)
            .service(create_country)
            .service(get_country)
            .service(update_country)
            .service(patch_country)
            .service(delete_country),
    );
}
