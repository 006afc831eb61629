use actix_cors::Cors;
use actix_web::{
    middleware::{self, TrailingSlash},
    web, App, HttpServer,
};
use dotenvy::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use locality::api::{self, middleware::RequestId, openapi::ApiDoc};
use locality::config::{Config, ServerConfig};
use locality::database::{schema, ConnectionManager};
use locality::AppState;

fn build_cors(server: &ServerConfig) -> Cors {
    let origins = server.allowed_origins();
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    let db = ConnectionManager::connect(&config.database)
        .await
        .map_err(|e| {
            log::error!("{}", e);
            std::io::Error::other(e.to_string())
        })?;

    if config.server.create_schema {
        schema::create_tables(db.connection())
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
    }

    let app_state = AppState::new(db, config.server.max_page_size);
    let server = config.server.clone();
    let host = server.host.clone();
    let port = server.port;
    let workers = server.effective_workers();

    log::info!("Starting server at http://{}:{} with {} workers", host, port, workers);
    log::info!("Swagger UI available at http://{}:{}/docs/", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::new(TrailingSlash::MergeOnly))
            .wrap(build_cors(&server))
            .wrap(RequestId)
            .app_data(web::Data::new(app_state.clone()))
            .configure(api::configure)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/openapi.json", ApiDoc::openapi()))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
