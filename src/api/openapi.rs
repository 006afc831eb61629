use utoipa::OpenApi;

use crate::api::{cities, countries, health, states};
use crate::errors::{ErrorResponse, FieldError};

#[derive(OpenApi)]
#[openapi(
    info(title = "Locality API", description = "Countries, states and cities registry"),
    paths(
        // Countries
        countries::list_countries,
        countries::get_country,
        countries::create_country,
        countries::update_country,
        countries::patch_country,
        countries::delete_country,
        // States
        states::list_states,
        states::list_states_by_country,
        states::get_state,
        states::create_state,
        states::update_state,
        states::patch_state,
        states::delete_state,
        // Cities
        cities::list_cities,
        cities::list_cities_by_state,
        cities::get_city,
        cities::create_city,
        cities::update_city,
        cities::patch_city,
        cities::delete_city,
        // Health
        health::health,
    ),
    components(
        schemas(
            countries::CreateCountry,
            countries::UpdateCountry,
            countries::CountryResponse,
            states::CreateState,
            states::UpdateState,
            states::StateResponse,
            cities::CreateCity,
            cities::UpdateCity,
            cities::CityResponse,
            health::HealthResponse,
            ErrorResponse,
            FieldError,
        )
    ),
    tags(
        (name = "Countries", description = "Country registry"),
        (name = "States", description = "States, each owned by a country"),
        (name = "Cities", description = "Cities, each owned by a state"),
        (name = "Health", description = "Liveness and database reachability")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/country",
            "/country/{id}",
            "/state",
            "/state/{id}",
            "/state/country/{country_id}",
            "/city",
            "/city/{id}",
            "/city/state/{state_id}",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
