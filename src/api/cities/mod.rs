pub mod functions;
pub mod handlers;
pub mod structures;

pub use functions::CityService;
pub use handlers::{
    __path_create_city, __path_delete_city, __path_get_city, __path_list_cities,
    __path_list_cities_by_state, __path_patch_city, __path_update_city, create_city, delete_city,
    get_city, init_routes, list_cities, list_cities_by_state, patch_city, update_city,
};
pub use structures::{CityFilter, CityListQuery, CityResponse, CreateCity, UpdateCity};
