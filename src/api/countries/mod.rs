pub mod functions;
pub mod handlers;
pub mod structures;

pub use functions::CountryService;
pub use handlers::{
    __path_create_country, __path_delete_country, __path_get_country, __path_list_countries,
    __path_patch_country, __path_update_country, create_country, delete_country, get_country,
    init_routes, list_countries, patch_country, update_country,
};
pub use structures::{CountryResponse, CreateCountry, PageQuery, UpdateCountry};
