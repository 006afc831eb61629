pub mod functions;
pub mod handlers;
pub mod structures;

pub use functions::StateService;
pub use handlers::{
    __path_create_state, __path_delete_state, __path_get_state, __path_list_states,
    __path_list_states_by_country, __path_patch_state, __path_update_state, create_state,
    delete_state, get_state, init_routes, list_states, list_states_by_country, patch_state,
    update_state,
};
pub use structures::{CreateState, StateFilter, StateListQuery, StateResponse, UpdateState};
