pub mod crud;

pub use crud::{CrudService, Pagination};

use chrono::{SubsecRound, Utc};
use sea_orm::prelude::DateTimeUtc;

/// Current time at whole-second precision, the resolution MySQL timestamps keep.
pub fn now() -> DateTimeUtc {
    Utc::now().trunc_subsecs(0)
}
