use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::{
        extract::{FieldKind, FieldSpec, InputSchema},
        states::StateResponse,
        validation::{normalize_name, normalize_optional_code, FieldErrors},
    },
    database::models::city,
    errors::FieldError,
};

/// Cities accept one-letter codes, unlike countries and states.
pub const CITY_CODE_MIN_LEN: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCity {
    #[schema(example = 1, minimum = 1)]
    pub state_id: i32,
    #[schema(example = "Porto Alegre", min_length = 2, max_length = 255)]
    pub name: String,
    /// Optional. A blank code is stored as absent.
    #[serde(default)]
    #[schema(example = "POA", max_length = 10)]
    pub code: Option<String>,
}

impl InputSchema for CreateCity {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("state_id", FieldKind::Integer),
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::optional("code", FieldKind::Text),
    ];

    fn normalized(self) -> Self {
        Self {
            state_id: self.state_id,
            name: normalize_name(&self.name),
            code: normalize_optional_code(self.code.as_deref()),
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
        errors.check_id("state_id", self.state_id);
        errors.check_name("name", &self.name);
        if let Some(code) = &self.code {
            errors.check_code("code", code, CITY_CODE_MIN_LEN);
        }
        errors.into_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCity {
    #[serde(default)]
    #[schema(example = 1, minimum = 1)]
    pub state_id: Option<i32>,
    #[serde(default)]
    #[schema(example = "Porto Alegre", min_length = 2, max_length = 255)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "POA", max_length = 10)]
    pub code: Option<String>,
}

impl UpdateCity {
    pub fn is_noop(&self, current: &city::Model) -> bool {
        self.state_id.is_none_or(|id| id == current.state_id)
            && self.name.as_ref().is_none_or(|name| *name == current.name)
            && self
                .code
                .as_ref()
                .is_none_or(|code| current.code.as_ref() == Some(code))
    }
}

impl InputSchema for UpdateCity {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("state_id", FieldKind::Integer),
        FieldSpec::optional("name", FieldKind::Text),
        FieldSpec::optional("code", FieldKind::Text),
    ];

    fn normalized(self) -> Self {
        Self {
            state_id: self.state_id,
            name: self.name.as_deref().map(normalize_name),
            code: normalize_optional_code(self.code.as_deref()),
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
        if let Some(id) = self.state_id {
            errors.check_id("state_id", id);
        }
        if let Some(name) = &self.name {
            errors.check_name("name", name);
        }
        if let Some(code) = &self.code {
            errors.check_code("code", code, CITY_CODE_MIN_LEN);
        }
        errors.into_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub state_id: i32,
    #[schema(example = "Porto Alegre")]
    pub name: String,
    #[schema(example = "POA")]
    pub code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: Option<StateResponse>,
}

impl CityResponse {
    pub fn from_parts(model: city::Model, state: Option<StateResponse>) -> Self {
        Self {
            id: model.id,
            state_id: model.state_id,
            name: model.name,
            code: model.code,
            created_at: model.created_at,
            updated_at: model.updated_at,
            state,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CityListQuery {
    /// Only cities of this state.
    pub state_id: Option<i32>,
    /// Records to skip. Default 0.
    pub skip: Option<u64>,
    /// Maximum records to return. Default 100.
    pub limit: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CityFilter {
    pub state_id: Option<i32>,
}
