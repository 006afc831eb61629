use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::{
        countries::CountryResponse,
        extract::{FieldKind, FieldSpec, InputSchema},
        validation::{normalize_code, normalize_name, FieldErrors, CODE_MIN_LEN},
    },
    database::models::{country, state},
    errors::FieldError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateState {
    #[schema(example = 1, minimum = 1)]
    pub country_id: i32,
    #[schema(example = "Rio Grande Do Sul", min_length = 2, max_length = 255)]
    pub name: String,
    /// Unique within the owning country.
    #[schema(example = "RS", min_length = 2, max_length = 10)]
    pub code: String,
}

impl InputSchema for CreateState {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("country_id", FieldKind::Integer),
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("code", FieldKind::Text),
    ];

    fn normalized(self) -> Self {
        Self {
            country_id: self.country_id,
            name: normalize_name(&self.name),
            code: normalize_code(&self.code),
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
        errors.check_id("country_id", self.country_id);
        errors.check_name("name", &self.name);
        errors.check_code("code", &self.code, CODE_MIN_LEN);
        errors.into_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateState {
    #[serde(default)]
    #[schema(example = 1, minimum = 1)]
    pub country_id: Option<i32>,
    #[serde(default)]
    #[schema(example = "Rio Grande Do Sul", min_length = 2, max_length = 255)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "RS", min_length = 2, max_length = 10)]
    pub code: Option<String>,
}

impl UpdateState {
    pub fn is_noop(&self, current: &state::Model) -> bool {
        self.country_id.is_none_or(|id| id == current.country_id)
            && self.name.as_ref().is_none_or(|name| *name == current.name)
            && self.code.as_ref().is_none_or(|code| *code == current.code)
    }
}

impl InputSchema for UpdateState {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("country_id", FieldKind::Integer),
        FieldSpec::optional("name", FieldKind::Text),
        FieldSpec::optional("code", FieldKind::Text),
    ];

    fn normalized(self) -> Self {
        Self {
            country_id: self.country_id,
            name: self.name.as_deref().map(normalize_name),
            code: self.code.as_deref().map(normalize_code),
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
        if let Some(id) = self.country_id {
            errors.check_id("country_id", id);
        }
        if let Some(name) = &self.name {
            errors.check_name("name", name);
        }
        if let Some(code) = &self.code {
            errors.check_code("code", code, CODE_MIN_LEN);
        }
        errors.into_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StateResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub country_id: i32,
    #[schema(example = "Rio Grande Do Sul")]
    pub name: String,
    #[schema(example = "RS")]
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub country: Option<CountryResponse>,
}

impl StateResponse {
    pub fn from_parts(model: state::Model, country: Option<country::Model>) -> Self {
        Self {
            id: model.id,
            country_id: model.country_id,
            name: model.name,
            code: model.code,
            created_at: model.created_at,
            updated_at: model.updated_at,
            country: country.map(CountryResponse::from),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StateListQuery {
    /// Only states of this country.
    pub country_id: Option<i32>,
    /// Records to skip. Default 0.
    pub skip: Option<u64>,
    /// Maximum records to return. Default 100.
    pub limit: Option<u64>,
}

/// Optional parent filter for state listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateFilter {
    pub country_id: Option<i32>,
}
