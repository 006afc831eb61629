use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::{
        extract::{FieldKind, FieldSpec, InputSchema},
        validation::{normalize_code, normalize_name, FieldErrors, CODE_MIN_LEN},
    },
    database::models::country,
    errors::FieldError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCountry {
    /// Country name. Trimmed and title-cased.
    #[schema(example = "Brazil", min_length = 2, max_length = 255)]
    pub name: String,
    /// Country code, unique across countries. Trimmed and upper-cased.
    #[schema(example = "BR", min_length = 2, max_length = 10)]
    pub code: String,
}

impl InputSchema for CreateCountry {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::Text),
        FieldSpec::required("code", FieldKind::Text),
    ];

    fn normalized(self) -> Self {
        Self {
            name: normalize_name(&self.name),
            code: normalize_code(&self.code),
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
        errors.check_name("name", &self.name);
        errors.check_code("code", &self.code, CODE_MIN_LEN);
        errors.into_vec()
    }
}

/// Partial update; absent or null fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCountry {
    #[serde(default)]
    #[schema(example = "Brazil", min_length = 2, max_length = 255)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "BR", min_length = 2, max_length = 10)]
    pub code: Option<String>,
}

impl UpdateCountry {
    /// True when applying the update would leave `current` untouched.
    pub fn is_noop(&self, current: &country::Model) -> bool {
        self.name.as_ref().is_none_or(|name| *name == current.name)
            && self.code.as_ref().is_none_or(|code| *code == current.code)
    }
}

impl InputSchema for UpdateCountry {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("name", FieldKind::Text),
        FieldSpec::optional("code", FieldKind::Text),
    ];

    fn normalized(self) -> Self {
        Self {
            name: self.name.as_deref().map(normalize_name),
            code: self.code.as_deref().map(normalize_code),
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = FieldErrors::default();
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
pub struct CountryResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Brazil")]
    pub name: String,
    #[schema(example = "BR")]
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<country::Model> for CountryResponse {
    fn from(model: country::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Records to skip. Default 0.
    pub skip: Option<u64>,
    /// Maximum records to return. Default 100.
    pub limit: Option<u64>,
}
