//! Typed request bodies validated against their schema before reaching a handler.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::{AppError, FieldError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => value
                .as_i64()
                .is_some_and(|n| i32::try_from(n).is_ok()),
        }
    }

    fn expected(self) -> &'static str {
        match self {
            FieldKind::Text => "expected a string",
            FieldKind::Integer => "expected an integer",
        }
    }
}

/// Describes one field accepted by an input schema.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: true }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, required: false }
    }
}

/// A create or update payload.
///
/// `FIELDS` is the introspectable shape of the payload; `normalized` and
/// `validate` apply the value rules once the shape is known to be right.
pub trait InputSchema: DeserializeOwned + Sized {
    const FIELDS: &'static [FieldSpec];

    fn normalized(self) -> Self;

    fn validate(&self) -> Vec<FieldError>;

    /// Normalizes and validates a value built in code rather than parsed from JSON.
    fn prepare(self) -> Result<Self, AppError> {
        let value = self.normalized();
        let errors = value.validate();
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(errors))
        }
    }

    fn from_json(value: Value) -> Result<Self, AppError> {
        let object = check_shape(value, Self::FIELDS).map_err(AppError::Validation)?;
        let parsed: Self = serde_json::from_value(Value::Object(object))
            .map_err(|e| AppError::invalid("body", e.to_string()))?;
        parsed.prepare()
    }
}

/// Checks presence, unknown keys and JSON types. Reports every offending field.
fn check_shape(value: Value, fields: &[FieldSpec]) -> Result<Map<String, Value>, Vec<FieldError>> {
    let object = match value {
        Value::Object(object) => object,
        _ => return Err(vec![FieldError::new("body", "expected a JSON object")]),
    };

    let mut errors = Vec::new();

    for key in object.keys() {
        if !fields.iter().any(|f| f.name == key.as_str()) {
            errors.push(FieldError::new(key.as_str(), "unknown field"));
        }
    }

    for entry in fields {
        match object.get(entry.name) {
            None | Some(Value::Null) => {
                if entry.required {
                    errors.push(FieldError::new(entry.name, "field required"));
                }
            }
            Some(v) if !entry.kind.accepts(v) => {
                errors.push(FieldError::new(entry.name, entry.kind.expected()));
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(object)
    } else {
        Err(errors)
    }
}

/// JSON body extractor that rejects malformed payloads with a 422.
pub struct ValidJson<T>(pub T);

impl<T> ValidJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for ValidJson<T>
where
    T: InputSchema + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let web::Json(value) = body
                .await
                .map_err(|e| AppError::invalid("body", e.to_string()))?;
            T::from_json(value).map(ValidJson)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        label: String,
        parent_id: Option<i32>,
    }

    impl InputSchema for Probe {
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::required("label", FieldKind::Text),
            FieldSpec::optional("parent_id", FieldKind::Integer),
        ];

        fn normalized(mut self) -> Self {
            self.label = self.label.trim().to_string();
            self
        }

        fn validate(&self) -> Vec<FieldError> {
            if self.label.is_empty() {
                vec![FieldError::new("label", "must not be blank")]
            } else {
                Vec::new()
            }
        }
    }

    fn fields_of(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_well_formed_payload() {
        let probe = Probe::from_json(json!({"label": " x ", "parent_id": 4})).unwrap();
        assert_eq!(probe.label, "x");
        assert_eq!(probe.parent_id, Some(4));
    }

    #[test]
    fn null_optional_is_absent() {
        let probe = Probe::from_json(json!({"label": "x", "parent_id": null})).unwrap();
        assert_eq!(probe.parent_id, None);
    }

    #[test]
    fn names_every_offending_field() {
        let err = Probe::from_json(json!({"parent_id": "seven", "colour": "red"})).unwrap_err();
        assert_eq!(fields_of(err), vec!["colour", "label", "parent_id"]);
    }

    #[test]
    fn rejects_out_of_range_integers_and_non_objects() {
        let err = Probe::from_json(json!({"label": "x", "parent_id": 5_000_000_000i64})).unwrap_err();
        assert_eq!(fields_of(err), vec!["parent_id"]);

        let err = Probe::from_json(json!(["label"])).unwrap_err();
        assert_eq!(fields_of(err), vec!["body"]);
    }

    #[test]
    fn value_rules_run_after_normalization() {
        let err = Probe::from_json(json!({"label": "   "})).unwrap_err();
        assert_eq!(fields_of(err), vec!["label"]);
    }
}
