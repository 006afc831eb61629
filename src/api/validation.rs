//! Field normalization and validation rules shared by the input schemas.

use regex::Regex;

use crate::errors::FieldError;

lazy_static::lazy_static! {
    static ref CODE_RE: Regex = Regex::new(r"^[A-Z0-9-]+$").unwrap();
}

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 255;
pub const CODE_MIN_LEN: usize = 2;
pub const CODE_MAX_LEN: usize = 10;

/// Upper-cases the first letter of every word and lower-cases the rest.
/// A word starts at any letter not preceded by another letter.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

pub fn normalize_name(value: &str) -> String {
    title_case(value.trim())
}

pub fn normalize_code(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Optional codes collapse to `None` when blank.
pub fn normalize_optional_code(value: Option<&str>) -> Option<String> {
    value.map(normalize_code).filter(|code| !code.is_empty())
}

/// Collects field errors so a payload reports every problem at once.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn check_name(&mut self, field: &str, value: &str) {
        let len = value.chars().count();
        if len < NAME_MIN_LEN {
            self.push(field, format!("must be at least {} characters", NAME_MIN_LEN));
        } else if len > NAME_MAX_LEN {
            self.push(field, format!("must be at most {} characters", NAME_MAX_LEN));
        }
    }

    pub fn check_code(&mut self, field: &str, value: &str, min_len: usize) {
        let len = value.chars().count();
        if len < min_len {
            self.push(field, format!("must be at least {} characters", min_len));
        } else if len > CODE_MAX_LEN {
            self.push(field, format!("must be at most {} characters", CODE_MAX_LEN));
        } else if !CODE_RE.is_match(value) {
            self.push(field, "may only contain letters, digits and '-'");
        }
    }

    pub fn check_id(&mut self, field: &str, value: i32) {
        if value <= 0 {
            self.push(field, "must be greater than 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_each_word() {
        assert_eq!(normalize_name("  rio grande do sul "), "Rio Grande Do Sul");
        assert_eq!(normalize_name("SÃO PAULO"), "São Paulo");
        assert_eq!(title_case("d'oeste"), "D'Oeste");
        assert_eq!(title_case("3rd district"), "3Rd District");
    }

    #[test]
    fn codes_are_trimmed_and_upper_cased() {
        assert_eq!(normalize_code(" br "), "BR");
        assert_eq!(normalize_optional_code(Some("  ")), None);
        assert_eq!(normalize_optional_code(Some("poa")), Some("POA".to_string()));
        assert_eq!(normalize_optional_code(None), None);
    }

    #[test]
    fn collects_every_problem() {
        let mut errors = FieldErrors::default();
        errors.check_name("name", "B");
        errors.check_code("code", "TOOLONGCODE1", CODE_MIN_LEN);
        errors.check_id("country_id", 0);

        let fields: Vec<_> = errors.into_vec().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "code", "country_id"]);
    }

    #[test]
    fn code_alphabet_is_restricted() {
        let mut errors = FieldErrors::default();
        errors.check_code("code", "B R", CODE_MIN_LEN);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::default();
        errors.check_code("code", "BR-SP", CODE_MIN_LEN);
        assert!(errors.is_empty());
    }
}
