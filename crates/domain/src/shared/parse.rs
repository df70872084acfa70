use std::str::FromStr;
use thiserror::Error;

/// Returned by the `FromStr` implementations of the domain enums when the
/// given string does not name any variant.
#[derive(Error, Debug, PartialEq)]
#[error("Invalid {kind} value: `{value}`")]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidEnumValue {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Lenient enum parsing used at the system edges.
///
/// Missing, blank or unparseable values are replaced by `default`, the
/// parse error never reaches the caller.
pub fn parse_enum_or<T: FromStr>(value: Option<&str>, default: T) -> T {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.parse().unwrap_or(default),
        _ => default,
    }
}

/// Like `parse_enum_or` but without a fallback. Unparseable values are
/// dropped from the result.
pub fn parse_enums<T: FromStr, S: AsRef<str>>(values: &[S]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| value.as_ref().trim().parse().ok())
        .collect()
}
