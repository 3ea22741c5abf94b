use std::num::IntErrorKind;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use crate::pagination::PageRequest;

pub(crate) mod donation;
pub(crate) mod food_item;
pub(crate) mod user;

#[cfg(test)]
pub(crate) mod test_utils;

pub(crate) use donation::*;
pub(crate) use food_item::*;
pub(crate) use user::*;

pub(crate) const WELCOME_MESSAGE: &str = "Welcome to the Food Waste Reduction App!";

/// Handler for `GET /`
pub(crate) async fn home() -> &'static str {
    WELCOME_MESSAGE
}

/// A record that is built from a JSON body whose fields are all required.
pub(crate) trait FromInput: Sized {
    /// The body as sent, every field optional so that absent ones can be reported.
    type Input: DeserializeOwned + Validate + Default + Send;

    /// Required fields in the order they are reported.
    const FIELDS: &'static [&'static str];

    /// `None` if any required field is absent.
    fn from_input(input: Self::Input) -> Option<Self>;
}

/// A record built from a JSON body with every required field present.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ValidatedJson<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: FromInput,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;

        let body = parse_object(&bytes)?;
        let absent = absent_fields(&body, T::FIELDS);
        if !absent.is_empty() {
            return Err(ApiError::MissingFields(absent));
        }

        let input: T::Input = serde_json::from_value(Value::Object(body))
            .map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        input
            .validate()
            .map_err(|errors| ApiError::MissingFields(failed_fields(&errors, T::FIELDS)))?;

        T::from_input(input)
            .map(ValidatedJson)
            .ok_or_else(|| ApiError::MissingFields(T::FIELDS.to_vec()))
    }
}

/// A `null` body stands for an object with nothing in it.
fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;

    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(body) => Ok(body),
        other => Err(ApiError::MalformedBody(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

/// Declared keys that are absent from `body` or `null`, checked before any value is typed.
fn absent_fields(body: &Map<String, Value>, declared: &[&'static str]) -> Vec<&'static str> {
    declared
        .iter()
        .copied()
        .filter(|field| body.get(*field).map_or(true, Value::is_null))
        .collect()
}

fn failed_fields(errors: &ValidationErrors, declared: &[&'static str]) -> Vec<&'static str> {
    let failed = errors.field_errors();
    declared
        .iter()
        .copied()
        .filter(|field| failed.contains_key(field))
        .collect()
}

/// Body of a successful `POST`.
#[derive(Debug, Serialize)]
pub(crate) struct Created {
    pub(crate) message: &'static str,
}

pub(crate) fn created(message: &'static str) -> (StatusCode, Json<Created>) {
    (StatusCode::CREATED, Json(Created { message }))
}

/// An integer query parameter that parsed, or that was a valid integer too large for `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryInt {
    Value(i64),
    OutOfRange,
}

impl QueryInt {
    /// `None` when `raw` is not an integer at all.
    fn parse(raw: &str) -> Option<Self> {
        match raw.parse::<i64>() {
            Ok(value) => Some(QueryInt::Value(value)),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Some(QueryInt::OutOfRange)
            }
            Err(_) => None,
        }
    }
}

/// Parses an optional integer query parameter, treating a value that is not an integer as absent.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Option<QueryInt>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| QueryInt::parse(value.trim())))
}

/// Resolves a [`QueryInt`], failing the request when it does not fit in an `i64`.
pub(crate) fn int_param(
    name: &'static str,
    value: Option<QueryInt>,
) -> Result<Option<i64>, ApiError> {
    match value {
        None => Ok(None),
        Some(QueryInt::Value(value)) => Ok(Some(value)),
        Some(QueryInt::OutOfRange) => Err(ApiError::OutOfRange(name)),
    }
}

// filters only apply when their value is truthy: non-empty, non-zero

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub(crate) fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

/// `page` and `limit`, as accepted by every listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) page: Option<QueryInt>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) limit: Option<QueryInt>,
}

impl PageParams {
    pub(crate) fn page_request(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(
            int_param("page", self.page)?,
            int_param("limit", self.limit)?,
        ))
    }
}
