//! Endpoint facades, one per resource family.
//!
//! # Design
//! Each facade borrows the client's `Transport` and carries no state of its
//! own. Every operation is split into a pure `build_*` method producing the
//! `HttpRequest` and an async method that sends it and decodes the result
//! with [`parse`]. List filters drop unset parameters from the query string;
//! create/update bodies always carry every field.

pub mod bookings;
pub mod event_offers;
pub mod price_categories;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{parse_response, Transport};

pub use bookings::{BookingFilter, Bookings};
pub use event_offers::{EventOfferFilter, EventOffers};
pub use price_categories::{PriceCategories, PriceCategoryFilter};

/// Default value of the `firstIndex` pagination parameter.
pub const DEFAULT_FIRST_INDEX: u32 = 1;
/// Default value of the `limit` pagination parameter.
pub const DEFAULT_LIMIT: u32 = 50;

/// Check the status, classify failures and decode the body into `T`.
pub fn parse<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let value = parse_response(response).map_err(ApiError::classify)?;
    decode(value)
}

/// Decode an already-parsed JSON value into `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}

pub(crate) async fn dispatch<T: DeserializeOwned>(
    transport: &Transport,
    request: HttpRequest,
) -> Result<T, ApiError> {
    parse(transport.send(request).await?)
}

pub(crate) fn param(value: impl ToString) -> Option<String> {
    Some(value.to_string())
}

/// Percent-encode `value` so it stays a single path segment. Empty and dot
/// segments are rejected because URL normalization would remove them.
pub(crate) fn path_segment(value: &str) -> Result<String, ApiError> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(ApiError::InvalidInput(format!(
            "{value:?} is not a usable path segment"
        )));
    }
    let invalid = || ApiError::InvalidInput(format!("cannot encode path segment {value:?}"));
    let mut url = Url::parse("http://segment.invalid/").map_err(|_| invalid())?;
    url.path_segments_mut().map_err(|_| invalid())?.pop_if_empty().push(value);
    Ok(url.path().trim_start_matches('/').to_string())
}

#[cfg(test)]
pub(crate) fn test_transport() -> Transport {
    use crate::config::{ClientConfig, Settings};

    Transport::open(ClientConfig::new(Settings {
        api_key: "test-key".to_string(),
        api_endpoint: "https://backend.example".to_string(),
    }))
    .expect("valid test endpoint")
}
