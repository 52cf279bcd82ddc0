//! Bookings: listing, lookup by token and state transitions.

use chrono::{DateTime, SecondsFormat, Utc};

use super::{dispatch, param, path_segment, DEFAULT_FIRST_INDEX};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::models::{Booking, BookingList, BookingStatus, CtxMessageType};
use crate::transport::Transport;

const BASE_ROUTE: &str = "bookings/v1";

/// Optional refinements for [`Bookings::list_bookings`].
#[derive(Debug, Clone, PartialEq)]
pub struct BookingFilter {
    pub first_index: u32,
    pub price_category_id: Option<i64>,
    pub stock_id: Option<i64>,
    pub status: Option<BookingStatus>,
    /// Only bookings for events starting after this instant.
    pub beginning_datetime: Option<DateTime<Utc>>,
}

impl Default for BookingFilter {
    fn default() -> Self {
        Self {
            first_index: DEFAULT_FIRST_INDEX,
            price_category_id: None,
            stock_id: None,
            status: None,
            beginning_datetime: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Bookings<'a> {
    transport: &'a Transport,
}

impl<'a> Bookings<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn build_list_bookings(
        &self,
        offer_id: i64,
        filter: &BookingFilter,
    ) -> Result<HttpRequest, ApiError> {
        let params = [
            ("offerId", param(offer_id)),
            ("firstIndex", param(filter.first_index)),
            ("priceCategoryId", filter.price_category_id.map(|v| v.to_string())),
            ("stockId", filter.stock_id.map(|v| v.to_string())),
            ("status", filter.status.map(|s| s.as_str().to_string())),
            (
                "beginningDatetime",
                filter
                    .beginning_datetime
                    .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ),
        ];
        self.transport
            .build::<()>(HttpMethod::Get, &format!("{BASE_ROUTE}/bookings"), &params, None)
    }

    /// List the bookings of an offer.
    pub async fn list_bookings(
        &self,
        offer_id: i64,
        filter: &BookingFilter,
    ) -> Result<BookingList, ApiError> {
        dispatch(self.transport, self.build_list_bookings(offer_id, filter)?).await
    }

    pub fn build_get_booking(&self, token: &str) -> Result<HttpRequest, ApiError> {
        let token = path_segment(token)?;
        self.transport
            .build::<()>(HttpMethod::Get, &format!("{BASE_ROUTE}/token/{token}"), &[], None)
    }

    /// Fetch one booking by its token. A 404 surfaces as `ApiError::NotFound`.
    pub async fn get_booking(&self, token: &str) -> Result<Booking, ApiError> {
        dispatch(self.transport, self.build_get_booking(token)?).await
    }

    pub fn build_cancel_booking(&self, token: &str) -> Result<HttpRequest, ApiError> {
        self.transition("cancel", token)
    }

    /// Cancel a booking. Returns the acknowledgement, not the booking.
    pub async fn cancel_booking(&self, token: &str) -> Result<CtxMessageType, ApiError> {
        dispatch(self.transport, self.build_cancel_booking(token)?).await
    }

    pub fn build_validate_booking(&self, token: &str) -> Result<HttpRequest, ApiError> {
        self.transition("use", token)
    }

    /// Mark a booking as used, e.g. when the attendee shows up.
    pub async fn validate_booking(&self, token: &str) -> Result<CtxMessageType, ApiError> {
        dispatch(self.transport, self.build_validate_booking(token)?).await
    }

    pub fn build_revert_validation(&self, token: &str) -> Result<HttpRequest, ApiError> {
        self.transition("keep", token)
    }

    /// Undo a previous validation.
    pub async fn revert_validation(&self, token: &str) -> Result<CtxMessageType, ApiError> {
        dispatch(self.transport, self.build_revert_validation(token)?).await
    }

    /// Tokens are escaped into a single path segment.
    fn transition(&self, action: &str, token: &str) -> Result<HttpRequest, ApiError> {
        let token = path_segment(token)?;
        self.transport.build::<()>(
            HttpMethod::Patch,
            &format!("{BASE_ROUTE}/{action}/token/{token}"),
            &[],
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::endpoints::test_transport;

    #[test]
    fn list_with_defaults_sends_offer_and_first_index_only() {
        let transport = test_transport();
        let req = Bookings::new(&transport)
            .build_list_bookings(42, &BookingFilter::default())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "https://backend.example/bookings/v1/bookings");
        assert_eq!(req.url().unwrap().query(), Some("offerId=42&firstIndex=1"));
        assert!(req.body.is_none());
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn list_with_filters_adds_them_in_order() {
        let transport = test_transport();
        let filter = BookingFilter {
            first_index: 3,
            price_category_id: Some(5),
            stock_id: None,
            status: Some(BookingStatus::Cancelled),
            beginning_datetime: Some(Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()),
        };
        let req = Bookings::new(&transport).build_list_bookings(42, &filter).unwrap();
        let keys: Vec<&str> = req.query.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            ["offerId", "firstIndex", "priceCategoryId", "status", "beginningDatetime"]
        );
        assert_eq!(req.query[3].1, "CANCELLED");
        assert_eq!(req.query[4].1, "2024-05-01T20:00:00Z");
    }

    #[test]
    fn get_booking_uses_token_route() {
        let transport = test_transport();
        let req = Bookings::new(&transport).build_get_booking("TNUJTH").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "https://backend.example/bookings/v1/token/TNUJTH");
    }

    #[test]
    fn transitions_are_bodiless_patches() {
        let transport = test_transport();
        let bookings = Bookings::new(&transport);
        let cases = [
            (bookings.build_cancel_booking("ABC").unwrap(), "cancel"),
            (bookings.build_validate_booking("ABC").unwrap(), "use"),
            (bookings.build_revert_validation("ABC").unwrap(), "keep"),
        ];
        for (req, action) in cases {
            assert_eq!(req.method, HttpMethod::Patch);
            assert_eq!(
                req.path,
                format!("https://backend.example/bookings/v1/{action}/token/ABC")
            );
            assert!(req.body.is_none());
            assert_eq!(req.header("content-type"), None);
            assert_eq!(req.header("authorization"), Some("Bearer test-key"));
        }
    }

    #[test]
    fn token_with_query_characters_stays_in_the_path() {
        let transport = test_transport();
        let req = Bookings::new(&transport)
            .build_get_booking("ABC?offerId=1#x")
            .unwrap();
        assert_eq!(
            req.path,
            "https://backend.example/bookings/v1/token/ABC%3FofferId=1%23x"
        );
        let url = req.url().unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn token_with_slashes_cannot_leave_the_booking_route() {
        let transport = test_transport();
        let req = Bookings::new(&transport)
            .build_validate_booking("../../../offers/v1/events")
            .unwrap();
        let url = req.url().unwrap();
        assert_eq!(
            url.path(),
            "/bookings/v1/use/token/..%2F..%2F..%2Foffers%2Fv1%2Fevents"
        );
    }

    #[test]
    fn dot_and_empty_tokens_are_rejected_before_sending() {
        let transport = test_transport();
        let bookings = Bookings::new(&transport);
        assert!(matches!(
            bookings.build_cancel_booking(".."),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            bookings.build_get_booking(""),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
