//! Event offers: listing by venue, lookup, create and update.

use super::{dispatch, param, DEFAULT_FIRST_INDEX, DEFAULT_LIMIT};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::models::{CtxMessageType, EventOffer, EventOfferBody, EventOfferList};
use crate::transport::Transport;

const EVENTS_ROUTE: &str = "offers/v1/events";

/// Optional refinements for [`EventOffers::list_event_offers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOfferFilter {
    pub first_index: u32,
    pub limit: u32,
    /// Comma-separated provider ids.
    pub ids_at_provider: Option<String>,
    pub address_id: Option<i64>,
}

impl Default for EventOfferFilter {
    fn default() -> Self {
        Self {
            first_index: DEFAULT_FIRST_INDEX,
            limit: DEFAULT_LIMIT,
            ids_at_provider: None,
            address_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventOffers<'a> {
    transport: &'a Transport,
}

impl<'a> EventOffers<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn build_list_event_offers(
        &self,
        venue_id: i64,
        filter: &EventOfferFilter,
    ) -> Result<HttpRequest, ApiError> {
        let params = [
            ("venueId", param(venue_id)),
            ("firstIndex", param(filter.first_index)),
            ("limit", param(filter.limit)),
            ("idsAtProvider", filter.ids_at_provider.clone()),
            ("addressId", filter.address_id.map(|v| v.to_string())),
        ];
        self.transport
            .build::<()>(HttpMethod::Get, EVENTS_ROUTE, &params, None)
    }

    /// List the event offers of a venue.
    pub async fn list_event_offers(
        &self,
        venue_id: i64,
        filter: &EventOfferFilter,
    ) -> Result<EventOfferList, ApiError> {
        dispatch(self.transport, self.build_list_event_offers(venue_id, filter)?).await
    }

    pub fn build_get_event_offer(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.transport
            .build::<()>(HttpMethod::Get, &format!("{EVENTS_ROUTE}/{id}"), &[], None)
    }

    pub async fn get_event_offer(&self, id: i64) -> Result<EventOffer, ApiError> {
        dispatch(self.transport, self.build_get_event_offer(id)?).await
    }

    pub fn build_create_event_offer(&self, body: &EventOfferBody) -> Result<HttpRequest, ApiError> {
        self.transport
            .build(HttpMethod::Post, EVENTS_ROUTE, &[], Some(body))
    }

    /// Create an event offer. Returns the acknowledgement, not the offer.
    pub async fn create_event_offer(
        &self,
        body: &EventOfferBody,
    ) -> Result<CtxMessageType, ApiError> {
        dispatch(self.transport, self.build_create_event_offer(body)?).await
    }

    pub fn build_update_event_offer(&self, body: &EventOfferBody) -> Result<HttpRequest, ApiError> {
        self.transport
            .build(HttpMethod::Patch, EVENTS_ROUTE, &[], Some(body))
    }

    /// Send a full replacement representation of an event offer.
    pub async fn update_event_offer(
        &self,
        body: &EventOfferBody,
    ) -> Result<CtxMessageType, ApiError> {
        dispatch(self.transport, self.build_update_event_offer(body)?).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::endpoints::test_transport;
    use crate::models::{
        AccessibilityInfo, CategoryRelatedFields, EventCategory, LocationInfo, PriceCategoryBody,
    };

    fn body() -> EventOfferBody {
        let mut body = EventOfferBody::new(
            AccessibilityInfo {
                audio_disability_compliant: false,
                mental_disability_compliant: true,
                motor_disability_compliant: true,
                visual_disability_compliant: false,
            },
            CategoryRelatedFields {
                category: EventCategory::SpectacleRepresentation,
                speaker: "Compagnie du Soleil".to_string(),
            },
            true,
            LocationInfo::physical(12),
            "Le Petit Prince",
        );
        body.price_categories = Some(vec![PriceCategoryBody::new("Plein tarif", 1800)]);
        body
    }

    #[test]
    fn list_omits_unset_filters() {
        let transport = test_transport();
        let req = EventOffers::new(&transport)
            .build_list_event_offers(7, &EventOfferFilter::default())
            .unwrap();
        assert_eq!(req.path, "https://backend.example/offers/v1/events");
        assert_eq!(req.url().unwrap().query(), Some("venueId=7&firstIndex=1&limit=50"));
    }

    #[test]
    fn list_sends_provider_and_address_filters() {
        let transport = test_transport();
        let filter = EventOfferFilter {
            ids_at_provider: Some("a,b".to_string()),
            address_id: Some(88),
            ..EventOfferFilter::default()
        };
        let req = EventOffers::new(&transport)
            .build_list_event_offers(7, &filter)
            .unwrap();
        assert_eq!(
            req.url().unwrap().query(),
            Some("venueId=7&firstIndex=1&limit=50&idsAtProvider=a%2Cb&addressId=88")
        );
    }

    #[test]
    fn get_uses_id_in_path() {
        let transport = test_transport();
        let req = EventOffers::new(&transport).build_get_event_offer(99).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "https://backend.example/offers/v1/events/99");
    }

    #[test]
    fn create_posts_full_body_with_nulls() {
        let transport = test_transport();
        let req = EventOffers::new(&transport)
            .build_create_event_offer(&body())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["name"], "Le Petit Prince");
        assert_eq!(sent["categoryRelatedFields"]["category"], "SPECTACLE_REPRESENTATION");
        assert_eq!(sent["priceCategories"][0]["price"], 1800);
        assert!(sent.get("bookingContact").unwrap().is_null());
        assert!(sent.get("publicationDatetime").unwrap().is_null());
    }

    #[test]
    fn update_patches_same_route() {
        let transport = test_transport();
        let req = EventOffers::new(&transport)
            .build_update_event_offer(&body())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "https://backend.example/offers/v1/events");
        assert!(req.body.is_some());
    }
}
