//! Price categories of an event offer.

use serde::Serialize;

use super::{dispatch, param, DEFAULT_FIRST_INDEX, DEFAULT_LIMIT};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::models::{CtxMessageType, PriceCategoriesList, PriceCategoryBody};
use crate::transport::Transport;

const EVENTS_ROUTE: &str = "offers/v1/events";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCategoryFilter {
    pub first_index: u32,
    pub limit: u32,
    pub ids_at_provider: Option<String>,
}

impl Default for PriceCategoryFilter {
    fn default() -> Self {
        Self {
            first_index: DEFAULT_FIRST_INDEX,
            limit: DEFAULT_LIMIT,
            ids_at_provider: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody<'b> {
    price_categories: &'b [PriceCategoryBody],
}

#[derive(Debug, Clone, Copy)]
pub struct PriceCategories<'a> {
    transport: &'a Transport,
}

impl<'a> PriceCategories<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub fn build_list_price_categories(
        &self,
        event_id: i64,
        filter: &PriceCategoryFilter,
    ) -> Result<HttpRequest, ApiError> {
        let params = [
            ("limit", param(filter.limit)),
            ("firstIndex", param(filter.first_index)),
            ("idsAtProvider", filter.ids_at_provider.clone()),
        ];
        self.transport.build::<()>(
            HttpMethod::Get,
            &format!("{EVENTS_ROUTE}/{event_id}/price_categories"),
            &params,
            None,
        )
    }

    pub async fn list_price_categories(
        &self,
        event_id: i64,
        filter: &PriceCategoryFilter,
    ) -> Result<PriceCategoriesList, ApiError> {
        dispatch(
            self.transport,
            self.build_list_price_categories(event_id, filter)?,
        )
        .await
    }

    pub fn build_create_price_categories(
        &self,
        event_id: i64,
        categories: &[PriceCategoryBody],
    ) -> Result<HttpRequest, ApiError> {
        self.transport.build(
            HttpMethod::Post,
            &format!("{EVENTS_ROUTE}/{event_id}/price_categories"),
            &[],
            Some(&CreateBody {
                price_categories: categories,
            }),
        )
    }

    /// Add price categories to an event.
    pub async fn create_price_categories(
        &self,
        event_id: i64,
        categories: &[PriceCategoryBody],
    ) -> Result<CtxMessageType, ApiError> {
        dispatch(
            self.transport,
            self.build_create_price_categories(event_id, categories)?,
        )
        .await
    }

    pub fn build_update_price_category(
        &self,
        event_id: i64,
        price_category_id: i64,
        category: &PriceCategoryBody,
    ) -> Result<HttpRequest, ApiError> {
        self.transport.build(
            HttpMethod::Put,
            &format!("{EVENTS_ROUTE}/{event_id}/price_categories/{price_category_id}"),
            &[],
            Some(category),
        )
    }

    /// Replace one price category of an event.
    pub async fn update_price_category(
        &self,
        event_id: i64,
        price_category_id: i64,
        category: &PriceCategoryBody,
    ) -> Result<CtxMessageType, ApiError> {
        dispatch(
            self.transport,
            self.build_update_price_category(event_id, price_category_id, category)?,
        )
        .await
    }
}
