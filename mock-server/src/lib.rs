//! In-memory stand-in for the Pass Culture public API.
//!
//! Serves the bookings, event offer and price category routes with bearer
//! token checking. Tests can inject a failure status or a delay for the next
//! requests and inspect every request the server received.

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
};
use tracing::{debug, info};

pub const DEFAULT_API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub offer_id: i64,
    pub offer_name: String,
    pub stock_id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub price: f64,
    pub price_category_id: Option<i64>,
    pub quantity: u32,
    pub status: String,
    pub user_email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCategory {
    pub id: i64,
    pub id_at_provider: Option<String>,
    pub label: String,
    pub price: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOffer {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub has_ticket: bool,
    pub accessibility: Value,
    pub category_related_fields: Value,
    pub location: Value,
    pub price_categories: Vec<PriceCategory>,
    pub booking_allowed_datetime: String,
    pub publication_datetime: String,
    pub enable_double_bookings: bool,
    pub description: Option<String>,
    pub id_at_provider: Option<String>,
}

impl EventOffer {
    fn venue_id(&self) -> Option<i64> {
        self.location.get("venueId").and_then(Value::as_i64)
    }
}

/// Create/update payload as the platform receives it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOfferInput {
    pub accessibility: Value,
    pub category_related_fields: Value,
    pub has_ticket: bool,
    pub location: Value,
    pub name: String,
    pub booking_allowed_datetime: Option<String>,
    pub publication_datetime: Option<String>,
    pub enable_double_bookings: Option<bool>,
    pub description: Option<String>,
    pub id_at_provider: Option<String>,
    pub price_categories: Option<Vec<PriceCategoryInput>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCategoryInput {
    pub id_at_provider: Option<String>,
    pub label: String,
    pub price: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePriceCategories {
    pub price_categories: Vec<PriceCategoryInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub offer_id: i64,
    pub first_index: Option<usize>,
    pub price_category_id: Option<i64>,
    pub stock_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub venue_id: i64,
    pub first_index: Option<usize>,
    pub limit: Option<usize>,
    pub ids_at_provider: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCategoryQuery {
    pub first_index: Option<usize>,
    pub limit: Option<usize>,
    pub ids_at_provider: Option<String>,
}

/// A request as the server saw it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<String>,
}

pub struct MockState {
    api_key: String,
    bookings: RwLock<HashMap<String, Booking>>,
    offers: RwLock<HashMap<i64, EventOffer>>,
    next_id: Mutex<i64>,
    fail_next: Mutex<Option<u16>>,
    delay: Mutex<Option<Duration>>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

pub type SharedState = Arc<MockState>;

/// Handle on a mock server's state. Cheap to clone.
#[derive(Clone)]
pub struct MockApi {
    state: SharedState,
}

impl MockApi {
    pub fn new(api_key: &str) -> Self {
        Self::with_data(api_key, Vec::new(), Vec::new())
    }

    pub fn with_data(
        api_key: &str,
        bookings: Vec<(String, Booking)>,
        offers: Vec<EventOffer>,
    ) -> Self {
        let next_id = offers
            .iter()
            .flat_map(|o| std::iter::once(o.id).chain(o.price_categories.iter().map(|p| p.id)))
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: Arc::new(MockState {
                api_key: api_key.to_string(),
                bookings: RwLock::new(bookings.into_iter().collect()),
                offers: RwLock::new(offers.into_iter().map(|o| (o.id, o)).collect()),
                next_id: Mutex::new(next_id),
                fail_next: Mutex::new(None),
                delay: Mutex::new(None),
                recorded: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Small dataset used by the binary: one offer with two bookings.
    pub fn demo() -> Self {
        Self::with_data(
            DEFAULT_API_KEY,
            vec![
                ("TNUJTH".to_string(), sample_booking(1, 42, "CONFIRMED")),
                ("XKCD42".to_string(), sample_booking(2, 42, "USED")),
            ],
            vec![sample_event_offer(42, 3, "Concert au parc")],
        )
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/bookings/v1/bookings", get(list_bookings))
            .route("/bookings/v1/token/{token}", get(get_booking))
            .route("/bookings/v1/cancel/token/{token}", patch(cancel_booking))
            .route("/bookings/v1/use/token/{token}", patch(use_booking))
            .route("/bookings/v1/keep/token/{token}", patch(keep_booking))
            .route(
                "/offers/v1/events",
                get(list_events).post(create_event).patch(update_event),
            )
            .route("/offers/v1/events/{id}", get(get_event))
            .route(
                "/offers/v1/events/{id}/price_categories",
                get(list_price_categories).post(create_price_categories),
            )
            .route(
                "/offers/v1/events/{id}/price_categories/{category_id}",
                put(update_price_category),
            )
            .layer(middleware::from_fn_with_state(self.state.clone(), guard))
            .with_state(self.state.clone())
    }

    pub async fn insert_booking(&self, token: &str, booking: Booking) {
        self.state
            .bookings
            .write()
            .await
            .insert(token.to_string(), booking);
    }

    pub async fn booking(&self, token: &str) -> Option<Booking> {
        self.state.bookings.read().await.get(token).cloned()
    }

    pub async fn insert_event_offer(&self, offer: EventOffer) {
        let mut next_id = self.state.next_id.lock().await;
        let highest = offer
            .price_categories
            .iter()
            .map(|p| p.id)
            .fold(offer.id, i64::max);
        *next_id = (*next_id).max(highest + 1);
        self.state.offers.write().await.insert(offer.id, offer);
    }

    pub async fn event_offer(&self, id: i64) -> Option<EventOffer> {
        self.state.offers.read().await.get(&id).cloned()
    }

    /// Answer the next request with `status` instead of routing it.
    pub async fn fail_next(&self, status: u16) {
        *self.state.fail_next.lock().await = Some(status);
    }

    /// Wait this long before answering every subsequent request.
    pub async fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().await = Some(delay);
    }

    pub async fn recorded(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().await.clone()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}

pub fn app() -> Router {
    MockApi::default().router()
}

pub async fn run(listener: TcpListener, api: MockApi) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Pass Culture API listening");
    }
    axum::serve(listener, api.router()).await
}

pub fn sample_booking(id: i64, offer_id: i64, status: &str) -> Booking {
    Booking {
        id,
        offer_id,
        offer_name: format!("Offer {offer_id}"),
        stock_id: 100 + id,
        venue_id: 3,
        venue_name: "Le Zénith".to_string(),
        price: 12.5,
        price_category_id: Some(1),
        quantity: 1,
        status: status.to_string(),
        user_email: Some(format!("user{id}@example.com")),
    }
}

pub fn sample_event_offer(id: i64, venue_id: i64, name: &str) -> EventOffer {
    EventOffer {
        id,
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        has_ticket: true,
        accessibility: json!({
            "audioDisabilityCompliant": true,
            "mentalDisabilityCompliant": true,
            "motorDisabilityCompliant": false,
            "visualDisabilityCompliant": false
        }),
        category_related_fields: json!({"category": "CONCERT", "speaker": "Orchestre"}),
        location: json!({"type": "physical", "venueId": venue_id}),
        price_categories: vec![PriceCategory {
            id: id * 10,
            id_at_provider: Some(format!("pc-{id}")),
            label: "Plein tarif".to_string(),
            price: 2500,
        }],
        booking_allowed_datetime: "2024-06-01T18:00:00Z".to_string(),
        publication_datetime: "2024-05-01T08:00:00Z".to_string(),
        enable_double_bookings: false,
        description: None,
        id_at_provider: Some(format!("ext-{id}")),
    }
}

fn ack(loc: &str, msg: &str, ctx: Value) -> Json<Value> {
    Json(json!({"ctx": ctx, "loc": [loc], "msg": msg, "type": "success"}))
}

/// Records the request, applies injected delay/failure, then checks the token.
async fn guard(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    let header_value = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: (!bytes.is_empty()).then(|| String::from_utf8_lossy(&bytes).into_owned()),
    };
    debug!(method = %recorded.method, path = %recorded.path, "mock request");
    let expected = format!("Bearer {}", state.api_key);
    let authorized = recorded.authorization.as_deref() == Some(expected.as_str());
    state.recorded.lock().await.push(recorded);

    let delay = *state.delay.lock().await;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = state.fail_next.lock().await.take() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "injected failure").into_response();
    }
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"auth": "API key required"})),
        )
            .into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn list_bookings(
    State(state): State<SharedState>,
    Query(query): Query<BookingQuery>,
) -> Json<Value> {
    let bookings = state.bookings.read().await;
    let mut matching: Vec<Booking> = bookings
        .values()
        .filter(|b| b.offer_id == query.offer_id)
        .filter(|b| query.status.as_ref().is_none_or(|s| &b.status == s))
        .filter(|b| query.stock_id.is_none_or(|s| b.stock_id == s))
        .filter(|b| {
            query
                .price_category_id
                .is_none_or(|p| b.price_category_id == Some(p))
        })
        .cloned()
        .collect();
    matching.sort_by_key(|b| b.id);
    let skip = query.first_index.unwrap_or(1).saturating_sub(1);
    let page: Vec<Booking> = matching.into_iter().skip(skip).collect();
    Json(json!({"data": page}))
}

async fn get_booking(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Booking>, StatusCode> {
    let bookings = state.bookings.read().await;
    bookings.get(&token).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn set_booking_status(
    state: &MockState,
    token: &str,
    status: &str,
    msg: &str,
) -> Result<Json<Value>, StatusCode> {
    let mut bookings = state.bookings.write().await;
    let booking = bookings.get_mut(token).ok_or(StatusCode::NOT_FOUND)?;
    booking.status = status.to_string();
    Ok(ack("booking", msg, json!({"token": token})))
}

async fn cancel_booking(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    set_booking_status(&state, &token, "CANCELLED", "cancelled").await
}

async fn use_booking(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    set_booking_status(&state, &token, "USED", "validated").await
}

async fn keep_booking(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    set_booking_status(&state, &token, "CONFIRMED", "validation reverted").await
}

async fn list_events(
    State(state): State<SharedState>,
    Query(query): Query<EventQuery>,
) -> Json<Value> {
    let offers = state.offers.read().await;
    let providers: Option<Vec<&str>> = query
        .ids_at_provider
        .as_deref()
        .map(|ids| ids.split(',').collect());
    let mut matching: Vec<EventOffer> = offers
        .values()
        .filter(|o| o.venue_id() == Some(query.venue_id))
        .filter(|o| {
            providers.as_ref().is_none_or(|ids| {
                o.id_at_provider
                    .as_deref()
                    .is_some_and(|id| ids.contains(&id))
            })
        })
        .cloned()
        .collect();
    matching.sort_by_key(|o| o.id);

    let limit = query.limit.unwrap_or(50).max(1);
    let first_index = query.first_index.unwrap_or(1).max(1);
    let total = matching.len();
    let events: Vec<EventOffer> = matching
        .into_iter()
        .skip(first_index - 1)
        .take(limit)
        .collect();
    Json(json!({
        "events": events,
        "pagination": {
            "total": total,
            "page": (first_index - 1) / limit + 1,
            "limit": limit,
            "pages": total.div_ceil(limit),
        }
    }))
}

async fn get_event(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<EventOffer>, StatusCode> {
    let offers = state.offers.read().await;
    offers.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn allocate_id(state: &MockState) -> i64 {
    let mut next_id = state.next_id.lock().await;
    let id = *next_id;
    *next_id += 1;
    id
}

async fn create_event(
    State(state): State<SharedState>,
    Json(input): Json<EventOfferInput>,
) -> Json<Value> {
    let id = allocate_id(&state).await;
    let mut price_categories = Vec::new();
    for category in input.price_categories.unwrap_or_default() {
        price_categories.push(PriceCategory {
            id: allocate_id(&state).await,
            id_at_provider: category.id_at_provider,
            label: category.label,
            price: category.price,
        });
    }
    let offer = EventOffer {
        id,
        name: input.name,
        status: "ACTIVE".to_string(),
        has_ticket: input.has_ticket,
        accessibility: input.accessibility,
        category_related_fields: input.category_related_fields,
        location: input.location,
        price_categories,
        booking_allowed_datetime: input
            .booking_allowed_datetime
            .unwrap_or_else(|| "2024-01-01T00:00:00Z".to_string()),
        publication_datetime: input
            .publication_datetime
            .unwrap_or_else(|| "2024-01-01T00:00:00Z".to_string()),
        enable_double_bookings: input.enable_double_bookings.unwrap_or(true),
        description: input.description,
        id_at_provider: input.id_at_provider,
    };
    state.offers.write().await.insert(id, offer);
    ack("offer", "created", json!({"offerId": id}))
}

/// Updates are matched on `idAtProvider`, the only stable key in the body.
async fn update_event(
    State(state): State<SharedState>,
    Json(input): Json<EventOfferInput>,
) -> Result<Json<Value>, StatusCode> {
    let provider_id = input.id_at_provider.ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
    let mut offers = state.offers.write().await;
    let offer = offers
        .values_mut()
        .find(|o| o.id_at_provider.as_deref() == Some(provider_id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    offer.name = input.name;
    offer.has_ticket = input.has_ticket;
    offer.accessibility = input.accessibility;
    offer.category_related_fields = input.category_related_fields;
    offer.location = input.location;
    offer.description = input.description;
    if let Some(enabled) = input.enable_double_bookings {
        offer.enable_double_bookings = enabled;
    }
    Ok(ack("offer", "updated", json!({"offerId": offer.id})))
}

async fn list_price_categories(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(query): Query<PriceCategoryQuery>,
) -> Result<Json<Value>, StatusCode> {
    let offers = state.offers.read().await;
    let offer = offers.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let providers: Option<Vec<&str>> = query
        .ids_at_provider
        .as_deref()
        .map(|ids| ids.split(',').collect());
    let limit = query.limit.unwrap_or(50).max(1);
    let first_index = query.first_index.unwrap_or(1).max(1);
    let data: Vec<&PriceCategory> = offer
        .price_categories
        .iter()
        .filter(|p| {
            providers.as_ref().is_none_or(|ids| {
                p.id_at_provider
                    .as_deref()
                    .is_some_and(|id| ids.contains(&id))
            })
        })
        .skip(first_index - 1)
        .take(limit)
        .collect();
    Ok(Json(json!({"data": data})))
}

async fn create_price_categories(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(input): Json<CreatePriceCategories>,
) -> Result<Json<Value>, StatusCode> {
    if !state.offers.read().await.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut created = Vec::new();
    for category in input.price_categories {
        created.push(PriceCategory {
            id: allocate_id(&state).await,
            id_at_provider: category.id_at_provider,
            label: category.label,
            price: category.price,
        });
    }
    let ids: Vec<i64> = created.iter().map(|p| p.id).collect();
    let mut offers = state.offers.write().await;
    let offer = offers.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    offer.price_categories.extend(created);
    Ok(ack("priceCategories", "created", json!({"ids": ids})))
}

async fn update_price_category(
    State(state): State<SharedState>,
    Path((id, category_id)): Path<(i64, i64)>,
    Json(input): Json<PriceCategoryInput>,
) -> Result<Json<Value>, StatusCode> {
    let mut offers = state.offers.write().await;
    let offer = offers.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let category = offer
        .price_categories
        .iter_mut()
        .find(|p| p.id == category_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    category.id_at_provider = input.id_at_provider;
    category.label = input.label;
    category.price = input.price;
    Ok(ack("priceCategory", "updated", json!({"id": category_id})))
}
