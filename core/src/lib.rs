//! Async typed client for the Pass Culture public API.
//!
//! # Overview
//! Bookings, event offers and price categories are exposed as endpoint
//! facades on a [`PassCultureClient`]. Each call builds an [`HttpRequest`],
//! sends it through the single [`Transport`], and decodes the JSON answer into
//! a typed model.
//!
//! # Design
//! - `Transport` is the only code that performs I/O; it sets the bearer and
//!   JSON headers and turns networking failures into [`ApiError`] values.
//! - Facades expose a pure `build_*` method next to every async operation, so
//!   the wire contract can be checked without a server.
//! - Models mirror the wire format: camelCase on the wire, snake_case in Rust,
//!   both accepted when decoding. Unknown enum values are rejected.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod transport;

pub use client::PassCultureClient;
pub use config::{ClientConfig, Settings, DEFAULT_TIMEOUT};
pub use endpoints::{
    BookingFilter, Bookings, EventOfferFilter, EventOffers, PriceCategories, PriceCategoryFilter,
};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use models::{
    AccessibilityInfo, Booking, BookingList, BookingStatus, CategoryRelatedFields,
    CtxMessageType, EventCategory, EventOffer, EventOfferBody, EventOfferList, EventOfferStatus,
    ImageBody, LocationInfo, LocationType, PaginationInfo, PriceCategoriesList, PriceCategory,
    PriceCategoryBody,
};
pub use transport::Transport;
