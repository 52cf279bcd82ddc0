//! Typed models for the Pass Culture API.
//!
//! # Design
//! Every entity is built only by deserializing a JSON payload and is never
//! mutated afterwards. Field mapping follows one rule everywhere: the Rust
//! field is snake_case, the wire name is camelCase (`rename_all`), and the
//! snake_case spelling is accepted as an alias so payloads validate under
//! either name. Unknown fields are ignored; missing non-optional fields and
//! unrecognised enum values are rejected.

pub mod booking;
pub mod event_offer;
pub mod price_category;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use booking::{Booking, BookingList, BookingStatus};
pub use event_offer::{
    AccessibilityInfo, CategoryRelatedFields, EventCategory, EventOffer, EventOfferBody,
    EventOfferList, EventOfferStatus, ImageBody, LocationInfo, LocationType,
};
pub use price_category::{PriceCategoriesList, PriceCategory, PriceCategoryBody};

/// Describes a result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub pages: u64,
}

/// Acknowledgement envelope returned by mutation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtxMessageType {
    #[serde(default)]
    pub ctx: Map<String, Value>,
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type", alias = "message_type")]
    pub message_type: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ctx_message_reads_all_fields() {
        let msg: CtxMessageType = serde_json::from_value(json!({
            "ctx": {"bookingId": 3},
            "loc": ["booking", "status"],
            "msg": "validated",
            "type": "success"
        }))
        .unwrap();
        assert_eq!(msg.ctx["bookingId"], 3);
        assert_eq!(msg.loc, vec!["booking", "status"]);
        assert_eq!(msg.msg, "validated");
        assert_eq!(msg.message_type, "success");
    }

    #[test]
    fn ctx_message_defaults_missing_ctx() {
        let msg: CtxMessageType =
            serde_json::from_value(json!({"loc": [], "msg": "ok", "type": "success"})).unwrap();
        assert!(msg.ctx.is_empty());
    }

    #[test]
    fn ctx_message_requires_msg() {
        let result: Result<CtxMessageType, _> =
            serde_json::from_value(json!({"loc": [], "type": "success"}));
        assert!(result.is_err());
    }

    #[test]
    fn ctx_message_serializes_type_under_wire_name() {
        let msg = CtxMessageType {
            ctx: Map::new(),
            loc: vec!["offer".to_string()],
            msg: "created".to_string(),
            message_type: "success".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "success");
        assert!(value.get("message_type").is_none());
    }

    #[test]
    fn pagination_reads_plain_fields() {
        let page: PaginationInfo =
            serde_json::from_value(json!({"total": 120, "page": 2, "limit": 50, "pages": 3}))
                .unwrap();
        assert_eq!(page.pages, 3);
    }
}
