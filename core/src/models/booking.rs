use serde::{Deserialize, Deserializer, Serialize};

use super::PaginationInfo;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Used,
    Reimbursed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Used => "USED",
            BookingStatus::Reimbursed => "REIMBURSED",
        }
    }
}

/// A reservation. References its offer, stock and venue by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(alias = "offer_id")]
    pub offer_id: i64,
    #[serde(alias = "offer_name")]
    pub offer_name: String,
    #[serde(default, alias = "offer_ean")]
    pub offer_ean: Option<String>,
    #[serde(alias = "stock_id")]
    pub stock_id: i64,
    #[serde(alias = "venue_id")]
    pub venue_id: i64,
    #[serde(alias = "venue_name")]
    pub venue_name: String,
    #[serde(default, alias = "venue_address")]
    pub venue_address: Option<String>,
    #[serde(default, alias = "venue_departement_code")]
    pub venue_departement_code: Option<String>,
    #[serde(deserialize_with = "non_negative_price")]
    pub price: f64,
    #[serde(default, alias = "price_category_id")]
    pub price_category_id: Option<i64>,
    #[serde(default, alias = "price_category_label")]
    pub price_category_label: Option<String>,
    pub quantity: u32,
    pub status: BookingStatus,
    #[serde(default, alias = "confirmation_date")]
    pub confirmation_date: Option<String>,
    #[serde(default, alias = "creation_date")]
    pub creation_date: Option<String>,
    #[serde(default, alias = "user_birth_date")]
    pub user_birth_date: Option<String>,
    #[serde(default, alias = "user_email")]
    pub user_email: Option<String>,
    #[serde(default, alias = "user_first_name")]
    pub user_first_name: Option<String>,
    #[serde(default, alias = "user_last_name")]
    pub user_last_name: Option<String>,
    #[serde(default, alias = "user_phone_number")]
    pub user_phone_number: Option<String>,
    #[serde(default, alias = "user_postal_code")]
    pub user_postal_code: Option<String>,
}

fn non_negative_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let price = f64::deserialize(deserializer)?;
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(serde::de::Error::custom(format!(
            "price must be a non-negative number, got {price}"
        )))
    }
}

/// A page of bookings. The wire key for the items is `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingList {
    #[serde(rename = "data", alias = "bookings")]
    pub bookings: Vec<Booking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
}
