use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::price_category::{PriceCategory, PriceCategoryBody};
use super::PaginationInfo;

/// Publication state of an event offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOfferStatus {
    Active,
    Inactive,
    Expired,
    SoldOut,
}

/// Closed set of event categories accepted by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    AtelierPratiqueArt,
    CinePleinAir,
    Concert,
    Concours,
    Conference,
    EvenementCine,
    EvenementJeu,
    EvenementMusique,
    EvenementPatrimoine,
    FestivalArtVisuel,
    FestivalCine,
    FestivalLivre,
    FestivalMusique,
    FestivalSpectacle,
    LivestreamEvenement,
    LivestreamMusique,
    LivestreamPratiqueArtistique,
    Rencontre,
    RencontreEnLigne,
    RencontreJeu,
    Salon,
    SeanceCine,
    SeanceEssaiPratiqueArt,
    SpectacleRepresentation,
    Visite,
    VisiteGuidee,
}

/// Disability-compliance flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityInfo {
    #[serde(alias = "audio_disability_compliant")]
    pub audio_disability_compliant: bool,
    #[serde(alias = "mental_disability_compliant")]
    pub mental_disability_compliant: bool,
    #[serde(alias = "motor_disability_compliant")]
    pub motor_disability_compliant: bool,
    #[serde(alias = "visual_disability_compliant")]
    pub visual_disability_compliant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRelatedFields {
    pub category: EventCategory,
    pub speaker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Physical,
    Digital,
}

/// Where the event takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    #[serde(rename = "type", alias = "location_type")]
    pub location_type: LocationType,
    #[serde(default, alias = "venue_id")]
    pub venue_id: Option<i64>,
}

impl LocationInfo {
    pub fn physical(venue_id: i64) -> Self {
        Self {
            location_type: LocationType::Physical,
            venue_id: Some(venue_id),
        }
    }

    pub fn digital() -> Self {
        Self {
            location_type: LocationType::Digital,
            venue_id: None,
        }
    }
}

/// Offer image. `file` is a base64-encoded PNG or JPEG in 2:3 portrait format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBody {
    pub credit: Option<String>,
    pub file: Option<String>,
}

/// A cultural event listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOffer {
    pub id: i64,
    pub name: String,
    pub status: EventOfferStatus,
    #[serde(alias = "has_ticket")]
    pub has_ticket: bool,
    pub accessibility: AccessibilityInfo,
    #[serde(alias = "category_related_fields")]
    pub category_related_fields: CategoryRelatedFields,
    pub location: LocationInfo,
    #[serde(alias = "price_categories")]
    pub price_categories: Vec<PriceCategory>,
    #[serde(alias = "booking_allowed_datetime", deserialize_with = "utc_datetime")]
    pub booking_allowed_datetime: DateTime<Utc>,
    #[serde(alias = "publication_datetime", deserialize_with = "utc_datetime")]
    pub publication_datetime: DateTime<Utc>,
    #[serde(alias = "enable_double_bookings")]
    pub enable_double_bookings: bool,
    #[serde(default, alias = "booking_contact")]
    pub booking_contact: Option<String>,
    #[serde(default, alias = "booking_email")]
    pub booking_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Duration in minutes.
    #[serde(default, alias = "event_duration")]
    pub event_duration: Option<u32>,
    #[serde(default, alias = "external_ticket_office_url")]
    pub external_ticket_office_url: Option<String>,
    #[serde(default, alias = "id_at_provider")]
    pub id_at_provider: Option<String>,
    #[serde(default, alias = "item_collection_details")]
    pub item_collection_details: Option<String>,
}

/// A page of event offers. The wire key for the items is `events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOfferList {
    #[serde(rename = "events", alias = "event_offers")]
    pub event_offers: Vec<EventOffer>,
    pub pagination: PaginationInfo,
}

/// Full representation sent when creating or updating an event offer.
///
/// Every field is serialized; unset optional fields go out as `null` because
/// the platform treats an explicit null differently from an absent key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOfferBody {
    pub accessibility: AccessibilityInfo,
    #[serde(alias = "category_related_fields")]
    pub category_related_fields: CategoryRelatedFields,
    #[serde(alias = "has_ticket")]
    pub has_ticket: bool,
    pub location: LocationInfo,
    pub name: String,
    #[serde(
        default,
        alias = "booking_allowed_datetime",
        deserialize_with = "optional_utc_datetime"
    )]
    pub booking_allowed_datetime: Option<DateTime<Utc>>,
    #[serde(default, alias = "booking_contact")]
    pub booking_contact: Option<String>,
    #[serde(default, alias = "booking_email")]
    pub booking_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "enable_double_bookings")]
    pub enable_double_bookings: Option<bool>,
    #[serde(default, alias = "event_duration")]
    pub event_duration: Option<u32>,
    #[serde(default, alias = "external_ticket_office_url")]
    pub external_ticket_office_url: Option<String>,
    #[serde(default, alias = "id_at_provider")]
    pub id_at_provider: Option<String>,
    #[serde(default)]
    pub image: Option<ImageBody>,
    #[serde(default, alias = "item_collection_details")]
    pub item_collection_details: Option<String>,
    #[serde(default, alias = "price_categories")]
    pub price_categories: Option<Vec<PriceCategoryBody>>,
    #[serde(
        default,
        alias = "publication_datetime",
        deserialize_with = "optional_utc_datetime"
    )]
    pub publication_datetime: Option<DateTime<Utc>>,
}

impl EventOfferBody {
    /// Body with the required fields set. Double bookings are enabled by
    /// default; everything else starts unset.
    pub fn new(
        accessibility: AccessibilityInfo,
        category_related_fields: CategoryRelatedFields,
        has_ticket: bool,
        location: LocationInfo,
        name: impl Into<String>,
    ) -> Self {
        Self {
            accessibility,
            category_related_fields,
            has_ticket,
            location,
            name: name.into(),
            booking_allowed_datetime: None,
            booking_contact: None,
            booking_email: None,
            description: None,
            enable_double_bookings: Some(true),
            event_duration: None,
            external_ticket_office_url: None,
            id_at_provider: None,
            image: None,
            item_collection_details: None,
            price_categories: None,
            publication_datetime: None,
        }
    }
}

/// Parse an RFC 3339 timestamp, or an ISO 8601 one without offset read as UTC.
fn parse_utc_datetime(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|n| n.and_utc()))
}

fn utc_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc_datetime(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid datetime {raw:?}: expected RFC 3339 or YYYY-MM-DDTHH:MM:SS"
        ))
    })
}

fn optional_utc_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_utc_datetime(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid datetime {raw:?}: expected RFC 3339 or YYYY-MM-DDTHH:MM:SS"
            ))
        }),
    }
}
