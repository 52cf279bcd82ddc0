use serde::{Deserialize, Serialize};

use super::PaginationInfo;

/// A priced tier of an event offer. `price` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCategory {
    pub id: i64,
    #[serde(default, alias = "id_at_provider")]
    pub id_at_provider: Option<String>,
    pub label: String,
    pub price: i64,
}

/// Price categories of one event. The wire key for the items is `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCategoriesList {
    #[serde(rename = "data", alias = "priceCategories", alias = "price_categories")]
    pub price_categories: Vec<PriceCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
}

/// Price category payload for create and update calls. The id is assigned by
/// the platform, so it is not part of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCategoryBody {
    #[serde(default, alias = "id_at_provider")]
    pub id_at_provider: Option<String>,
    pub label: String,
    pub price: i64,
}

impl PriceCategoryBody {
    pub fn new(label: impl Into<String>, price: i64) -> Self {
        Self {
            id_at_provider: None,
            label: label.into(),
            price,
        }
    }
}

impl From<&PriceCategory> for PriceCategoryBody {
    fn from(category: &PriceCategory) -> Self {
        Self {
            id_at_provider: category.id_at_provider.clone(),
            label: category.label.clone(),
            price: category.price,
        }
    }
}
