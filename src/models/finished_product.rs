use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, MutableEntity};
use crate::database::Collection;

pub const QUALITY_PENDING: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedProduct {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub batch_number: Option<String>,
    /// Either an RFC 3339 timestamp or a plain `YYYY-MM-DD` date, as sent.
    pub manufacturing_date: Option<String>,
    /// pass / fail / pending
    pub quality_status: String,
    pub location: Option<String>,
    pub specifications: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinishedProduct {
    /// Local calendar day the product was made, if the date parses.
    pub fn manufacturing_day(&self) -> Option<NaiveDate> {
        self.manufacturing_date.as_deref().and_then(calendar_day)
    }
}

fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local).date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewFinishedProduct {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<i64>,
    pub batch_number: Option<String>,
    pub manufacturing_date: Option<String>,
    pub quality_status: Option<String>,
    pub location: Option<String>,
    pub specifications: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
}

impl Entity for FinishedProduct {
    const COLLECTION: Collection = Collection::FinishedProducts;
    const LABEL: &'static str = "Product";
    type New = NewFinishedProduct;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(new: NewFinishedProduct, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name.unwrap_or_default(),
            sku: new.sku.unwrap_or_default(),
            quantity: new.quantity.unwrap_or(0),
            batch_number: new.batch_number,
            manufacturing_date: new.manufacturing_date,
            quality_status: new
                .quality_status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| QUALITY_PENDING.to_string()),
            location: new.location,
            specifications: new.specifications,
            created_at: now,
            updated_at: now,
        }
    }
}

impl MutableEntity for FinishedProduct {
    type Patch = FinishedProductPatch;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_made(date: &str) -> FinishedProduct {
        FinishedProduct::from_new(
            NewFinishedProduct {
                name: Some("Widget".into()),
                manufacturing_date: Some(date.into()),
                ..Default::default()
            },
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    #[test]
    fn quality_status_defaults_to_pending() {
        let product = product_made("2026-01-02");
        assert_eq!(product.quality_status, "pending");
    }

    #[test]
    fn parses_plain_dates() {
        let product = product_made("2026-01-02");
        assert_eq!(product.manufacturing_day(), NaiveDate::from_ymd_opt(2026, 1, 2));
    }

    #[test]
    fn parses_timestamps_in_local_time() {
        let now = Utc::now();
        let product = product_made(&now.to_rfc3339());
        assert_eq!(product.manufacturing_day(), Some(now.with_timezone(&Local).date_naive()));
    }

    #[test]
    fn garbage_dates_have_no_day() {
        assert!(product_made("last tuesday").manufacturing_day().is_none());
    }
}
