use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;
use crate::database::Collection;

pub const STATUS_PASS: &str = "pass";
pub const STATUS_FAIL: &str = "fail";

/// Stored key of `item_reference`, used for per-item lookups.
pub const ITEM_REFERENCE_FIELD: &str = "itemReference";

/// An inspection record. Append-only: there is no update or delete.
///
/// `item_reference` is a batch number or SKU typed by the inspector and is
/// never checked against either collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCheck {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub item_reference: String,
    pub inspector: Option<String>,
    pub parameters: Option<String>,
    pub results: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    pub inspection_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl QualityCheck {
    pub fn passed(&self) -> bool {
        self.status == STATUS_PASS
    }

    pub fn failed(&self) -> bool {
        self.status == STATUS_FAIL
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewQualityCheck {
    pub item_reference: Option<String>,
    pub inspector: Option<String>,
    pub parameters: Option<String>,
    pub results: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

impl Entity for QualityCheck {
    const COLLECTION: Collection = Collection::QualityChecks;
    const LABEL: &'static str = "Quality check";
    type New = NewQualityCheck;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(new: NewQualityCheck, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            item_reference: new.item_reference.unwrap_or_default(),
            inspector: new.inspector,
            parameters: new.parameters,
            results: new.results,
            status: new.status.unwrap_or_default(),
            remarks: new.remarks,
            inspection_date: now,
            created_at: now,
        }
    }
}
