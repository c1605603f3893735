use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, MutableEntity};
use crate::database::Collection;

/// A production batch moving through the shop floor.
///
/// `process_id` and `process_name` are copies taken when the batch starts.
/// `current_stage` is free text; the client offers Preparation, Machining,
/// Assembly, Finishing and Quality Check. `progress` is a percentage but is
/// stored as sent, without clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipBatch {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub batch_number: String,
    pub process_id: Option<String>,
    pub process_name: Option<String>,
    pub quantity: i64,
    pub current_stage: Option<String>,
    pub assigned_operator: Option<String>,
    pub progress: i64,
    pub notes: Option<String>,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewWipBatch {
    pub batch_number: Option<String>,
    pub process_id: Option<String>,
    pub process_name: Option<String>,
    pub quantity: Option<i64>,
    pub current_stage: Option<String>,
    pub assigned_operator: Option<String>,
    pub progress: Option<i64>,
    pub notes: Option<String>,
}

/// `startDate` is not patchable.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WipBatchPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for WipBatch {
    const COLLECTION: Collection = Collection::Wip;
    const LABEL: &'static str = "WIP item";
    type New = NewWipBatch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(new: NewWipBatch, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            batch_number: new.batch_number.unwrap_or_default(),
            process_id: new.process_id.filter(|s| !s.is_empty()),
            process_name: new.process_name,
            quantity: new.quantity.unwrap_or(1),
            current_stage: new.current_stage,
            assigned_operator: new.assigned_operator,
            progress: new.progress.unwrap_or(0),
            notes: new.notes,
            start_date: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl MutableEntity for WipBatch {
    const ACK_LABEL: &'static str = "WIP";
    type Patch = WipBatchPatch;
}
