pub mod finished_product;
pub mod process;
pub mod quality_check;
pub mod raw_material;
pub mod wip;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::database::Collection;

pub use finished_product::{FinishedProduct, FinishedProductPatch, NewFinishedProduct};
pub use process::{InputMaterial, NewProcess, Process, ProcessPatch};
pub use quality_check::{NewQualityCheck, QualityCheck};
pub use raw_material::{NewRawMaterial, RawMaterial, RawMaterialPatch};
pub use wip::{NewWipBatch, WipBatch, WipBatchPatch};

/// A record type stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Human-readable name used in response messages, e.g. "Material".
    const LABEL: &'static str;

    /// Creation payload. Every field is optional on the wire; defaults are
    /// filled in by `from_new`.
    type New: DeserializeOwned + Send + 'static;

    fn id(&self) -> Uuid;

    fn from_new(new: Self::New, id: Uuid, now: DateTime<Utc>) -> Self;
}

/// Entities that support update and delete. Quality checks are append-only
/// and do not implement this.
pub trait MutableEntity: Entity {
    /// Name used in update and delete acknowledgements. Differs from
    /// `LABEL` only where the two messages historically disagree.
    const ACK_LABEL: &'static str = <Self as Entity>::LABEL;

    /// Partial update. Absent fields serialize to nothing and leave the
    /// stored value alone.
    type Patch: Serialize + DeserializeOwned + Send + 'static;
}

/// Field stamped on every update.
pub const UPDATED_AT_FIELD: &str = "updatedAt";
