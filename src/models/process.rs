use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, MutableEntity};
use crate::database::Collection;

pub const DEFAULT_PROCESS_STATUS: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputMaterial {
    pub material_name: String,
    pub quantity: f64,
    pub unit: String,
}

/// A manufacturing recipe. WIP batches copy its name; nothing enforces
/// that the reference stays valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub output_product: Option<String>,
    /// Hours.
    pub estimated_duration: f64,
    pub input_materials: Vec<InputMaterial>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProcess {
    pub name: Option<String>,
    pub description: Option<String>,
    pub output_product: Option<String>,
    pub estimated_duration: Option<f64>,
    pub input_materials: Option<Vec<InputMaterial>>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_materials: Option<Vec<InputMaterial>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Entity for Process {
    const COLLECTION: Collection = Collection::Processes;
    const LABEL: &'static str = "Process";
    type New = NewProcess;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(new: NewProcess, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name.unwrap_or_default(),
            description: new.description,
            output_product: new.output_product,
            estimated_duration: new.estimated_duration.unwrap_or(0.0),
            input_materials: new.input_materials.unwrap_or_default(),
            status: new
                .status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_PROCESS_STATUS.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl MutableEntity for Process {
    type Patch = ProcessPatch;
}
