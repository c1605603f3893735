use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, MutableEntity};
use crate::database::Collection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub material_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub unit: String,
    pub supplier: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_per_unit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub minimum_stock_level: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RawMaterial {
    /// Low stock is inclusive: sitting exactly at the minimum counts.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.minimum_stock_level
    }

    pub fn stock_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.cost_per_unit)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRawMaterial {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub material_type: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub supplier: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub cost_per_unit: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub minimum_stock_level: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterialPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub cost_per_unit: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub minimum_stock_level: Option<Decimal>,
}

impl Entity for RawMaterial {
    const COLLECTION: Collection = Collection::RawMaterials;
    const LABEL: &'static str = "Material";
    type New = NewRawMaterial;

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_new(new: NewRawMaterial, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name.unwrap_or_default(),
            material_type: new.material_type.unwrap_or_default(),
            quantity: new.quantity.unwrap_or_default(),
            unit: new.unit.unwrap_or_default(),
            supplier: new.supplier.filter(|s| !s.trim().is_empty()),
            cost_per_unit: new.cost_per_unit.unwrap_or_default(),
            minimum_stock_level: new.minimum_stock_level.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl MutableEntity for RawMaterial {
    type Patch = RawMaterialPatch;
}
