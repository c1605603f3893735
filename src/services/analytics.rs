//! Derived metrics over full collection snapshots.
//!
//! Nothing is cached: every call rescans the collections it needs. The
//! reductions are plain functions over slices so they can be tested without
//! a store. Percentages and money leave this module as fixed-decimal strings.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::Repository;
use crate::{
    database::Database,
    error::AppResult,
    models::{FinishedProduct, Process, QualityCheck, RawMaterial, WipBatch},
};

pub const LOW_STOCK_PREVIEW: usize = 5;
pub const QUALITY_WINDOW: usize = 100;
pub const TOP_MATERIALS: usize = 5;
pub const UNKNOWN_STAGE: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionCounts {
    pub raw_materials: u64,
    pub processes: u64,
    pub wip: u64,
    pub finished_products: u64,
    pub quality_checks: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub raw_materials_count: u64,
    pub processes_count: u64,
    pub wip_count: u64,
    pub finished_products_count: u64,
    pub quality_checks_count: u64,
    pub low_stock_count: usize,
    pub low_stock_materials: Vec<RawMaterial>,
    pub quality_issues_count: usize,
    pub quality_pass_rate: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionSummary {
    pub active_production: usize,
    pub completed_today: usize,
    pub average_progress: String,
    pub wip_by_stage: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MaterialValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_raw_material_value: String,
    pub total_finished_products: i64,
    pub raw_material_types: usize,
    pub finished_product_types: usize,
    pub top_materials: Vec<MaterialValue>,
}

fn money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Quality figures over the most recent inspections.
///
/// Returns `(pass_rate, failed)`. With no inspections at all the pass rate is
/// reported as 100.
pub fn quality_window(mut checks: Vec<QualityCheck>) -> (String, usize) {
    checks.sort_by(|a, b| b.inspection_date.cmp(&a.inspection_date));
    checks.truncate(QUALITY_WINDOW);

    if checks.is_empty() {
        return ("100.0".to_string(), 0);
    }

    let passed = checks.iter().filter(|c| c.passed()).count();
    let failed = checks.iter().filter(|c| c.failed()).count();
    let rate = passed as f64 / checks.len() as f64 * 100.0;
    (format!("{:.1}", rate), failed)
}

pub fn summarize_dashboard(
    counts: CollectionCounts,
    materials: Vec<RawMaterial>,
    checks: Vec<QualityCheck>,
) -> DashboardSummary {
    let mut low_stock: Vec<RawMaterial> = materials.into_iter().filter(|m| m.is_low_stock()).collect();
    let low_stock_count = low_stock.len();
    low_stock.truncate(LOW_STOCK_PREVIEW);

    let (quality_pass_rate, quality_issues_count) = quality_window(checks);

    DashboardSummary {
        raw_materials_count: counts.raw_materials,
        processes_count: counts.processes,
        wip_count: counts.wip,
        finished_products_count: counts.finished_products,
        quality_checks_count: counts.quality_checks,
        low_stock_count,
        low_stock_materials: low_stock,
        quality_issues_count,
        quality_pass_rate,
    }
}

pub fn stage_histogram(batches: &[WipBatch]) -> BTreeMap<String, usize> {
    let mut histogram = BTreeMap::new();
    for batch in batches {
        let stage = batch
            .current_stage
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_STAGE);
        *histogram.entry(stage.to_string()).or_insert(0) += 1;
    }
    histogram
}

pub fn average_progress(batches: &[WipBatch]) -> String {
    if batches.is_empty() {
        return "0.0".to_string();
    }
    let total: f64 = batches.iter().map(|b| b.progress as f64).sum();
    format!("{:.1}", total / batches.len() as f64)
}

pub fn summarize_production(
    batches: &[WipBatch],
    products: &[FinishedProduct],
    today: NaiveDate,
) -> ProductionSummary {
    let completed_today = products
        .iter()
        .filter(|p| p.manufacturing_day() == Some(today))
        .count();

    ProductionSummary {
        active_production: batches.len(),
        completed_today,
        average_progress: average_progress(batches),
        wip_by_stage: stage_histogram(batches),
    }
}

/// Materials ordered by on-hand value, highest first. Ties keep store order.
pub fn top_materials(materials: &[RawMaterial], limit: usize) -> Vec<MaterialValue> {
    let mut ranked: Vec<(&RawMaterial, Decimal)> =
        materials.iter().map(|m| (m, m.stock_value())).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(m, value)| MaterialValue {
            name: m.name.clone(),
            value: money(value),
        })
        .collect()
}

pub fn summarize_inventory(materials: &[RawMaterial], products: &[FinishedProduct]) -> InventorySummary {
    let total_value = materials
        .iter()
        .fold(Decimal::ZERO, |acc, m| acc.saturating_add(m.stock_value()));
    let total_units = products
        .iter()
        .fold(0i64, |acc, p| acc.saturating_add(p.quantity));

    InventorySummary {
        total_raw_material_value: money(total_value),
        total_finished_products: total_units,
        raw_material_types: materials.len(),
        finished_product_types: products.len(),
        top_materials: top_materials(materials, TOP_MATERIALS),
    }
}

/// Store-backed front for the three summaries.
#[derive(Clone)]
pub struct Analytics {
    materials: Repository<RawMaterial>,
    processes: Repository<Process>,
    wip: Repository<WipBatch>,
    products: Repository<FinishedProduct>,
    checks: Repository<QualityCheck>,
}

impl Analytics {
    pub fn new(db: Database) -> Self {
        Self {
            materials: Repository::new(db.clone()),
            processes: Repository::new(db.clone()),
            wip: Repository::new(db.clone()),
            products: Repository::new(db.clone()),
            checks: Repository::new(db),
        }
    }

    async fn counts(&self) -> AppResult<CollectionCounts> {
        let (raw_materials, processes, wip, finished_products, quality_checks) = tokio::try_join!(
            self.materials.count(),
            self.processes.count(),
            self.wip.count(),
            self.products.count(),
            self.checks.count()
        )?;
        Ok(CollectionCounts {
            raw_materials,
            processes,
            wip,
            finished_products,
            quality_checks,
        })
    }

    pub async fn dashboard(&self) -> AppResult<DashboardSummary> {
        let (counts, materials, checks) =
            tokio::try_join!(self.counts(), self.materials.list(), self.checks.list())?;
        Ok(summarize_dashboard(counts, materials, checks))
    }

    pub async fn production(&self, today: NaiveDate) -> AppResult<ProductionSummary> {
        let (batches, products) = tokio::try_join!(self.wip.list(), self.products.list())?;
        Ok(summarize_production(&batches, &products, today))
    }

    pub async fn inventory(&self) -> AppResult<InventorySummary> {
        let (materials, products) = tokio::try_join!(self.materials.list(), self.products.list())?;
        Ok(summarize_inventory(&materials, &products))
    }
}
