// ==========================================
// 价值工程决策引擎 - 导出行结构
// ==========================================
// 每张表一个扁平行结构; 列名为大写蛇形
// 表头由 HEADERS 显式写出, 空表也保留表头
// ==========================================

use crate::domain::{
    Alternative, CategoryGroup, CategoryMetrics, MatchedMaterial, PortfolioMetrics,
    ScoredAlternative, Selection, UnmatchedMaterial,
};
use serde::Serialize;

/// 可导出为 CSV 的行
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

fn alternative_kind_label(alt: &Alternative) -> &'static str {
    match alt.kind.origin() {
        Some(origin) => origin.as_str(),
        None => "original",
    }
}

// ==========================================
// 匹配结果
// ==========================================
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MatchedRow {
    pub material_id: String,
    pub category: &'static str,
    pub location: String,
    pub style: String,
    pub quantity: u32,
    pub matched_code: String,
    pub matched_description: String,
    pub unit_material_cost: f64,
    pub unit_install_cost: f64,
    pub unit_total_cost: f64,
    pub total_material_cost: f64,
    pub total_install_cost: f64,
    pub total_cost: f64,
    pub target_width_in: f64,
    pub target_height_in: f64,
    pub target_area_sqft: f64,
}

impl TableRow for MatchedRow {
    const HEADERS: &'static [&'static str] = &[
        "MATERIAL_ID",
        "CATEGORY",
        "LOCATION",
        "STYLE",
        "QUANTITY",
        "MATCHED_CODE",
        "MATCHED_DESCRIPTION",
        "UNIT_MATERIAL_COST",
        "UNIT_INSTALL_COST",
        "UNIT_TOTAL_COST",
        "TOTAL_MATERIAL_COST",
        "TOTAL_INSTALL_COST",
        "TOTAL_COST",
        "TARGET_WIDTH_IN",
        "TARGET_HEIGHT_IN",
        "TARGET_AREA_SQFT",
    ];
}

impl From<&MatchedMaterial> for MatchedRow {
    fn from(m: &MatchedMaterial) -> Self {
        Self {
            material_id: m.spec.material_id.clone(),
            category: m.category().as_str(),
            location: m.spec.location.clone(),
            style: m.spec.style.clone(),
            quantity: m.quantity(),
            matched_code: m.item.code.clone(),
            matched_description: m.item.description.clone(),
            unit_material_cost: m.item.material_cost,
            unit_install_cost: m.item.install_cost,
            unit_total_cost: m.item.total_cost,
            total_material_cost: m.total_material_cost(),
            total_install_cost: m.total_install_cost(),
            total_cost: m.total_cost(),
            target_width_in: m.target.width_in,
            target_height_in: m.target.height_in,
            target_area_sqft: m.target.area_sqft,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UnmatchedRow {
    pub material_id: String,
    pub category: &'static str,
    pub width: String,
    pub height: String,
    pub style: String,
    pub material: String,
    pub quantity: u32,
    pub reason: String,
}

impl TableRow for UnmatchedRow {
    const HEADERS: &'static [&'static str] = &[
        "MATERIAL_ID",
        "CATEGORY",
        "WIDTH",
        "HEIGHT",
        "STYLE",
        "MATERIAL",
        "QUANTITY",
        "REASON",
    ];
}

impl From<&UnmatchedMaterial> for UnmatchedRow {
    fn from(u: &UnmatchedMaterial) -> Self {
        Self {
            material_id: u.spec.material_id.clone(),
            category: u.spec.category.as_str(),
            width: u.spec.width.clone(),
            height: u.spec.height.clone(),
            style: u.spec.style.clone(),
            material: u.spec.material.clone(),
            quantity: u.spec.quantity,
            reason: u.reason.clone(),
        }
    }
}

// ==========================================
// 替代方案
// ==========================================
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AlternativeRow {
    pub material_id: String,
    pub category: &'static str,
    pub rank: u32,
    pub kind: &'static str,
    pub alt_code: String,
    pub alt_description: String,
    pub material_cost: f64,
    pub install_cost: f64,
    pub total_cost: f64,
    pub original_cost: f64,
    pub cost_reduction_pct: f64,
    pub quantity: u32,
    pub extended_total_cost: f64,
}

impl TableRow for AlternativeRow {
    const HEADERS: &'static [&'static str] = &[
        "MATERIAL_ID",
        "CATEGORY",
        "RANK",
        "KIND",
        "ALT_CODE",
        "ALT_DESCRIPTION",
        "MATERIAL_COST",
        "INSTALL_COST",
        "TOTAL_COST",
        "ORIGINAL_COST",
        "COST_REDUCTION_PCT",
        "QUANTITY",
        "EXTENDED_TOTAL_COST",
    ];
}

impl AlternativeRow {
    pub fn new(alt: &Alternative, quantity: u32) -> Self {
        Self {
            material_id: alt.material_id.clone(),
            category: alt.category.as_str(),
            rank: alt.rank(),
            kind: alternative_kind_label(alt),
            alt_code: alt.item.code.clone(),
            alt_description: alt.item.description.clone(),
            material_cost: alt.item.material_cost,
            install_cost: alt.item.install_cost,
            total_cost: alt.item.total_cost,
            original_cost: alt.original_cost,
            cost_reduction_pct: alt.cost_reduction_pct,
            quantity,
            extended_total_cost: alt.item.total_cost * quantity as f64,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ScoredRow {
    pub material_id: String,
    pub category: &'static str,
    pub rank: u32,
    pub kind: &'static str,
    pub alt_code: String,
    pub alt_description: String,
    pub total_cost: f64,
    pub original_cost: f64,
    pub cost_reduction_pct: f64,
    pub quantity: u32,
    pub extended_total_cost: f64,
    pub functional_score: f64,
    pub design_score: f64,
    pub cost_score: u8,
    pub score_source: String,
}

impl TableRow for ScoredRow {
    const HEADERS: &'static [&'static str] = &[
        "MATERIAL_ID",
        "CATEGORY",
        "RANK",
        "KIND",
        "ALT_CODE",
        "ALT_DESCRIPTION",
        "TOTAL_COST",
        "ORIGINAL_COST",
        "COST_REDUCTION_PCT",
        "QUANTITY",
        "EXTENDED_TOTAL_COST",
        "FUNCTIONAL_SCORE",
        "DESIGN_SCORE",
        "COST_SCORE",
        "SCORE_SOURCE",
    ];
}

impl ScoredRow {
    pub fn new(scored: &ScoredAlternative, quantity: u32) -> Self {
        let alt = &scored.alternative;
        Self {
            material_id: alt.material_id.clone(),
            category: alt.category.as_str(),
            rank: alt.rank(),
            kind: alternative_kind_label(alt),
            alt_code: alt.item.code.clone(),
            alt_description: alt.item.description.clone(),
            total_cost: alt.item.total_cost,
            original_cost: alt.original_cost,
            cost_reduction_pct: alt.cost_reduction_pct,
            quantity,
            extended_total_cost: alt.item.total_cost * quantity as f64,
            functional_score: scored.scores.functional,
            design_score: scored.scores.design,
            cost_score: scored.scores.cost,
            score_source: scored.source.to_string(),
        }
    }
}

// ==========================================
// 策略优选与指标
// ==========================================
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SelectionRow {
    pub strategy: String,
    pub material_id: String,
    pub category: &'static str,
    pub quantity: u32,
    pub selected_rank: u32,
    pub selected_code: String,
    pub selected_description: String,
    pub original_total: f64,
    pub selected_total: f64,
    pub savings: f64,
    pub cost_reduction_pct: f64,
    pub functional_score: f64,
    pub design_score: f64,
    pub cost_score: u8,
    pub weighted_score: f64,
}

impl TableRow for SelectionRow {
    const HEADERS: &'static [&'static str] = &[
        "STRATEGY",
        "MATERIAL_ID",
        "CATEGORY",
        "QUANTITY",
        "SELECTED_RANK",
        "SELECTED_CODE",
        "SELECTED_DESCRIPTION",
        "ORIGINAL_TOTAL",
        "SELECTED_TOTAL",
        "SAVINGS",
        "COST_REDUCTION_PCT",
        "FUNCTIONAL_SCORE",
        "DESIGN_SCORE",
        "COST_SCORE",
        "WEIGHTED_SCORE",
    ];
}

impl SelectionRow {
    pub fn new(strategy_id: &str, selection: &Selection) -> Self {
        let chosen = &selection.chosen;
        Self {
            strategy: strategy_id.to_string(),
            material_id: selection.material_id.clone(),
            category: selection.group.as_str(),
            quantity: selection.quantity,
            selected_rank: selection.rank(),
            selected_code: chosen.alternative.item.code.clone(),
            selected_description: chosen.alternative.item.description.clone(),
            original_total: selection.original_total(),
            selected_total: selection.selected_total(),
            savings: selection.original_total() - selection.selected_total(),
            cost_reduction_pct: chosen.alternative.cost_reduction_pct,
            functional_score: chosen.scores.functional,
            design_score: chosen.scores.design,
            cost_score: chosen.scores.cost,
            weighted_score: selection.weighted_score,
        }
    }
}

/// 分类或组合层指标; 组合层 TOTAL_QUANTITY 留空
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MetricsRow {
    pub strategy: String,
    pub scope: String,
    pub total_original_cost: f64,
    pub total_selected_cost: f64,
    pub total_cost_savings: f64,
    pub cost_reduction_pct: f64,
    pub avg_functional_score: f64,
    pub avg_design_score: f64,
    pub avg_cost_score: f64,
    pub total_quantity: Option<u64>,
    pub num_materials: usize,
}

impl TableRow for MetricsRow {
    const HEADERS: &'static [&'static str] = &[
        "STRATEGY",
        "SCOPE",
        "TOTAL_ORIGINAL_COST",
        "TOTAL_SELECTED_COST",
        "TOTAL_COST_SAVINGS",
        "COST_REDUCTION_PCT",
        "AVG_FUNCTIONAL_SCORE",
        "AVG_DESIGN_SCORE",
        "AVG_COST_SCORE",
        "TOTAL_QUANTITY",
        "NUM_MATERIALS",
    ];
}

impl MetricsRow {
    pub const OVERALL_SCOPE: &'static str = "overall";

    pub fn category(strategy_id: &str, group: CategoryGroup, m: &CategoryMetrics) -> Self {
        Self {
            strategy: strategy_id.to_string(),
            scope: group.as_str().to_string(),
            total_original_cost: m.total_original_cost,
            total_selected_cost: m.total_selected_cost,
            total_cost_savings: m.total_cost_savings,
            cost_reduction_pct: m.cost_reduction_pct,
            avg_functional_score: m.avg_functional_score,
            avg_design_score: m.avg_design_score,
            avg_cost_score: m.avg_cost_score,
            total_quantity: Some(m.total_quantity),
            num_materials: m.num_materials,
        }
    }

    pub fn overall(strategy_id: &str, m: &PortfolioMetrics) -> Self {
        Self {
            strategy: strategy_id.to_string(),
            scope: Self::OVERALL_SCOPE.to_string(),
            total_original_cost: m.total_original_cost,
            total_selected_cost: m.total_selected_cost,
            total_cost_savings: m.total_cost_savings,
            cost_reduction_pct: m.cost_reduction_pct,
            avg_functional_score: m.avg_functional_score,
            avg_design_score: m.avg_design_score,
            avg_cost_score: m.avg_cost_score,
            total_quantity: None,
            num_materials: m.num_materials,
        }
    }
}
