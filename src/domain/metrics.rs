// ==========================================
// 价值工程决策引擎 - 选择结果与汇总指标
// ==========================================
// 每次策略运行重新计算, 不作为可变状态保存
// ==========================================

use crate::domain::alternative::ScoredAlternative;
use crate::domain::types::CategoryGroup;
use serde::{Deserialize, Serialize};

/// 某策略下单个材料的选中方案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub material_id: String,
    pub group: CategoryGroup,
    pub quantity: u32,
    pub chosen: ScoredAlternative,
    pub weighted_score: f64,
}

impl Selection {
    pub fn rank(&self) -> u32 {
        self.chosen.rank()
    }

    pub fn original_total(&self) -> f64 {
        self.chosen.alternative.original_cost * self.quantity as f64
    }

    pub fn selected_total(&self) -> f64 {
        self.chosen.alternative.item.total_cost * self.quantity as f64
    }
}

/// 分类指标（按数量加权）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryMetrics {
    pub total_original_cost: f64,
    pub total_selected_cost: f64,
    pub total_cost_savings: f64,
    pub cost_reduction_pct: f64,
    pub avg_functional_score: f64,
    pub avg_design_score: f64,
    pub avg_cost_score: f64,
    pub total_quantity: u64,
    pub num_materials: usize,
}

/// 组合层指标（分类求和 + 按材料数加权的平均分）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_original_cost: f64,
    pub total_selected_cost: f64,
    pub total_cost_savings: f64,
    pub cost_reduction_pct: f64,
    pub avg_functional_score: f64,
    pub avg_design_score: f64,
    pub avg_cost_score: f64,
    pub num_materials: usize,
}

/// 单次策略运行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy_id: String,
    pub title: String,
    pub weights: [f64; 3],
    pub selections: Vec<Selection>,
    pub categories: Vec<(CategoryGroup, CategoryMetrics)>,
    pub overall: PortfolioMetrics,
}

impl StrategyRun {
    pub fn category(&self, group: CategoryGroup) -> Option<&CategoryMetrics> {
        self.categories
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, m)| m)
    }
}
