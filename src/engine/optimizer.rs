// ==========================================
// 价值工程决策引擎 - 加权优选引擎
// ==========================================
// 职责: 按权重三元组为每个材料选出加权分最高的方案, 并汇总指标
// 规则:
// - weighted = 功能*w_f + 设计*w_d + 成本*w_c
// - 并列时 rank 小者胜出（原方案优先）
// - 分类指标按数量加权; 组合指标 = 分类求和 + 按材料数加权平均分
// - 除数为 0 时结果记 0
// ==========================================

use crate::domain::{
    CategoryGroup, CategoryMetrics, PortfolioMetrics, ScoredAlternative, ScoredSet, Selection,
    StrategyRun,
};
use crate::engine::strategy::{StrategyDefinition, StrategyWeights};
use tracing::{debug, warn};

/// 加权分并列判定容差
const TIE_EPSILON: f64 = 1e-9;

pub fn weighted_score(alt: &ScoredAlternative, weights: &StrategyWeights) -> f64 {
    alt.scores
        .weighted(weights.functional, weights.design, weights.cost)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// ==========================================
// SelectionOptimizer - 加权优选引擎
// ==========================================
pub struct SelectionOptimizer;

impl SelectionOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// 运行一个策略: 逐材料选择 + 分类/组合汇总
    pub fn run(&self, definition: &StrategyDefinition, sets: &[ScoredSet]) -> StrategyRun {
        let weights = definition.weights;
        if !weights.validate() {
            warn!(
                strategy = %definition.strategy_id,
                sum = weights.sum(),
                "策略权重之和不为 1, 按原值计算"
            );
        }

        let selections: Vec<Selection> = sets
            .iter()
            .filter_map(|set| self.select(set, &weights))
            .collect();

        let categories: Vec<(CategoryGroup, CategoryMetrics)> = CategoryGroup::ALL
            .iter()
            .map(|group| {
                let members: Vec<&Selection> =
                    selections.iter().filter(|s| s.group == *group).collect();
                (*group, Self::category_metrics(&members))
            })
            .collect();

        let category_values: Vec<CategoryMetrics> = categories.iter().map(|(_, m)| *m).collect();
        let overall = Self::portfolio_metrics(&category_values);

        debug!(
            strategy = %definition.strategy_id,
            selections = selections.len(),
            savings = overall.total_cost_savings,
            reduction_pct = overall.cost_reduction_pct,
            "策略优选完成"
        );

        StrategyRun {
            strategy_id: definition.strategy_id.clone(),
            title: definition.title.clone(),
            weights: weights.as_array(),
            selections,
            categories,
            overall,
        }
    }

    /// 选择加权分最高的方案; 集合为空时返回 None
    pub fn select(&self, set: &ScoredSet, weights: &StrategyWeights) -> Option<Selection> {
        let mut best: Option<(f64, &ScoredAlternative)> = None;
        for alt in &set.alternatives {
            let score = weighted_score(alt, weights);
            best = match best {
                None => Some((score, alt)),
                Some((best_score, best_alt)) => {
                    let replace = if (score - best_score).abs() <= TIE_EPSILON {
                        alt.rank() < best_alt.rank()
                    } else {
                        score > best_score
                    };
                    if replace {
                        Some((score, alt))
                    } else {
                        Some((best_score, best_alt))
                    }
                }
            };
        }

        best.map(|(score, chosen)| Selection {
            material_id: set.material.material_id().to_string(),
            group: set.material.category().group(),
            quantity: set.material.quantity(),
            chosen: chosen.clone(),
            weighted_score: score,
        })
    }

    /// 分类指标（数量加权）
    pub fn category_metrics(selections: &[&Selection]) -> CategoryMetrics {
        let total_original_cost: f64 = selections.iter().map(|s| s.original_total()).sum();
        let total_selected_cost: f64 = selections.iter().map(|s| s.selected_total()).sum();
        let total_cost_savings = total_original_cost - total_selected_cost;
        let total_quantity: u64 = selections.iter().map(|s| s.quantity as u64).sum();
        let qty = total_quantity as f64;

        let weighted_sum = |f: fn(&Selection) -> f64| -> f64 {
            selections.iter().map(|s| f(s) * s.quantity as f64).sum()
        };

        CategoryMetrics {
            total_original_cost,
            total_selected_cost,
            total_cost_savings,
            cost_reduction_pct: ratio(total_cost_savings, total_original_cost) * 100.0,
            avg_functional_score: ratio(weighted_sum(|s| s.chosen.scores.functional), qty),
            avg_design_score: ratio(weighted_sum(|s| s.chosen.scores.design), qty),
            avg_cost_score: ratio(weighted_sum(|s| s.chosen.scores.cost as f64), qty),
            total_quantity,
            num_materials: selections.len(),
        }
    }

    /// 组合指标（分类求和 + 按材料数加权平均分）
    pub fn portfolio_metrics(categories: &[CategoryMetrics]) -> PortfolioMetrics {
        let total_original_cost: f64 = categories.iter().map(|m| m.total_original_cost).sum();
        let total_selected_cost: f64 = categories.iter().map(|m| m.total_selected_cost).sum();
        let total_cost_savings = total_original_cost - total_selected_cost;
        let num_materials: usize = categories.iter().map(|m| m.num_materials).sum();
        let n = num_materials as f64;

        let weighted_avg = |f: fn(&CategoryMetrics) -> f64| -> f64 {
            ratio(
                categories.iter().map(|m| f(m) * m.num_materials as f64).sum(),
                n,
            )
        };

        PortfolioMetrics {
            total_original_cost,
            total_selected_cost,
            total_cost_savings,
            cost_reduction_pct: ratio(total_cost_savings, total_original_cost) * 100.0,
            avg_functional_score: weighted_avg(|m| m.avg_functional_score),
            avg_design_score: weighted_avg(|m| m.avg_design_score),
            avg_cost_score: weighted_avg(|m| m.avg_cost_score),
            num_materials,
        }
    }
}

impl Default for SelectionOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
