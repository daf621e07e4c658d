// ==========================================
// 价值工程决策引擎 - 方案预设
// ==========================================
// 输出: 策略 ID → (材料 ID → 选中 rank), 供展示层直接读取
// 来源:
// - 每个加权策略运行的选择结果
// - 两个字典序预设: 功能+降本 / 设计+降本
// ==========================================

use crate::domain::{ScoredAlternative, ScoredSet, StrategyRun};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const PRESET_BEST_FUNCTIONAL_COST: &str = "best_functional_cost";
pub const PRESET_BEST_DESIGN_COST: &str = "best_design_cost";

/// 字典序预设的首要评分项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicographicCriterion {
    Functional,
    Design,
}

impl LexicographicCriterion {
    pub fn preset_id(&self) -> &'static str {
        match self {
            LexicographicCriterion::Functional => PRESET_BEST_FUNCTIONAL_COST,
            LexicographicCriterion::Design => PRESET_BEST_DESIGN_COST,
        }
    }

    fn score(&self, alt: &ScoredAlternative) -> f64 {
        match self {
            LexicographicCriterion::Functional => alt.scores.functional,
            LexicographicCriterion::Design => alt.scores.design,
        }
    }
}

/// 字典序选择: 仅考虑降本 > 0 的方案, 评分高者优先, 其次降本高, 再次 rank 小;
/// 没有任何降本方案时返回 0 (原方案)
pub fn lexicographic_rank(set: &ScoredSet, criterion: LexicographicCriterion) -> u32 {
    set.alternatives
        .iter()
        .filter(|a| !a.alternative.kind.is_original() && a.alternative.cost_reduction_pct > 0.0)
        .min_by(|a, b| {
            criterion
                .score(b)
                .partial_cmp(&criterion.score(a))
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.alternative
                        .cost_reduction_pct
                        .partial_cmp(&a.alternative.cost_reduction_pct)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.rank().cmp(&b.rank()))
        })
        .map(|a| a.rank())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetBook {
    presets: BTreeMap<String, BTreeMap<String, u32>>,
}

impl PresetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由策略运行结果与评分集合构建完整预设
    pub fn build(runs: &[StrategyRun], scored: &[ScoredSet]) -> Self {
        let mut book = Self::new();
        for run in runs {
            book.add_run(run);
        }
        for criterion in [LexicographicCriterion::Functional, LexicographicCriterion::Design] {
            for set in scored {
                book.insert(
                    criterion.preset_id(),
                    set.material.material_id(),
                    lexicographic_rank(set, criterion),
                );
            }
        }
        book
    }

    pub fn add_run(&mut self, run: &StrategyRun) {
        for selection in &run.selections {
            self.insert(&run.strategy_id, &selection.material_id, selection.rank());
        }
    }

    pub fn insert(&mut self, strategy_id: &str, material_id: &str, rank: u32) {
        self.presets
            .entry(strategy_id.to_string())
            .or_default()
            .insert(material_id.to_string(), rank);
    }

    pub fn rank(&self, strategy_id: &str, material_id: &str) -> Option<u32> {
        self.presets
            .get(strategy_id)
            .and_then(|m| m.get(material_id))
            .copied()
    }

    pub fn strategy_ids(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
