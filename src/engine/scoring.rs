// ==========================================
// 价值工程决策引擎 - 三项评分
// ==========================================
// 功能 / 设计: 评估器链 (外部模型 → 规则回退)
// 成本: 降本百分比阶梯, 纯函数
// 固定分:
// - 原方案 (5, 5, 1), 不调用任何评分规则
// - 电器折扣方案 (5, 5, 2), 与计算出的 10% 无关
// ==========================================

use crate::domain::{
    AlternativeOrigin, AlternativeSet, CriteriaScores, ScoreSource, ScoredAlternative, ScoredSet,
};
use crate::engine::cost::cost_score;
use crate::engine::evaluator::{EvaluationRequest, EvaluatorChain};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 功能/设计评分模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// 仅规则评分
    Rule,
    /// 外部模型评分, 失败时回退规则
    Model,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Rule => "rule",
            ScoringMode::Model => "model",
        }
    }
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Rule
    }
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rule" | "rules" | "heuristic" => Ok(ScoringMode::Rule),
            "model" | "remote" | "llm" => Ok(ScoringMode::Model),
            other => Err(format!("未知评分模式: {}", other)),
        }
    }
}

/// 电器折扣方案固定分
pub const APPLIANCE_DISCOUNT_SCORES: CriteriaScores = CriteriaScores {
    functional: 5.0,
    design: 5.0,
    cost: 2,
};

pub struct CriteriaScorer {
    chain: EvaluatorChain,
}

impl CriteriaScorer {
    pub fn new(chain: EvaluatorChain) -> Self {
        Self { chain }
    }

    pub fn score_all(&self, sets: &[AlternativeSet]) -> Vec<ScoredSet> {
        let scored: Vec<ScoredSet> = sets.iter().map(|s| self.score_set(s)).collect();

        let fallbacks = scored
            .iter()
            .flat_map(|s| s.alternatives.iter())
            .filter(|a| a.source == ScoreSource::Fallback)
            .count();
        info!(
            materials = scored.len(),
            evaluator = self.chain.primary_name(),
            fallbacks,
            "评分完成"
        );
        scored
    }

    pub fn score_set(&self, set: &AlternativeSet) -> ScoredSet {
        let original_item = &set.material.item;

        let alternatives = set
            .alternatives
            .iter()
            .map(|alt| {
                let (scores, source) = match alt.kind.origin() {
                    None => (CriteriaScores::ORIGINAL, ScoreSource::Pinned),
                    Some(AlternativeOrigin::FlatDiscount) => {
                        (APPLIANCE_DISCOUNT_SCORES, ScoreSource::Pinned)
                    }
                    Some(_) => {
                        let request = EvaluationRequest {
                            category: alt.category,
                            original: original_item,
                            alternative: &alt.item,
                            cost_reduction_pct: alt.cost_reduction_pct,
                        };
                        let (fidelity, source) = self.chain.evaluate(&request);
                        (
                            CriteriaScores {
                                functional: fidelity.functional,
                                design: fidelity.design,
                                cost: cost_score(alt.cost_reduction_pct),
                            },
                            source,
                        )
                    }
                };
                ScoredAlternative {
                    alternative: alt.clone(),
                    scores,
                    source,
                }
            })
            .collect();

        ScoredSet {
            material: set.material.clone(),
            alternatives,
        }
    }
}

impl Default for CriteriaScorer {
    fn default() -> Self {
        Self::new(EvaluatorChain::rules_only())
    }
}
