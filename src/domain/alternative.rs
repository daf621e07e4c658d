// ==========================================
// 价值工程决策引擎 - 替代方案实体
// ==========================================
// 原方案 / 生成方案 以标签变体区分, 不依赖 rank == 0 魔法值
// ==========================================

use crate::domain::material::{MatchedMaterial, PricedItem};
use crate::domain::types::{MaterialCategory, ScoreSource, StrategicRole};
use serde::{Deserialize, Serialize};

/// 生成方案的来源规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "role")]
pub enum AlternativeOrigin {
    /// 严格更便宜
    Cheaper,
    /// 同价补位（候选不足上限时追加, 不挤占更便宜的条目）
    SamePriceFill,
    /// 窗户战略模式的固定角色
    Strategic(StrategicRole),
    /// 电器固定折扣
    FlatDiscount,
}

impl AlternativeOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlternativeOrigin::Cheaper => "cheaper",
            AlternativeOrigin::SamePriceFill => "same_price_fill",
            AlternativeOrigin::Strategic(role) => role.as_str(),
            AlternativeOrigin::FlatDiscount => "flat_discount",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeKind {
    Original,
    Generated { rank: u32, origin: AlternativeOrigin },
}

impl AlternativeKind {
    pub fn rank(&self) -> u32 {
        match self {
            AlternativeKind::Original => 0,
            AlternativeKind::Generated { rank, .. } => *rank,
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, AlternativeKind::Original)
    }

    pub fn origin(&self) -> Option<AlternativeOrigin> {
        match self {
            AlternativeKind::Original => None,
            AlternativeKind::Generated { origin, .. } => Some(*origin),
        }
    }
}

// ==========================================
// Alternative - 替代方案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub material_id: String,
    pub category: MaterialCategory,
    pub kind: AlternativeKind,
    pub item: PricedItem,
    /// 原方案单价（总价口径）
    pub original_cost: f64,
    pub cost_reduction_pct: f64,
}

impl Alternative {
    pub fn rank(&self) -> u32 {
        self.kind.rank()
    }

    pub fn original(matched: &MatchedMaterial) -> Self {
        Self {
            material_id: matched.material_id().to_string(),
            category: matched.category(),
            kind: AlternativeKind::Original,
            item: matched.item.clone(),
            original_cost: matched.unit_total_cost(),
            cost_reduction_pct: 0.0,
        }
    }
}

/// 单个材料的方案集合（下标 0 恒为原方案）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSet {
    pub material: MatchedMaterial,
    pub alternatives: Vec<Alternative>,
}

impl AlternativeSet {
    /// 生成方案（不含原方案）
    pub fn generated(&self) -> impl Iterator<Item = &Alternative> {
        self.alternatives.iter().filter(|a| !a.kind.is_original())
    }

    pub fn generated_count(&self) -> usize {
        self.generated().count()
    }
}

// ==========================================
// 评分
// ==========================================
/// 三项评分; 功能/设计可带小数 (规则微调), 成本为阶梯整数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriteriaScores {
    pub functional: f64,
    pub design: f64,
    pub cost: u8,
}

impl CriteriaScores {
    /// 原方案固定分
    pub const ORIGINAL: CriteriaScores = CriteriaScores {
        functional: 5.0,
        design: 5.0,
        cost: 1,
    };

    pub fn weighted(&self, w_functional: f64, w_design: f64, w_cost: f64) -> f64 {
        self.functional * w_functional + self.design * w_design + self.cost as f64 * w_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAlternative {
    pub alternative: Alternative,
    pub scores: CriteriaScores,
    pub source: ScoreSource,
}

impl ScoredAlternative {
    pub fn rank(&self) -> u32 {
        self.alternative.rank()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSet {
    pub material: MatchedMaterial,
    pub alternatives: Vec<ScoredAlternative>,
}
