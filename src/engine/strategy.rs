// ==========================================
// 价值工程决策引擎 - 策略定义
// ==========================================
// 用途：
// - 四个预设策略对应固定权重三元组 (功能, 设计, 成本)；
// - 自定义策略从配置加载, 与预设策略一起参与优选。

use crate::config::strategy_profile::CustomStrategyProfile;
use serde::{Deserialize, Serialize};

/// 权重三元组; 调用方约定三者之和为 1 (不强制)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub functional: f64,
    pub design: f64,
    pub cost: f64,
}

impl StrategyWeights {
    pub const fn new(functional: f64, design: f64, cost: f64) -> Self {
        Self {
            functional,
            design,
            cost,
        }
    }

    pub fn sum(&self) -> f64 {
        self.functional + self.design + self.cost
    }

    /// 三项之和是否约等于 1
    pub fn validate(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }

    /// 所有分量有限且非负, 且不全为 0
    pub fn is_usable(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite() && *w >= 0.0) && self.sum() > 0.0
    }

    /// 归一化使三项之和为 1
    pub fn normalise(&mut self) {
        let sum = self.sum();
        if sum > 0.0 {
            self.functional /= sum;
            self.design /= sum;
            self.cost /= sum;
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.functional, self.design, self.cost]
    }
}

impl Default for StrategyWeights {
    fn default() -> Self {
        OptimizationStrategy::Balanced.weights()
    }
}

/// 优选策略（预设）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    BestFunctional,
    BestCost,
    BestDesign,
    Balanced,
}

impl OptimizationStrategy {
    pub const ALL: [OptimizationStrategy; 4] = [
        OptimizationStrategy::BestFunctional,
        OptimizationStrategy::BestCost,
        OptimizationStrategy::BestDesign,
        OptimizationStrategy::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationStrategy::BestFunctional => "best_functional",
            OptimizationStrategy::BestCost => "best_cost",
            OptimizationStrategy::BestDesign => "best_design",
            OptimizationStrategy::Balanced => "balanced",
        }
    }

    pub fn title_cn(&self) -> &'static str {
        match self {
            OptimizationStrategy::BestFunctional => "功能优先",
            OptimizationStrategy::BestCost => "成本优先",
            OptimizationStrategy::BestDesign => "设计优先",
            OptimizationStrategy::Balanced => "均衡方案",
        }
    }

    /// i18n 键
    pub fn title_key(&self) -> String {
        format!("strategy.{}", self.as_str())
    }

    pub fn weights(&self) -> StrategyWeights {
        match self {
            OptimizationStrategy::BestFunctional => StrategyWeights::new(1.0, 0.0, 0.0),
            OptimizationStrategy::BestCost => StrategyWeights::new(0.0, 0.0, 1.0),
            OptimizationStrategy::BestDesign => StrategyWeights::new(0.0, 1.0, 0.0),
            OptimizationStrategy::Balanced => {
                StrategyWeights::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
            }
        }
    }
}

impl Default for OptimizationStrategy {
    fn default() -> Self {
        OptimizationStrategy::Balanced
    }
}

impl std::str::FromStr for OptimizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best_functional" | "best-functional" | "functional" => {
                Ok(OptimizationStrategy::BestFunctional)
            }
            "best_cost" | "best-cost" | "cost" => Ok(OptimizationStrategy::BestCost),
            "best_design" | "best-design" | "design" => Ok(OptimizationStrategy::BestDesign),
            "balanced" => Ok(OptimizationStrategy::Balanced),
            other => Err(format!("未知策略类型: {}", other)),
        }
    }
}

/// 一次优选运行所用的具名策略（预设或自定义）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDefinition {
    pub strategy_id: String,
    pub title: String,
    pub weights: StrategyWeights,
}

impl From<OptimizationStrategy> for StrategyDefinition {
    fn from(strategy: OptimizationStrategy) -> Self {
        Self {
            strategy_id: strategy.as_str().to_string(),
            title: strategy.title_cn().to_string(),
            weights: strategy.weights(),
        }
    }
}

impl StrategyDefinition {
    /// 四个预设策略
    pub fn canonical() -> Vec<StrategyDefinition> {
        OptimizationStrategy::ALL
            .iter()
            .copied()
            .map(StrategyDefinition::from)
            .collect()
    }

    /// 自定义策略: 以预设策略权重为底, 参数中给出的分量覆盖之
    pub fn from_profile(profile: &CustomStrategyProfile) -> Result<Self, String> {
        let base: OptimizationStrategy = profile.base_strategy.parse()?;
        let base_weights = base.weights();
        let params = &profile.parameters;
        let weights = StrategyWeights::new(
            params.functional_weight.unwrap_or(base_weights.functional),
            params.design_weight.unwrap_or(base_weights.design),
            params.cost_weight.unwrap_or(base_weights.cost),
        );

        Ok(Self {
            strategy_id: profile.strategy_id.trim().to_string(),
            title: profile.title.clone(),
            weights,
        })
    }
}
