use serde::{Deserialize, Serialize};

/// 自定义策略（配置对象）
///
/// 存储位置：配置文件 `custom_strategies` 键（JSON 数组）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomStrategyProfile {
    /// 自定义策略 ID（用于选择/引用/导出文件名）
    pub strategy_id: String,

    /// 显示名称
    pub title: String,

    /// 说明（可选）
    #[serde(default)]
    pub description: Option<String>,

    /// 基于哪个预设策略（best_functional/best_cost/best_design/balanced）
    #[serde(default = "default_base_strategy")]
    pub base_strategy: String,

    /// 参数（未给出的权重沿用预设策略）
    #[serde(default)]
    pub parameters: CustomStrategyParameters,
}

fn default_base_strategy() -> String {
    "balanced".to_string()
}

/// 自定义策略参数
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomStrategyParameters {
    /// 功能保真权重
    #[serde(default)]
    pub functional_weight: Option<f64>,

    /// 设计保真权重
    #[serde(default)]
    pub design_weight: Option<f64>,

    /// 降本权重
    #[serde(default)]
    pub cost_weight: Option<f64>,
}
