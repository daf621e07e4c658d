// ==========================================
// 价值工程决策引擎 - 流水线配置读取 Trait
// ==========================================
// 职责: 定义各引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::strategy_profile::CustomStrategyProfile;

// ==========================================
// PipelineConfigReader Trait
// ==========================================
// 用途: 替代方案/评分/报告所需的配置读取接口
// 实现者: ConfigManager（JSON 文件 + 环境变量覆写）
pub trait PipelineConfigReader: Send + Sync {
    // ===== 替代方案生成 =====

    /// 窗/门单个材料的替代方案上限
    ///
    /// # 默认值
    /// - 3
    fn get_max_alternatives(&self) -> ConfigResult<usize>;

    /// 容差阶梯停止放宽所需的最少候选数
    ///
    /// # 默认值
    /// - 3
    fn get_min_candidates(&self) -> ConfigResult<usize>;

    /// 窗面积差容差阶梯 (%)
    ///
    /// # 默认值
    /// - [20, 30]
    fn get_window_area_tolerance_ladder(&self) -> ConfigResult<Vec<f64>>;

    /// 窗替代方案模式（cheapest / strategic）
    ///
    /// # 默认值
    /// - cheapest
    fn get_window_mode(&self) -> ConfigResult<String>;

    /// 内门宽度容差 (in)
    ///
    /// # 默认值
    /// - 6
    fn get_interior_door_width_tolerance_in(&self) -> ConfigResult<f64>;

    /// 外门最小开口高度 (in)
    ///
    /// # 默认值
    /// - 84
    fn get_exterior_door_min_height_in(&self) -> ConfigResult<f64>;

    /// 是否允许同价补位
    ///
    /// # 默认值
    /// - true
    fn get_allow_same_price_fill(&self) -> ConfigResult<bool>;

    /// 战略模式面积差容差阶梯 (%)
    ///
    /// # 默认值
    /// - [20, 30, 40]
    fn get_strategic_area_tolerance_ladder(&self) -> ConfigResult<Vec<f64>>;

    // ===== 评分 =====

    /// 评分模式（rule / model）
    ///
    /// # 默认值
    /// - rule
    fn get_scoring_mode(&self) -> ConfigResult<String>;

    /// 外部评估服务地址; 未配置时为 None
    fn get_evaluator_endpoint(&self) -> ConfigResult<Option<String>>;

    /// 外部评估超时（毫秒）
    ///
    /// # 默认值
    /// - 10000
    fn get_evaluator_timeout_ms(&self) -> ConfigResult<u64>;

    /// 外部评估模型名
    ///
    /// # 默认值
    /// - default
    fn get_evaluator_model(&self) -> ConfigResult<String>;

    /// 外部评估 API Key（仅从环境变量读取）
    fn get_evaluator_api_key(&self) -> ConfigResult<Option<String>>;

    // ===== 报告 =====

    /// 报告语言
    ///
    /// # 默认值
    /// - zh-CN
    fn get_report_locale(&self) -> ConfigResult<String>;

    /// 自定义策略列表
    ///
    /// # 默认值
    /// - []
    fn get_custom_strategies(&self) -> ConfigResult<Vec<CustomStrategyProfile>>;
}
