// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use ve_optimizer::config::{ConfigResult, CustomStrategyProfile, PipelineConfigReader};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub max_alternatives: usize,
    pub min_candidates: usize,
    pub window_area_tolerance_ladder: Vec<f64>,
    pub window_mode: String,
    pub interior_door_width_tolerance_in: f64,
    pub exterior_door_min_height_in: f64,
    pub allow_same_price_fill: bool,
    pub strategic_area_tolerance_ladder: Vec<f64>,
    pub scoring_mode: String,
    pub evaluator_endpoint: Option<String>,
    pub evaluator_timeout_ms: u64,
    pub evaluator_model: String,
    pub report_locale: String,
    pub custom_strategies: Vec<CustomStrategyProfile>,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            max_alternatives: 3,
            min_candidates: 3,
            window_area_tolerance_ladder: vec![20.0, 30.0],
            window_mode: "cheapest".to_string(),
            interior_door_width_tolerance_in: 6.0,
            exterior_door_min_height_in: 84.0,
            allow_same_price_fill: true,
            strategic_area_tolerance_ladder: vec![20.0, 30.0, 40.0],
            scoring_mode: "rule".to_string(),
            evaluator_endpoint: None,
            evaluator_timeout_ms: 10_000,
            evaluator_model: "default".to_string(),
            report_locale: "zh-CN".to_string(),
            custom_strategies: Vec::new(),
        }
    }

    /// 窗户战略模式
    pub fn strategic() -> Self {
        let mut config = Self::default();
        config.window_mode = "strategic".to_string();
        config
    }

    /// 关闭同价补位
    pub fn without_same_price_fill() -> Self {
        let mut config = Self::default();
        config.allow_same_price_fill = false;
        config
    }

    /// 外部模型评分（端点不可达, 用于验证回退）
    pub fn model_scoring(endpoint: &str) -> Self {
        let mut config = Self::default();
        config.scoring_mode = "model".to_string();
        config.evaluator_endpoint = Some(endpoint.to_string());
        config.evaluator_timeout_ms = 200;
        config
    }

    pub fn with_custom_strategies(profiles: Vec<CustomStrategyProfile>) -> Self {
        let mut config = Self::default();
        config.custom_strategies = profiles;
        config
    }
}

impl PipelineConfigReader for MockConfig {
    fn get_max_alternatives(&self) -> ConfigResult<usize> {
        Ok(self.max_alternatives)
    }

    fn get_min_candidates(&self) -> ConfigResult<usize> {
        Ok(self.min_candidates)
    }

    fn get_window_area_tolerance_ladder(&self) -> ConfigResult<Vec<f64>> {
        Ok(self.window_area_tolerance_ladder.clone())
    }

    fn get_window_mode(&self) -> ConfigResult<String> {
        Ok(self.window_mode.clone())
    }

    fn get_interior_door_width_tolerance_in(&self) -> ConfigResult<f64> {
        Ok(self.interior_door_width_tolerance_in)
    }

    fn get_exterior_door_min_height_in(&self) -> ConfigResult<f64> {
        Ok(self.exterior_door_min_height_in)
    }

    fn get_allow_same_price_fill(&self) -> ConfigResult<bool> {
        Ok(self.allow_same_price_fill)
    }

    fn get_strategic_area_tolerance_ladder(&self) -> ConfigResult<Vec<f64>> {
        Ok(self.strategic_area_tolerance_ladder.clone())
    }

    fn get_scoring_mode(&self) -> ConfigResult<String> {
        Ok(self.scoring_mode.clone())
    }

    fn get_evaluator_endpoint(&self) -> ConfigResult<Option<String>> {
        Ok(self.evaluator_endpoint.clone())
    }

    fn get_evaluator_timeout_ms(&self) -> ConfigResult<u64> {
        Ok(self.evaluator_timeout_ms)
    }

    fn get_evaluator_model(&self) -> ConfigResult<String> {
        Ok(self.evaluator_model.clone())
    }

    fn get_evaluator_api_key(&self) -> ConfigResult<Option<String>> {
        Ok(None)
    }

    fn get_report_locale(&self) -> ConfigResult<String> {
        Ok(self.report_locale.clone())
    }

    fn get_custom_strategies(&self) -> ConfigResult<Vec<CustomStrategyProfile>> {
        Ok(self.custom_strategies.clone())
    }
}
