// ==========================================
// 价值工程决策引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 键值文件 ({"key": value})
// 覆写: 环境变量 VE_OPTIMIZER_<KEY> 优先于文件
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::pipeline_config_trait::PipelineConfigReader;
use crate::config::strategy_profile::CustomStrategyProfile;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "VE_OPTIMIZER_";

/// 外部评估 API Key 的环境变量
pub const EVALUATOR_API_KEY_ENV: &str = "VE_EVALUATOR_API_KEY";

/// 默认配置文件目录名
pub const CONFIG_DIR_NAME: &str = "ve-optimizer";

fn is_true(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// 配置键 → 环境变量名（alternatives.max_count → VE_OPTIMIZER_ALTERNATIVES_MAX_COUNT）
pub fn env_var_name(key: &str) -> String {
    let upper: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", ENV_PREFIX, upper)
}

/// 解析数值列表: 支持 JSON 数组 "[20, 30]" 或逗号分隔 "20,30"
fn parse_f64_list(raw: &str) -> Option<Vec<f64>> {
    let values: Vec<f64> = match serde_json::from_str::<Vec<f64>>(raw) {
        Ok(v) => v,
        Err(_) => raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .ok()?,
    };

    let mut values: Vec<f64> = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(values)
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
    source: Option<PathBuf>,
    env_overrides: bool,
}

impl ConfigManager {
    /// 空配置（全部使用默认值, 仍读取环境变量覆写）
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            source: None,
            env_overrides: true,
        }
    }

    /// 默认配置文件路径: <config_dir>/ve-optimizer/config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.json"))
    }

    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式路径（必须存在）; None 时尝试默认路径（不存在则为空配置）
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::new()),
            },
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 值可以是字符串、数值、布尔或数组; 非字符串值按 JSON 文本保存
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed: BTreeMap<String, Value> =
            serde_json::from_str(&content).map_err(|e| ConfigError::Format {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let values = parsed
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect();

        tracing::info!(path = %path.display(), "配置文件已加载");

        Ok(Self {
            values,
            source: Some(path.to_path_buf()),
            env_overrides: true,
        })
    }

    /// 关闭环境变量覆写（测试用）
    pub fn without_env_overrides(mut self) -> Self {
        self.env_overrides = false;
        self
    }

    /// 设置单个配置值（内存中）
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 读取配置值: 环境变量 > 文件
    pub fn get_config_value(&self, key: &str) -> Option<String> {
        if self.env_overrides {
            if let Ok(v) = std::env::var(env_var_name(key)) {
                if !v.trim().is_empty() {
                    return Some(v);
                }
            }
        }
        self.values.get(key).cloned()
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .unwrap_or_else(|| default.to_string())
    }

    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: std::str::FromStr + Copy,
    {
        match self.get_config_value(key) {
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值无法解析，使用默认值");
                default
            }),
            None => default,
        }
    }

    fn get_ladder_or_default(&self, key: &str, default: &[f64]) -> Vec<f64> {
        match self.get_config_value(key) {
            Some(raw) => parse_f64_list(&raw).unwrap_or_else(|| {
                tracing::warn!(config_key = key, raw_value = %raw, "容差阶梯配置格式错误，使用默认值");
                default.to_vec()
            }),
            None => default.to_vec(),
        }
    }

    /// 获取所有配置的快照（JSON 格式, 已应用环境变量覆写, 不含密钥）
    pub fn get_config_snapshot(&self) -> String {
        let mut snapshot: BTreeMap<&str, String> = BTreeMap::new();
        for key in config_keys::ALL {
            if let Some(v) = self.get_config_value(key) {
                snapshot.insert(key, v);
            }
        }
        json!(snapshot).to_string()
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// PipelineConfigReader Trait 实现
// ==========================================
impl PipelineConfigReader for ConfigManager {
    // ===== 替代方案生成 =====

    fn get_max_alternatives(&self) -> ConfigResult<usize> {
        Ok(self.get_parsed_or_default(config_keys::MAX_ALTERNATIVES, 3usize))
    }

    fn get_min_candidates(&self) -> ConfigResult<usize> {
        Ok(self.get_parsed_or_default(config_keys::MIN_CANDIDATES, 3usize))
    }

    fn get_window_area_tolerance_ladder(&self) -> ConfigResult<Vec<f64>> {
        Ok(self.get_ladder_or_default(config_keys::WINDOW_AREA_TOLERANCE_LADDER, &[20.0, 30.0]))
    }

    fn get_window_mode(&self) -> ConfigResult<String> {
        Ok(self.get_config_or_default(config_keys::WINDOW_MODE, "cheapest"))
    }

    fn get_interior_door_width_tolerance_in(&self) -> ConfigResult<f64> {
        Ok(self.get_parsed_or_default(config_keys::INTERIOR_DOOR_WIDTH_TOLERANCE_IN, 6.0))
    }

    fn get_exterior_door_min_height_in(&self) -> ConfigResult<f64> {
        Ok(self.get_parsed_or_default(config_keys::EXTERIOR_DOOR_MIN_HEIGHT_IN, 84.0))
    }

    fn get_allow_same_price_fill(&self) -> ConfigResult<bool> {
        let value = self.get_config_or_default(config_keys::ALLOW_SAME_PRICE_FILL, "true");
        Ok(is_true(&value).unwrap_or(true))
    }

    fn get_strategic_area_tolerance_ladder(&self) -> ConfigResult<Vec<f64>> {
        Ok(self.get_ladder_or_default(
            config_keys::STRATEGIC_AREA_TOLERANCE_LADDER,
            &[20.0, 30.0, 40.0],
        ))
    }

    // ===== 评分 =====

    fn get_scoring_mode(&self) -> ConfigResult<String> {
        Ok(self.get_config_or_default(config_keys::SCORING_MODE, "rule"))
    }

    fn get_evaluator_endpoint(&self) -> ConfigResult<Option<String>> {
        Ok(self
            .get_config_value(config_keys::EVALUATOR_ENDPOINT)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    fn get_evaluator_timeout_ms(&self) -> ConfigResult<u64> {
        Ok(self.get_parsed_or_default(config_keys::EVALUATOR_TIMEOUT_MS, 10_000u64))
    }

    fn get_evaluator_model(&self) -> ConfigResult<String> {
        Ok(self.get_config_or_default(config_keys::EVALUATOR_MODEL, "default"))
    }

    fn get_evaluator_api_key(&self) -> ConfigResult<Option<String>> {
        if !self.env_overrides {
            return Ok(None);
        }
        Ok(std::env::var(EVALUATOR_API_KEY_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty()))
    }

    // ===== 报告 =====

    fn get_report_locale(&self) -> ConfigResult<String> {
        Ok(self.get_config_or_default(config_keys::REPORT_LOCALE, "zh-CN"))
    }

    fn get_custom_strategies(&self) -> ConfigResult<Vec<CustomStrategyProfile>> {
        let value = self.get_config_or_default(config_keys::CUSTOM_STRATEGIES, "[]");
        let profiles: Vec<CustomStrategyProfile> =
            serde_json::from_str(&value).map_err(|e| ConfigError::InvalidValue {
                key: config_keys::CUSTOM_STRATEGIES.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })?;
        Ok(profiles)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 替代方案生成
    pub const MAX_ALTERNATIVES: &str = "alternatives.max_count";
    pub const MIN_CANDIDATES: &str = "alternatives.min_candidates";
    pub const WINDOW_AREA_TOLERANCE_LADDER: &str = "alternatives.window_area_tolerance_ladder";
    pub const WINDOW_MODE: &str = "alternatives.window_mode";
    pub const INTERIOR_DOOR_WIDTH_TOLERANCE_IN: &str =
        "alternatives.interior_door_width_tolerance_in";
    pub const EXTERIOR_DOOR_MIN_HEIGHT_IN: &str = "alternatives.exterior_door_min_height_in";
    pub const ALLOW_SAME_PRICE_FILL: &str = "alternatives.allow_same_price_fill";

    // 战略模式
    pub const STRATEGIC_AREA_TOLERANCE_LADDER: &str = "strategic.area_tolerance_ladder";

    // 评分
    pub const SCORING_MODE: &str = "scoring.mode";
    pub const EVALUATOR_ENDPOINT: &str = "evaluator.endpoint";
    pub const EVALUATOR_TIMEOUT_MS: &str = "evaluator.timeout_ms";
    pub const EVALUATOR_MODEL: &str = "evaluator.model";

    // 报告
    pub const REPORT_LOCALE: &str = "report.locale";

    // 自定义策略 (JSON 数组)
    pub const CUSTOM_STRATEGIES: &str = "custom_strategies";

    pub const ALL: [&str; 14] = [
        MAX_ALTERNATIVES,
        MIN_CANDIDATES,
        WINDOW_AREA_TOLERANCE_LADDER,
        WINDOW_MODE,
        INTERIOR_DOOR_WIDTH_TOLERANCE_IN,
        EXTERIOR_DOOR_MIN_HEIGHT_IN,
        ALLOW_SAME_PRICE_FILL,
        STRATEGIC_AREA_TOLERANCE_LADDER,
        SCORING_MODE,
        EVALUATOR_ENDPOINT,
        EVALUATOR_TIMEOUT_MS,
        EVALUATOR_MODEL,
        REPORT_LOCALE,
        CUSTOM_STRATEGIES,
    ];
}
