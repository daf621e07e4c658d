// ==========================================
// 价值工程决策引擎 - 功能/设计保真度评估
// ==========================================
// 两种实现:
// - RuleBasedEvaluator: 本地规则启发式（确定性, 永不失败）
// - RemoteModelEvaluator: 外部文本比对服务（阻塞 HTTP, 必须有超时）
// EvaluatorChain: 外部服务失败时确定性回退到规则
// ==========================================

use crate::domain::{MaterialCategory, PricedItem, ScoreSource};
use crate::engine::dimension::{catalog_area_sqft, DEFAULT_WINDOW_AREA_SQFT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// 评分上下限
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum EvaluatorError {
    #[error("外部评估服务未配置: {0}")]
    NotConfigured(String),

    #[error("外部评估服务超时")]
    Timeout,

    #[error("外部评估服务传输失败: {0}")]
    Transport(String),

    #[error("外部评估服务返回非成功状态: {0}")]
    HttpStatus(u16),

    #[error("外部评估服务返回格式错误: {0}")]
    MalformedPayload(String),

    #[error("评分超出范围 ({field}): {value}, 期望 1-5")]
    ScoreOutOfRange { field: &'static str, value: i64 },
}

impl EvaluatorError {
    /// 日志用失败类别
    pub fn kind(&self) -> &'static str {
        match self {
            EvaluatorError::NotConfigured(_) => "not_configured",
            EvaluatorError::Timeout => "timeout",
            EvaluatorError::Transport(_) => "transport",
            EvaluatorError::HttpStatus(_) => "http_status",
            EvaluatorError::MalformedPayload(_) => "malformed_payload",
            EvaluatorError::ScoreOutOfRange { .. } => "out_of_range",
        }
    }
}

// ==========================================
// 请求 / 结果
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct EvaluationRequest<'a> {
    pub category: MaterialCategory,
    pub original: &'a PricedItem,
    pub alternative: &'a PricedItem,
    pub cost_reduction_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FidelityScores {
    pub functional: f64,
    pub design: f64,
}

/// 保真度评估接口
pub trait DescriptionEvaluator: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, request: &EvaluationRequest) -> Result<FidelityScores, EvaluatorError>;
}

// ==========================================
// RuleBasedEvaluator - 规则启发式
// ==========================================
/// 窗: 按替代品材质/玻璃/面积/造型打分, 功能与设计基线不要求一致
/// 门: 两侧描述含相同材质关键字 → 4/4, 否则 3/3
pub struct RuleBasedEvaluator;

/// 评分所需的窗属性
#[derive(Debug, Clone, Default)]
struct WindowAttributes {
    material: String,
    glazing: String,
    item_type: String,
    area: f64,
}

impl WindowAttributes {
    fn from_item(item: &PricedItem) -> Self {
        match &item.entry {
            Some(entry) => Self {
                material: entry.material.to_lowercase(),
                glazing: entry.glazing.to_lowercase(),
                item_type: entry.item_type.to_lowercase(),
                area: catalog_area_sqft(&entry.size),
            },
            // 无目录行时退化为描述文本
            None => {
                let text = item.description.to_lowercase();
                Self {
                    material: text.clone(),
                    glazing: text.clone(),
                    item_type: text,
                    area: DEFAULT_WINDOW_AREA_SQFT,
                }
            }
        }
    }
}

impl RuleBasedEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn window_scores(alternative: &PricedItem) -> FidelityScores {
        let attrs = WindowAttributes::from_item(alternative);
        let wood = attrs.material.contains("wood");
        let vinyl = attrs.material.contains("vinyl");
        let aluminum = attrs.material.contains("alum");

        // 功能: 材质为主, 玻璃/尺寸微调
        let mut functional = if wood {
            5.0
        } else if vinyl {
            4.0
        } else if aluminum {
            2.5
        } else {
            3.0
        };
        if attrs.glazing.contains("insul") {
            functional += 0.3;
        }
        if attrs.glazing.contains("low-e") {
            functional += 0.2;
        }
        if attrs.area < 15.0 {
            functional -= 0.2;
        }

        // 设计: 材质为主, 尺寸影响较大, 造型加分
        let mut design = if wood {
            5.0
        } else if aluminum {
            3.0
        } else if vinyl {
            2.5
        } else {
            3.0
        };
        if attrs.area >= 40.0 {
            design += 1.0;
        } else if attrs.area >= 30.0 {
            design += 0.5;
        } else if attrs.area < 15.0 {
            design -= 1.0;
        } else if attrs.area < 20.0 {
            design -= 0.5;
        }
        if attrs.item_type.contains("bay") {
            design += 0.8;
        }
        if attrs.item_type.contains("picture") {
            design += 0.6;
        }

        FidelityScores {
            functional: clamp_score(functional),
            design: clamp_score(design),
        }
    }

    fn door_scores(original: &PricedItem, alternative: &PricedItem) -> FidelityScores {
        let original = original.description.to_lowercase();
        let alternative = alternative.description.to_lowercase();
        let same_material = ["wood", "metal", "glass"]
            .iter()
            .any(|m| original.contains(m) && alternative.contains(m));

        let score = if same_material { 4.0 } else { 3.0 };
        FidelityScores {
            functional: score,
            design: score,
        }
    }
}

impl Default for RuleBasedEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptionEvaluator for RuleBasedEvaluator {
    fn name(&self) -> &'static str {
        "rule"
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<FidelityScores, EvaluatorError> {
        let scores = match request.category {
            MaterialCategory::Window => Self::window_scores(request.alternative),
            MaterialCategory::ExteriorDoor | MaterialCategory::InteriorDoor => {
                Self::door_scores(request.original, request.alternative)
            }
            MaterialCategory::Appliance => FidelityScores {
                functional: MAX_SCORE,
                design: MAX_SCORE,
            },
        };
        Ok(scores)
    }
}

// ==========================================
// RemoteModelEvaluator - 外部文本比对服务
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvaluatorConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

pub struct RemoteModelEvaluator {
    config: RemoteEvaluatorConfig,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct RemoteScores {
    functional: i64,
    design: i64,
}

impl RemoteModelEvaluator {
    pub fn new(config: RemoteEvaluatorConfig) -> Result<Self, EvaluatorError> {
        if config.endpoint.trim().is_empty() {
            return Err(EvaluatorError::NotConfigured("endpoint 为空".to_string()));
        }
        if config.timeout_ms == 0 {
            return Err(EvaluatorError::NotConfigured("timeout 必须大于 0".to_string()));
        }

        let timeout = Duration::from_millis(config.timeout_ms.max(100));
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();

        Ok(Self { config, agent })
    }

    fn payload(&self, request: &EvaluationRequest) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "category": request.category.as_str(),
            "original_description": request.original.description,
            "alternative_description": request.alternative.description,
            "cost_reduction_pct": request.cost_reduction_pct,
        })
    }
}

impl DescriptionEvaluator for RemoteModelEvaluator {
    fn name(&self) -> &'static str {
        "remote_model"
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<FidelityScores, EvaluatorError> {
        crate::perf::record_remote_call();
        let mut call = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");
        if let Some(key) = self.config.api_key.as_deref() {
            call = call.set("Authorization", &format!("Bearer {key}"));
        }

        let response = call
            .send_json(self.payload(request))
            .map_err(error_from_ureq)?;
        let body: Value = serde_json::from_reader(response.into_reader())
            .map_err(|e| EvaluatorError::MalformedPayload(e.to_string()))?;

        parse_response(&body)
    }
}

fn error_from_ureq(err: ureq::Error) -> EvaluatorError {
    match err {
        ureq::Error::Status(status, _) => EvaluatorError::HttpStatus(status),
        ureq::Error::Transport(transport) => {
            let detail = format!("{:?} {}", transport.kind(), transport);
            if detail.to_ascii_lowercase().contains("timeout")
                || detail.to_ascii_lowercase().contains("timed out")
            {
                EvaluatorError::Timeout
            } else {
                EvaluatorError::Transport(detail)
            }
        }
    }
}

/// 解析服务响应
///
/// 支持两种形态: 直接返回 `{"functional":x,"design":y}`,
/// 或以文本字段 (`content`/`text`/`completion`) 包裹, 文本可能带 ``` 代码块
pub fn parse_response(body: &Value) -> Result<FidelityScores, EvaluatorError> {
    if body.get("functional").is_some() {
        let scores: RemoteScores = serde_json::from_value(body.clone())
            .map_err(|e| EvaluatorError::MalformedPayload(e.to_string()))?;
        return validate(scores);
    }

    let text = ["content", "text", "completion"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .ok_or_else(|| EvaluatorError::MalformedPayload("缺少评分字段".to_string()))?;
    parse_scores_text(text)
}

/// 解析文本形式的评分 JSON（去除 ``` / ```json 代码块）
pub fn parse_scores_text(text: &str) -> Result<FidelityScores, EvaluatorError> {
    let mut content = text.trim();
    if content.contains("```") {
        content = content.split("```").nth(1).unwrap_or(content);
        content = content.trim().trim_start_matches("json").trim();
    }

    let scores: RemoteScores = serde_json::from_str(content)
        .map_err(|e| EvaluatorError::MalformedPayload(e.to_string()))?;
    validate(scores)
}

fn validate(scores: RemoteScores) -> Result<FidelityScores, EvaluatorError> {
    for (field, value) in [("functional", scores.functional), ("design", scores.design)] {
        if !(1..=5).contains(&value) {
            return Err(EvaluatorError::ScoreOutOfRange { field, value });
        }
    }
    Ok(FidelityScores {
        functional: scores.functional as f64,
        design: scores.design as f64,
    })
}

// ==========================================
// EvaluatorChain - 主评估器 + 规则回退
// ==========================================
pub struct EvaluatorChain {
    primary: Option<Box<dyn DescriptionEvaluator>>,
    rules: RuleBasedEvaluator,
}

impl EvaluatorChain {
    /// 仅规则评分
    pub fn rules_only() -> Self {
        Self {
            primary: None,
            rules: RuleBasedEvaluator::new(),
        }
    }

    /// 主评估器失败时回退到规则
    pub fn with_primary(primary: Box<dyn DescriptionEvaluator>) -> Self {
        Self {
            primary: Some(primary),
            rules: RuleBasedEvaluator::new(),
        }
    }

    pub fn primary_name(&self) -> &'static str {
        self.primary
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.rules.name())
    }

    pub fn evaluate(&self, request: &EvaluationRequest) -> (FidelityScores, ScoreSource) {
        if let Some(primary) = &self.primary {
            match primary.evaluate(request) {
                Ok(scores) => {
                    return (
                        FidelityScores {
                            functional: clamp_score(scores.functional),
                            design: clamp_score(scores.design),
                        },
                        ScoreSource::Model,
                    )
                }
                Err(err) => {
                    warn!(
                        evaluator = primary.name(),
                        error_kind = err.kind(),
                        error = %err,
                        alternative = %request.alternative.code,
                        "外部评估失败, 回退到规则评分"
                    );
                    crate::perf::record_fallback();
                    return (self.rule_scores(request), ScoreSource::Fallback);
                }
            }
        }
        (self.rule_scores(request), ScoreSource::Rule)
    }

    fn rule_scores(&self, request: &EvaluationRequest) -> FidelityScores {
        // 规则评估器不会失败; 保底给中位分
        self.rules.evaluate(request).unwrap_or(FidelityScores {
            functional: 3.0,
            design: 3.0,
        })
    }
}

impl Default for EvaluatorChain {
    fn default() -> Self {
        Self::rules_only()
    }
}
