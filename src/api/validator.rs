// ==========================================
// 价值工程决策引擎 - 输入校验器
// ==========================================
// 职责: 流水线启动前的前置条件与输入校验
// 规则:
// - 材料清单与参考目录缺一不可（前置条件失败）
// - 材料 ID 不可为空; 同类别内不可重复
// - 数量为 0 的材料应在导入阶段排除
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::{MaterialCategory, MaterialSpec, ReferenceCatalog};
use crate::engine::StrategyWeights;

// ==========================================
// ValidationMode - 校验模式
// ==========================================

/// 校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValidationMode {
    /// 严格模式：任何违规都返回错误
    Strict,
    /// 宽松模式：剔除违规材料并告警, 其余继续分析
    #[default]
    Lenient,
}

/// 宽松模式下的校验结果
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMaterials {
    pub accepted: Vec<MaterialSpec>,
    pub violations: Vec<ValidationViolation>,
}

// ==========================================
// InputValidator - 输入校验器
// ==========================================

pub struct InputValidator {
    mode: ValidationMode,
}

impl InputValidator {
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// 前置条件检查
    ///
    /// # 返回
    /// - Err(ApiError::PreconditionFailed): 材料清单为空或参考目录完全为空
    pub fn check_preconditions(
        &self,
        specs: &[MaterialSpec],
        catalog: &ReferenceCatalog,
    ) -> ApiResult<()> {
        if specs.is_empty() {
            return Err(ApiError::PreconditionFailed("材料清单为空".to_string()));
        }
        if catalog.is_empty() {
            return Err(ApiError::PreconditionFailed("参考目录为空".to_string()));
        }

        // 某类别有材料但目录缺失: 这些材料将全部未匹配, 仅告警
        let present: HashSet<MaterialCategory> = specs.iter().map(|s| s.category).collect();
        for category in present {
            let missing = match category {
                MaterialCategory::Appliance => catalog.appliances.is_empty(),
                other => catalog.entries_for(other).is_empty(),
            };
            if missing {
                warn!(category = %category, "该类别缺少参考目录, 材料将全部未匹配");
            }
        }
        Ok(())
    }

    /// 材料清单校验
    ///
    /// # 返回
    /// - Strict: 存在违规时返回 ValidationError
    /// - Lenient: 剔除违规材料, 返回保留的材料与违规列表
    pub fn validate_materials(&self, specs: &[MaterialSpec]) -> ApiResult<ValidatedMaterials> {
        let mut violations = Vec::new();
        let mut accepted = Vec::with_capacity(specs.len());
        let mut seen: HashSet<(MaterialCategory, String)> = HashSet::new();

        for spec in specs {
            let id = spec.material_id.trim();
            if id.is_empty() {
                violations.push(ValidationViolation {
                    violation_type: "EMPTY_ID".to_string(),
                    material_id: String::new(),
                    reason: "材料ID为空".to_string(),
                    details: Some(serde_json::json!({ "category": spec.category.as_str() })),
                });
                continue;
            }
            if spec.quantity == 0 {
                violations.push(ValidationViolation {
                    violation_type: "ZERO_QUANTITY".to_string(),
                    material_id: id.to_string(),
                    reason: "数量为0的材料不参与分析".to_string(),
                    details: None,
                });
                continue;
            }
            if !seen.insert((spec.category, id.to_string())) {
                violations.push(ValidationViolation {
                    violation_type: "DUPLICATE_ID".to_string(),
                    material_id: id.to_string(),
                    reason: format!("{}中材料ID重复", spec.category),
                    details: Some(serde_json::json!({ "quantity": spec.quantity })),
                });
                continue;
            }
            accepted.push(spec.clone());
        }

        if !violations.is_empty() {
            match self.mode {
                ValidationMode::Strict => {
                    return Err(ApiError::ValidationError {
                        reason: format!("{}个材料未通过校验", violations.len()),
                        violations,
                    });
                }
                ValidationMode::Lenient => {
                    warn!(
                        rejected = violations.len(),
                        accepted = accepted.len(),
                        "宽松模式: 已剔除未通过校验的材料"
                    );
                }
            }
        }

        Ok(ValidatedMaterials {
            accepted,
            violations,
        })
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(ValidationMode::default())
    }
}

/// 权重校验: 必须非负且不全为 0; 之和不为 1 时仅告警
pub fn validate_weights(strategy_id: &str, weights: &StrategyWeights) -> ApiResult<()> {
    if !weights.is_usable() {
        return Err(ApiError::InvalidInput(format!(
            "策略{}权重无效: ({}, {}, {})",
            strategy_id, weights.functional, weights.design, weights.cost
        )));
    }
    if !weights.validate() {
        warn!(strategy = %strategy_id, sum = weights.sum(), "策略权重之和不为 1");
    }
    Ok(())
}
