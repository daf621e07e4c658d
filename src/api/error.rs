// ==========================================
// 价值工程决策引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 将导入/导出/配置错误转换为可读消息
// ==========================================

use crate::config::ConfigError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 前置条件错误（流水线启动前报告）
    // ==========================================
    #[error("前置条件不满足: {0}")]
    PreconditionFailed(String),

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 输入校验失败（带详细原因）
    #[error("输入校验失败: {reason}")]
    ValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 外部数据错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("结果导出失败: {0}")]
    ExportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件不存在: {}", path)),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ExportError 转换
// ==========================================
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Other(err) => ApiError::Other(err),
            other => ApiError::ExportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidValue { key, value, reason } => {
                ApiError::InvalidInput(format!("配置项{}={}无效: {}", key, value, reason))
            }
            ConfigError::Other(err) => ApiError::Other(err),
            other => ApiError::ConfigError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================

/// 校验违规详情
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationViolation {
    /// 违规类型（EMPTY_ID / DUPLICATE_ID / ZERO_QUANTITY / ...）
    pub violation_type: String,
    /// 材料ID
    pub material_id: String,
    /// 违规原因
    pub reason: String,
    /// 额外信息（可选）
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::FileNotFound("windows.csv".to_string()).into();
        match api_err {
            ApiError::NotFound(msg) => assert!(msg.contains("windows.csv")),
            _ => panic!("Expected NotFound"),
        }

        let api_err: ApiError = ImportError::TypeConversionError {
            row: 7,
            field: "QUANTITY".to_string(),
            message: "x".to_string(),
        }
        .into();
        match api_err {
            ApiError::ImportError(msg) => assert!(msg.contains('7')),
            _ => panic!("Expected ImportError"),
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let api_err: ApiError = ConfigError::InvalidValue {
            key: "custom_strategies".to_string(),
            value: "my".to_string(),
            reason: "strategy_id 重复".to_string(),
        }
        .into();
        match api_err {
            ApiError::InvalidInput(msg) => {
                assert!(msg.contains("custom_strategies"));
                assert!(msg.contains("重复"));
            }
            _ => panic!("Expected InvalidInput"),
        }
    }
}
