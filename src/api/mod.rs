// ==========================================
// 价值工程决策引擎 - API 层
// ==========================================
// 职责: 提供分析入口, 供命令行调用
// ==========================================

pub mod analysis_api;
pub mod error;
pub mod validator;

// 重导出核心类型
pub use analysis_api::{AnalysisApi, AnalysisRequest, AnalysisResponse};
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use validator::{validate_weights, InputValidator, ValidatedMaterials, ValidationMode};
