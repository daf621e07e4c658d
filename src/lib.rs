// ==========================================
// 价值工程决策引擎 - 核心库
// ==========================================
// 流程: 目录匹配 → 替代方案 → 三项评分 → 加权优选
// 系统定位: 决策支持系统 (人工最终决策)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 不可变记录
pub mod domain;

// 引擎层 - 流水线各阶段
pub mod engine;

// 导入层 - 外部表格数据
pub mod importer;

// 导出层 - 扁平表格输出
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能埋点
pub mod perf;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CategoryGroup, MaterialCategory, ScoreSource, StrategicRole};

// 领域实体
pub use domain::{
    Alternative, AlternativeKind, AlternativeSet, CatalogEntry, CategoryMetrics,
    MatchedMaterial, MaterialSpec, PortfolioMetrics, ReferenceCatalog, ScoredAlternative,
    ScoredSet, Selection, StrategyRun,
};

// 引擎
pub use engine::{
    AlternativeGenerator, AnalysisReport, CatalogMatcher, CriteriaScorer, PipelineSettings,
    SelectionOptimizer, StrategyDefinition, StrategyWeights, ValueEngineeringPipeline,
};

// 导入/导出
pub use exporter::TableExporter;
pub use importer::{CatalogLoader, CatalogSources, TableImporter};

// 配置
pub use config::{ConfigManager, PipelineConfigReader};

// API
pub use api::{AnalysisApi, ApiError, ApiResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "建筑材料价值工程决策引擎";
