// ==========================================
// 价值工程决策引擎 - 领域模型层
// ==========================================
// 职责: 定义材料/目录/替代方案/指标等不可变记录
// 红线: 不含匹配/搜索/评分逻辑
// ==========================================

pub mod alternative;
pub mod material;
pub mod metrics;
pub mod types;

// 重导出核心类型
pub use alternative::{
    Alternative, AlternativeKind, AlternativeOrigin, AlternativeSet, CriteriaScores,
    ScoredAlternative, ScoredSet,
};
pub use material::{
    ApplianceListing, CatalogEntry, MatchOutcome, MatchedMaterial, MaterialSpec, PricedItem,
    ReferenceCatalog, TargetDimensions, UnmatchedMaterial,
};
pub use metrics::{CategoryMetrics, PortfolioMetrics, Selection, StrategyRun};
pub use types::{CategoryGroup, MaterialCategory, ScoreSource, StrategicRole};
