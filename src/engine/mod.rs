// ==========================================
// 价值工程决策引擎 - 引擎层
// ==========================================
// 职责: 实现匹配/替代/评分/优选规则, 不做文件 IO
// 约定: 引擎均为输入的纯函数, 参考目录显式传入且只读
// ==========================================

pub mod alternatives;
pub mod cost;
pub mod dimension;
pub mod evaluator;
pub mod matcher;
pub mod optimizer;
pub mod orchestrator;
pub mod preset;
pub mod scoring;
pub mod strategic;
pub mod strategy;

// 重导出核心引擎
pub use alternatives::{AlternativeConfig, AlternativeGenerator, WindowMode};
pub use evaluator::{
    DescriptionEvaluator, EvaluationRequest, EvaluatorChain, EvaluatorError, FidelityScores,
    RemoteEvaluatorConfig, RemoteModelEvaluator, RuleBasedEvaluator,
};
pub use matcher::CatalogMatcher;
pub use optimizer::SelectionOptimizer;
pub use orchestrator::{AnalysisReport, PipelineSettings, ValueEngineeringPipeline};
pub use preset::PresetBook;
pub use scoring::{CriteriaScorer, ScoringMode};
pub use strategic::StrategicWindowPlanner;
pub use strategy::{OptimizationStrategy, StrategyDefinition, StrategyWeights};
