// ==========================================
// 价值工程决策引擎 - 引擎编排器
// ==========================================
// 用途: 协调五个阶段的执行顺序
// 流程: 匹配 → 替代方案 → 评分 → 各策略优选 → 预设
// 约定: 各阶段均为输入的纯函数, 参考目录只读, 可重复运行
// ==========================================

use crate::config::{ConfigError, ConfigResult, PipelineConfigReader};
use crate::domain::{
    AlternativeSet, MatchOutcome, MatchedMaterial, MaterialSpec, ReferenceCatalog, ScoredSet,
    StrategyRun, UnmatchedMaterial,
};
use crate::engine::alternatives::{AlternativeConfig, AlternativeGenerator, WindowMode};
use crate::engine::evaluator::{EvaluatorChain, RemoteEvaluatorConfig, RemoteModelEvaluator};
use crate::engine::matcher::CatalogMatcher;
use crate::engine::optimizer::SelectionOptimizer;
use crate::engine::preset::PresetBook;
use crate::engine::scoring::{CriteriaScorer, ScoringMode};
use crate::engine::strategy::{OptimizationStrategy, StrategyDefinition};
use crate::perf::PerfGuard;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

// ==========================================
// PipelineSettings - 流水线设置
// ==========================================

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub alternatives: AlternativeConfig,
    pub scoring_mode: ScoringMode,
    pub remote: Option<RemoteEvaluatorConfig>,
    /// 预设策略在前, 自定义策略在后
    pub strategies: Vec<StrategyDefinition>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            alternatives: AlternativeConfig::default(),
            scoring_mode: ScoringMode::Rule,
            remote: None,
            strategies: StrategyDefinition::canonical(),
        }
    }
}

impl PipelineSettings {
    /// 从配置读取器构建
    ///
    /// # 说明
    /// - 模式类配置无法识别时告警并使用默认值
    /// - 自定义策略无效（未知基准策略、权重不可用、ID 冲突）时返回错误
    /// - 权重之和不为 1 的自定义策略会被归一化
    pub fn from_config<C>(config: &C) -> ConfigResult<Self>
    where
        C: PipelineConfigReader + ?Sized,
    {
        let window_mode_raw = config.get_window_mode()?;
        let window_mode = window_mode_raw.parse::<WindowMode>().unwrap_or_else(|e| {
            warn!(raw_value = %window_mode_raw, error = %e, "窗替代模式无效，使用 cheapest");
            WindowMode::Cheapest
        });

        let alternatives = AlternativeConfig {
            max_alternatives: config.get_max_alternatives()?.max(1),
            min_candidates: config.get_min_candidates()?.max(1),
            window_area_tolerance_ladder: config.get_window_area_tolerance_ladder()?,
            interior_door_width_tolerance_in: config.get_interior_door_width_tolerance_in()?,
            exterior_door_min_height_in: config.get_exterior_door_min_height_in()?,
            allow_same_price_fill: config.get_allow_same_price_fill()?,
            window_mode,
            strategic_area_tolerance_ladder: config.get_strategic_area_tolerance_ladder()?,
        };

        let scoring_raw = config.get_scoring_mode()?;
        let scoring_mode = scoring_raw.parse::<ScoringMode>().unwrap_or_else(|e| {
            warn!(raw_value = %scoring_raw, error = %e, "评分模式无效，使用 rule");
            ScoringMode::Rule
        });

        let remote = match (scoring_mode, config.get_evaluator_endpoint()?) {
            (ScoringMode::Model, Some(endpoint)) => Some(RemoteEvaluatorConfig {
                endpoint,
                api_key: config.get_evaluator_api_key()?,
                model: config.get_evaluator_model()?,
                timeout_ms: config.get_evaluator_timeout_ms()?,
            }),
            (ScoringMode::Model, None) => {
                warn!("评分模式为 model 但未配置 evaluator.endpoint，仅使用规则评分");
                None
            }
            (ScoringMode::Rule, _) => None,
        };

        let mut strategies = StrategyDefinition::canonical();
        let mut seen: HashSet<String> = strategies.iter().map(|s| s.strategy_id.clone()).collect();
        for profile in config.get_custom_strategies()? {
            let invalid = |reason: String| ConfigError::InvalidValue {
                key: crate::config::config_keys::CUSTOM_STRATEGIES.to_string(),
                value: profile.strategy_id.clone(),
                reason,
            };

            let mut definition = StrategyDefinition::from_profile(&profile).map_err(invalid)?;
            if definition.strategy_id.is_empty() {
                return Err(invalid("strategy_id 为空".to_string()));
            }
            if !seen.insert(definition.strategy_id.clone()) {
                return Err(invalid("strategy_id 重复".to_string()));
            }
            if !definition.weights.is_usable() {
                return Err(invalid("权重必须非负且不全为 0".to_string()));
            }
            if !definition.weights.validate() {
                warn!(
                    strategy = %definition.strategy_id,
                    sum = definition.weights.sum(),
                    "自定义策略权重之和不为 1，已归一化"
                );
                definition.weights.normalise();
            }
            strategies.push(definition);
        }

        Ok(Self {
            alternatives,
            scoring_mode,
            remote,
            strategies,
        })
    }

    /// 构建评估器链; 外部评估器创建失败时仅使用规则
    pub fn evaluator_chain(&self) -> EvaluatorChain {
        match &self.remote {
            Some(remote) => match RemoteModelEvaluator::new(remote.clone()) {
                Ok(evaluator) => EvaluatorChain::with_primary(Box::new(evaluator)),
                Err(e) => {
                    warn!(error = %e, "外部评估器不可用，仅使用规则评分");
                    EvaluatorChain::rules_only()
                }
            },
            None => EvaluatorChain::rules_only(),
        }
    }
}

// ==========================================
// AnalysisReport - 分析结果
// ==========================================

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,

    // 匹配输出
    pub matched: Vec<MatchedMaterial>,
    pub unmatched: Vec<UnmatchedMaterial>,

    // 替代方案与评分输出
    pub alternative_sets: Vec<AlternativeSet>,
    pub scored_sets: Vec<ScoredSet>,

    // 优选输出
    pub strategy_runs: Vec<StrategyRun>,
    pub presets: PresetBook,
}

impl AnalysisReport {
    /// 未匹配（被排除出下游阶段）的材料数
    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    pub fn strategy_run(&self, strategy_id: &str) -> Option<&StrategyRun> {
        self.strategy_runs
            .iter()
            .find(|r| r.strategy_id == strategy_id)
    }
}

// ==========================================
// ValueEngineeringPipeline - 引擎编排器
// ==========================================

pub struct ValueEngineeringPipeline {
    matcher: CatalogMatcher,
    generator: AlternativeGenerator,
    scorer: CriteriaScorer,
    optimizer: SelectionOptimizer,
    strategies: Vec<StrategyDefinition>,
}

impl ValueEngineeringPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        let scorer = CriteriaScorer::new(settings.evaluator_chain());
        Self {
            matcher: CatalogMatcher::new(),
            generator: AlternativeGenerator::new(settings.alternatives),
            scorer,
            optimizer: SelectionOptimizer::new(),
            strategies: settings.strategies,
        }
    }

    /// 替换评分器（用于注入自定义评估器）
    pub fn with_scorer(mut self, scorer: CriteriaScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn strategies(&self) -> &[StrategyDefinition] {
        &self.strategies
    }

    /// 执行完整流程
    ///
    /// # 参数
    /// - specs: 项目材料清单
    /// - catalog: 参考目录（只读）
    pub fn run(&self, specs: &[MaterialSpec], catalog: &ReferenceCatalog) -> AnalysisReport {
        let _perf = PerfGuard::new("pipeline_run");
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            materials_count = specs.len(),
            strategies_count = self.strategies.len(),
            "开始执行价值工程分析"
        );

        // ==========================================
        // 步骤1: Catalog Matcher - 目录匹配
        // ==========================================
        debug!("步骤1: 执行目录匹配");
        let (matched, unmatched) = {
            let _perf = PerfGuard::new("match_catalog");
            let mut matched = Vec::new();
            let mut unmatched = Vec::new();
            for outcome in self.matcher.match_all(specs, catalog) {
                match outcome {
                    MatchOutcome::Matched(m) => matched.push(m),
                    MatchOutcome::Unmatched(u) => unmatched.push(u),
                }
            }
            (matched, unmatched)
        };
        if !unmatched.is_empty() {
            warn!(
                unmatched_count = unmatched.len(),
                "存在未匹配材料，已排除出后续阶段"
            );
        }

        // ==========================================
        // 步骤2: Alternative Generator - 替代方案生成
        // ==========================================
        debug!("步骤2: 执行替代方案生成");
        let alternative_sets = {
            let _perf = PerfGuard::new("generate_alternatives");
            self.generator.generate_all(&matched, catalog)
        };

        // ==========================================
        // 步骤3: Criteria Scorer - 三项评分
        // ==========================================
        debug!("步骤3: 执行三项评分");
        let scored_sets = {
            let _perf = PerfGuard::new("score_alternatives");
            self.scorer.score_all(&alternative_sets)
        };

        // ==========================================
        // 步骤4: Selection Optimizer - 各策略优选
        // ==========================================
        debug!("步骤4: 执行各策略优选");
        let strategy_runs: Vec<StrategyRun> = {
            let _perf = PerfGuard::new("optimize_selections");
            self.strategies
                .iter()
                .map(|definition| self.optimizer.run(definition, &scored_sets))
                .collect()
        };

        // ==========================================
        // 步骤5: 方案预设
        // ==========================================
        let presets = PresetBook::build(&strategy_runs, &scored_sets);

        for run in &strategy_runs {
            info!(
                run_id = %run_id,
                strategy = %run.strategy_id,
                savings = run.overall.total_cost_savings,
                reduction_pct = run.overall.cost_reduction_pct,
                "策略结果"
            );
        }
        info!(
            run_id = %run_id,
            matched_count = matched.len(),
            unmatched_count = unmatched.len(),
            "价值工程分析完成"
        );

        AnalysisReport {
            run_id,
            generated_at: Utc::now(),
            matched,
            unmatched,
            alternative_sets,
            scored_sets,
            strategy_runs,
            presets,
        }
    }
}

impl Default for ValueEngineeringPipeline {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}

/// 预设策略 ID 是否为内置策略
pub fn is_canonical_strategy(strategy_id: &str) -> bool {
    OptimizationStrategy::ALL
        .iter()
        .any(|s| s.as_str() == strategy_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{config_keys, ConfigManager};

    fn manager(pairs: &[(&str, &str)]) -> ConfigManager {
        let mut cfg = ConfigManager::new().without_env_overrides();
        for (k, v) in pairs {
            cfg.set(k, *v);
        }
        cfg
    }

    #[test]
    fn test_settings_defaults() {
        let settings = PipelineSettings::from_config(&manager(&[])).unwrap();
        assert_eq!(settings.alternatives, AlternativeConfig::default());
        assert_eq!(settings.scoring_mode, ScoringMode::Rule);
        assert!(settings.remote.is_none());
        assert_eq!(settings.strategies.len(), 4);
    }

    #[test]
    fn test_settings_model_mode_requires_endpoint() {
        let settings =
            PipelineSettings::from_config(&manager(&[(config_keys::SCORING_MODE, "model")]))
                .unwrap();
        assert_eq!(settings.scoring_mode, ScoringMode::Model);
        assert!(settings.remote.is_none());

        let settings = PipelineSettings::from_config(&manager(&[
            (config_keys::SCORING_MODE, "model"),
            (config_keys::EVALUATOR_ENDPOINT, "http://127.0.0.1:9/score"),
            (config_keys::EVALUATOR_TIMEOUT_MS, "500"),
        ]))
        .unwrap();
        let remote = settings.remote.clone().unwrap();
        assert_eq!(remote.timeout_ms, 500);
        assert_eq!(remote.model, "default");
        assert_eq!(settings.evaluator_chain().primary_name(), "remote_model");
    }

    #[test]
    fn test_settings_unknown_window_mode_falls_back() {
        let settings =
            PipelineSettings::from_config(&manager(&[(config_keys::WINDOW_MODE, "fancy")]))
                .unwrap();
        assert_eq!(settings.alternatives.window_mode, WindowMode::Cheapest);
    }

    #[test]
    fn test_settings_custom_strategies() {
        let settings = PipelineSettings::from_config(&manager(&[(
            config_keys::CUSTOM_STRATEGIES,
            r#"[{"strategy_id":"heavy","title":"Heavy","parameters":{"functional_weight":2,"design_weight":1,"cost_weight":1}}]"#,
        )]))
        .unwrap();
        assert_eq!(settings.strategies.len(), 5);
        let custom = &settings.strategies[4];
        assert_eq!(custom.strategy_id, "heavy");
        assert!(custom.weights.validate());
        assert!((custom.weights.functional - 0.5).abs() < 1e-9);
        assert!(!is_canonical_strategy("heavy"));
        assert!(is_canonical_strategy("balanced"));
    }

    #[test]
    fn test_settings_rejects_duplicate_or_bad_strategies() {
        let duplicate = manager(&[(
            config_keys::CUSTOM_STRATEGIES,
            r#"[{"strategy_id":"balanced","title":"Again"}]"#,
        )]);
        assert!(matches!(
            PipelineSettings::from_config(&duplicate),
            Err(ConfigError::InvalidValue { .. })
        ));

        let negative = manager(&[(
            config_keys::CUSTOM_STRATEGIES,
            r#"[{"strategy_id":"neg","title":"Neg","parameters":{"cost_weight":-1}}]"#,
        )]);
        assert!(PipelineSettings::from_config(&negative).is_err());

        let unknown_base = manager(&[(
            config_keys::CUSTOM_STRATEGIES,
            r#"[{"strategy_id":"x","title":"X","base_strategy":"cheapest"}]"#,
        )]);
        assert!(PipelineSettings::from_config(&unknown_base).is_err());
    }

    #[test]
    fn test_run_with_empty_inputs() {
        let report = ValueEngineeringPipeline::default().run(&[], &ReferenceCatalog::default());
        assert!(report.matched.is_empty());
        assert_eq!(report.unmatched_count(), 0);
        assert_eq!(report.strategy_runs.len(), 4);
        assert!(report.strategy_run("balanced").is_some());
        assert!(!report.run_id.is_empty());
    }
}
