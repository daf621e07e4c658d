// ==========================================
// 价值工程决策引擎 - 分析 API
// ==========================================
// 职责: 前置条件检查 → 输入校验 → 流水线 → 可选导出
// ==========================================

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::api::error::{ApiResult, ValidationViolation};
use crate::api::validator::{validate_weights, InputValidator, ValidationMode};
use crate::config::PipelineConfigReader;
use crate::domain::{MaterialCategory, MaterialSpec, ReferenceCatalog};
use crate::engine::{AnalysisReport, PipelineSettings, StrategyDefinition, ValueEngineeringPipeline};
use crate::exporter::TableExporter;
use crate::importer::{CatalogLoader, CatalogSources, ImportSummary, TableImporter};

/// 基于文件的分析请求
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// 项目材料清单
    pub materials: PathBuf,
    /// 材料清单缺少 CATEGORY 列时使用
    pub default_category: Option<MaterialCategory>,
    pub catalog: CatalogSources,
    /// 指定时导出全部表格
    pub out_dir: Option<PathBuf>,
}

/// 分析API响应
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub report: AnalysisReport,
    /// 各输入文件的导入摘要（材料清单在前）
    pub import_summaries: Vec<ImportSummary>,
    /// 宽松模式下被剔除的材料
    pub violations: Vec<ValidationViolation>,
    /// 导出的文件（未导出时为空）
    pub exported_files: Vec<PathBuf>,
}

/// 分析API
pub struct AnalysisApi {
    pipeline: ValueEngineeringPipeline,
    validator: InputValidator,
}

impl AnalysisApi {
    /// 创建新的AnalysisApi实例
    pub fn new(settings: PipelineSettings, mode: ValidationMode) -> ApiResult<Self> {
        for definition in &settings.strategies {
            validate_weights(&definition.strategy_id, &definition.weights)?;
        }
        Ok(Self {
            pipeline: ValueEngineeringPipeline::new(settings),
            validator: InputValidator::new(mode),
        })
    }

    /// 从配置读取器构建
    pub fn from_config<C>(config: &C, mode: ValidationMode) -> ApiResult<Self>
    where
        C: PipelineConfigReader + ?Sized,
    {
        let settings = PipelineSettings::from_config(config)?;
        Self::new(settings, mode)
    }

    /// 使用已构建的流水线（如注入自定义评分器）
    pub fn with_pipeline(pipeline: ValueEngineeringPipeline, mode: ValidationMode) -> Self {
        Self {
            pipeline,
            validator: InputValidator::new(mode),
        }
    }

    /// 参与优选的策略（预设在前）
    pub fn strategies(&self) -> &[StrategyDefinition] {
        self.pipeline.strategies()
    }

    /// 分析内存中的材料清单与参考目录
    ///
    /// # 返回
    /// - Ok((AnalysisReport, 违规列表))
    /// - Err(ApiError::PreconditionFailed): 材料清单或参考目录为空
    /// - Err(ApiError::ValidationError): 严格模式下存在违规材料
    pub fn analyze(
        &self,
        specs: &[MaterialSpec],
        catalog: &ReferenceCatalog,
    ) -> ApiResult<(AnalysisReport, Vec<ValidationViolation>)> {
        self.validator.check_preconditions(specs, catalog)?;
        let validated = self.validator.validate_materials(specs)?;

        // 剔除后为空同样视为前置条件失败
        self.validator
            .check_preconditions(&validated.accepted, catalog)?;

        let report = self.pipeline.run(&validated.accepted, catalog);
        if report.unmatched_count() > 0 {
            warn!(
                run_id = %report.run_id,
                unmatched_count = report.unmatched_count(),
                "部分材料未匹配"
            );
        }
        Ok((report, validated.violations))
    }

    /// 分析并导出到目录
    pub fn analyze_and_export(
        &self,
        specs: &[MaterialSpec],
        catalog: &ReferenceCatalog,
        out_dir: &Path,
    ) -> ApiResult<(AnalysisReport, Vec<PathBuf>)> {
        let (report, _) = self.analyze(specs, catalog)?;
        let files = TableExporter::new(out_dir).export(&report)?;
        Ok((report, files))
    }

    /// 从文件加载 → 分析 → 可选导出
    pub fn analyze_files(&self, request: &AnalysisRequest) -> ApiResult<AnalysisResponse> {
        let (specs, materials_summary) =
            TableImporter::new().load_materials(&request.materials, request.default_category)?;
        let (catalog, catalog_summaries) = CatalogLoader::new().load(&request.catalog)?;

        let (report, violations) = self.analyze(&specs, &catalog)?;

        let exported_files = match &request.out_dir {
            Some(dir) => TableExporter::new(dir).export(&report)?,
            None => Vec::new(),
        };

        let mut import_summaries = Vec::with_capacity(catalog_summaries.len() + 1);
        import_summaries.push(materials_summary);
        import_summaries.extend(catalog_summaries);

        info!(
            run_id = %report.run_id,
            matched_count = report.matched.len(),
            exported = exported_files.len(),
            "分析请求完成"
        );

        Ok(AnalysisResponse {
            report,
            import_summaries,
            violations,
            exported_files,
        })
    }
}
