// ==========================================
// 价值工程决策引擎 - 导入层
// ==========================================
// 职责: 表格文件 → 项目材料清单 / 参考目录
// 支持: CSV, TSV
// 说明: 数量为 0 的材料行在此排除并计数
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{DelimitedParser, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, FieldMapper, FileParser, RawRow};

use crate::domain::{ApplianceListing, CatalogEntry, MaterialCategory, MaterialSpec, ReferenceCatalog};
use crate::perf::PerfGuard;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ==========================================
// ImportSummary - 单文件导入摘要
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub file: String,
    pub total_rows: usize,
    pub imported: usize,
    /// 数量为 0 被排除的材料行
    pub skipped_zero_quantity: usize,
    /// 总价无法解析（NaN）的目录行
    pub unparsable_costs: usize,
}

impl ImportSummary {
    fn for_file(path: &Path, total_rows: usize) -> Self {
        Self {
            file: path.display().to_string(),
            total_rows,
            ..Default::default()
        }
    }
}

// ==========================================
// TableImporter - 表格导入器
// ==========================================
pub struct TableImporter<P = UniversalFileParser, M = FieldMapperImpl>
where
    P: FileParser,
    M: FieldMapper,
{
    parser: P,
    mapper: M,
}

impl TableImporter {
    pub fn new() -> Self {
        Self::with_components(UniversalFileParser, FieldMapperImpl::new())
    }
}

impl Default for TableImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, M> TableImporter<P, M>
where
    P: FileParser,
    M: FieldMapper,
{
    pub fn with_components(parser: P, mapper: M) -> Self {
        Self { parser, mapper }
    }

    /// 导入项目材料清单
    ///
    /// # 参数
    /// - default_category: 文件缺少 CATEGORY 列时使用（如单独的窗表）
    ///
    /// # 返回
    /// - 数量 > 0 的材料 + 导入摘要
    pub fn load_materials(
        &self,
        path: &Path,
        default_category: Option<MaterialCategory>,
    ) -> ImportResult<(Vec<MaterialSpec>, ImportSummary)> {
        let _perf = PerfGuard::new("import_materials");
        let rows = self.parser.parse_to_raw_records(path)?;
        let mut summary = ImportSummary::for_file(path, rows.len());

        let mut specs = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            // 行号从表头之后的第 2 行起算
            let spec = self.mapper.map_to_material_spec(row, idx + 2, default_category)?;
            if spec.quantity == 0 {
                summary.skipped_zero_quantity += 1;
                continue;
            }
            specs.push(spec);
        }
        summary.imported = specs.len();

        if summary.skipped_zero_quantity > 0 {
            warn!(
                file = %summary.file,
                skipped = summary.skipped_zero_quantity,
                "数量为 0 的材料已排除"
            );
        }
        info!(file = %summary.file, imported = summary.imported, "材料清单导入完成");
        Ok((specs, summary))
    }

    /// 导入窗/门目录
    pub fn load_catalog_entries(
        &self,
        path: &Path,
    ) -> ImportResult<(Vec<CatalogEntry>, ImportSummary)> {
        let rows = self.parser.parse_to_raw_records(path)?;
        let mut summary = ImportSummary::for_file(path, rows.len());

        let entries = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.mapper.map_to_catalog_entry(row, idx + 2))
            .collect::<ImportResult<Vec<CatalogEntry>>>()?;

        summary.imported = entries.len();
        summary.unparsable_costs = entries.iter().filter(|e| !e.has_usable_cost()).count();
        info!(
            file = %summary.file,
            imported = summary.imported,
            unparsable_costs = summary.unparsable_costs,
            "目录导入完成"
        );
        Ok((entries, summary))
    }

    /// 导入电器价格表
    pub fn load_appliance_listings(
        &self,
        path: &Path,
    ) -> ImportResult<(Vec<ApplianceListing>, ImportSummary)> {
        let rows = self.parser.parse_to_raw_records(path)?;
        let mut summary = ImportSummary::for_file(path, rows.len());

        let listings = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| self.mapper.map_to_appliance_listing(row, idx + 2))
            .collect::<ImportResult<Vec<ApplianceListing>>>()?;

        summary.imported = listings.len();
        info!(file = %summary.file, imported = summary.imported, "电器价格表导入完成");
        Ok((listings, summary))
    }
}

// ==========================================
// CatalogLoader - 参考目录装配
// ==========================================

/// 参考目录来源文件（均可缺省）
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    pub windows: Option<PathBuf>,
    pub exterior_doors: Option<PathBuf>,
    pub interior_doors: Option<PathBuf>,
    pub appliances: Option<PathBuf>,
}

impl CatalogSources {
    pub fn is_empty(&self) -> bool {
        self.windows.is_none()
            && self.exterior_doors.is_none()
            && self.interior_doors.is_none()
            && self.appliances.is_none()
    }
}

pub struct CatalogLoader {
    importer: TableImporter,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self {
            importer: TableImporter::new(),
        }
    }

    /// 装配参考目录（一次运行只加载一次）
    pub fn load(&self, sources: &CatalogSources) -> ImportResult<(ReferenceCatalog, Vec<ImportSummary>)> {
        let _perf = PerfGuard::new("load_catalog");
        let mut catalog = ReferenceCatalog::default();
        let mut summaries = Vec::new();

        if let Some(path) = &sources.windows {
            let (entries, summary) = self.importer.load_catalog_entries(path)?;
            catalog.windows = entries;
            summaries.push(summary);
        }
        if let Some(path) = &sources.exterior_doors {
            let (entries, summary) = self.importer.load_catalog_entries(path)?;
            catalog.exterior_doors = entries;
            summaries.push(summary);
        }
        if let Some(path) = &sources.interior_doors {
            let (entries, summary) = self.importer.load_catalog_entries(path)?;
            catalog.interior_doors = entries;
            summaries.push(summary);
        }
        if let Some(path) = &sources.appliances {
            let (listings, summary) = self.importer.load_appliance_listings(path)?;
            catalog.appliances = listings;
            summaries.push(summary);
        }

        info!(
            windows = catalog.windows.len(),
            exterior_doors = catalog.exterior_doors.len(),
            interior_doors = catalog.interior_doors.len(),
            appliances = catalog.appliances.len(),
            "参考目录装配完成"
        );
        Ok((catalog, summaries))
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}
