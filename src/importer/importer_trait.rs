// ==========================================
// 价值工程决策引擎 - 导入接口定义
// ==========================================
// 职责: 定义表格导入各阶段的接口（不包含实现）
// 阶段: 文件解析 → 数据清洗 → 字段映射
// ==========================================

use crate::domain::{ApplianceListing, CatalogEntry, MaterialCategory, MaterialSpec};
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 一行原始记录: 表头 → 单元格文本（均已 trim）
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 将表格文件解析为原始记录
    ///
    /// # 返回
    /// - 按文件顺序的行; 完全空白的行已跳过
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
pub trait DataCleaner: Send + Sync {
    /// TRIM（可选 UPPER）
    fn clean_text(&self, value: &str, uppercase: bool) -> String;

    /// 空白与常见空值标记（NULL/N/A/-）统一为 None
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 目录金额列
    ///
    /// # 规则
    /// - 去除 `$` 与千分位
    /// - 空串 → 0.0
    /// - 无法解析 → NaN（记录告警, 下游视为不可比较价格）
    fn parse_money(&self, value: Option<&str>, row: usize, field: &str) -> f64;

    /// 数量列（允许 "12" / "12.0"; 负数或小数报错）
    fn parse_quantity(&self, value: &str, row: usize) -> ImportResult<u32>;

    /// 材料类别
    fn parse_category(&self, value: &str, row: usize) -> ImportResult<MaterialCategory>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// 项目材料行 → MaterialSpec
    ///
    /// # 参数
    /// - default_category: 文件缺少类别列时使用
    fn map_to_material_spec(
        &self,
        row: &RawRow,
        row_number: usize,
        default_category: Option<MaterialCategory>,
    ) -> ImportResult<MaterialSpec>;

    /// 窗/门目录行 → CatalogEntry
    fn map_to_catalog_entry(&self, row: &RawRow, row_number: usize) -> ImportResult<CatalogEntry>;

    /// 电器价格行 → ApplianceListing
    fn map_to_appliance_listing(
        &self,
        row: &RawRow,
        row_number: usize,
    ) -> ImportResult<ApplianceListing>;
}
