// ==========================================
// 价值工程决策引擎 - 导出层
// ==========================================
// 职责: AnalysisReport → 扁平 CSV 表 + presets.json
// ==========================================

pub mod error;
pub mod rows;
pub mod table_exporter;

pub use error::{ExportError, ExportResult};
pub use rows::TableRow;
pub use table_exporter::TableExporter;
