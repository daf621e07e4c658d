// ==========================================
// 价值工程决策引擎 - 表格导出器
// ==========================================
// 输出目录下的文件:
// - matched_materials.csv / unmatched_materials.csv
// - alternatives.csv / alternatives_scored.csv
// - {strategy}_selections.csv / {strategy}_metrics.csv
// - presets.json
// ==========================================

use crate::engine::orchestrator::AnalysisReport;
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::rows::{
    AlternativeRow, MatchedRow, MetricsRow, ScoredRow, SelectionRow, TableRow, UnmatchedRow,
};
use crate::perf::PerfGuard;
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MATCHED_FILE: &str = "matched_materials.csv";
pub const UNMATCHED_FILE: &str = "unmatched_materials.csv";
pub const ALTERNATIVES_FILE: &str = "alternatives.csv";
pub const SCORED_FILE: &str = "alternatives_scored.csv";
pub const PRESETS_FILE: &str = "presets.json";

/// 策略 ID 转为安全的文件名片段
pub fn file_stem_for(strategy_id: &str) -> String {
    let stem: String = strategy_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "strategy".to_string()
    } else {
        stem
    }
}

/// 写出一张 CSV 表（含表头）
fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> ExportResult<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "表格写出");
    Ok(())
}

// ==========================================
// TableExporter
// ==========================================
pub struct TableExporter {
    out_dir: PathBuf,
}

impl TableExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// 导出全部表格
    ///
    /// # 返回
    /// - 写出的文件路径（按写出顺序）
    pub fn export(&self, report: &AnalysisReport) -> ExportResult<Vec<PathBuf>> {
        let _perf = PerfGuard::new("export_tables");
        fs::create_dir_all(&self.out_dir).map_err(|source| ExportError::OutputDir {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut written = Vec::new();

        let matched: Vec<MatchedRow> = report.matched.iter().map(MatchedRow::from).collect();
        written.push(self.write(MATCHED_FILE, &matched)?);

        let unmatched: Vec<UnmatchedRow> = report.unmatched.iter().map(UnmatchedRow::from).collect();
        written.push(self.write(UNMATCHED_FILE, &unmatched)?);

        let alternatives: Vec<AlternativeRow> = report
            .alternative_sets
            .iter()
            .flat_map(|set| {
                let quantity = set.material.quantity();
                set.alternatives
                    .iter()
                    .map(move |alt| AlternativeRow::new(alt, quantity))
            })
            .collect();
        written.push(self.write(ALTERNATIVES_FILE, &alternatives)?);

        let scored: Vec<ScoredRow> = report
            .scored_sets
            .iter()
            .flat_map(|set| {
                let quantity = set.material.quantity();
                set.alternatives
                    .iter()
                    .map(move |alt| ScoredRow::new(alt, quantity))
            })
            .collect();
        written.push(self.write(SCORED_FILE, &scored)?);

        for run in &report.strategy_runs {
            let stem = file_stem_for(&run.strategy_id);

            let selections: Vec<SelectionRow> = run
                .selections
                .iter()
                .map(|s| SelectionRow::new(&run.strategy_id, s))
                .collect();
            written.push(self.write(&format!("{}_selections.csv", stem), &selections)?);

            let mut metrics: Vec<MetricsRow> = run
                .categories
                .iter()
                .map(|(group, m)| MetricsRow::category(&run.strategy_id, *group, m))
                .collect();
            metrics.push(MetricsRow::overall(&run.strategy_id, &run.overall));
            written.push(self.write(&format!("{}_metrics.csv", stem), &metrics)?);
        }

        let presets_path = self.out_dir.join(PRESETS_FILE);
        fs::write(&presets_path, report.presets.to_json_pretty()?)?;
        written.push(presets_path);

        info!(
            run_id = %report.run_id,
            out_dir = %self.out_dir.display(),
            files = written.len(),
            "导出完成"
        );
        Ok(written)
    }

    fn write<T: TableRow>(&self, file_name: &str, rows: &[T]) -> ExportResult<PathBuf> {
        let path = self.out_dir.join(file_name);
        write_table(&path, rows)?;
        Ok(path)
    }
}
