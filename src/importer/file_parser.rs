// ==========================================
// 价值工程决策引擎 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / TSV (.tsv, .txt)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 按扩展名推断分隔符; 不支持的扩展名返回 None
pub fn delimiter_for(path: &Path) -> Option<u8> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "csv" => Some(b','),
        "tsv" | "txt" => Some(b'\t'),
        _ => None,
    }
}

// ==========================================
// 分隔符文本 Parser 实现
// ==========================================
pub struct DelimitedParser {
    delimiter: u8,
}

impl DelimitedParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn csv() -> Self {
        Self::new(b',')
    }

    pub fn tsv() -> Self {
        Self::new(b'\t')
    }
}

impl FileParser for DelimitedParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true) // 允许行长度不一致
            .trim(csv::Trim::All)
            .from_reader(file);

        // 读取表头（去除 UTF-8 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = RawRow::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        match delimiter_for(file_path) {
            Some(delimiter) => DelimitedParser::new(delimiter).parse_to_raw_records(file_path),
            None => Err(ImportError::UnsupportedFormat(
                file_path
                    .extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )),
        }
    }
}
