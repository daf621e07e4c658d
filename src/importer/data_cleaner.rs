// ==========================================
// 价值工程决策引擎 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / NULL 标准化 / 金额与数量解析
// ==========================================

use crate::domain::MaterialCategory;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            match trimmed.to_uppercase().as_str() {
                "" | "NULL" | "NAN" | "N/A" | "NA" | "-" => None,
                _ => Some(trimmed.to_string()),
            }
        })
    }

    fn parse_money(&self, value: Option<&str>, row: usize, field: &str) -> f64 {
        let cleaned = value.unwrap_or("").replace([',', '$'], "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return 0.0;
        }
        cleaned.parse::<f64>().unwrap_or_else(|_| {
            tracing::warn!(row, field, raw_value = %cleaned, "金额无法解析，记为 NaN");
            f64::NAN
        })
    }

    fn parse_quantity(&self, value: &str, row: usize) -> ImportResult<u32> {
        let cleaned = value.trim().replace(',', "");
        let conversion_error = |message: String| ImportError::TypeConversionError {
            row,
            field: "QUANTITY".to_string(),
            message,
        };

        let number = cleaned
            .parse::<f64>()
            .map_err(|_| conversion_error(format!("无法解析为数量: {}", value)))?;
        if !number.is_finite() || number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
            return Err(conversion_error(format!("数量必须为非负整数: {}", value)));
        }
        Ok(number as u32)
    }

    fn parse_category(&self, value: &str, row: usize) -> ImportResult<MaterialCategory> {
        value
            .parse::<MaterialCategory>()
            .map_err(|message| ImportError::FieldMappingError { row, message })
    }
}

impl DataCleaner {
    /// 门位置是否为外门（入户/阳台/露台等）
    pub fn is_exterior_location(&self, location: &str) -> bool {
        let lower = location.to_lowercase();
        ["exterior", "entry", "entrance", "balcony", "patio", "terrace", "corridor"]
            .iter()
            .any(|k| lower.contains(k))
    }
}
