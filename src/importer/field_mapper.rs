// ==========================================
// 价值工程决策引擎 - 字段映射器实现
// ==========================================
// 职责: 源列名（含别名）→ 领域字段 + 类型转换
// ==========================================

use crate::domain::{ApplianceListing, CatalogEntry, MaterialCategory, MaterialSpec};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait, RawRow,
};

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_material_spec(
        &self,
        row: &RawRow,
        row_number: usize,
        default_category: Option<MaterialCategory>,
    ) -> ImportResult<MaterialSpec> {
        let material_id =
            self.get_string(row, "MATERIAL_ID")
                .ok_or_else(|| ImportError::PrimaryKeyMissing {
                    row: row_number,
                    field: "MATERIAL_ID".to_string(),
                })?;

        let location = self.get_string(row, "LOCATION").unwrap_or_default();
        let category = match (self.get_string(row, "CATEGORY"), default_category) {
            (Some(raw), _) if matches!(raw.trim().to_lowercase().as_str(), "door" | "doors") => {
                // 未区分内外门时按位置判断
                if self.cleaner.is_exterior_location(&location) {
                    MaterialCategory::ExteriorDoor
                } else {
                    MaterialCategory::InteriorDoor
                }
            }
            (Some(raw), _) => self.cleaner.parse_category(&raw, row_number)?,
            (None, Some(category)) => category,
            (None, None) => {
                return Err(ImportError::FieldMappingError {
                    row: row_number,
                    message: "缺少 CATEGORY 且未指定默认类别".to_string(),
                })
            }
        };

        let quantity_raw =
            self.get_string(row, "QUANTITY")
                .ok_or_else(|| ImportError::FieldMappingError {
                    row: row_number,
                    message: "缺少 QUANTITY".to_string(),
                })?;

        Ok(MaterialSpec {
            material_id,
            category,
            width: self.get_string(row, "WIDTH").unwrap_or_default(),
            height: self.get_string(row, "HEIGHT").unwrap_or_default(),
            style: self.get_string(row, "STYLE").unwrap_or_default(),
            material: self.get_string(row, "MATERIAL").unwrap_or_default(),
            location,
            quantity: self.cleaner.parse_quantity(&quantity_raw, row_number)?,
        })
    }

    fn map_to_catalog_entry(&self, row: &RawRow, row_number: usize) -> ImportResult<CatalogEntry> {
        let code = self
            .get_string(row, "CODE")
            .ok_or_else(|| ImportError::PrimaryKeyMissing {
                row: row_number,
                field: "CODE".to_string(),
            })?;

        let material_cost = self.parse_money(row, "MAT", row_number);
        let install_cost = self.parse_money(row, "INST", row_number);
        let total_cost = self.parse_money(row, "TOTAL", row_number);

        Ok(CatalogEntry {
            code,
            material: self.get_string(row, "CATALOG_MATERIAL").unwrap_or_default(),
            item_type: self.get_string(row, "TYPE").unwrap_or_default(),
            size: self.get_string(row, "SIZE").unwrap_or_default(),
            core_type: self.get_string(row, "CORE_TYPE").unwrap_or_default(),
            glazing: self.get_string(row, "GLAZING").unwrap_or_default(),
            description: self.get_string(row, "DESCRIPTION").unwrap_or_default(),
            material_cost,
            install_cost,
            total_cost,
        })
    }

    fn map_to_appliance_listing(
        &self,
        row: &RawRow,
        row_number: usize,
    ) -> ImportResult<ApplianceListing> {
        let description =
            self.get_string(row, "DESCRIPTION")
                .ok_or_else(|| ImportError::PrimaryKeyMissing {
                    row: row_number,
                    field: "Description".to_string(),
                })?;

        Ok(ApplianceListing {
            description,
            unit: self.get_string(row, "UNIT").unwrap_or_default(),
            cost: self.get_string(row, "COST").unwrap_or_default(),
        })
    }
}

impl FieldMapper {
    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        let aliases: &[&str] = match key {
            "MATERIAL_ID" => &["MATERIAL_ID", "MARK", "ID", "Material ID", "APPLIANCE", "Appliance"],
            "CATEGORY" => &["CATEGORY", "Category"],
            "WIDTH" => &["WIDTH", "UNIT SIZE WIDTH", "Width"],
            "HEIGHT" => &["HEIGHT", "UNIT SIZE HEIGHT", "Height"],
            "STYLE" => &["STYLE", "TYPE", "Style", "Type"],
            "MATERIAL" => &["MATERIAL", "Material"],
            "LOCATION" => &["LOCATION", "Location"],
            "QUANTITY" => &["QUANTITY", "COUNT", "TOTAL COUNT", "Quantity", "Count"],
            "CODE" => &["CODE", "Code"],
            // 门目录的材质列在部分文件中为 "Material"
            "CATALOG_MATERIAL" => &["MATERIAL", "Material"],
            "SIZE" => &["SIZE", "OPENING", "DIMENSIONS", "Size"],
            "CORE_TYPE" => &["Core type", "CORE_TYPE", "CORE TYPE", "Core Type"],
            "GLAZING" => &["GLAZING", "Glazing"],
            "DESCRIPTION" => &["DESCRIPTION", "Description"],
            "MAT" => &["MAT", "MAT."],
            "INST" => &["INST", "INST."],
            "TOTAL" => &["TOTAL", "TOTAL COST", "Total"],
            "UNIT" => &["Unit", "UNIT"],
            "COST" => &["Cost", "COST"],
            _ => &[],
        };

        // 尝试所有可能的列名
        let single = [key];
        let candidates: &[&str] = if aliases.is_empty() { &single } else { aliases };
        for alias in candidates {
            let value = self.cleaner.normalize_null(row.get(*alias).cloned());
            if value.is_some() {
                return value;
            }
        }
        None
    }

    /// 金额列（空值标记按空串处理）
    fn parse_money(&self, row: &RawRow, key: &str, row_number: usize) -> f64 {
        let raw = self.get_string(row, key);
        self.cleaner.parse_money(raw.as_deref(), row_number, key)
    }
}
