// ==========================================
// 价值工程决策引擎 - 材料与参考目录实体
// ==========================================
// 输入: MaterialSpec (项目材料) / CatalogEntry (参考成本库)
// 输出: MatchedMaterial (材料 + 唯一最佳目录条目)
// 红线: 本层只定义数据, 不含匹配/搜索逻辑
// ==========================================

use crate::domain::types::MaterialCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// MaterialSpec - 项目材料
// ==========================================
/// 一个项目材料实例（窗型号/门型号/电器类型）
///
/// 创建后只读; 数量为 0 的记录在导入阶段已被排除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub material_id: String,
    pub category: MaterialCategory,
    pub width: String,
    pub height: String,
    /// 窗: 样式; 门: 门型; 电器: 电器名称
    pub style: String,
    /// 窗: V/W/A 材质代码; 门: 材质描述 (WD/SC, HM, glass ...)
    pub material: String,
    #[serde(default)]
    pub location: String,
    pub quantity: u32,
}

impl MaterialSpec {
    /// 展示用描述
    pub fn description(&self) -> String {
        if self.category.is_door() && !self.location.trim().is_empty() {
            format!("{} - {}", self.location.trim(), self.style.trim())
        } else if matches!(self.category, MaterialCategory::Appliance) && self.style.trim().is_empty() {
            self.material_id.trim().to_string()
        } else {
            self.style.trim().to_string()
        }
    }
}

// ==========================================
// CatalogEntry - 参考成本库条目
// ==========================================
/// 窗/外门/内门共用的目录行; 不同目录缺失的列留空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub material: String,
    pub item_type: String,
    /// SIZE / OPENING / DIMENSIONS
    pub size: String,
    #[serde(default)]
    pub core_type: String,
    #[serde(default)]
    pub glazing: String,
    #[serde(default)]
    pub description: String,
    pub material_cost: f64,
    pub install_cost: f64,
    pub total_cost: f64,
}

impl CatalogEntry {
    /// 拼接展示描述（跳过空字段）
    pub fn describe(&self) -> String {
        [
            self.material.as_str(),
            self.core_type.as_str(),
            self.item_type.as_str(),
            self.description.as_str(),
            self.size.as_str(),
        ]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// 总价可参与比较（清洗阶段无法解析的金额为 NaN）
    pub fn has_usable_cost(&self) -> bool {
        self.total_cost.is_finite()
    }
}

// ==========================================
// ApplianceListing - 电器价格条目
// ==========================================
/// 电器目录行; 价格保留原始文本 (可能为区间 "885 - 1300")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceListing {
    pub description: String,
    #[serde(default)]
    pub unit: String,
    pub cost: String,
}

// ==========================================
// ReferenceCatalog - 参考目录 (一次运行内只读)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCatalog {
    pub windows: Vec<CatalogEntry>,
    pub exterior_doors: Vec<CatalogEntry>,
    pub interior_doors: Vec<CatalogEntry>,
    pub appliances: Vec<ApplianceListing>,
}

impl ReferenceCatalog {
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
            && self.exterior_doors.is_empty()
            && self.interior_doors.is_empty()
            && self.appliances.is_empty()
    }

    /// 窗/门类别对应的目录; 电器返回空切片
    pub fn entries_for(&self, category: MaterialCategory) -> &[CatalogEntry] {
        match category {
            MaterialCategory::Window => &self.windows,
            MaterialCategory::ExteriorDoor => &self.exterior_doors,
            MaterialCategory::InteriorDoor => &self.interior_doors,
            MaterialCategory::Appliance => &[],
        }
    }
}

// ==========================================
// PricedItem - 带单价的方案条目
// ==========================================
/// 匹配结果与替代方案共用的单价视图
///
/// `entry` 保留目录原始行, 供规则评分读取材质/玻璃/类型; 合成条目为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedItem {
    pub code: String,
    pub description: String,
    pub material_cost: f64,
    pub install_cost: f64,
    pub total_cost: f64,
    #[serde(skip)]
    pub entry: Option<CatalogEntry>,
}

impl PricedItem {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            code: entry.code.clone(),
            description: entry.describe(),
            material_cost: entry.material_cost,
            install_cost: entry.install_cost,
            total_cost: entry.total_cost,
            entry: Some(entry.clone()),
        }
    }

    /// 无目录行的合成条目（电器原价/折扣价）
    pub fn synthetic(code: &str, description: String, unit_cost: f64) -> Self {
        Self {
            code: code.to_string(),
            description,
            material_cost: unit_cost,
            install_cost: 0.0,
            total_cost: unit_cost,
            entry: None,
        }
    }
}

// ==========================================
// TargetDimensions - 规格目标尺寸
// ==========================================
/// 由原始尺寸字符串解析得到（解析失败时为默认值）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetDimensions {
    pub width_in: f64,
    pub height_in: f64,
    pub area_sqft: f64,
}

// ==========================================
// MatchedMaterial - 已匹配材料
// ==========================================
/// 不变量: 每个 MaterialSpec 恰好绑定一个目录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedMaterial {
    pub spec: MaterialSpec,
    pub item: PricedItem,
    pub target: TargetDimensions,
}

impl MatchedMaterial {
    pub fn material_id(&self) -> &str {
        &self.spec.material_id
    }

    pub fn category(&self) -> MaterialCategory {
        self.spec.category
    }

    pub fn quantity(&self) -> u32 {
        self.spec.quantity
    }

    pub fn unit_total_cost(&self) -> f64 {
        self.item.total_cost
    }

    pub fn total_material_cost(&self) -> f64 {
        self.item.material_cost * self.spec.quantity as f64
    }

    pub fn total_install_cost(&self) -> f64 {
        self.item.install_cost * self.spec.quantity as f64
    }

    pub fn total_cost(&self) -> f64 {
        self.item.total_cost * self.spec.quantity as f64
    }
}

// ==========================================
// 匹配结果
// ==========================================
/// 未匹配材料: 从下游所有阶段排除, 但需计数上报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedMaterial {
    pub spec: MaterialSpec,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(MatchedMaterial),
    Unmatched(UnmatchedMaterial),
}

impl MatchOutcome {
    pub fn matched(&self) -> Option<&MatchedMaterial> {
        match self {
            MatchOutcome::Matched(m) => Some(m),
            MatchOutcome::Unmatched(_) => None,
        }
    }
}
