// ==========================================
// 价值工程决策引擎 - 目录匹配引擎
// ==========================================
// 职责: 为每个项目材料找到唯一最佳参考目录条目
// 规则: 材质过滤 → 样式过滤 → 尺寸差最小
// 红线: 任一过滤结果为空时回退到上一步的候选集,
//       非空目录永远不会因过滤而匹配失败
// ==========================================

use crate::domain::{
    ApplianceListing, CatalogEntry, MatchOutcome, MatchedMaterial, MaterialCategory, MaterialSpec,
    PricedItem, ReferenceCatalog, UnmatchedMaterial,
};
use crate::engine::cost::parse_cost;
use crate::engine::dimension::{catalog_area_sqft, catalog_width_in, target_dimensions};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// 窗样式关键字（按优先级）
pub const WINDOW_STYLE_KEYWORDS: [&str; 6] = [
    "casement",
    "sliding",
    "fixed",
    "picture",
    "awning",
    "double hung",
];

/// 电器关键字映射: 材料名包含 key 时依次尝试 keywords
///
/// dishwasher 必须排在 washer 之前, hood 必须排在 range 之前
const APPLIANCE_KEYWORDS: [(&str, &[&str]); 7] = [
    ("refrigerator", &["Refrigerator, no frost", "Refrigerator"]),
    ("microwave", &["Microwave oven"]),
    ("hood", &["Hood for range"]),
    ("range", &["Cooking range", "range"]),
    ("dishwasher", &["Dishwasher, built-in"]),
    ("washer", &["Washer"]),
    ("dryer", &["Dryer"]),
];

/// 电器原方案的合成编码
pub const APPLIANCE_ORIGINAL_CODE: &str = "ORIGINAL";

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 电器类型名: 材料标识即电器类型（如 "Refrigerator"）;
/// 标识不含已知类型关键字时退回 STYLE 列
fn appliance_name(spec: &MaterialSpec) -> &str {
    let known = |text: &str| {
        let text = text.to_lowercase();
        APPLIANCE_KEYWORDS.iter().any(|(key, _)| text.contains(key))
    };
    if known(spec.material_id.as_str()) || spec.style.trim().is_empty() {
        spec.material_id.as_str()
    } else {
        spec.style.as_str()
    }
}

/// 窗材质代码 → 目录材质关键字（仅在规格声明时生效）
pub fn window_material_keyword(code: &str) -> Option<&'static str> {
    let code = code.trim().to_lowercase();
    match code.as_str() {
        "" => None,
        "v" => Some("vinyl"),
        "w" => Some("wood"),
        "a" => Some("alum"),
        other if other.contains("vinyl") => Some("vinyl"),
        other if other.contains("wood") => Some("wood"),
        other if other.contains("alum") => Some("alum"),
        _ => None,
    }
}

/// 从样式描述中识别第一个已知样式关键字
pub fn window_style_keyword(style: &str) -> Option<&'static str> {
    let style = style.to_lowercase();
    WINDOW_STYLE_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| style.contains(keyword))
}

/// 内门材质判断结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoorMaterialTraits {
    pub wood: bool,
    pub metal: bool,
    pub solid_core: bool,
    pub hollow_core: bool,
}

impl DoorMaterialTraits {
    pub fn from_text(material: &str) -> Self {
        let lower = material.to_lowercase();
        Self {
            wood: lower.contains("wood") || lower.contains("wd"),
            metal: lower.contains("metal"),
            solid_core: lower.contains("sc"),
            hollow_core: lower.contains("hc") || lower.contains("hollow"),
        }
    }

    /// 目录 material 列需要包含的关键字
    pub fn material_keyword(&self) -> Option<&'static str> {
        if self.wood {
            Some("wood")
        } else if self.metal {
            Some("metal")
        } else {
            None
        }
    }

    /// 目录 core_type 列需要包含的关键字
    pub fn core_keyword(&self) -> Option<&'static str> {
        if self.solid_core {
            Some("solid")
        } else if self.hollow_core {
            Some("hollow")
        } else {
            None
        }
    }
}

/// 过滤候选集; 过滤结果为空时保留原候选集
pub(crate) fn narrow<'a, F>(candidates: Vec<&'a CatalogEntry>, keep: F) -> Vec<&'a CatalogEntry>
where
    F: Fn(&CatalogEntry) -> bool,
{
    let narrowed: Vec<&CatalogEntry> = candidates.iter().copied().filter(|e| keep(*e)).collect();
    if narrowed.is_empty() {
        candidates
    } else {
        narrowed
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// ==========================================
// CatalogMatcher - 目录匹配引擎
// ==========================================
/// 无状态引擎; 目录以只读引用显式传入
pub struct CatalogMatcher;

impl CatalogMatcher {
    pub fn new() -> Self {
        Self
    }

    /// 批量匹配（顺序与输入一致）
    pub fn match_all(&self, specs: &[MaterialSpec], catalog: &ReferenceCatalog) -> Vec<MatchOutcome> {
        specs
            .iter()
            .map(|spec| self.match_material(spec, catalog))
            .collect()
    }

    /// 匹配单个材料
    pub fn match_material(&self, spec: &MaterialSpec, catalog: &ReferenceCatalog) -> MatchOutcome {
        let target = target_dimensions(spec);

        let item = match spec.category {
            MaterialCategory::Window => self
                .best_window(spec, target.area_sqft, &catalog.windows)
                .map(PricedItem::from_entry),
            MaterialCategory::ExteriorDoor => self
                .best_exterior_door(target.width_in, &catalog.exterior_doors)
                .map(PricedItem::from_entry),
            MaterialCategory::InteriorDoor => self
                .best_interior_door(spec, target.width_in, &catalog.interior_doors)
                .map(PricedItem::from_entry),
            MaterialCategory::Appliance => self
                .best_appliance(appliance_name(spec), &catalog.appliances)
                .map(|(listing, unit_cost)| {
                    PricedItem::synthetic(
                        APPLIANCE_ORIGINAL_CODE,
                        listing.description.clone(),
                        unit_cost,
                    )
                }),
        };

        match item {
            Some(item) => {
                debug!(
                    material_id = %spec.material_id,
                    category = %spec.category,
                    code = %item.code,
                    unit_total = item.total_cost,
                    "材料匹配完成"
                );
                MatchOutcome::Matched(MatchedMaterial {
                    spec: spec.clone(),
                    item,
                    target,
                })
            }
            None => {
                warn!(
                    material_id = %spec.material_id,
                    category = %spec.category,
                    "目录中无可用候选, 材料未匹配"
                );
                MatchOutcome::Unmatched(UnmatchedMaterial {
                    spec: spec.clone(),
                    reason: format!("{} 目录无可用候选", spec.category),
                })
            }
        }
    }

    // ===== 窗 =====

    fn best_window<'a>(
        &self,
        spec: &MaterialSpec,
        target_area: f64,
        catalog: &'a [CatalogEntry],
    ) -> Option<&'a CatalogEntry> {
        let mut candidates: Vec<&CatalogEntry> =
            catalog.iter().filter(|e| e.has_usable_cost()).collect();
        if candidates.is_empty() {
            return None;
        }

        if let Some(keyword) = window_material_keyword(&spec.material) {
            candidates = narrow(candidates, |e| contains_ci(&e.material, keyword));
        }
        if let Some(keyword) = window_style_keyword(&spec.style) {
            candidates = narrow(candidates, |e| contains_ci(&e.item_type, keyword));
        }

        // 面积差最小; 并列时取先出现者
        candidates.into_iter().fold(None, |best, entry| {
            let diff = (catalog_area_sqft(&entry.size) - target_area).abs();
            match best {
                Some((best_diff, _)) if cmp_f64(diff, best_diff) != Ordering::Less => best,
                _ => Some((diff, entry)),
            }
        })
        .map(|(_, entry)| entry)
    }

    // ===== 外门 =====

    fn best_exterior_door<'a>(
        &self,
        target_width: f64,
        catalog: &'a [CatalogEntry],
    ) -> Option<&'a CatalogEntry> {
        let candidates: Vec<&CatalogEntry> =
            catalog.iter().filter(|e| e.has_usable_cost()).collect();
        if candidates.is_empty() {
            return None;
        }

        let candidates = narrow(candidates, |e| {
            contains_ci(&e.item_type, "glass") || contains_ci(&e.item_type, "door")
        });

        candidates.into_iter().fold(None, |best, entry| {
            let diff = (catalog_width_in(&entry.size) - target_width).abs();
            match best {
                Some((best_diff, _)) if cmp_f64(diff, best_diff) != Ordering::Less => best,
                _ => Some((diff, entry)),
            }
        })
        .map(|(_, entry)| entry)
    }

    // ===== 内门 =====

    fn best_interior_door<'a>(
        &self,
        spec: &MaterialSpec,
        target_width: f64,
        catalog: &'a [CatalogEntry],
    ) -> Option<&'a CatalogEntry> {
        let mut candidates: Vec<&CatalogEntry> =
            catalog.iter().filter(|e| e.has_usable_cost()).collect();
        if candidates.is_empty() {
            return None;
        }

        let traits = DoorMaterialTraits::from_text(&spec.material);
        if let Some(keyword) = traits.material_keyword() {
            candidates = narrow(candidates, |e| contains_ci(&e.material, keyword));
        }
        if let Some(keyword) = traits.core_keyword() {
            candidates = narrow(candidates, |e| contains_ci(&e.core_type, keyword));
        }

        // 宽度差优先, 总价次之; 稳定排序保证并列时先出现者胜出
        candidates.sort_by(|a, b| {
            let da = (catalog_width_in(&a.size) - target_width).abs();
            let db = (catalog_width_in(&b.size) - target_width).abs();
            cmp_f64(da, db).then_with(|| cmp_f64(a.total_cost, b.total_cost))
        });
        candidates.into_iter().next()
    }

    // ===== 电器 =====

    fn best_appliance<'a>(
        &self,
        appliance_name: &str,
        listings: &'a [ApplianceListing],
    ) -> Option<(&'a ApplianceListing, f64)> {
        let name = appliance_name.to_lowercase();
        let priced = |listing: &'a ApplianceListing| {
            let cost = parse_cost(&listing.cost);
            (cost > 0.0).then_some((listing, cost))
        };

        for (key, keywords) in APPLIANCE_KEYWORDS.iter() {
            if !name.contains(key) {
                continue;
            }
            for keyword in keywords.iter() {
                let found = listings
                    .iter()
                    .filter(|l| contains_ci(&l.description, keyword))
                    .find_map(priced);
                if found.is_some() {
                    return found;
                }
            }
        }

        // 关键字均未命中: 取第一个有价格的条目
        listings.iter().find_map(priced)
    }
}

impl Default for CatalogMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
