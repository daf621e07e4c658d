// ==========================================
// 价值工程决策引擎 - 替代方案生成引擎
// ==========================================
// 职责: 为已匹配材料在同一参考目录中搜索更便宜(或同价)的候选
// 规则:
// - 排除原目录编码
// - 样式/材质过滤放宽: 过滤为空时回退
// - 窗: 面积差容差阶梯 (20% → 30%), 达到最少候选数即停止
// - 外门: 开口高度 ≥ 84 in; 内门: 宽度差 ≤ 6 in
// - 价格: 严格更便宜者按总价升序取前 N; 不足 N 时追加同价补位
// - 电器: 固定 10% 折扣, 不搜索目录
// ==========================================

use crate::domain::{
    Alternative, AlternativeKind, AlternativeOrigin, AlternativeSet, CatalogEntry,
    MatchedMaterial, MaterialCategory, PricedItem, ReferenceCatalog,
};
use crate::engine::cost::cost_reduction_pct;
use crate::engine::dimension::{catalog_area_sqft, catalog_height_in, catalog_width_in};
use crate::engine::matcher::{narrow, window_style_keyword, DoorMaterialTraits};
use crate::engine::strategic::StrategicWindowPlanner;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// 电器固定折扣比例 (%)
pub const APPLIANCE_DISCOUNT_PCT: f64 = 10.0;

/// 电器折扣方案的合成编码
pub const APPLIANCE_REDUCED_CODE: &str = "REDUCED";

/// 同价判定容差
const SAME_PRICE_EPSILON: f64 = 1e-6;

/// 窗替代方案模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// 最便宜优先, 最多 N 个
    Cheapest,
    /// 4 个固定角色
    Strategic,
}

impl Default for WindowMode {
    fn default() -> Self {
        WindowMode::Cheapest
    }
}

impl std::str::FromStr for WindowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cheapest" | "baseline" => Ok(WindowMode::Cheapest),
            "strategic" => Ok(WindowMode::Strategic),
            other => Err(format!("未知窗替代模式: {}", other)),
        }
    }
}

/// 替代方案生成配置
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeConfig {
    pub max_alternatives: usize,
    pub min_candidates: usize,
    /// 窗面积差容差阶梯 (%), 最后一级为硬上限
    pub window_area_tolerance_ladder: Vec<f64>,
    pub interior_door_width_tolerance_in: f64,
    pub exterior_door_min_height_in: f64,
    pub allow_same_price_fill: bool,
    pub window_mode: WindowMode,
    /// 战略模式下的容差阶梯 (%)
    pub strategic_area_tolerance_ladder: Vec<f64>,
}

impl Default for AlternativeConfig {
    fn default() -> Self {
        Self {
            max_alternatives: 3,
            min_candidates: 3,
            window_area_tolerance_ladder: vec![20.0, 30.0],
            interior_door_width_tolerance_in: 6.0,
            exterior_door_min_height_in: 84.0,
            allow_same_price_fill: true,
            window_mode: WindowMode::Cheapest,
            strategic_area_tolerance_ladder: vec![20.0, 30.0, 40.0],
        }
    }
}

impl AlternativeConfig {
    /// 单个材料生成方案数上限
    pub fn cap_for(&self, category: MaterialCategory) -> usize {
        match category {
            MaterialCategory::Appliance => 1,
            MaterialCategory::Window if self.window_mode == WindowMode::Strategic => {
                StrategicWindowPlanner::ROLE_COUNT
            }
            _ => self.max_alternatives,
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn same_price(a: f64, b: f64) -> bool {
    (a - b).abs() <= SAME_PRICE_EPSILON
}

/// 面积差百分比（目标面积非正时视为无穷大）
pub fn area_diff_pct(candidate_area: f64, target_area: f64) -> f64 {
    if target_area > 0.0 {
        (candidate_area - target_area).abs() / target_area * 100.0
    } else {
        f64::INFINITY
    }
}

// ==========================================
// AlternativeGenerator - 替代方案生成引擎
// ==========================================
pub struct AlternativeGenerator {
    config: AlternativeConfig,
}

impl AlternativeGenerator {
    pub fn new(config: AlternativeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlternativeConfig {
        &self.config
    }

    /// 批量生成（顺序与输入一致）
    pub fn generate_all(
        &self,
        matched: &[MatchedMaterial],
        catalog: &ReferenceCatalog,
    ) -> Vec<AlternativeSet> {
        let sets: Vec<AlternativeSet> = matched
            .iter()
            .map(|m| self.generate(m, catalog))
            .collect();

        let generated: usize = sets.iter().map(|s| s.generated_count()).sum();
        info!(
            materials = sets.len(),
            generated,
            window_mode = ?self.config.window_mode,
            "替代方案生成完成"
        );
        sets
    }

    /// 为单个材料生成方案集合（下标 0 为原方案）
    pub fn generate(&self, matched: &MatchedMaterial, catalog: &ReferenceCatalog) -> AlternativeSet {
        let original_cost = matched.unit_total_cost();

        let mut alternatives = vec![Alternative::original(matched)];
        let picked: Vec<(AlternativeOrigin, PricedItem)> = match matched.category() {
            MaterialCategory::Appliance => vec![(
                AlternativeOrigin::FlatDiscount,
                Self::appliance_discount(matched),
            )],
            MaterialCategory::Window if self.config.window_mode == WindowMode::Strategic => {
                let pool = self.pool(matched, &catalog.windows);
                StrategicWindowPlanner::new(self.config.strategic_area_tolerance_ladder.clone())
                    .plan(matched, pool)
                    .into_iter()
                    .map(|(role, entry)| {
                        (AlternativeOrigin::Strategic(role), PricedItem::from_entry(entry))
                    })
                    .collect()
            }
            MaterialCategory::Window => {
                let eligible = self.window_candidates(matched, &catalog.windows);
                self.rank_by_price(original_cost, eligible)
            }
            MaterialCategory::ExteriorDoor => {
                let eligible = self.exterior_door_candidates(matched, &catalog.exterior_doors);
                self.rank_by_price(original_cost, eligible)
            }
            MaterialCategory::InteriorDoor => {
                let eligible = self.interior_door_candidates(matched, &catalog.interior_doors);
                self.rank_by_price(original_cost, eligible)
            }
        };

        for (idx, (origin, item)) in picked.into_iter().enumerate() {
            let cost_reduction = match origin {
                AlternativeOrigin::FlatDiscount => APPLIANCE_DISCOUNT_PCT,
                _ => cost_reduction_pct(original_cost, item.total_cost),
            };
            alternatives.push(Alternative {
                material_id: matched.material_id().to_string(),
                category: matched.category(),
                kind: AlternativeKind::Generated {
                    rank: idx as u32 + 1,
                    origin,
                },
                item,
                original_cost,
                cost_reduction_pct: cost_reduction,
            });
        }

        debug!(
            material_id = %matched.material_id(),
            category = %matched.category(),
            generated = alternatives.len() - 1,
            "替代方案生成"
        );

        AlternativeSet {
            material: matched.clone(),
            alternatives,
        }
    }

    // ===== 候选池 =====

    /// 可比较价格且非原编码的目录行
    fn pool<'a>(&self, matched: &MatchedMaterial, catalog: &'a [CatalogEntry]) -> Vec<&'a CatalogEntry> {
        catalog
            .iter()
            .filter(|e| e.has_usable_cost() && e.code != matched.item.code)
            .collect()
    }

    fn within_price(&self, matched: &MatchedMaterial, entry: &CatalogEntry) -> bool {
        let original = matched.unit_total_cost();
        entry.total_cost < original || same_price(entry.total_cost, original)
    }

    /// 窗: 样式过滤(放宽) + 面积容差阶梯
    fn window_candidates<'a>(
        &self,
        matched: &MatchedMaterial,
        catalog: &'a [CatalogEntry],
    ) -> Vec<&'a CatalogEntry> {
        let mut pool = self.pool(matched, catalog);
        if let Some(keyword) = window_style_keyword(&matched.spec.style) {
            pool = narrow(pool, |e| e.item_type.to_lowercase().contains(keyword));
        }

        let target_area = matched.target.area_sqft;
        let mut eligible = Vec::new();
        for (step, tolerance) in self.config.window_area_tolerance_ladder.iter().enumerate() {
            eligible = pool
                .iter()
                .copied()
                .filter(|e| area_diff_pct(catalog_area_sqft(&e.size), target_area) <= *tolerance)
                .filter(|e| self.within_price(matched, e))
                .collect();

            debug!(
                material_id = %matched.material_id(),
                step,
                tolerance_pct = *tolerance,
                candidate_count = eligible.len(),
                "窗面积容差阶梯"
            );
            if eligible.len() >= self.config.min_candidates {
                break;
            }
        }
        eligible
    }

    /// 外门: 开口高度硬约束 + 玻璃/铝材质过滤(放宽)
    fn exterior_door_candidates<'a>(
        &self,
        matched: &MatchedMaterial,
        catalog: &'a [CatalogEntry],
    ) -> Vec<&'a CatalogEntry> {
        let mut pool: Vec<&CatalogEntry> = self
            .pool(matched, catalog)
            .into_iter()
            .filter(|e| catalog_height_in(&e.size) >= self.config.exterior_door_min_height_in)
            .collect();

        let material = &matched.spec.material;
        if material.to_lowercase().contains("glass") || material.to_uppercase().contains("WD/CMF") {
            pool = narrow(pool, |e| {
                let m = e.material.to_lowercase();
                m.contains("glass") || m.contains("alum")
            });
        }

        pool.into_iter()
            .filter(|e| self.within_price(matched, e))
            .collect()
    }

    /// 内门: 木/金属材质过滤(放宽) + 宽度容差硬约束
    fn interior_door_candidates<'a>(
        &self,
        matched: &MatchedMaterial,
        catalog: &'a [CatalogEntry],
    ) -> Vec<&'a CatalogEntry> {
        let mut pool = self.pool(matched, catalog);
        let traits = DoorMaterialTraits::from_text(&matched.spec.material);
        if let Some(keyword) = traits.material_keyword() {
            pool = narrow(pool, |e| e.material.to_lowercase().contains(keyword));
        }

        let target_width = matched.target.width_in;
        pool.into_iter()
            .filter(|e| {
                (catalog_width_in(&e.size) - target_width).abs()
                    <= self.config.interior_door_width_tolerance_in
            })
            .filter(|e| self.within_price(matched, e))
            .collect()
    }

    // ===== 价格排序 =====

    /// 严格更便宜者升序取前 N; 不足时追加同价补位（只追加, 不挤占）
    fn rank_by_price(
        &self,
        original_cost: f64,
        eligible: Vec<&CatalogEntry>,
    ) -> Vec<(AlternativeOrigin, PricedItem)> {
        let cap = self.config.max_alternatives;
        let (mut cheaper, same): (Vec<&CatalogEntry>, Vec<&CatalogEntry>) = eligible
            .into_iter()
            .partition(|e| !same_price(e.total_cost, original_cost));

        cheaper.sort_by(|a, b| cmp_f64(a.total_cost, b.total_cost));

        let mut picked: Vec<(AlternativeOrigin, PricedItem)> = cheaper
            .into_iter()
            .take(cap)
            .map(|e| (AlternativeOrigin::Cheaper, PricedItem::from_entry(e)))
            .collect();

        if self.config.allow_same_price_fill && picked.len() < cap {
            let room = cap - picked.len();
            picked.extend(
                same.into_iter()
                    .take(room)
                    .map(|e| (AlternativeOrigin::SamePriceFill, PricedItem::from_entry(e))),
            );
        }
        picked
    }

    // ===== 电器 =====

    fn appliance_discount(matched: &MatchedMaterial) -> PricedItem {
        let unit = matched.unit_total_cost();
        let reduced = unit * (100.0 - APPLIANCE_DISCOUNT_PCT) / 100.0;
        PricedItem::synthetic(
            APPLIANCE_REDUCED_CODE,
            format!(
                "{} ({}% discount)",
                matched.material_id(),
                APPLIANCE_DISCOUNT_PCT
            ),
            reduced,
        )
    }
}

impl Default for AlternativeGenerator {
    fn default() -> Self {
        Self::new(AlternativeConfig::default())
    }
}
