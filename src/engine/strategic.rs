// ==========================================
// 价值工程决策引擎 - 窗户战略替代方案
// ==========================================
// 每个窗型号最多 4 个固定角色:
// 1. 最佳功能 + 降本
// 2. 最佳设计 + 降本
// 3. 最低成本
// 4. 均衡
// 规则: 同一材料内角色之间不复用目录编码; 无可用候选时跳过该角色
// ==========================================

use crate::domain::{CatalogEntry, MatchedMaterial, StrategicRole};
use crate::engine::alternatives::area_diff_pct;
use crate::engine::cost::{cost_reduction_pct, cost_score};
use crate::engine::dimension::catalog_area_sqft;
use crate::engine::matcher::window_style_keyword;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// 容差阶梯每一级需要达到的最少候选数（最后一级不设下限）
const LADDER_MIN_COUNTS: [usize; 2] = [4, 2];

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// 候选窗及其派生属性
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    entry: &'a CatalogEntry,
    area: f64,
}

impl<'a> Candidate<'a> {
    fn material(&self) -> String {
        self.entry.material.to_lowercase()
    }

    fn is_wood(&self) -> bool {
        self.material().contains("wood")
    }

    fn is_vinyl(&self) -> bool {
        self.material().contains("vinyl")
    }

    fn is_aluminum(&self) -> bool {
        self.material().contains("alum")
    }

    /// 功能分: 保温/耐久/气密
    fn functional_score(&self) -> f64 {
        let mut score = if self.is_wood() {
            5.0
        } else if self.is_vinyl() {
            4.0
        } else if self.is_aluminum() {
            3.0
        } else {
            2.0
        };
        if self.entry.glazing.to_lowercase().contains("insul") {
            score += 0.5;
        }
        score
    }

    /// 设计分: 外观/建筑意图
    fn design_score(&self) -> f64 {
        let mut score = if self.is_wood() {
            5.0
        } else if self.is_vinyl() {
            3.0
        } else if self.is_aluminum() {
            3.5
        } else {
            2.0
        };
        if self.area < 20.0 {
            score -= 0.5;
        }
        let item_type = self.entry.item_type.to_lowercase();
        if item_type.contains("bay") || item_type.contains("picture") {
            score += 1.0;
        }
        score
    }
}

// ==========================================
// StrategicWindowPlanner
// ==========================================
pub struct StrategicWindowPlanner {
    ladder: Vec<f64>,
}

impl StrategicWindowPlanner {
    pub const ROLE_COUNT: usize = 4;

    pub fn new(ladder: Vec<f64>) -> Self {
        Self { ladder }
    }

    /// 为窗分配战略角色
    ///
    /// `pool` 为已排除原编码、价格可比较的目录行
    pub fn plan<'a>(
        &self,
        matched: &MatchedMaterial,
        pool: Vec<&'a CatalogEntry>,
    ) -> Vec<(StrategicRole, &'a CatalogEntry)> {
        let candidates = self.candidates(matched, pool);
        let mut used: HashSet<&str> = HashSet::new();
        let mut assigned = Vec::with_capacity(Self::ROLE_COUNT);

        for role in StrategicRole::ORDER {
            let available: Vec<Candidate<'a>> = candidates
                .iter()
                .copied()
                .filter(|c| !used.contains(c.entry.code.as_str()))
                .collect();

            let pick = match role {
                StrategicRole::BestFunctionalCost => Self::best_functional(&available),
                StrategicRole::BestDesignCost => Self::best_design(&available),
                StrategicRole::LowestCost => Self::lowest_cost(&available),
                StrategicRole::Balanced => Self::balanced(&available),
            };

            match pick {
                Some(candidate) => {
                    used.insert(candidate.entry.code.as_str());
                    assigned.push((role, candidate.entry));
                }
                None => debug!(
                    material_id = %matched.material_id(),
                    role = role.as_str(),
                    "无未使用候选, 跳过角色"
                ),
            }
        }
        assigned
    }

    /// 候选集: 样式过滤（仅在剩余 ≥4 时生效）+ 面积容差阶梯 + 价格不高于原方案
    fn candidates<'a>(&self, matched: &MatchedMaterial, pool: Vec<&'a CatalogEntry>) -> Vec<Candidate<'a>> {
        let mut pool = pool;
        if let Some(keyword) = window_style_keyword(&matched.spec.style) {
            let styled: Vec<&CatalogEntry> = pool
                .iter()
                .copied()
                .filter(|e| e.item_type.to_lowercase().contains(keyword))
                .collect();
            if styled.len() >= Self::ROLE_COUNT {
                pool = styled;
            }
        }

        let original = matched.unit_total_cost();
        let target_area = matched.target.area_sqft;
        let measured: Vec<Candidate<'a>> = pool
            .into_iter()
            .filter(|e| e.total_cost <= original)
            .map(|entry| Candidate {
                entry,
                area: catalog_area_sqft(&entry.size),
            })
            .collect();

        let last = self.ladder.len().saturating_sub(1);
        for (step, tolerance) in self.ladder.iter().enumerate() {
            let within: Vec<Candidate<'a>> = measured
                .iter()
                .copied()
                .filter(|c| area_diff_pct(c.area, target_area) <= *tolerance)
                .collect();
            let need = LADDER_MIN_COUNTS.get(step).copied().unwrap_or(0);
            if step == last || within.len() >= need {
                return within;
            }
        }
        Vec::new()
    }

    fn best_functional<'a>(available: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let mut sorted = available.to_vec();
        sorted.sort_by(|a, b| {
            cmp_f64(b.functional_score(), a.functional_score())
                .then_with(|| cmp_f64(a.entry.total_cost, b.entry.total_cost))
        });
        sorted.into_iter().next()
    }

    fn best_design<'a>(available: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let mut sorted = available.to_vec();
        sorted.sort_by(|a, b| {
            cmp_f64(b.design_score(), a.design_score())
                .then_with(|| cmp_f64(a.entry.total_cost, b.entry.total_cost))
        });
        sorted.into_iter().next()
    }

    /// 最低成本: 有铝窗时在铝窗中取最便宜
    fn lowest_cost<'a>(available: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let aluminum: Vec<Candidate<'a>> =
            available.iter().copied().filter(|c| c.is_aluminum()).collect();
        let scope = if aluminum.is_empty() {
            available.to_vec()
        } else {
            aluminum
        };
        scope.into_iter().fold(None, |best: Option<Candidate<'a>>, c| match best {
            Some(b) if cmp_f64(c.entry.total_cost, b.entry.total_cost) != Ordering::Less => Some(b),
            _ => Some(c),
        })
    }

    /// 均衡: 有乙烯窗时取按价格排序的中位; 否则三项归一化加权
    fn balanced<'a>(available: &[Candidate<'a>]) -> Option<Candidate<'a>> {
        let mut vinyl: Vec<Candidate<'a>> =
            available.iter().copied().filter(|c| c.is_vinyl()).collect();
        if !vinyl.is_empty() {
            vinyl.sort_by(|a, b| cmp_f64(a.entry.total_cost, b.entry.total_cost));
            let mid = vinyl.len() / 2;
            return vinyl.get(mid).copied();
        }

        let max_cost = available
            .iter()
            .map(|c| c.entry.total_cost)
            .fold(0.0_f64, f64::max);

        let blended = |c: &Candidate| {
            let cost = cost_score(cost_reduction_pct(max_cost, c.entry.total_cost)) as f64;
            c.functional_score() / 5.5 * 0.333 + c.design_score() / 6.0 * 0.333 + cost / 5.0 * 0.334
        };

        available.iter().copied().fold(None, |best: Option<(f64, Candidate<'a>)>, c| {
            let score = blended(&c);
            match best {
                Some((s, _)) if cmp_f64(score, s) != Ordering::Greater => best,
                _ => Some((score, c)),
            }
        })
        .map(|(_, c)| c)
    }
}
