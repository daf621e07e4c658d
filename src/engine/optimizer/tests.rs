use super::*;
use crate::domain::{
    Alternative, AlternativeKind, AlternativeOrigin, CriteriaScores, MatchedMaterial,
    MaterialCategory, MaterialSpec, PricedItem, ScoreSource, TargetDimensions,
};
use crate::engine::strategy::OptimizationStrategy;

// ==========================================
// 测试辅助函数
// ==========================================

fn matched(id: &str, category: MaterialCategory, quantity: u32, unit_total: f64) -> MatchedMaterial {
    MatchedMaterial {
        spec: MaterialSpec {
            material_id: id.to_string(),
            category,
            width: String::new(),
            height: String::new(),
            style: String::new(),
            material: String::new(),
            location: String::new(),
            quantity,
        },
        item: PricedItem::synthetic("ORIG", format!("{} original", id), unit_total),
        target: TargetDimensions {
            width_in: 36.0,
            height_in: 84.0,
            area_sqft: 20.0,
        },
    }
}

/// (总价, 功能, 设计, 成本分); 第一个为原方案
fn scored_set(material: MatchedMaterial, options: &[(f64, f64, f64, u8)]) -> ScoredSet {
    let original_cost = material.unit_total_cost();
    let alternatives = options
        .iter()
        .enumerate()
        .map(|(idx, (total, f, d, c))| {
            let kind = if idx == 0 {
                AlternativeKind::Original
            } else {
                AlternativeKind::Generated {
                    rank: idx as u32,
                    origin: AlternativeOrigin::Cheaper,
                }
            };
            ScoredAlternative {
                alternative: Alternative {
                    material_id: material.material_id().to_string(),
                    category: material.category(),
                    kind,
                    item: PricedItem::synthetic(&format!("C{}", idx), String::new(), *total),
                    original_cost,
                    cost_reduction_pct: crate::engine::cost::cost_reduction_pct(original_cost, *total),
                },
                scores: CriteriaScores {
                    functional: *f,
                    design: *d,
                    cost: *c,
                },
                source: if idx == 0 { ScoreSource::Pinned } else { ScoreSource::Rule },
            }
        })
        .collect();
    ScoredSet {
        material,
        alternatives,
    }
}

fn sample_sets() -> Vec<ScoredSet> {
    vec![
        scored_set(
            matched("W1", MaterialCategory::Window, 10, 500.0),
            &[
                (500.0, 5.0, 5.0, 1),
                (400.0, 4.0, 3.0, 4),
                (300.0, 2.5, 3.5, 5),
            ],
        ),
        scored_set(
            matched("D1", MaterialCategory::InteriorDoor, 4, 300.0),
            &[(300.0, 5.0, 5.0, 1), (250.0, 4.0, 4.0, 2)],
        ),
        scored_set(
            matched("Refrigerator", MaterialCategory::Appliance, 2, 1000.0),
            &[(1000.0, 5.0, 5.0, 1), (900.0, 5.0, 5.0, 2)],
        ),
    ]
}

// ==========================================
// 选择
// ==========================================

#[test]
fn test_selection_is_maximal_for_every_strategy() {
    let optimizer = SelectionOptimizer::new();
    let sets = sample_sets();
    for strategy in OptimizationStrategy::ALL {
        let weights = strategy.weights();
        for set in &sets {
            let selection = optimizer.select(set, &weights).unwrap();
            for alt in &set.alternatives {
                assert!(
                    selection.weighted_score + 1e-9 >= weighted_score(alt, &weights),
                    "{} / {}: 选中方案不是最大加权分",
                    strategy.as_str(),
                    set.material.material_id()
                );
            }
        }
    }
}

#[test]
fn test_tie_prefers_lowest_rank() {
    let optimizer = SelectionOptimizer::new();
    let set = &sample_sets()[2];

    // 功能优先: 原方案与折扣方案功能分都是 5, 原方案胜出
    let functional = optimizer
        .select(set, &OptimizationStrategy::BestFunctional.weights())
        .unwrap();
    assert_eq!(functional.rank(), 0);

    // 成本优先: 折扣方案 2 > 1
    let cost = optimizer
        .select(set, &OptimizationStrategy::BestCost.weights())
        .unwrap();
    assert_eq!(cost.rank(), 1);
}

#[test]
fn test_empty_set_has_no_selection() {
    let set = ScoredSet {
        material: matched("X", MaterialCategory::Window, 1, 100.0),
        alternatives: Vec::new(),
    };
    assert!(SelectionOptimizer::new()
        .select(&set, &StrategyWeights::default())
        .is_none());
}

// ==========================================
// 汇总
// ==========================================

#[test]
fn test_cost_strategy_metrics() {
    let run = SelectionOptimizer::new().run(
        &OptimizationStrategy::BestCost.into(),
        &sample_sets(),
    );

    let windows = run.category(CategoryGroup::Windows).unwrap();
    assert_eq!(windows.total_original_cost, 5000.0);
    assert_eq!(windows.total_selected_cost, 3000.0);
    assert!((windows.cost_reduction_pct - 40.0).abs() < 1e-9);
    assert_eq!(windows.avg_cost_score, 5.0);

    let appliances = run.category(CategoryGroup::Appliances).unwrap();
    assert_eq!(appliances.total_selected_cost, 1800.0);
    assert!((appliances.cost_reduction_pct - 10.0).abs() < 1e-9);

    // 组合: 5000+1200+2000 → 3000+1000+1800
    assert_eq!(run.overall.total_original_cost, 8200.0);
    assert_eq!(run.overall.total_selected_cost, 5800.0);
    assert_eq!(run.overall.total_cost_savings, 2400.0);
    assert_eq!(run.overall.num_materials, 3);
    // 平均成本分按材料数加权: (5 + 2 + 2) / 3
    assert!((run.overall.avg_cost_score - 3.0).abs() < 1e-9);
}

#[test]
fn test_quantity_weighted_scores() {
    let sets = vec![
        scored_set(
            matched("W1", MaterialCategory::Window, 3, 100.0),
            &[(100.0, 5.0, 5.0, 1)],
        ),
        scored_set(
            matched("W2", MaterialCategory::Window, 1, 100.0),
            &[(100.0, 1.0, 1.0, 1)],
        ),
    ];
    let run = SelectionOptimizer::new().run(&OptimizationStrategy::Balanced.into(), &sets);
    let windows = run.category(CategoryGroup::Windows).unwrap();
    assert!((windows.avg_functional_score - 4.0).abs() < 1e-9);
    assert_eq!(windows.total_quantity, 4);
}

#[test]
fn test_zero_quantity_category_reports_zero() {
    let sets = vec![scored_set(
        matched("D0", MaterialCategory::ExteriorDoor, 0, 800.0),
        &[(800.0, 5.0, 5.0, 1), (500.0, 3.0, 3.0, 5)],
    )];
    let run = SelectionOptimizer::new().run(&OptimizationStrategy::BestCost.into(), &sets);
    let doors = run.category(CategoryGroup::Doors).unwrap();
    assert_eq!(doors.cost_reduction_pct, 0.0);
    assert_eq!(doors.avg_functional_score, 0.0);
    assert_eq!(doors.avg_design_score, 0.0);
    assert_eq!(doors.avg_cost_score, 0.0);

    // 无材料的分类同样为 0
    let windows = run.category(CategoryGroup::Windows).unwrap();
    assert_eq!(windows.num_materials, 0);
    assert_eq!(windows.cost_reduction_pct, 0.0);
}

#[test]
fn test_empty_portfolio_is_all_zero() {
    let run = SelectionOptimizer::new().run(&OptimizationStrategy::Balanced.into(), &[]);
    assert_eq!(run.overall, PortfolioMetrics::default());
}
