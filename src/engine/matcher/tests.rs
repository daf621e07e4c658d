use super::*;
use crate::domain::{ApplianceListing, CatalogEntry, MaterialCategory, MaterialSpec, ReferenceCatalog};

// ==========================================
// 测试辅助函数
// ==========================================

fn entry(code: &str, material: &str, item_type: &str, size: &str, total: f64) -> CatalogEntry {
    CatalogEntry {
        code: code.to_string(),
        material: material.to_string(),
        item_type: item_type.to_string(),
        size: size.to_string(),
        core_type: String::new(),
        glazing: String::new(),
        description: String::new(),
        material_cost: total * 0.7,
        install_cost: total * 0.3,
        total_cost: total,
    }
}

fn interior(code: &str, material: &str, core: &str, size: &str, total: f64) -> CatalogEntry {
    CatalogEntry {
        core_type: core.to_string(),
        ..entry(code, material, "Passage door", size, total)
    }
}

fn spec(id: &str, category: MaterialCategory, width: &str, height: &str, style: &str, material: &str) -> MaterialSpec {
    MaterialSpec {
        material_id: id.to_string(),
        category,
        width: width.to_string(),
        height: height.to_string(),
        style: style.to_string(),
        material: material.to_string(),
        location: String::new(),
        quantity: 4,
    }
}

fn listing(description: &str, cost: &str) -> ApplianceListing {
    ApplianceListing {
        description: description.to_string(),
        unit: "Ea.".to_string(),
        cost: cost.to_string(),
    }
}

fn matched_code(outcome: &MatchOutcome) -> Option<String> {
    outcome.matched().map(|m| m.item.code.clone())
}

// ==========================================
// 窗
// ==========================================

#[test]
fn test_window_prefers_material_then_style_then_area() {
    let catalog = ReferenceCatalog {
        windows: vec![
            entry("W1", "Wood", "Casement", "4'-0\" x 5'-0\"", 900.0),
            entry("W2", "Vinyl", "Sliding", "4'-0\" x 5'-0\"", 350.0),
            entry("W3", "Vinyl", "Casement", "3'-0\" x 3'-0\"", 300.0),
            entry("W4", "Vinyl", "Casement", "4'-0\" x 4'-6\"", 420.0),
        ],
        ..Default::default()
    };
    let matcher = CatalogMatcher::new();
    let outcome = matcher.match_material(
        &spec("A", MaterialCategory::Window, "4'-0\"", "5'-0\"", "Casement", "V"),
        &catalog,
    );
    // 材质 Vinyl → 样式 Casement → 面积最接近 20 sq ft 的 W4 (18 sq ft)
    assert_eq!(matched_code(&outcome), Some("W4".to_string()));
    let matched = outcome.matched().unwrap();
    assert_eq!(matched.total_cost(), 420.0 * 4.0);
}

#[test]
fn test_window_filter_falls_back_when_empty() {
    let catalog = ReferenceCatalog {
        windows: vec![
            entry("W1", "Aluminum", "Fixed", "2'-0\" x 2'-0\"", 200.0),
            entry("W2", "Aluminum", "Fixed", "4'-0\" x 5'-0\"", 260.0),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("B", MaterialCategory::Window, "4'-0\"", "5'-0\"", "Casement", "W"),
        &catalog,
    );
    // 无 Wood 也无 Casement: 回退到全集, 按面积取 W2
    assert_eq!(matched_code(&outcome), Some("W2".to_string()));
}

#[test]
fn test_window_area_tie_keeps_first() {
    let catalog = ReferenceCatalog {
        windows: vec![
            entry("W1", "Vinyl", "Casement", "4'-0\" x 5'-0\"", 500.0),
            entry("W2", "Vinyl", "Casement", "5'-0\" x 4'-0\"", 450.0),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("C", MaterialCategory::Window, "4'-0\"", "5'-0\"", "casement", ""),
        &catalog,
    );
    assert_eq!(matched_code(&outcome), Some("W1".to_string()));
}

#[test]
fn test_empty_catalog_is_unmatched() {
    let outcome = CatalogMatcher::new().match_material(
        &spec("D", MaterialCategory::Window, "4'-0\"", "5'-0\"", "casement", "V"),
        &ReferenceCatalog::default(),
    );
    assert!(matches!(outcome, MatchOutcome::Unmatched(_)));
}

#[test]
fn test_unpriced_entries_are_ignored() {
    let catalog = ReferenceCatalog {
        windows: vec![
            entry("W1", "Vinyl", "Casement", "4'-0\" x 5'-0\"", f64::NAN),
            entry("W2", "Vinyl", "Casement", "3'-0\" x 3'-0\"", 300.0),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("E", MaterialCategory::Window, "4'-0\"", "5'-0\"", "casement", "V"),
        &catalog,
    );
    assert_eq!(matched_code(&outcome), Some("W2".to_string()));
}

// ==========================================
// 门
// ==========================================

#[test]
fn test_exterior_door_matches_opening_width() {
    let catalog = ReferenceCatalog {
        exterior_doors: vec![
            entry("E1", "Aluminum", "Sliding glass door", "8'-0\" x 6'-8\"", 1500.0),
            entry("E2", "Aluminum", "Sliding glass door", "6'-0\" x 6'-8\"", 1200.0),
            entry("E3", "Steel", "Frame only", "6'-0\" x 6'-8\"", 300.0),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("D1", MaterialCategory::ExteriorDoor, "6'-0\"", "6'-8\"", "Sliding", "Glass"),
        &catalog,
    );
    assert_eq!(matched_code(&outcome), Some("E2".to_string()));
}

#[test]
fn test_interior_door_core_and_cost_tiebreak() {
    let catalog = ReferenceCatalog {
        interior_doors: vec![
            interior("I1", "Metal", "Hollow", "3'-0\" x 6'-8\"", 250.0),
            interior("I2", "Wood", "Hollow core", "3'-0\" x 6'-8\"", 180.0),
            interior("I3", "Wood", "Solid core", "3'-0\" x 6'-8\"", 320.0),
            interior("I4", "Wood", "Solid core", "3'-0\" x 6'-8\"", 290.0),
            interior("I5", "Wood", "Solid core", "2'-6\" x 6'-8\"", 200.0),
        ],
        ..Default::default()
    };
    let matcher = CatalogMatcher::new();

    let solid = matcher.match_material(
        &spec("D2", MaterialCategory::InteriorDoor, "3'-0\"", "6'-8\"", "Passage", "WD/SC"),
        &catalog,
    );
    // 实心木门中宽度差为 0 的有 I3/I4, 总价次序取 I4
    assert_eq!(matched_code(&solid), Some("I4".to_string()));

    let hollow = matcher.match_material(
        &spec("D3", MaterialCategory::InteriorDoor, "3'-0\"", "6'-8\"", "Passage", "Wood HC"),
        &catalog,
    );
    assert_eq!(matched_code(&hollow), Some("I2".to_string()));
}

#[test]
fn test_door_traits_from_text() {
    let traits = DoorMaterialTraits::from_text("WD/SC");
    assert!(traits.wood && traits.solid_core && !traits.hollow_core);
    assert_eq!(traits.material_keyword(), Some("wood"));
    assert_eq!(traits.core_keyword(), Some("solid"));

    let traits = DoorMaterialTraits::from_text("Hollow Metal");
    assert!(traits.metal && traits.hollow_core);
    assert_eq!(traits.core_keyword(), Some("hollow"));
}

// ==========================================
// 电器
// ==========================================

#[test]
fn test_appliance_keyword_priority_and_range_cost() {
    let catalog = ReferenceCatalog {
        appliances: vec![
            listing("Refrigerator, 14 C.F.", "600"),
            listing("Refrigerator, no frost, 19 C.F.", "885 - 1300"),
            listing("Dishwasher, built-in, 2 cycles", "$1,000"),
            listing("Washer, automatic", "950"),
        ],
        ..Default::default()
    };
    let matcher = CatalogMatcher::new();

    let fridge = matcher.match_material(
        &spec("Refrigerator", MaterialCategory::Appliance, "", "", "Refrigerator", ""),
        &catalog,
    );
    let fridge = fridge.matched().unwrap();
    assert_eq!(fridge.item.description, "Refrigerator, no frost, 19 C.F.");
    assert_eq!(fridge.item.total_cost, 1092.5);

    let dishwasher = matcher.match_material(
        &spec("Dishwasher", MaterialCategory::Appliance, "", "", "Dishwasher", ""),
        &catalog,
    );
    assert_eq!(dishwasher.matched().unwrap().item.total_cost, 1000.0);
}

#[test]
fn test_appliance_skips_unpriced_and_falls_back() {
    let catalog = ReferenceCatalog {
        appliances: vec![
            listing("Microwave oven, countertop", ""),
            listing("Disposal, garbage", "250"),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("Microwave", MaterialCategory::Appliance, "", "", "Microwave", ""),
        &catalog,
    );
    assert_eq!(outcome.matched().unwrap().item.total_cost, 250.0);

    let none = CatalogMatcher::new().match_material(
        &spec("Microwave", MaterialCategory::Appliance, "", "", "Microwave", ""),
        &ReferenceCatalog {
            appliances: vec![listing("Microwave oven", "n/a")],
            ..Default::default()
        },
    );
    assert!(matches!(none, MatchOutcome::Unmatched(_)));
}

#[test]
fn test_appliance_keyed_by_material_id_when_style_empty() {
    // 电器数量表只有 Appliance/Count 两列, STYLE 为空
    let catalog = ReferenceCatalog {
        appliances: vec![
            listing("Range, 30\" free standing", "600"),
            listing("Refrigerator, no frost", "885 - 1115"),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("Refrigerator", MaterialCategory::Appliance, "", "", "", ""),
        &catalog,
    );
    let matched = outcome.matched().unwrap();
    assert_eq!(matched.item.description, "Refrigerator, no frost");
    assert_eq!(matched.item.total_cost, 1000.0);
    assert_eq!(matched.spec.description(), "Refrigerator");
}

#[test]
fn test_appliance_style_used_when_id_is_a_mark() {
    let catalog = ReferenceCatalog {
        appliances: vec![
            listing("Range, 30\" free standing", "600"),
            listing("Dishwasher, built-in, 2 cycles", "450"),
        ],
        ..Default::default()
    };
    let outcome = CatalogMatcher::new().match_material(
        &spec("AP-3", MaterialCategory::Appliance, "", "", "Dishwasher", ""),
        &catalog,
    );
    assert_eq!(outcome.matched().unwrap().item.total_cost, 450.0);
}

// ==========================================
// 幂等
// ==========================================

#[test]
fn test_match_all_is_idempotent() {
    let catalog = ReferenceCatalog {
        windows: vec![
            entry("W1", "Vinyl", "Casement", "4'-0\" x 5'-0\"", 500.0),
            entry("W2", "Wood", "Sliding", "4'-0\" x 5'-0\"", 700.0),
        ],
        ..Default::default()
    };
    let specs = vec![
        spec("A", MaterialCategory::Window, "4'-0\"", "5'-0\"", "Casement", "V"),
        spec("B", MaterialCategory::Window, "4'-0\"", "5'-0\"", "Sliding", "W"),
    ];
    let matcher = CatalogMatcher::new();
    assert_eq!(matcher.match_all(&specs, &catalog), matcher.match_all(&specs, &catalog));
}
