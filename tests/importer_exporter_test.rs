// ==========================================
// 导入 → 分析 → 导出 集成测试
// ==========================================

mod helpers;

use helpers::test_data_builder::write_lines;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use ve_optimizer::api::{AnalysisApi, AnalysisRequest, ApiError, ValidationMode};
use ve_optimizer::domain::MaterialCategory;
use ve_optimizer::engine::PipelineSettings;
use ve_optimizer::importer::{CatalogSources, TableImporter};

fn write_catalog(dir: &Path) -> CatalogSources {
    let windows = write_lines(
        dir,
        "windows.tsv",
        &[
            "CODE\tMATERIAL\tTYPE\tSIZE\tMAT\tINST\tTOTAL",
            "W-ORIG\tVinyl\tCasement\t4'-0\" x 5'-0\"\t375\t125\t500",
            "W-CAS\tVinyl\tCasement\t3'-9\" x 5'-0\"\t300\t100\t400",
            "W-SLD\tVinyl\tSliding\t4'-0\" x 5'-0\"\t225\t75\t300",
            "W-TBD\tVinyl\tCasement\t4'-0\" x 5'-0\"\tn/a\t\tcall",
        ],
    );
    let exterior_doors = write_lines(
        dir,
        "exterior_doors.tsv",
        &[
            "CODE\tMATERIAL\tTYPE\tSIZE\tMAT\tINST\tTOTAL",
            "E-ORIG\tMetal\tDoor, steel\t3'-0\" x 7'-0\"\t1500\t500\t2000",
            "E-ALT\tMetal\tDoor, steel flush\t3'-0\" x 7'-0\"\t1125\t375\t1500",
            "E-LOW\tMetal\tDoor, steel\t3'-0\" x 6'-8\"\t675\t225\t900",
        ],
    );
    let interior_doors = write_lines(
        dir,
        "interior_doors.tsv",
        &[
            "CODE\tMaterial\tCore type\tDIMENSIONS\tMAT.\tINST.\tTOTAL",
            "I-ORIG\tWood\tSolid\t3'-0\" x 6'-8\"\t600\t200\t800",
            "I-ALT\tWood\tHollow\t2'-8\" x 6'-8\"\t450\t150\t600",
        ],
    );
    let appliances = write_lines(
        dir,
        "appliances.tsv",
        &[
            "Description\tUnit\tCost",
            "Refrigerator, no frost\tEa.\t885 - 1115",
            "Range, 30\" free standing\tEa.\t600",
        ],
    );

    CatalogSources {
        windows: Some(windows),
        exterior_doors: Some(exterior_doors),
        interior_doors: Some(interior_doors),
        appliances: Some(appliances),
    }
}

fn write_materials(dir: &Path) -> PathBuf {
    write_lines(
        dir,
        "materials.tsv",
        &[
            "MATERIAL_ID\tCATEGORY\tWIDTH\tHEIGHT\tSTYLE\tMATERIAL\tLOCATION\tQUANTITY",
            "A\twindow\t4'-0\"\t5'-0\"\tCasement\tV\t\t10",
            "D1\tdoor\t3'-0\"\t7'-0\"\t\tHM\tUnit Entry\t4",
            "D2\tdoor\t3'-0\"\t6'-8\"\t\tWD/SC\tBedroom\t6",
            "Refrigerator\tappliance\t\t\tRefrigerator\t\tKitchen\t4",
            "Z\twindow\t3'-0\"\t4'-0\"\tSliding\tV\t\t0",
        ],
    )
}

fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn column(headers: &[String], name: &str) -> usize {
    headers.iter().position(|h| h == name).unwrap()
}

#[test]
fn test_files_round_trip_through_api() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let request = AnalysisRequest {
        materials: write_materials(dir.path()),
        default_category: None,
        catalog: write_catalog(dir.path()),
        out_dir: Some(out.clone()),
    };

    let api = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    let response = api.analyze_files(&request).unwrap();

    // 导入摘要: 材料清单 + 4 个目录
    assert_eq!(response.import_summaries.len(), 5);
    let materials = &response.import_summaries[0];
    assert_eq!(materials.total_rows, 5);
    assert_eq!(materials.imported, 4);
    assert_eq!(materials.skipped_zero_quantity, 1);
    assert_eq!(response.import_summaries[1].unparsable_costs, 1);
    assert!(response.violations.is_empty());

    // 通用 "door" 按位置区分内外门
    let categories: Vec<MaterialCategory> = response
        .report
        .matched
        .iter()
        .map(|m| m.category())
        .collect();
    assert_eq!(
        categories,
        vec![
            MaterialCategory::Window,
            MaterialCategory::ExteriorDoor,
            MaterialCategory::InteriorDoor,
            MaterialCategory::Appliance,
        ]
    );

    // 4 张基础表 + 4 个策略 × 2 + presets.json
    assert_eq!(response.exported_files.len(), 13);
    for file in &response.exported_files {
        assert!(file.exists(), "{} 未写出", file.display());
    }

    // 成本优先策略的指标表
    let (headers, rows) = read_rows(&out.join("best_cost_metrics.csv"));
    let scope = column(&headers, "SCOPE");
    let original = column(&headers, "TOTAL_ORIGINAL_COST");
    let savings = column(&headers, "TOTAL_COST_SAVINGS");
    let overall = rows.iter().find(|r| r[scope] == "overall").unwrap();
    assert_eq!(overall[original].parse::<f64>().unwrap(), 21800.0);
    assert_eq!(overall[savings].parse::<f64>().unwrap(), 4600.0);

    // 选择表: 每个匹配材料一行
    let (headers, rows) = read_rows(&out.join("best_cost_selections.csv"));
    assert_eq!(rows.len(), 4);
    let code = column(&headers, "SELECTED_CODE");
    let selected: Vec<&str> = rows.iter().map(|r| r[code].as_str()).collect();
    assert_eq!(selected, vec!["W-CAS", "E-ALT", "I-ALT", "REDUCED"]);

    // 预设
    let presets: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("presets.json")).unwrap())
            .unwrap();
    assert_eq!(presets["best_cost"]["D1"], 1);
    assert_eq!(presets["best_functional"]["D1"], 0);
}

#[test]
fn test_unmatched_table_lists_excluded_materials() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let mut catalog = write_catalog(dir.path());
    catalog.interior_doors = None;

    let request = AnalysisRequest {
        materials: write_materials(dir.path()),
        default_category: None,
        catalog,
        out_dir: Some(out.clone()),
    };
    let api = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    let response = api.analyze_files(&request).unwrap();
    assert_eq!(response.report.unmatched_count(), 1);

    let (headers, rows) = read_rows(&out.join("unmatched_materials.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][column(&headers, "MATERIAL_ID")], "D2");
}

#[test]
fn test_default_category_applies_without_category_column() {
    let dir = TempDir::new().unwrap();
    let materials = write_lines(
        dir.path(),
        "windows_only.tsv",
        &[
            "MARK\tUNIT SIZE WIDTH\tUNIT SIZE HEIGHT\tTYPE\tMATERIAL\tTOTAL COUNT",
            "A\t4'-0\"\t5'-0\"\tCasement\tV\t10",
        ],
    );
    let mut catalog = write_catalog(dir.path());
    catalog.exterior_doors = None;
    catalog.interior_doors = None;
    catalog.appliances = None;

    let request = AnalysisRequest {
        materials,
        default_category: Some(MaterialCategory::Window),
        catalog,
        out_dir: None,
    };
    let api = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    let response = api.analyze_files(&request).unwrap();

    assert!(response.exported_files.is_empty());
    assert_eq!(response.report.matched.len(), 1);
    assert_eq!(response.report.matched[0].item.code, "W-ORIG");
}

#[test]
fn test_appliance_count_file_matches_by_appliance_name() {
    let dir = TempDir::new().unwrap();
    let materials = write_lines(
        dir.path(),
        "appliance_counts.tsv",
        &[
            "Appliance\tCount\tManufacturer\tModel",
            "Refrigerator\t4\tGE\tGTS18",
            "Range\t2\tWhirlpool\tWFE505",
        ],
    );

    let (specs, summary) = TableImporter::new()
        .load_materials(&materials, Some(MaterialCategory::Appliance))
        .unwrap();
    assert_eq!(summary.imported, 2);
    assert_eq!(specs[0].material_id, "Refrigerator");
    assert!(specs[0].style.is_empty());

    let mut catalog = write_catalog(dir.path());
    catalog.windows = None;
    catalog.exterior_doors = None;
    catalog.interior_doors = None;
    let request = AnalysisRequest {
        materials,
        default_category: Some(MaterialCategory::Appliance),
        catalog,
        out_dir: None,
    };
    let api = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    let response = api.analyze_files(&request).unwrap();

    let matched = &response.report.matched;
    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].item.description, "Refrigerator, no frost");
    assert_eq!(matched[0].item.total_cost, 1000.0);
    assert_eq!(matched[1].item.description, "Range, 30\" free standing");
    assert_eq!(matched[1].item.total_cost, 600.0);
}

#[test]
fn test_strict_mode_rejects_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let materials = write_lines(
        dir.path(),
        "dup.tsv",
        &[
            "MATERIAL_ID\tCATEGORY\tWIDTH\tHEIGHT\tSTYLE\tMATERIAL\tQUANTITY",
            "A\twindow\t4'-0\"\t5'-0\"\tCasement\tV\t10",
            "A\twindow\t4'-0\"\t5'-0\"\tCasement\tV\t2",
        ],
    );
    let request = AnalysisRequest {
        materials,
        default_category: None,
        catalog: write_catalog(dir.path()),
        out_dir: None,
    };

    let strict = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Strict).unwrap();
    assert!(matches!(
        strict.analyze_files(&request),
        Err(ApiError::ValidationError { .. })
    ));

    let lenient = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    let response = lenient.analyze_files(&request).unwrap();
    assert_eq!(response.violations.len(), 1);
    assert_eq!(response.violations[0].violation_type, "DUPLICATE_ID");
    assert_eq!(response.report.matched.len(), 1);
}

#[test]
fn test_missing_catalog_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let request = AnalysisRequest {
        materials: write_materials(dir.path()),
        default_category: None,
        catalog: CatalogSources {
            windows: Some(dir.path().join("missing.csv")),
            ..Default::default()
        },
        out_dir: None,
    };
    let api = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    assert!(matches!(
        api.analyze_files(&request),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_empty_catalog_fails_precondition() {
    let dir = TempDir::new().unwrap();
    let request = AnalysisRequest {
        materials: write_materials(dir.path()),
        default_category: None,
        catalog: CatalogSources::default(),
        out_dir: None,
    };
    let api = AnalysisApi::new(PipelineSettings::default(), ValidationMode::Lenient).unwrap();
    assert!(matches!(
        api.analyze_files(&request),
        Err(ApiError::PreconditionFailed(_))
    ));
}
