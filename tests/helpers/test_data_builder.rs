// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use std::io::Write;
use std::path::{Path, PathBuf};
use ve_optimizer::domain::{
    ApplianceListing, CatalogEntry, MaterialCategory, MaterialSpec, ReferenceCatalog,
};

// ==========================================
// MaterialSpec 构建器
// ==========================================

pub struct MaterialBuilder {
    spec: MaterialSpec,
}

impl MaterialBuilder {
    fn base(material_id: &str, category: MaterialCategory) -> Self {
        Self {
            spec: MaterialSpec {
                material_id: material_id.to_string(),
                category,
                width: String::new(),
                height: String::new(),
                style: String::new(),
                material: String::new(),
                location: String::new(),
                quantity: 1,
            },
        }
    }

    /// 窗: 宽 × 高（英尺-英寸文本）
    pub fn window(material_id: &str, width: &str, height: &str) -> Self {
        let mut builder = Self::base(material_id, MaterialCategory::Window);
        builder.spec.width = width.to_string();
        builder.spec.height = height.to_string();
        builder
    }

    pub fn exterior_door(material_id: &str, width: &str) -> Self {
        let mut builder = Self::base(material_id, MaterialCategory::ExteriorDoor);
        builder.spec.width = width.to_string();
        builder.spec.height = "7'-0\"".to_string();
        builder.spec.location = "Unit Entry".to_string();
        builder
    }

    pub fn interior_door(material_id: &str, width: &str) -> Self {
        let mut builder = Self::base(material_id, MaterialCategory::InteriorDoor);
        builder.spec.width = width.to_string();
        builder.spec.height = "6'-8\"".to_string();
        builder.spec.location = "Bedroom".to_string();
        builder
    }

    /// 电器行与数量表一致: 只有类型名与数量, STYLE 留空
    pub fn appliance(name: &str) -> Self {
        Self::base(name, MaterialCategory::Appliance)
    }

    pub fn style(mut self, style: &str) -> Self {
        self.spec.style = style.to_string();
        self
    }

    pub fn material(mut self, material: &str) -> Self {
        self.spec.material = material.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.spec.location = location.to_string();
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.spec.quantity = quantity;
        self
    }

    pub fn build(self) -> MaterialSpec {
        self.spec
    }
}

// ==========================================
// CatalogEntry 构建器
// ==========================================

pub struct CatalogEntryBuilder {
    entry: CatalogEntry,
}

impl CatalogEntryBuilder {
    /// 总价按 75% 材料 / 25% 安装拆分
    pub fn new(code: &str, size: &str, total_cost: f64) -> Self {
        Self {
            entry: CatalogEntry {
                code: code.to_string(),
                material: String::new(),
                item_type: String::new(),
                size: size.to_string(),
                core_type: String::new(),
                glazing: String::new(),
                description: String::new(),
                material_cost: total_cost * 0.75,
                install_cost: total_cost * 0.25,
                total_cost,
            },
        }
    }

    pub fn material(mut self, material: &str) -> Self {
        self.entry.material = material.to_string();
        self
    }

    pub fn item_type(mut self, item_type: &str) -> Self {
        self.entry.item_type = item_type.to_string();
        self
    }

    pub fn core_type(mut self, core_type: &str) -> Self {
        self.entry.core_type = core_type.to_string();
        self
    }

    pub fn glazing(mut self, glazing: &str) -> Self {
        self.entry.glazing = glazing.to_string();
        self
    }

    pub fn build(self) -> CatalogEntry {
        self.entry
    }
}

/// 窗目录条目（Vinyl）
pub fn vinyl_window(code: &str, item_type: &str, size: &str, total_cost: f64) -> CatalogEntry {
    CatalogEntryBuilder::new(code, size, total_cost)
        .material("Vinyl")
        .item_type(item_type)
        .build()
}

pub fn appliance_listing(description: &str, cost: &str) -> ApplianceListing {
    ApplianceListing {
        description: description.to_string(),
        unit: "Ea.".to_string(),
        cost: cost.to_string(),
    }
}

// ==========================================
// 场景目录
// ==========================================

/// 窗 20 sqft 场景:
/// - 原方案 casement 4'-0" x 5'-0" 500
/// - casement 19 sqft 400（面积差 5%）
/// - sliding 20 sqft 300（样式不符）
pub fn casement_scenario_catalog() -> ReferenceCatalog {
    ReferenceCatalog {
        windows: vec![
            vinyl_window("W-ORIG", "Casement", "4'-0\" x 5'-0\"", 500.0),
            vinyl_window("W-CAS", "Casement", "3'-9\" x 5'-0\"", 400.0),
            vinyl_window("W-SLD", "Sliding", "4'-0\" x 5'-0\"", 300.0),
        ],
        ..Default::default()
    }
}

/// 四类材料齐全的目录
pub fn full_catalog() -> ReferenceCatalog {
    let mut catalog = casement_scenario_catalog();
    catalog.exterior_doors = vec![
        CatalogEntryBuilder::new("E-ORIG", "3'-0\" x 7'-0\"", 2000.0)
            .material("Metal")
            .item_type("Door, steel")
            .build(),
        CatalogEntryBuilder::new("E-ALT", "3'-0\" x 7'-0\"", 1500.0)
            .material("Metal")
            .item_type("Door, steel flush")
            .build(),
        CatalogEntryBuilder::new("E-LOW", "3'-0\" x 6'-8\"", 900.0)
            .material("Metal")
            .item_type("Door, steel")
            .build(),
    ];
    catalog.interior_doors = vec![
        CatalogEntryBuilder::new("I-ORIG", "3'-0\" x 6'-8\"", 800.0)
            .material("Wood")
            .core_type("Solid")
            .build(),
        CatalogEntryBuilder::new("I-ALT", "2'-8\" x 6'-8\"", 600.0)
            .material("Wood")
            .core_type("Hollow")
            .build(),
    ];
    catalog.appliances = vec![
        appliance_listing("Refrigerator, no frost", "885 - 1115"),
        appliance_listing("Range, 30\" free standing", "600"),
    ];
    catalog
}

/// 与 full_catalog 对应的材料清单
pub fn full_material_list() -> Vec<MaterialSpec> {
    vec![
        MaterialBuilder::window("A", "4'-0\"", "5'-0\"")
            .style("Casement")
            .material("V")
            .quantity(10)
            .build(),
        MaterialBuilder::exterior_door("D1", "3'-0\"")
            .material("HM")
            .quantity(4)
            .build(),
        MaterialBuilder::interior_door("D2", "3'-0\"")
            .material("WD/SC")
            .quantity(6)
            .build(),
        MaterialBuilder::appliance("Refrigerator").quantity(4).build(),
    ]
}

// ==========================================
// 文件辅助
// ==========================================

/// 逐行写入文本文件
pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create test file");
    for line in lines {
        writeln!(file, "{}", line).expect("write test file");
    }
    path
}
