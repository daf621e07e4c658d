// ==========================================
// 价值工程决策引擎 - 领域类型定义
// ==========================================
// 材料类别 / 报表分组 / 评分来源 / 战略角色
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 材料类别 (Material Category)
// ==========================================
// 门按位置拆分为外门/内门两套独立目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialCategory {
    Window,
    ExteriorDoor,
    InteriorDoor,
    Appliance,
}

impl MaterialCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCategory::Window => "window",
            MaterialCategory::ExteriorDoor => "exterior_door",
            MaterialCategory::InteriorDoor => "interior_door",
            MaterialCategory::Appliance => "appliance",
        }
    }

    /// 报表分组（窗/门/电器）
    pub fn group(&self) -> CategoryGroup {
        match self {
            MaterialCategory::Window => CategoryGroup::Windows,
            MaterialCategory::ExteriorDoor | MaterialCategory::InteriorDoor => CategoryGroup::Doors,
            MaterialCategory::Appliance => CategoryGroup::Appliances,
        }
    }

    pub fn is_door(&self) -> bool {
        matches!(
            self,
            MaterialCategory::ExteriorDoor | MaterialCategory::InteriorDoor
        )
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MaterialCategory::Window => "Window",
            MaterialCategory::ExteriorDoor => "Exterior Door",
            MaterialCategory::InteriorDoor => "Interior Door",
            MaterialCategory::Appliance => "Appliance",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for MaterialCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "window" | "windows" => Ok(MaterialCategory::Window),
            "exterior door" | "ext door" | "exterior" => Ok(MaterialCategory::ExteriorDoor),
            "interior door" | "int door" | "interior" => Ok(MaterialCategory::InteriorDoor),
            "appliance" | "appliances" => Ok(MaterialCategory::Appliance),
            other => Err(format!("未知材料类别: {}", other)),
        }
    }
}

// ==========================================
// 报表分组 (Category Group)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Windows,
    Doors,
    Appliances,
}

impl CategoryGroup {
    pub const ALL: [CategoryGroup; 3] = [
        CategoryGroup::Windows,
        CategoryGroup::Doors,
        CategoryGroup::Appliances,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGroup::Windows => "windows",
            CategoryGroup::Doors => "doors",
            CategoryGroup::Appliances => "appliances",
        }
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 评分来源 (Score Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreSource {
    Pinned,    // 原方案 / 电器折扣: 固定分
    Rule,      // 规则启发式
    Model,     // 外部文本比对模型
    Fallback,  // 外部模型失败后回退到规则
}

impl fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSource::Pinned => write!(f, "PINNED"),
            ScoreSource::Rule => write!(f, "RULE"),
            ScoreSource::Model => write!(f, "MODEL"),
            ScoreSource::Fallback => write!(f, "FALLBACK"),
        }
    }
}

// ==========================================
// 战略角色 (Strategic Role)
// ==========================================
// 窗户战略模式下的 4 个固定角色, 顺序即分配顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicRole {
    BestFunctionalCost,
    BestDesignCost,
    LowestCost,
    Balanced,
}

impl StrategicRole {
    pub const ORDER: [StrategicRole; 4] = [
        StrategicRole::BestFunctionalCost,
        StrategicRole::BestDesignCost,
        StrategicRole::LowestCost,
        StrategicRole::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategicRole::BestFunctionalCost => "best_functional_cost",
            StrategicRole::BestDesignCost => "best_design_cost",
            StrategicRole::LowestCost => "best_cost_only",
            StrategicRole::Balanced => "balanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategicRole::BestFunctionalCost => "Best Functional + Cost",
            StrategicRole::BestDesignCost => "Best Design + Cost",
            StrategicRole::LowestCost => "Lowest Cost",
            StrategicRole::Balanced => "Balanced",
        }
    }
}
