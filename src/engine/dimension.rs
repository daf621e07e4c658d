// ==========================================
// 价值工程决策引擎 - 尺寸解析
// ==========================================
// 输入: 自由文本尺寸 ("5'-0\"", "4-6", "3'-0\" x 7'-0\"")
// 输出: 英寸 / 平方英尺
// 红线: 解析失败不报错, 一律降级为默认值
// ==========================================

use crate::domain::{MaterialCategory, MaterialSpec, TargetDimensions};
use regex::Regex;
use std::sync::OnceLock;

/// 窗面积默认值 (sq ft)
pub const DEFAULT_WINDOW_AREA_SQFT: f64 = 20.0;
/// 门宽默认值 (in)
pub const DEFAULT_DOOR_WIDTH_IN: f64 = 36.0;
/// 门高默认值 (in)
pub const DEFAULT_DOOR_HEIGHT_IN: f64 = 84.0;

// 英尺-英寸: 5'-0 / 5' 0 / 5-0 (英寸引号已预先去除)
fn feet_inches_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(?:'\s*-?\s*|-)\s*(\d+)").ok())
        .as_ref()
}

fn bare_number_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)").ok()).as_ref()
}

fn normalize(text: &str) -> String {
    text.trim().replace('"', "")
}

/// 提取文本中全部 英尺-英寸 片段, 换算为英寸
pub fn feet_inches_segments(text: &str) -> Vec<f64> {
    let Some(re) = feet_inches_re() else {
        return Vec::new();
    };
    let cleaned = normalize(text);
    re.captures_iter(&cleaned)
        .filter_map(|caps| {
            let feet: f64 = caps.get(1)?.as_str().parse().ok()?;
            let inches: f64 = caps.get(2)?.as_str().parse().ok()?;
            Some(feet * 12.0 + inches)
        })
        .collect()
}

/// 解析单个长度为英寸
///
/// 先取第一个 英尺-英寸 片段; 否则把第一个裸数字视为英尺
pub fn parse_length_inches(text: &str) -> Option<f64> {
    if let Some(first) = feet_inches_segments(text).first() {
        return Some(*first);
    }
    let re = bare_number_re()?;
    let cleaned = normalize(text);
    let feet: f64 = re.captures(&cleaned)?.get(1)?.as_str().parse().ok()?;
    Some(feet * 12.0)
}

/// 解析 "W x H" 尺寸串为面积; 少于两个片段时返回 None
pub fn parse_area_sqft(size: &str) -> Option<f64> {
    let segments = feet_inches_segments(size);
    if segments.len() < 2 {
        return None;
    }
    Some(segments[0] * segments[1] / 144.0)
}

/// 目录尺寸串面积（默认 20 sq ft）
pub fn catalog_area_sqft(size: &str) -> f64 {
    parse_area_sqft(size).unwrap_or(DEFAULT_WINDOW_AREA_SQFT)
}

/// 目录开口宽度（默认 36 in）
pub fn catalog_width_in(size: &str) -> f64 {
    feet_inches_segments(size)
        .first()
        .copied()
        .unwrap_or(DEFAULT_DOOR_WIDTH_IN)
}

/// 目录开口高度: "W x H" 取第二段; 只有一段时取该段（默认 84 in）
pub fn catalog_height_in(size: &str) -> f64 {
    let segments = feet_inches_segments(size);
    match segments.as_slice() {
        [] => DEFAULT_DOOR_HEIGHT_IN,
        [only] => *only,
        [_, height, ..] => *height,
    }
}

/// 规格目标尺寸
///
/// - 窗: 宽高都能解析且面积 > 0 时取 w*h/144, 否则 20 sq ft
/// - 门: 宽默认 36 in, 高默认 84 in
/// - 电器: 不关心尺寸, 返回默认值
pub fn target_dimensions(spec: &MaterialSpec) -> TargetDimensions {
    let width = parse_length_inches(&spec.width).filter(|w| *w > 0.0);
    let height = parse_length_inches(&spec.height).filter(|h| *h > 0.0);

    match spec.category {
        MaterialCategory::Window => {
            let area = match (width, height) {
                (Some(w), Some(h)) => w * h / 144.0,
                _ => DEFAULT_WINDOW_AREA_SQFT,
            };
            TargetDimensions {
                width_in: width.unwrap_or(0.0),
                height_in: height.unwrap_or(0.0),
                area_sqft: area,
            }
        }
        _ => {
            let w = width.unwrap_or(DEFAULT_DOOR_WIDTH_IN);
            let h = height.unwrap_or(DEFAULT_DOOR_HEIGHT_IN);
            TargetDimensions {
                width_in: w,
                height_in: h,
                area_sqft: w * h / 144.0,
            }
        }
    }
}
