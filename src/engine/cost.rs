// ==========================================
// 价值工程决策引擎 - 成本规则
// ==========================================
// 价格文本解析 / 降本百分比 / 降本评分阶梯
// ==========================================

/// 阈值比较容差: 30/20/15/10 恰好落在边界时归入更高档
const SCORE_EPSILON: f64 = 1e-9;

/// 解析价格文本
///
/// - 去除 `,` 与 `$`
/// - 区间 "885 - 1300" 取算术平均
/// - 空串或无法解析返回 0.0
pub fn parse_cost(raw: &str) -> f64 {
    let cleaned = raw.replace([',', '$'], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return 0.0;
    }

    // 区间: 跳过首字符, 避免把负号当作分隔符
    if let Some(pos) = cleaned.get(1..).and_then(|rest| rest.find('-')) {
        let (low, high) = cleaned.split_at(pos + 1);
        let low = low.trim().parse::<f64>();
        let high = high[1..].trim().parse::<f64>();
        if let (Ok(low), Ok(high)) = (low, high) {
            return (low + high) / 2.0;
        }
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// 降本百分比: (原价 - 方案价) / 原价 * 100; 原价非正时为 0
pub fn cost_reduction_pct(original: f64, alternative: f64) -> f64 {
    if original > 0.0 && original.is_finite() && alternative.is_finite() {
        (original - alternative) / original * 100.0
    } else {
        0.0
    }
}

/// 降本评分: ≥30→5, ≥20→4, ≥15→3, ≥10→2, 其他→1
pub fn cost_score(reduction_pct: f64) -> u8 {
    let pct = reduction_pct + SCORE_EPSILON;
    if pct >= 30.0 {
        5
    } else if pct >= 20.0 {
        4
    } else if pct >= 15.0 {
        3
    } else if pct >= 10.0 {
        2
    } else {
        1
    }
}
