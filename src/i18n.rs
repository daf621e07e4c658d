// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::CategoryGroup;
use crate::engine::strategy::{OptimizationStrategy, StrategyDefinition};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use ve_optimizer::i18n::t;
/// let msg = t("strategy.best_cost");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use ve_optimizer::i18n::t_with_args;
/// let msg = t_with_args("report.matched", &[("count", "12")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 策略标题: 预设策略走翻译, 自定义策略使用配置中的标题
pub fn strategy_title(definition: &StrategyDefinition) -> String {
    match definition.strategy_id.parse::<OptimizationStrategy>() {
        Ok(strategy) if strategy.as_str() == definition.strategy_id => t(&strategy.title_key()),
        _ if !definition.title.trim().is_empty() => definition.title.clone(),
        _ => format!("{} ({})", t("strategy.custom"), definition.strategy_id),
    }
}

pub fn category_label(group: CategoryGroup) -> String {
    t(&format!("category.{}", group.as_str()))
}
