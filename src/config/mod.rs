// ==========================================
// 价值工程决策引擎 - 配置层
// ==========================================
// 职责: 系统配置管理, 支持环境变量覆写
// 存储: JSON 键值文件
// ==========================================

pub mod config_manager;
pub mod error;
pub mod pipeline_config_trait;
pub mod strategy_profile;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use pipeline_config_trait::PipelineConfigReader;
pub use strategy_profile::{CustomStrategyParameters, CustomStrategyProfile};
