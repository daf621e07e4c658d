// ==========================================
// 价值工程决策引擎 - 配置错误类型
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {path}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("配置项无效: {key} = {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
