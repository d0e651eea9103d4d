//! 错误处理模块
//!
//! 定义配置缓存的统一错误类型

use thiserror::Error;

/// 配置缓存的主要错误类型
#[derive(Error, Debug)]
pub enum ConfigCacheError {
    /// 配置源错误（通信、环境缺失等）
    #[error("配置源错误: {0}")]
    Source(#[from] SourceError),

    /// 配置完整性错误
    #[error("配置完整性错误: {0}")]
    Integrity(#[from] IntegrityError),

    /// 类型注册错误
    #[error("类型注册错误: {0}")]
    Registry(#[from] RegistryError),

    /// 设置文件错误
    #[error("设置错误: {0}")]
    Settings(#[from] SettingsError),

    /// 配置提供者错误
    #[error("配置提供者错误: {0}")]
    Provider(#[from] ProviderError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置源错误类型
///
/// 由 [`ConfigurationSource`](crate::source::ConfigurationSource) 实现产生，
/// 缓存层原样向上传播，不做吞没或替换。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// 配置源初始化失败（配置不当）
    #[error("配置源初始化失败: {0}")]
    Init(String),

    /// 与配置源通信失败
    #[error("配置源通信失败: {0}")]
    Communication(String),

    /// 请求的环境不存在
    #[error("环境不存在: {environment}")]
    MissingEnvironment { environment: String },

    /// 配置源当前无法提供数据
    #[error("配置源状态异常: {0}")]
    IllegalState(String),
}

/// 配置完整性错误类型
///
/// 已注册类型在获取到的配置快照中找不到对应数据，或数据无法转换
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// 缺少绑定文件（分区）
    #[error("类型 {type_name} 绑定的分区不存在: {partition}")]
    MissingPartition {
        type_name: &'static str,
        partition: String,
    },

    /// 分区中缺少配置键
    #[error("类型 {type_name} 的配置键 {key} 在分区 {partition} 中不存在")]
    MissingKey {
        type_name: &'static str,
        partition: String,
        key: String,
    },

    /// 配置值转换失败
    #[error("类型 {type_name} 的配置键 {key} 转换失败: {source}")]
    Conversion {
        type_name: &'static str,
        key: String,
        #[source]
        source: ConversionError,
    },
}

/// 值转换错误类型
#[derive(Error, Debug)]
pub enum ConversionError {
    /// 值的结构与目标类型不匹配
    #[error("无法转换为 {type_name}: {source}")]
    Malformed {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// 类型注册错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// 类型缺少必要的元数据
    #[error("类型 {type_name} 缺少元数据: {field} 不能为空")]
    MissingMetadata {
        type_name: &'static str,
        field: &'static str,
    },
}

/// 设置错误类型
#[derive(Error, Debug)]
pub enum SettingsError {
    /// 设置文件解析错误
    #[error("设置文件解析失败: {0}")]
    ParseError(String),

    /// 设置验证错误
    #[error("设置验证失败: {0}")]
    ValidationError(String),

    /// 设置文件不存在
    #[error("设置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 配置提供者错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// 环境尚未加载或类型未注册
    #[error("环境 {environment} 中没有 {type_name} 的缓存实例")]
    NotLoaded {
        environment: String,
        type_name: &'static str,
    },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ConfigCacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_converts_verbatim() {
        let err: ConfigCacheError = SourceError::MissingEnvironment {
            environment: "staging".to_string(),
        }
        .into();

        match err {
            ConfigCacheError::Source(SourceError::MissingEnvironment { environment }) => {
                assert_eq!(environment, "staging");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integrity_error_message() {
        let err = IntegrityError::MissingKey {
            type_name: "Widget",
            partition: "app.properties".to_string(),
            key: "widget".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("widget"));
        assert!(message.contains("app.properties"));
    }
}
