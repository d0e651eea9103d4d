//! 类型元数据定义

use serde::{Deserialize, Serialize};

/// 目标类型在配置快照中的位置
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMetaInfo {
    /// 配置键
    config_key: String,
    /// 绑定的分区（文件）名称
    partition: String,
}

impl TypeMetaInfo {
    /// 创建元数据，非空校验由 [`TypeRegistryBuilder`](super::TypeRegistryBuilder) 在构建时完成
    pub fn new(config_key: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            config_key: config_key.into(),
            partition: partition.into(),
        }
    }

    /// 配置键
    pub fn config_key(&self) -> &str {
        &self.config_key
    }

    /// 分区名称
    pub fn partition(&self) -> &str {
        &self.partition
    }
}

/// 静态声明的配置绑定元数据
///
/// ```
/// use serde::Deserialize;
/// use typed_config_cache::registry::ConfigMeta;
///
/// #[derive(Deserialize)]
/// struct Widget {
///     size: u32,
/// }
///
/// impl ConfigMeta for Widget {
///     const CONFIG_KEY: &'static str = "widget";
///     const BOUND_FILE: &'static str = "app.properties";
/// }
/// ```
pub trait ConfigMeta {
    /// 配置键
    const CONFIG_KEY: &'static str;
    /// 绑定的分区（文件）名称
    const BOUND_FILE: &'static str;

    /// 转换为运行期元数据
    fn meta_info() -> TypeMetaInfo {
        TypeMetaInfo::new(Self::CONFIG_KEY, Self::BOUND_FILE)
    }
}
