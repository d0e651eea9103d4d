//! 配置源模块
//!
//! 定义底层配置源接口以及配置快照结构。配置字节如何从远端传输
//! 由具体的配置源实现负责，缓存层只依赖这里的接口。

pub mod inmemory;

use crate::environment::Environment;
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

pub use inmemory::InMemoryConfigurationSource;

/// 单个分区（绑定文件）内的扁平键值集合
pub type Properties = HashMap<String, Value>;

/// 分区名称到键值集合的映射
pub type ConfigurationData = HashMap<String, Properties>;

/// 配置源trait，定义配置获取接口
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    /// 初始化配置源，必须在其他方法之前调用
    ///
    /// # 返回
    /// * `Result<(), SourceError>` - 配置不当时返回 `Init`，通信失败时返回 `Communication`
    async fn init(&self) -> Result<(), SourceError>;

    /// 获取指定环境的配置快照
    ///
    /// # 参数
    /// * `environment` - 要获取的环境
    ///
    /// # 返回
    /// * `Result<ConfigurationState, SourceError>` - 环境未知时返回 `MissingEnvironment`，
    ///   当前无法提供数据时返回 `IllegalState`
    async fn get_configuration(
        &self,
        environment: &Environment,
    ) -> Result<ConfigurationState, SourceError>;
}

/// 一次获取得到的配置快照
///
/// 每次获取都会新建，构造后不再修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationState {
    data: ConfigurationData,
    changed: bool,
}

impl ConfigurationState {
    /// 创建配置快照
    ///
    /// # 参数
    /// * `data` - 分区数据
    /// * `changed` - 与上一次返回的快照相比是否有变化
    pub fn new(data: ConfigurationData, changed: bool) -> Self {
        Self { data, changed }
    }

    /// 创建一个表示"未变化"的空快照
    pub fn unchanged() -> Self {
        Self::new(ConfigurationData::new(), false)
    }

    /// 分区数据
    pub fn data(&self) -> &ConfigurationData {
        &self.data
    }

    /// 是否与上一次快照不同
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// 查找 `partition` 分区下的 `key`
    pub fn lookup(&self, partition: &str, key: &str) -> Option<&Value> {
        self.data.get(partition).and_then(|props| props.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup() {
        let mut props = Properties::new();
        props.insert("widget".to_string(), json!({"size": 3}));
        let mut data = ConfigurationData::new();
        data.insert("app.properties".to_string(), props);

        let state = ConfigurationState::new(data, true);
        assert!(state.is_changed());
        assert_eq!(
            state.lookup("app.properties", "widget"),
            Some(&json!({"size": 3}))
        );
        assert!(state.lookup("app.properties", "missing").is_none());
        assert!(state.lookup("other.properties", "widget").is_none());
    }

    #[test]
    fn test_unchanged_state() {
        let state = ConfigurationState::unchanged();
        assert!(!state.is_changed());
        assert!(state.data().is_empty());
    }
}
