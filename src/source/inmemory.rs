//! 内存配置源实现
//!
//! 以内存中的分区数据作为配置源，主要用于测试与基准测试。
//! 每个环境维护一个修订号，修改后第一次获取时报告 `changed = true`。

use crate::environment::Environment;
use crate::error::SourceError;
use crate::source::{ConfigurationData, ConfigurationSource, ConfigurationState, Properties};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// 单个环境的数据槽
#[derive(Debug, Default)]
struct EnvironmentSlot {
    /// 分区数据
    data: ConfigurationData,
    /// 当前修订号，每次修改递增
    revision: u64,
    /// 最近一次返回给调用方的修订号
    served_revision: Option<u64>,
}

impl EnvironmentSlot {
    fn touch(&mut self) {
        self.revision += 1;
    }
}

#[derive(Debug, Default)]
struct Inner {
    initialized: bool,
    environments: HashMap<String, EnvironmentSlot>,
}

/// 内存配置源
#[derive(Debug, Default)]
pub struct InMemoryConfigurationSource {
    inner: Mutex<Inner>,
}

impl InMemoryConfigurationSource {
    /// 创建空的内存配置源
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始数据创建内存配置源
    ///
    /// # 参数
    /// * `environments` - 环境名称到分区数据的映射
    pub fn with_environments(environments: HashMap<String, ConfigurationData>) -> Self {
        let source = Self::new();
        for (name, data) in environments {
            source.insert_environment(Environment::new(name), data);
        }
        source
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 设置（或替换）某个环境的全部分区数据
    pub fn insert_environment(&self, environment: Environment, data: ConfigurationData) {
        let mut inner = self.lock();
        let slot = inner
            .environments
            .entry(environment.name().to_string())
            .or_default();
        slot.data = data;
        slot.touch();
    }

    /// 设置（或替换）某个环境下的一个分区
    pub fn put_partition(
        &self,
        environment: &Environment,
        partition: impl Into<String>,
        properties: Properties,
    ) {
        let mut inner = self.lock();
        let slot = inner
            .environments
            .entry(environment.name().to_string())
            .or_default();
        slot.data.insert(partition.into(), properties);
        slot.touch();
    }

    /// 设置单个配置项
    pub fn set_property(
        &self,
        environment: &Environment,
        partition: &str,
        key: impl Into<String>,
        value: Value,
    ) {
        let mut inner = self.lock();
        let slot = inner
            .environments
            .entry(environment.name().to_string())
            .or_default();
        slot.data
            .entry(partition.to_string())
            .or_default()
            .insert(key.into(), value);
        slot.touch();
    }

    /// 删除单个配置项，返回被删除的值
    pub fn remove_property(
        &self,
        environment: &Environment,
        partition: &str,
        key: &str,
    ) -> Option<Value> {
        let mut inner = self.lock();
        let slot = inner.environments.get_mut(environment.name())?;
        let removed = slot.data.get_mut(partition)?.remove(key);
        if removed.is_some() {
            slot.touch();
        }
        removed
    }
}

#[async_trait]
impl ConfigurationSource for InMemoryConfigurationSource {
    async fn init(&self) -> Result<(), SourceError> {
        self.lock().initialized = true;
        debug!("内存配置源已初始化");
        Ok(())
    }

    async fn get_configuration(
        &self,
        environment: &Environment,
    ) -> Result<ConfigurationState, SourceError> {
        let mut inner = self.lock();
        if !inner.initialized {
            return Err(SourceError::IllegalState(
                "内存配置源尚未初始化".to_string(),
            ));
        }

        let slot = inner
            .environments
            .get_mut(environment.name())
            .ok_or_else(|| SourceError::MissingEnvironment {
                environment: environment.name().to_string(),
            })?;

        let changed = slot.served_revision != Some(slot.revision);
        slot.served_revision = Some(slot.revision);

        debug!(
            environment = %environment,
            revision = slot.revision,
            changed,
            "内存配置源返回配置快照"
        );

        Ok(ConfigurationState::new(slot.data.clone(), changed))
    }
}
