//! 配置提供者
//!
//! 绑定到单个环境的薄封装，按类型从缓存配置源取出配置对象

use crate::cache::{CachedConfigurationSource, ReloadOutcome};
use crate::environment::Environment;
use crate::error::{ProviderError, Result};
use crate::reload::ReloadScheduler;
use std::sync::Arc;

/// 配置提供者
#[derive(Clone)]
pub struct ConfigurationProvider {
    /// 缓存配置源
    store: Arc<CachedConfigurationSource>,
    /// 绑定的环境
    environment: Environment,
    /// 周期重载调度器，随最后一个提供者释放而停止
    scheduler: Option<Arc<ReloadScheduler>>,
}

impl ConfigurationProvider {
    /// 创建绑定到 `environment` 的提供者
    pub fn new(store: Arc<CachedConfigurationSource>, environment: Environment) -> Self {
        Self {
            store,
            environment,
            scheduler: None,
        }
    }

    pub(crate) fn with_scheduler(mut self, scheduler: Arc<ReloadScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// 取出 `T` 的当前实例，尚未加载时返回 `None`
    pub async fn extract<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.store.extract::<T>(&self.environment).await
    }

    /// 取出 `T` 的当前实例，尚未加载时返回错误
    pub async fn require<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.extract::<T>().await.ok_or_else(|| {
            ProviderError::NotLoaded {
                environment: self.environment.name().to_string(),
                type_name: std::any::type_name::<T>(),
            }
            .into()
        })
    }

    /// 重载绑定的环境
    pub async fn reload(&self) -> Result<ReloadOutcome> {
        self.store.reload(&self.environment).await
    }

    /// 共享同一缓存的另一环境的提供者
    pub fn for_environment(&self, environment: Environment) -> Self {
        Self {
            store: Arc::clone(&self.store),
            environment,
            scheduler: self.scheduler.clone(),
        }
    }

    /// 绑定的环境
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// 底层缓存配置源
    pub fn store(&self) -> &Arc<CachedConfigurationSource> {
        &self.store
    }
}

impl std::fmt::Debug for ConfigurationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationProvider")
            .field("store", &self.store)
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigCacheError;
    use crate::registry::TypeRegistry;
    use crate::source::InMemoryConfigurationSource;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        size: u32,
    }

    async fn provider() -> ConfigurationProvider {
        let source = Arc::new(InMemoryConfigurationSource::new());
        source.set_property(
            &Environment::default(),
            "app.properties",
            "widget",
            json!({"size": 3}),
        );
        let registry = TypeRegistry::builder()
            .register::<Widget>("widget", "app.properties")
            .build()
            .unwrap();
        let store = Arc::new(CachedConfigurationSource::new(source, registry));
        store.init().await.unwrap();
        ConfigurationProvider::new(store, Environment::default())
    }

    #[tokio::test]
    async fn test_require_before_reload() {
        let provider = provider().await;
        let err = provider.require::<Widget>().await.unwrap_err();
        assert!(matches!(
            err,
            ConfigCacheError::Provider(ProviderError::NotLoaded { .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_after_reload() {
        let provider = provider().await;
        provider.reload().await.unwrap();

        let widget = provider.require::<Widget>().await.unwrap();
        assert_eq!(*widget, Widget { size: 3 });

        let staging = provider.for_environment(Environment::new("staging"));
        assert!(staging.extract::<Widget>().await.is_none());
        assert_eq!(staging.environment().name(), "staging");
    }
}
