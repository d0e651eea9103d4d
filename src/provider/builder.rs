//! 配置提供者构建器

use crate::cache::CachedConfigurationSource;
use crate::environment::Environment;
use crate::error::{Result, SourceError};
use crate::provider::ConfigurationProvider;
use crate::registry::TypeRegistry;
use crate::reload::{ReloadScheduler, ReloadStrategy};
use crate::settings::CacheSettings;
use crate::source::ConfigurationSource;
use std::sync::Arc;
use tracing::{error, info};

/// 配置提供者构建器
#[derive(Default)]
pub struct ConfigurationProviderBuilder {
    source: Option<Arc<dyn ConfigurationSource>>,
    registry: Option<TypeRegistry>,
    environment: Environment,
    /// 与绑定环境一起加载的其他环境
    environments: Vec<Environment>,
    strategy: ReloadStrategy,
}

impl ConfigurationProviderBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置底层配置源
    pub fn with_source(mut self, source: Arc<dyn ConfigurationSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// 设置类型元数据注册表，未设置时使用空注册表
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 设置绑定的环境
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// 设置需要一起加载并按策略重载的环境
    ///
    /// 绑定的环境总是会被加载，无需重复列出
    pub fn with_environments(mut self, environments: Vec<Environment>) -> Self {
        self.environments = environments;
        self
    }

    /// 设置重载策略
    pub fn with_reload_strategy(mut self, strategy: ReloadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 从设置中读取默认环境、环境列表与重载策略
    pub fn with_settings(self, settings: &CacheSettings) -> Self {
        self.with_environment(settings.default_environment())
            .with_environments(settings.environments())
            .with_reload_strategy(settings.reload_strategy())
    }

    /// 绑定环境在前，其余环境按给定顺序去重
    fn target_environments(&self) -> Vec<Environment> {
        let mut targets = vec![self.environment.clone()];
        for environment in &self.environments {
            if !targets.contains(environment) {
                targets.push(environment.clone());
            }
        }
        targets
    }

    /// 构建提供者
    ///
    /// 初始化配置源并对所有目标环境完成一次初始重载，然后按重载策略为每个环境启动周期任务
    ///
    /// # 返回
    /// * `Result<ConfigurationProvider>` - 配置源初始化或任一环境初始重载失败时返回错误
    pub async fn build(self) -> Result<ConfigurationProvider> {
        let targets = self.target_environments();
        let source = self
            .source
            .ok_or_else(|| SourceError::IllegalState("未指定配置源".to_string()))?;
        let registry = self.registry.unwrap_or_default();

        let store = Arc::new(CachedConfigurationSource::new(source, registry));
        store.init().await?;
        for (environment, result) in store.reload_all(&targets).await {
            if let Err(e) = result {
                error!("环境 {} 初始重载失败: {}", environment, e);
                return Err(e);
            }
        }

        let provider = ConfigurationProvider::new(Arc::clone(&store), self.environment.clone());

        info!(
            "配置提供者已就绪: 环境 {}，已加载 {} 个环境，重载策略 {:?}",
            self.environment,
            targets.len(),
            self.strategy
        );

        match self.strategy {
            ReloadStrategy::Immediate => Ok(provider),
            ReloadStrategy::Periodical(_) => {
                let scheduler = Arc::new(ReloadScheduler::new(store));
                for environment in targets {
                    scheduler.register(environment, self.strategy).await;
                }
                Ok(provider.with_scheduler(scheduler))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigCacheError;
    use crate::source::InMemoryConfigurationSource;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        size: u32,
    }

    fn source() -> Arc<InMemoryConfigurationSource> {
        let source = Arc::new(InMemoryConfigurationSource::new());
        source.set_property(
            &Environment::new("staging"),
            "app.properties",
            "widget",
            json!({"size": 8}),
        );
        source
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::builder()
            .register::<Widget>("widget", "app.properties")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_build_without_source_fails() {
        let result = ConfigurationProviderBuilder::new().build().await;
        assert!(matches!(
            result,
            Err(ConfigCacheError::Source(SourceError::IllegalState(_)))
        ));
    }

    #[tokio::test]
    async fn test_build_performs_initial_reload() {
        let provider = ConfigurationProviderBuilder::new()
            .with_source(source())
            .with_registry(registry())
            .with_environment(Environment::new("staging"))
            .build()
            .await
            .unwrap();

        let widget = provider.extract::<Widget>().await.unwrap();
        assert_eq!(*widget, Widget { size: 8 });
    }

    #[tokio::test]
    async fn test_build_propagates_missing_environment() {
        let result = ConfigurationProviderBuilder::new()
            .with_source(source())
            .with_registry(registry())
            .build()
            .await;
        assert!(matches!(
            result,
            Err(ConfigCacheError::Source(SourceError::MissingEnvironment { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_with_settings_starts_periodic_reload() {
        let mut settings = CacheSettings::default();
        settings.cache.default_environment = "staging".to_string();
        settings.cache.environments = vec!["staging".to_string()];
        settings.cache.reload_interval_seconds = 10;

        let source = source();
        let provider = ConfigurationProviderBuilder::new()
            .with_source(source.clone())
            .with_registry(registry())
            .with_settings(&settings)
            .build()
            .await
            .unwrap();

        source.set_property(
            &Environment::new("staging"),
            "app.properties",
            "widget",
            json!({"size": 9}),
        );
        tokio::time::sleep(Duration::from_secs(11)).await;

        let widget = provider.extract::<Widget>().await.unwrap();
        assert_eq!(*widget, Widget { size: 9 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_with_settings_loads_all_environments() {
        let mut settings = CacheSettings::default();
        settings.cache.environments = vec!["default".to_string(), "staging".to_string()];
        settings.cache.reload_interval_seconds = 5;

        let source = source();
        source.set_property(
            &Environment::default(),
            "app.properties",
            "widget",
            json!({"size": 1}),
        );
        let provider = ConfigurationProviderBuilder::new()
            .with_source(source.clone())
            .with_registry(registry())
            .with_settings(&settings)
            .build()
            .await
            .unwrap();
        assert_eq!(provider.environment(), &Environment::default());

        let staging = provider.for_environment(Environment::new("staging"));
        let widget = staging.extract::<Widget>().await.unwrap();
        assert_eq!(*widget, Widget { size: 8 });

        source.set_property(
            &Environment::new("staging"),
            "app.properties",
            "widget",
            json!({"size": 9}),
        );
        tokio::time::sleep(Duration::from_secs(6)).await;

        let widget = staging.extract::<Widget>().await.unwrap();
        assert_eq!(*widget, Widget { size: 9 });
        assert_eq!(provider.store().generation(&Environment::default()).await, Some(1));
    }

    #[tokio::test]
    async fn test_build_fails_when_listed_environment_is_missing() {
        let result = ConfigurationProviderBuilder::new()
            .with_source(source())
            .with_registry(registry())
            .with_environment(Environment::new("staging"))
            .with_environments(vec![Environment::new("production")])
            .build()
            .await;
        assert!(matches!(
            result,
            Err(ConfigCacheError::Source(SourceError::MissingEnvironment { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_strategy_builds_without_periodic_reload() {
        let source = source();
        let staging = Environment::new("staging");
        let provider = ConfigurationProviderBuilder::new()
            .with_source(source.clone())
            .with_registry(registry())
            .with_environment(staging.clone())
            .with_reload_strategy(ReloadStrategy::Periodical(Duration::ZERO))
            .build()
            .await
            .unwrap();

        source.set_property(&staging, "app.properties", "widget", json!({"size": 2}));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*provider.extract::<Widget>().await.unwrap(), Widget { size: 8 });

        provider.reload().await.unwrap();
        assert_eq!(*provider.extract::<Widget>().await.unwrap(), Widget { size: 2 });
    }
}
