//! 缓存配置源
//!
//! 按环境缓存反序列化后的类型化配置对象，并在底层配置源发生变化时重载

use crate::cache::generation::{Generation, GenerationPublished, ReloadOutcome};
use crate::environment::Environment;
use crate::error::{IntegrityError, Result};
use crate::registry::{CachedValue, TypeRegistry};
use crate::source::{ConfigurationSource, ConfigurationState};
use futures::future::join_all;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

/// 发布通知通道容量
const PUBLISH_CHANNEL_CAPACITY: usize = 32;

/// 带缓存的配置源
///
/// 读路径只持有共享锁做一次查找；重载在锁外完成获取与反序列化，
/// 只在替换环境缓存代的一步持有独占锁。
pub struct CachedConfigurationSource {
    /// 底层配置源
    source: Arc<dyn ConfigurationSource>,
    /// 类型元数据注册表
    registry: Arc<TypeRegistry>,
    /// 环境名称到当前缓存代的映射
    cache: RwLock<HashMap<String, Arc<Generation>>>,
    /// 缓存代发布通知发送器
    update_sender: broadcast::Sender<GenerationPublished>,
}

impl CachedConfigurationSource {
    /// 创建新的缓存配置源
    ///
    /// # 参数
    /// * `source` - 底层配置源
    /// * `registry` - 已构建完成的类型元数据注册表
    pub fn new(source: Arc<dyn ConfigurationSource>, registry: TypeRegistry) -> Self {
        let (update_sender, _) = broadcast::channel(PUBLISH_CHANNEL_CAPACITY);

        if registry.is_empty() {
            warn!("类型元数据注册表为空，重载不会产生任何缓存实例");
        }

        Self {
            source,
            registry: Arc::new(registry),
            cache: RwLock::new(HashMap::new()),
            update_sender,
        }
    }

    /// 初始化底层配置源，必须在第一次重载前调用一次
    pub async fn init(&self) -> Result<()> {
        self.source.init().await?;
        info!("配置源初始化完成");
        Ok(())
    }

    /// 获取环境中 `T` 的最新缓存实例
    ///
    /// 环境尚未成功重载过，或 `T` 未注册时返回 `None`
    pub async fn extract<T: Send + Sync + 'static>(
        &self,
        environment: &Environment,
    ) -> Option<Arc<T>> {
        let cache = self.cache.read().await;
        cache
            .get(environment.name())
            .and_then(|generation| generation.get::<T>())
    }

    /// 重载指定环境
    ///
    /// 配置源报告未变化时不做任何反序列化。任一步骤失败都会中止本次重载，
    /// 原有缓存代保持可见，错误返回给调用方。
    ///
    /// # 参数
    /// * `environment` - 要重载的环境
    ///
    /// # 返回
    /// * `Result<ReloadOutcome>` - 重载结果
    pub async fn reload(&self, environment: &Environment) -> Result<ReloadOutcome> {
        let started = Instant::now();

        let state = self.source.get_configuration(environment).await?;
        if !state.is_changed() {
            debug!("环境 {} 的配置未变化，跳过重载", environment);
            return Ok(ReloadOutcome::Unchanged);
        }

        let entries = self.materialize(&state).map_err(|e| {
            warn!("环境 {} 重载失败，保留当前缓存代: {}", environment, e);
            e
        })?;
        let types = entries.len();

        let generation = {
            let mut cache = self.cache.write().await;
            let number = cache
                .get(environment.name())
                .map_or(1, |current| current.number() + 1);
            let generation = Arc::new(Generation::new(number, entries));
            cache.insert(environment.name().to_string(), Arc::clone(&generation));
            generation
        };

        let notification = GenerationPublished {
            environment: environment.clone(),
            generation: generation.number(),
            types,
            published_at: generation.published_at(),
        };
        if self.update_sender.send(notification).is_err() {
            debug!("没有缓存代发布通知的订阅者");
        }

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            environment = %environment,
            generation = generation.number(),
            types,
            elapsed_ms,
            "配置缓存代已发布"
        );

        Ok(ReloadOutcome::Published {
            generation: generation.number(),
        })
    }

    /// 并发重载多个环境，各环境的结果相互独立
    pub async fn reload_all(
        &self,
        environments: &[Environment],
    ) -> Vec<(Environment, Result<ReloadOutcome>)> {
        let reloads = environments.iter().map(|environment| async move {
            (environment.clone(), self.reload(environment).await)
        });
        join_all(reloads).await
    }

    /// 按注册表把配置快照转换为完整的新缓存代内容
    fn materialize(
        &self,
        state: &ConfigurationState,
    ) -> std::result::Result<HashMap<TypeId, CachedValue>, IntegrityError> {
        let mut entries = HashMap::with_capacity(self.registry.len());
        for registered in self.registry.iter() {
            let value = registered.materialize(state)?;
            entries.insert(registered.type_id(), value);
        }
        Ok(entries)
    }

    /// 环境当前的缓存代号
    pub async fn generation(&self, environment: &Environment) -> Option<u64> {
        self.snapshot(environment)
            .await
            .map(|generation| generation.number())
    }

    /// 环境当前的完整缓存代
    pub async fn snapshot(&self, environment: &Environment) -> Option<Arc<Generation>> {
        self.cache.read().await.get(environment.name()).cloned()
    }

    /// 已有缓存代的环境列表
    pub async fn environments(&self) -> Vec<Environment> {
        let cache = self.cache.read().await;
        let mut environments: Vec<Environment> =
            cache.keys().map(|name| Environment::new(name.as_str())).collect();
        environments.sort();
        environments
    }

    /// 订阅缓存代发布通知
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationPublished> {
        self.update_sender.subscribe()
    }

    /// 类型元数据注册表
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for CachedConfigurationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedConfigurationSource")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
