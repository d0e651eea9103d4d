//! 重载调度器
//!
//! 按重载策略为每个环境启动周期性重载任务

use crate::cache::{CachedConfigurationSource, ReloadOutcome};
use crate::environment::Environment;
use crate::reload::ReloadStrategy;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 重载调度器
pub struct ReloadScheduler {
    /// 缓存配置源
    store: Arc<CachedConfigurationSource>,
    /// 环境名称到重载任务的映射
    tasks: RwLock<HashMap<String, JoinHandle<()>>>,
}

impl ReloadScheduler {
    /// 创建新的重载调度器
    pub fn new(store: Arc<CachedConfigurationSource>) -> Self {
        Self {
            store,
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// 为环境注册重载策略
    ///
    /// `Immediate` 不启动任务；`Periodical` 启动周期任务，替换该环境已有的任务。
    /// 间隔为零的 `Periodical` 按 `Immediate` 处理。
    pub async fn register(&self, environment: Environment, strategy: ReloadStrategy) {
        let period = match strategy.interval() {
            Some(period) if !period.is_zero() => period,
            Some(_) => {
                warn!("环境 {} 的周期重载间隔为零，改用即时重载策略", environment);
                return;
            }
            None => {
                debug!("环境 {} 使用即时重载策略，不启动周期任务", environment);
                return;
            }
        };

        let task = Self::spawn_reload_task(Arc::clone(&self.store), environment.clone(), period);

        let mut tasks = self.tasks.write().await;
        if let Some(previous) = tasks.insert(environment.name().to_string(), task) {
            previous.abort();
        }
        info!(
            "启动周期重载任务: {}，间隔: {}秒",
            environment,
            period.as_secs_f64()
        );
    }

    /// 启动单个环境的周期重载任务
    fn spawn_reload_task(
        store: Arc<CachedConfigurationSource>,
        environment: Environment,
        period: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // 第一次tick立即返回，初始重载由调用方完成
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match store.reload(&environment).await {
                    Ok(ReloadOutcome::Published { generation }) => {
                        debug!("周期重载发布新缓存代: {} #{}", environment, generation);
                    }
                    Ok(ReloadOutcome::Unchanged) => {}
                    Err(e) => {
                        error!("周期重载失败: {}，保留当前缓存代: {}", environment, e);
                    }
                }
            }
        })
    }

    /// 注销环境的重载任务
    pub async fn deregister(&self, environment: &Environment) {
        let mut tasks = self.tasks.write().await;
        if let Some(task) = tasks.remove(environment.name()) {
            task.abort();
            info!("停止周期重载任务: {}", environment);
        }
    }

    /// 已注册周期任务的环境
    pub async fn registered(&self) -> Vec<Environment> {
        let tasks = self.tasks.read().await;
        let mut environments: Vec<Environment> =
            tasks.keys().map(|name| Environment::new(name.as_str())).collect();
        environments.sort();
        environments
    }

    /// 停止所有重载任务
    pub async fn stop(&self) {
        let mut tasks = self.tasks.write().await;
        for (name, task) in tasks.drain() {
            task.abort();
            debug!("停止周期重载任务: {}", name);
        }
    }
}

impl Drop for ReloadScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.get_mut().drain() {
            task.abort();
        }
    }
}
