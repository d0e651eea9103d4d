//! 设置数据结构定义
//!
//! 定义缓存自身的设置结构体和验证逻辑

use crate::environment::{Environment, DEFAULT_ENVIRONMENT};
use crate::reload::ReloadStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 主设置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheSettings {
    /// 缓存设置
    #[serde(default)]
    pub cache: CacheSection,
    /// 日志设置
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// 缓存设置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheSection {
    /// 默认环境
    #[serde(default = "default_environment")]
    pub default_environment: String,
    /// 需要加载的环境列表
    #[serde(default = "default_environments")]
    pub environments: Vec<String>,
    /// 周期重载间隔（秒），0 表示只按需重载
    #[serde(default)]
    pub reload_interval_seconds: u64,
}

/// 日志设置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 是否使用JSON格式
    #[serde(default)]
    pub json: bool,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            default_environment: default_environment(),
            environments: default_environments(),
            reload_interval_seconds: 0,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl CacheSettings {
    /// 默认环境
    pub fn default_environment(&self) -> Environment {
        Environment::new(self.cache.default_environment.as_str())
    }

    /// 需要加载的环境列表
    pub fn environments(&self) -> Vec<Environment> {
        self.cache
            .environments
            .iter()
            .map(|name| Environment::new(name.as_str()))
            .collect()
    }

    /// 设置对应的重载策略
    pub fn reload_strategy(&self) -> ReloadStrategy {
        ReloadStrategy::from_interval_seconds(self.cache.reload_interval_seconds)
    }
}

// 默认值函数
fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}
fn default_environments() -> Vec<String> {
    vec![DEFAULT_ENVIRONMENT.to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}

/// 设置验证函数
///
/// # 参数
/// * `settings` - 要验证的设置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_settings(settings: &CacheSettings) -> Result<(), String> {
    let cache = &settings.cache;

    if cache.default_environment.trim().is_empty() {
        return Err("默认环境不能为空".to_string());
    }

    if cache.environments.is_empty() {
        return Err("至少需要配置一个环境".to_string());
    }

    let mut seen = HashSet::new();
    for name in &cache.environments {
        if name.trim().is_empty() {
            return Err("环境名称不能为空".to_string());
        }
        if !seen.insert(name.as_str()) {
            return Err(format!("环境重复: {name}"));
        }
    }

    if !seen.contains(cache.default_environment.as_str()) {
        return Err(format!(
            "默认环境 {} 不在环境列表中",
            cache.default_environment
        ));
    }

    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&settings.logging.level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            settings.logging.level, valid_log_levels
        ));
    }

    Ok(())
}
