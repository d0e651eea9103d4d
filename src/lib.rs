//! Typed Config Cache - 按环境缓存的类型化配置访问层
//!
//! 从外部配置源加载绑定到命名环境的键值配置，把选定的键反序列化为类型化对象，
//! 并从按需刷新的缓存中提供这些对象：
//! - 显式注册的类型元数据（配置键 + 分区名）
//! - 配置源未变化时跳过反序列化
//! - 读写锁保护下整体替换每个环境的缓存代
//! - 即时与周期性两种重载策略
//! - 结构化日志记录

pub mod cache;
pub mod deserializer;
pub mod environment;
pub mod error;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod reload;
pub mod settings;
pub mod source;

// 重新导出主要类型
pub use cache::{CachedConfigurationSource, Generation, GenerationPublished, ReloadOutcome};
pub use environment::Environment;
pub use error::{ConfigCacheError, Result};
pub use provider::{ConfigurationProvider, ConfigurationProviderBuilder};
pub use registry::{ConfigMeta, ScopeCatalog, TypeMetaInfo, TypeRegistry, TypeRegistryBuilder};
pub use reload::{ReloadScheduler, ReloadStrategy};
pub use source::{ConfigurationSource, ConfigurationState, InMemoryConfigurationSource};

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
