//! 配置缓存模块
//!
//! 按环境缓存类型化配置对象，读写锁保护下以不可变缓存代整体替换

pub mod generation;
pub mod store;

pub use generation::{Generation, GenerationPublished, ReloadOutcome};
pub use store::CachedConfigurationSource;
