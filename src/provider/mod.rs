//! 配置提供者模块
//!
//! 面向调用方的门面：按类型取配置对象，以及按设置组装缓存与重载策略

pub mod builder;
pub mod simple;

pub use builder::ConfigurationProviderBuilder;
pub use simple::ConfigurationProvider;
