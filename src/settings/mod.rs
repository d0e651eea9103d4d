//! 设置模块
//!
//! 缓存自身的设置：环境列表、重载间隔与日志选项

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{get_default_settings_path, SettingsLoader, TomlSettingsLoader};
pub use types::{validate_settings, CacheSection, CacheSettings, LoggingSettings};
