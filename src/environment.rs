//! 环境标识
//!
//! 选择使用哪个配置分区的不可变标识（例如 "default"、"staging"）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认环境名称
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// 配置环境，按名称判等
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    name: String,
}

impl Environment {
    /// 创建指定名称的环境
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 环境名称
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_ENVIRONMENT)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
