//! 重载策略定义

use std::time::Duration;

/// 重载策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadStrategy {
    /// 构建时重载一次，之后只在调用方显式请求时重载
    #[default]
    Immediate,
    /// 按固定间隔周期性重载
    Periodical(Duration),
}

impl ReloadStrategy {
    /// 由间隔秒数得到策略，0 表示不做周期性重载
    pub fn from_interval_seconds(seconds: u64) -> Self {
        if seconds == 0 {
            ReloadStrategy::Immediate
        } else {
            ReloadStrategy::Periodical(Duration::from_secs(seconds))
        }
    }

    /// 周期性重载的间隔
    pub fn interval(&self) -> Option<Duration> {
        match self {
            ReloadStrategy::Immediate => None,
            ReloadStrategy::Periodical(interval) => Some(*interval),
        }
    }
}
