//! 缓存代（generation）定义

use crate::environment::Environment;
use crate::registry::CachedValue;
use chrono::{DateTime, Utc};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// 某个环境的一次完整发布的类型化缓存
///
/// 发布后不可变，读者通过 `Arc` 共享
#[derive(Debug)]
pub struct Generation {
    /// 代号，同一环境内从1开始递增
    number: u64,
    /// 类型到实例的映射
    entries: HashMap<TypeId, CachedValue>,
    /// 发布时间
    published_at: DateTime<Utc>,
}

impl Generation {
    pub(crate) fn new(number: u64, entries: HashMap<TypeId, CachedValue>) -> Self {
        Self {
            number,
            entries,
            published_at: Utc::now(),
        }
    }

    /// 代号
    pub fn number(&self) -> u64 {
        self.number
    }

    /// 发布时间
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// 实例数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有任何实例
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取 `T` 的实例
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }
}

/// 重载结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// 配置源报告未变化，保留原有缓存代
    Unchanged,
    /// 发布了新的缓存代
    Published { generation: u64 },
}

impl ReloadOutcome {
    /// 是否发布了新的缓存代
    pub fn is_published(&self) -> bool {
        matches!(self, ReloadOutcome::Published { .. })
    }
}

/// 新缓存代发布通知
#[derive(Debug, Clone)]
pub struct GenerationPublished {
    /// 环境
    pub environment: Environment,
    /// 代号
    pub generation: u64,
    /// 实例数量
    pub types: usize,
    /// 发布时间
    pub published_at: DateTime<Utc>,
}
