//! 类型元数据注册表
//!
//! 在构造时一次性建立 {目标类型 → (配置键, 分区名)} 的映射，
//! 之后只读。以显式注册列表代替运行期的类型扫描。

pub mod meta;
pub mod scope;

use crate::deserializer;
use crate::error::{ConversionError, IntegrityError, RegistryError};
use crate::source::ConfigurationState;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use meta::{ConfigMeta, TypeMetaInfo};
pub use scope::{ScopeCatalog, ScopeFn};

/// 缓存中保存的类型擦除实例
pub type CachedValue = Arc<dyn Any + Send + Sync>;

type ConvertFn = fn(&Value) -> Result<CachedValue, ConversionError>;

fn convert_erased<T>(raw: &Value) -> Result<CachedValue, ConversionError>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    let value: T = deserializer::convert(raw)?;
    Ok(Arc::new(value))
}

/// 一个已注册的目标类型
#[derive(Clone)]
pub struct RegisteredType {
    type_id: TypeId,
    type_name: &'static str,
    meta: TypeMetaInfo,
    convert: ConvertFn,
}

impl RegisteredType {
    fn of<T>(meta: TypeMetaInfo) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            meta,
            convert: convert_erased::<T>,
        }
    }

    /// 类型标识
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 元数据
    pub fn meta(&self) -> &TypeMetaInfo {
        &self.meta
    }

    /// 从配置快照中取出并转换该类型的实例
    ///
    /// 分区缺失、键缺失与转换失败分别报告为不同的完整性错误
    pub fn materialize(&self, state: &ConfigurationState) -> Result<CachedValue, IntegrityError> {
        let partition = self.meta.partition();
        let key = self.meta.config_key();

        let raw = match state.lookup(partition, key) {
            Some(raw) => raw,
            None if !state.data().contains_key(partition) => {
                return Err(IntegrityError::MissingPartition {
                    type_name: self.type_name,
                    partition: partition.to_string(),
                });
            }
            None => {
                return Err(IntegrityError::MissingKey {
                    type_name: self.type_name,
                    partition: partition.to_string(),
                    key: key.to_string(),
                });
            }
        };

        (self.convert)(raw).map_err(|source| IntegrityError::Conversion {
            type_name: self.type_name,
            key: key.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredType")
            .field("type_name", &self.type_name)
            .field("meta", &self.meta)
            .finish()
    }
}

/// 类型元数据注册表，构造后只读
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<TypeId, RegisteredType>,
}

impl TypeRegistry {
    /// 创建注册表构建器
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// 创建空注册表
    pub fn empty() -> Self {
        Self::default()
    }

    /// 已注册的类型数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `T` 是否已注册
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// 获取 `T` 的元数据
    pub fn meta_of<T: 'static>(&self) -> Option<&TypeMetaInfo> {
        self.entries.get(&TypeId::of::<T>()).map(|entry| &entry.meta)
    }

    /// 遍历所有已注册类型
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredType> {
        self.entries.values()
    }
}

/// 注册表构建器
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    /// 待校验的注册项
    pending: Vec<RegisteredType>,
}

impl TypeRegistryBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册目标类型
    ///
    /// # 参数
    /// * `config_key` - 配置键
    /// * `partition` - 分区（绑定文件）名称
    pub fn register<T>(
        self,
        config_key: impl Into<String>,
        partition: impl Into<String>,
    ) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.register_with::<T>(TypeMetaInfo::new(config_key, partition))
    }

    fn register_with<T>(mut self, meta: TypeMetaInfo) -> Self
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        self.pending.push(RegisteredType::of::<T>(meta));
        self
    }

    /// 按类型上静态声明的元数据注册
    pub fn register_meta<T>(self) -> Self
    where
        T: ConfigMeta + DeserializeOwned + Send + Sync + 'static,
    {
        self.register_with::<T>(T::meta_info())
    }

    /// 待注册的类型数量
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// 构建注册表
    ///
    /// # 返回
    /// * `Result<TypeRegistry, RegistryError>` - 任一类型缺少配置键或分区名时立即失败
    pub fn build(self) -> Result<TypeRegistry, RegistryError> {
        let mut entries = HashMap::with_capacity(self.pending.len());

        for entry in self.pending {
            if entry.meta.config_key().trim().is_empty() {
                return Err(RegistryError::MissingMetadata {
                    type_name: entry.type_name,
                    field: "config_key",
                });
            }
            if entry.meta.partition().trim().is_empty() {
                return Err(RegistryError::MissingMetadata {
                    type_name: entry.type_name,
                    field: "partition",
                });
            }

            debug!(
                type_name = entry.type_name,
                config_key = entry.meta.config_key(),
                partition = entry.meta.partition(),
                "注册配置类型"
            );

            if let Some(previous) = entries.insert(entry.type_id, entry) {
                warn!(
                    "配置类型重复注册，保留最后一次注册: {}",
                    previous.type_name
                );
            }
        }

        info!("配置类型注册表构建完成，类型数量: {}", entries.len());
        Ok(TypeRegistry { entries })
    }
}
