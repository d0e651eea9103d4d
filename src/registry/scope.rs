//! 注册作用域
//!
//! 以命名作用域（类似包路径）组织注册函数，按作用域发现配置类型

use super::{TypeRegistry, TypeRegistryBuilder};
use crate::error::RegistryError;
use std::collections::HashMap;
use tracing::{info, warn};

/// 作用域注册函数
pub type ScopeFn = fn(TypeRegistryBuilder) -> TypeRegistryBuilder;

/// 作用域目录
#[derive(Debug, Clone, Default)]
pub struct ScopeCatalog {
    scopes: HashMap<String, ScopeFn>,
}

impl ScopeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加作用域
    pub fn with_scope(mut self, name: impl Into<String>, register: ScopeFn) -> Self {
        self.scopes.insert(name.into(), register);
        self
    }

    /// 查找作用域
    pub fn get(&self, name: &str) -> Option<ScopeFn> {
        self.scopes.get(name).copied()
    }
}

impl TypeRegistry {
    /// 从作用域目录发现并构建注册表
    ///
    /// 作用域不存在或没有注册任何类型时只记录警告并返回空注册表；
    /// 注册项缺少元数据时返回错误。
    ///
    /// # 参数
    /// * `catalog` - 作用域目录
    /// * `scope` - 作用域名称
    ///
    /// # 返回
    /// * `Result<TypeRegistry, RegistryError>` - 注册表，调用方不能假设其完整
    pub fn discover(catalog: &ScopeCatalog, scope: &str) -> Result<TypeRegistry, RegistryError> {
        let Some(register) = catalog.get(scope) else {
            warn!("配置类型作用域不存在: {}", scope);
            return Ok(TypeRegistry::empty());
        };

        let builder = register(TypeRegistryBuilder::new());
        if builder.pending_len() == 0 {
            warn!("作用域 {} 中没有注册任何配置类型", scope);
            return Ok(TypeRegistry::empty());
        }

        let registry = builder.build()?;
        info!("从作用域 {} 发现 {} 个配置类型", scope, registry.len());
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Widget {
        #[allow(dead_code)]
        size: u32,
    }

    fn app_scope(builder: TypeRegistryBuilder) -> TypeRegistryBuilder {
        builder.register::<Widget>("widget", "app.properties")
    }

    fn empty_scope(builder: TypeRegistryBuilder) -> TypeRegistryBuilder {
        builder
    }

    fn broken_scope(builder: TypeRegistryBuilder) -> TypeRegistryBuilder {
        builder.register::<Widget>("widget", "")
    }

    fn catalog() -> ScopeCatalog {
        ScopeCatalog::new()
            .with_scope("app.config", app_scope)
            .with_scope("app.empty", empty_scope)
            .with_scope("app.broken", broken_scope)
    }

    #[test]
    fn test_discover_known_scope() {
        let registry = TypeRegistry::discover(&catalog(), "app.config").unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<Widget>());
    }

    #[test]
    fn test_discover_unknown_scope_is_empty() {
        let registry = TypeRegistry::discover(&catalog(), "app.missing").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_discover_scope_without_types_is_empty() {
        let registry = TypeRegistry::discover(&catalog(), "app.empty").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_discover_invalid_metadata_fails() {
        let result = TypeRegistry::discover(&catalog(), "app.broken");
        assert!(matches!(result, Err(RegistryError::MissingMetadata { .. })));
    }
}
