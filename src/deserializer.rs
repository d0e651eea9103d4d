//! 配置值反序列化
//!
//! 将原始配置值（字符串或结构化值）转换为目标类型

use crate::error::ConversionError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 将原始配置值转换为 `T`
///
/// 结构化值直接按 `T` 反序列化。字符串值若无法直接转换，则按JSON文本再解析一次，
/// 因此 `"3"`、`"true"`、`"{\"size\":3}"` 这类写在属性文件里的值也能使用。
///
/// # 参数
/// * `raw` - 原始配置值
///
/// # 返回
/// * `Result<T, ConversionError>` - 转换结果，失败时携带直接转换的错误
pub fn convert<T: DeserializeOwned>(raw: &Value) -> Result<T, ConversionError> {
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(value) => Ok(value),
        Err(direct_err) => {
            if let Value::String(text) = raw {
                if let Ok(value) = serde_json::from_str::<T>(text) {
                    return Ok(value);
                }
            }
            Err(ConversionError::Malformed {
                type_name: std::any::type_name::<T>(),
                source: direct_err,
            })
        }
    }
}
