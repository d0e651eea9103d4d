//! 设置加载器实现
//!
//! 提供TOML设置文件解析、环境变量替换和错误处理功能

use crate::error::{Result, SettingsError};
use crate::settings::types::{validate_settings, CacheSettings};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use tracing::{debug, info};

/// 设置加载器trait，定义设置加载接口
#[async_trait]
pub trait SettingsLoader: Send + Sync {
    /// 从文件加载设置
    ///
    /// # 参数
    /// * `path` - 设置文件路径
    ///
    /// # 返回
    /// * `Result<CacheSettings>` - 加载的设置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<CacheSettings>;

    /// 从字符串加载设置
    ///
    /// # 参数
    /// * `content` - 设置文件内容
    ///
    /// # 返回
    /// * `Result<CacheSettings>` - 加载的设置或错误
    async fn load_from_string(&self, content: &str) -> Result<CacheSettings>;

    /// 验证设置
    fn validate(&self, settings: &CacheSettings) -> Result<()>;
}

/// TOML设置加载器实现
#[derive(Debug, Clone)]
pub struct TomlSettingsLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlSettingsLoader {
    /// 创建新的TOML设置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中 `${VAR_NAME}` 格式的环境变量
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| SettingsError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(SettingsError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析TOML内容
    fn parse_toml(&self, content: &str) -> Result<CacheSettings> {
        let processed_content = self.substitute_env_vars(content)?;

        let settings: CacheSettings = toml::from_str(&processed_content)
            .map_err(|e| SettingsError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(settings)
    }
}

impl Default for TomlSettingsLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl SettingsLoader for TomlSettingsLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<CacheSettings> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SettingsError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let settings = self.parse_toml(&content)?;
        self.validate(&settings)?;

        info!("成功加载设置文件: {}", path.display());
        debug!("设置内容: {:?}", settings);

        Ok(settings)
    }

    async fn load_from_string(&self, content: &str) -> Result<CacheSettings> {
        let settings = self.parse_toml(content)?;
        self.validate(&settings)?;

        debug!("成功解析设置字符串");

        Ok(settings)
    }

    fn validate(&self, settings: &CacheSettings) -> Result<()> {
        validate_settings(settings).map_err(|e| SettingsError::ValidationError(e).into())
    }
}

/// 获取默认设置文件路径
///
/// 当前目录存在 `config-cache.toml` 时使用它，否则使用用户配置目录下的
/// `typed-config-cache/config-cache.toml`
pub fn get_default_settings_path() -> std::path::PathBuf {
    const FILE_NAME: &str = "config-cache.toml";

    if Path::new(FILE_NAME).exists() {
        return std::path::PathBuf::from(FILE_NAME);
    }

    dirs::config_dir()
        .map(|config_dir| config_dir.join(crate::APP_NAME).join(FILE_NAME))
        .unwrap_or_else(|| std::path::PathBuf::from(FILE_NAME))
}
