// 配置模块 - 支持外部配置文件
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 配置文件路径
const CONFIG_FILE: &str = "./config.toml";

// ============== 配置结构体 ==============

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// 外部字段目录文件（.toml / .json），为空时使用内置目录
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    /// 导出 JSON 时是否格式化
    pub pretty: bool,
    /// 每次编辑后是否回显完整文档
    pub echo_document: bool,
}

// ============== 默认配置 ==============

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            echo_document: false,
        }
    }
}

// ============== 配置加载 ==============

impl AppConfig {
    /// 从配置文件加载，失败则使用默认配置
    pub fn load() -> Self {
        if !Path::new(CONFIG_FILE).exists() {
            info!("[Config] '{}' not found, using defaults", CONFIG_FILE);
            return Self::default();
        }
        Self::load_from_file(CONFIG_FILE).unwrap_or_else(|e| {
            warn!("[Config] failed to load '{}': {}", CONFIG_FILE, e);
            warn!("[Config] using defaults");
            Self::default()
        })
    }

    /// 从指定文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// 生成默认配置文件
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
        let default_content = include_str!("../config.toml");
        fs::write(path, default_content)?;
        Ok(())
    }
}

// ============== 全局配置实例 ==============

/// 全局配置实例 (懒加载)
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let config = AppConfig::load();
    match &config.catalog.path {
        Some(path) => info!("[Config] field catalog: {}", path),
        None => info!("[Config] field catalog: built-in"),
    }
    config
});
