use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 每毫米对应的内部单位数（纳米）。
const IU_PER_MM: f64 = 1_000_000.0;

fn mm_to_iu(mm: f64) -> i64 {
    (mm * IU_PER_MM).round() as i64
}

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub outline: OutlineConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `EDGECUT_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("EDGECUT_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 轮廓重建参数。长度均以毫米书写，使用前换算为内部单位。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub edge_layer: String,
    /// 端点连接容差；为 0 时仅接受完全重合的端点。
    pub tolerance_mm: f64,
    /// 容差为 0 时圆弧折线化的弦高误差。
    pub chord_error_mm: f64,
    /// 退化包围盒的外扩量。
    pub fallback_margin_mm: f64,
    pub allow_reverse_duplicates: bool,
}

impl OutlineConfig {
    pub fn tolerance_iu(&self) -> u64 {
        mm_to_iu(self.tolerance_mm).max(0) as u64
    }

    pub fn chord_error_iu(&self) -> u64 {
        mm_to_iu(self.chord_error_mm).max(1) as u64
    }

    pub fn fallback_margin_iu(&self) -> i64 {
        mm_to_iu(self.fallback_margin_mm).max(1)
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            edge_layer: "Edge.Cuts".to_string(),
            tolerance_mm: 0.0,
            chord_error_mm: 0.005,
            fallback_margin_mm: 1.0,
            allow_reverse_duplicates: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
