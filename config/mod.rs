use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::knn::Unit;

/// Locus 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocusConfig {
    /// 服务器配置
    pub server: ServerConfig,

    /// 数据集配置
    pub dataset: DatasetConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// 数据集配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// GeoJSON FeatureCollection 数据文件路径
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// 默认距离单位：miles, km
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Ball-tree 叶子节点大小
    #[serde(default = "default_leaf_size")]
    pub leaf_size: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7979
}

fn default_max_connections() -> usize {
    1024
}

fn default_timeout() -> u64 {
    30
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("./data/stores.geojson")
}

fn default_unit() -> String {
    "miles".to_string()
}

fn default_leaf_size() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for LocusConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_connections: default_max_connections(),
                timeout: default_timeout(),
            },
            dataset: DatasetConfig {
                path: default_dataset_path(),
                unit: default_unit(),
                leaf_size: default_leaf_size(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                output: default_log_output(),
                log_file: None,
            },
        }
    }
}

impl LocusConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（LOCUS__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use locus::config::LocusConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = LocusConfig::from_file("locus.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            // 1. 加载默认配置（内嵌）
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            // 2. 加载用户配置（可选，不存在不报错）
            .add_source(config::File::with_name(path).required(false))
            // 3. 加载环境变量（LOCUS__ 前缀，双下划线分隔嵌套）
            .add_source(config::Environment::with_prefix("LOCUS").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 解析配置中的距离单位
    pub fn default_unit(&self) -> Result<Unit, String> {
        self.dataset
            .unit
            .parse::<Unit>()
            .map_err(|_| format!("Invalid unit: '{}'. Must be miles or km", self.dataset.unit))
    }

    /// 验证配置
    ///
    /// 检查配置的合法性，包括：
    /// - 端口范围
    /// - 距离单位
    /// - 叶子节点大小
    /// - 日志级别
    pub fn validate(&self) -> Result<(), String> {
        // 验证端口（非特权端口）
        if self.server.port < 1024 {
            return Err(format!(
                "Server port {} is below 1024 (privileged range)",
                self.server.port
            ));
        }

        // 验证距离单位
        self.default_unit()?;

        // 验证叶子节点大小
        if self.dataset.leaf_size == 0 {
            return Err("Ball-tree leaf size must be at least 1".to_string());
        }

        // 验证日志级别
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        // 验证日志文件配置
        if self.logging.output == "file" && self.logging.log_file.is_none() {
            return Err("Log output is 'file' but log_file path is not specified".to_string());
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 Locus Configuration:");
        println!("   Server:      {}:{}", self.server.host, self.server.port);
        println!("   Max Connections: {}", self.server.max_connections);
        println!("   Timeout:     {} seconds", self.server.timeout);
        println!();
        println!("   Dataset:     {}", self.dataset.path.display());
        println!("   Unit:        {}", self.dataset.unit);
        println!("   Leaf Size:   {}", self.dataset.leaf_size);
        println!();
        println!("   Log Level:   {}", self.logging.level);
        println!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:    {}", log_file.display());
        }
        println!();
    }
}
