use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "sanctions.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据库连接串
    pub database_url: String,
    /// 连接池上限
    pub db_max_connections: u32,
    /// 制裁名单搜索页面
    pub search_url: String,
    /// 浏览器调试端口（设置后连接已运行的浏览器，否则启动无头浏览器）
    pub browser_debug_port: Option<u16>,
    /// 是否无头模式
    pub headless: bool,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<String>,
    /// 等待页面元素的超时时间（秒）
    pub element_timeout_secs: u64,
    /// 单个主体的最大搜索次数
    pub max_attempts: usize,
    /// 重试前等待（秒）
    pub retry_backoff_secs: u64,
    /// 点击搜索后等待结果渲染（毫秒）
    pub settle_delay_ms: u64,
    /// 点击重置后等待（毫秒）
    pub reset_delay_ms: u64,
    /// 页面缩放比例
    pub page_zoom_percent: u32,
    /// 截图目录
    pub capture_dir: PathBuf,
    /// 报表目录
    pub reports_dir: PathBuf,
    /// 日志目录
    pub logs_dir: PathBuf,
    /// 截图保留天数
    pub capture_retention_days: Option<u32>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://sanctions.db?mode=rwc".to_string(),
            db_max_connections: 5,
            search_url: "https://sanctionssearch.ofac.treas.gov/".to_string(),
            browser_debug_port: None,
            headless: true,
            chrome_executable: None,
            element_timeout_secs: 20,
            max_attempts: 3,
            retry_backoff_secs: 2,
            settle_delay_ms: 2000,
            reset_delay_ms: 1000,
            page_zoom_percent: 60,
            capture_dir: PathBuf::from("capturas"),
            reports_dir: PathBuf::from("reportes"),
            logs_dir: PathBuf::from("logs"),
            capture_retention_days: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：`SANCTIONS_CONFIG` 指定的文件或工作目录下的 `sanctions.toml`，再叠加环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SANCTIONS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        Ok(base.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// 只用环境变量覆盖默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用环境变量覆盖，无法解析的值保留原值
    pub fn with_env_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| lookup(key).map(PathBuf::from);

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(self.database_url),
            db_max_connections: parse_env(lookup("DB_MAX_CONNECTIONS")).unwrap_or(self.db_max_connections),
            search_url: lookup("SEARCH_URL").unwrap_or(self.search_url),
            browser_debug_port: parse_env(lookup("BROWSER_DEBUG_PORT")).or(self.browser_debug_port),
            headless: parse_env(lookup("BROWSER_HEADLESS")).unwrap_or(self.headless),
            chrome_executable: lookup("CHROME_EXECUTABLE").or(self.chrome_executable),
            element_timeout_secs: parse_env(lookup("ELEMENT_TIMEOUT_SECS")).unwrap_or(self.element_timeout_secs),
            max_attempts: parse_env(lookup("SEARCH_MAX_ATTEMPTS")).unwrap_or(self.max_attempts),
            retry_backoff_secs: parse_env(lookup("SEARCH_RETRY_BACKOFF_SECS")).unwrap_or(self.retry_backoff_secs),
            settle_delay_ms: parse_env(lookup("SEARCH_SETTLE_DELAY_MS")).unwrap_or(self.settle_delay_ms),
            reset_delay_ms: parse_env(lookup("SEARCH_RESET_DELAY_MS")).unwrap_or(self.reset_delay_ms),
            page_zoom_percent: parse_env(lookup("PAGE_ZOOM_PERCENT")).unwrap_or(self.page_zoom_percent),
            capture_dir: path("DIR_CAPTURAS").unwrap_or(self.capture_dir),
            reports_dir: path("DIR_REPORTES").unwrap_or(self.reports_dir),
            logs_dir: path("DIR_LOGS").unwrap_or(self.logs_dir),
            capture_retention_days: parse_env(lookup("CAPTURE_RETENTION_DAYS")).or(self.capture_retention_days),
            verbose_logging: parse_env(lookup("VERBOSE_LOGGING")).unwrap_or(self.verbose_logging),
        }
    }

    /// 搜索会话使用的参数
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            search_url: self.search_url.clone(),
            max_attempts: self.max_attempts.max(1),
            retry_backoff: Duration::from_secs(self.retry_backoff_secs),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            element_timeout: Duration::from_secs(self.element_timeout_secs),
            zoom_percent: self.page_zoom_percent,
        }
    }
}

/// 解析环境变量的值，无法解析时返回 `None`
fn parse_env<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// 搜索会话参数
#[derive(Clone, Debug)]
pub struct SearchSettings {
    pub search_url: String,
    pub max_attempts: usize,
    pub retry_backoff: Duration,
    pub settle_delay: Duration,
    pub reset_delay: Duration,
    pub element_timeout: Duration,
    pub zoom_percent: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Config::default().search_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_source_constants() {
        let settings = Config::default().search_settings();
        assert_eq!(settings.max_attempts, 3);
        assert_eq!(settings.retry_backoff, Duration::from_secs(2));
        assert_eq!(settings.settle_delay, Duration::from_secs(2));
        assert_eq!(settings.zoom_percent, 60);
    }

    #[test]
    fn env_overrides_replace_only_parseable_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SEARCH_MAX_ATTEMPTS", "5"),
            ("BROWSER_DEBUG_PORT", "not-a-port"),
            ("DIR_CAPTURAS", "/tmp/shots"),
        ]);
        let config =
            Config::default().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.browser_debug_port, None);
        assert_eq!(config.capture_dir, PathBuf::from("/tmp/shots"));
        assert_eq!(config.reports_dir, PathBuf::from("reportes"));
    }

    #[test]
    fn env_overrides_parse_each_field_type() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DB_MAX_CONNECTIONS", "2"),
            ("BROWSER_DEBUG_PORT", "9222"),
            ("BROWSER_HEADLESS", "false"),
            ("ELEMENT_TIMEOUT_SECS", "45"),
            ("SEARCH_SETTLE_DELAY_MS", "500"),
            ("PAGE_ZOOM_PERCENT", "80"),
            ("CAPTURE_RETENTION_DAYS", "30"),
            ("VERBOSE_LOGGING", "true"),
        ]);
        let config =
            Config::default().with_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_max_connections, 2);
        assert_eq!(config.browser_debug_port, Some(9222));
        assert!(!config.headless);
        assert_eq!(config.element_timeout_secs, 45);
        assert_eq!(config.settle_delay_ms, 500);
        assert_eq!(config.page_zoom_percent, 80);
        assert_eq!(config.capture_retention_days, Some(30));
        assert!(config.verbose_logging);
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            search_url = "http://localhost:8080/"
            max_attempts = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.search_url, "http://localhost:8080/");
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.retry_backoff_secs, 2);
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let config = Config {
            max_attempts: 0,
            ..Config::default()
        };
        assert_eq!(config.search_settings().max_attempts, 1);
    }
}
