use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器自动化错误
    #[error("浏览器错误: {0}")]
    Automation(#[from] AutomationError),
    /// 数据库错误
    #[error("数据库错误: {0}")]
    Store(#[from] StoreError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 浏览器自动化错误
///
/// 除 `SessionLost` 外，都属于可重试的页面错误
#[derive(Debug, Error)]
pub enum AutomationError {
    /// 页面元素不存在
    #[error("未找到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 元素存在但无法操作
    #[error("元素不可交互: {selector}")]
    NotInteractable { selector: String },
    /// 等待超时
    #[error("等待超时 ({what}, {secs} 秒)")]
    Timeout { what: String, secs: u64 },
    /// 导航失败
    #[error("导航到 {url} 失败: {reason}")]
    NavigationFailed { url: String, reason: String },
    /// 浏览器连接已断开
    #[error("浏览器会话已断开: {0}")]
    SessionLost(String),
    /// 启动或连接浏览器失败
    #[error("浏览器启动失败: {0}")]
    LaunchFailed(String),
    /// 脚本执行或驱动错误
    #[error("驱动错误: {0}")]
    Driver(String),
}

impl AutomationError {
    /// 浏览器会话是否已不可用（此类错误不再重试）
    pub fn is_session_lost(&self) -> bool {
        matches!(self, AutomationError::SessionLost(_))
    }

    /// 是否为"元素不存在"类错误（可选字段填写时忽略此类错误）
    pub fn is_missing_element(&self) -> bool {
        matches!(self, AutomationError::ElementNotFound { .. })
    }

    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AutomationError::ElementNotFound {
            selector: selector.into(),
        }
    }
}

/// 数据库错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// sqlx 返回的错误
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    /// 行数据映射失败
    #[error("行数据无法映射 ({table}): {reason}")]
    RowMapping { table: String, reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {reason}")]
    WriteFailed { path: String, reason: String },
    /// 其他 IO 错误
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Excel 生成失败
    #[error("Excel 生成失败: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    /// JSON 序列化失败
    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// 结果记录校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("subject_id 必须为正数 (当前: {0})")]
    NonPositiveSubjectId(i64),
    #[error("姓名不能为空")]
    BlankName,
    #[error("状态不能为空")]
    BlankStatus,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从第三方错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AutomationError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        use chromiumoxide::error::CdpError;
        match err {
            CdpError::Timeout => AutomationError::Timeout {
                what: "CDP 响应".to_string(),
                secs: 0,
            },
            CdpError::NotFound => AutomationError::element_not_found("<cdp>"),
            CdpError::Ws(e) => AutomationError::SessionLost(e.to_string()),
            // 浏览器进程或事件处理任务已退出
            CdpError::ChannelSendError(e) => AutomationError::SessionLost(e.to_string()),
            CdpError::NoResponse => AutomationError::SessionLost(CdpError::NoResponse.to_string()),
            other => AutomationError::Driver(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AutomationError {
    fn from(err: serde_json::Error) -> Self {
        AutomationError::Driver(format!("脚本返回值解析失败: {}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Store(StoreError::Database(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::Io(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 数据库操作结果类型
pub type StoreResult<T> = Result<T, StoreError>;

/// 浏览器操作结果类型
pub type AutomationResult<T> = Result<T, AutomationError>;
