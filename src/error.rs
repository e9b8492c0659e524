use thiserror::Error;

/// 应用程序错误类型
///
/// 这些错误只在内部流转，`search` / `refresh` 边界上全部被记录并降级处理。
#[derive(Debug, Error)]
pub enum AppError {
    /// 来源抓取错误（网络 / DOM / 渲染）
    #[error("来源抓取错误: {0}")]
    Fetch(#[from] SourceFetchError),
    /// PDF 下载或解析错误
    #[error("PDF错误: {0}")]
    Pdf(#[from] PdfError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 来源抓取错误
#[derive(Debug, Error)]
pub enum SourceFetchError {
    /// 网络请求失败
    #[error("请求 {url} 失败: {source}")]
    RequestFailed {
        url: String,
        source: reqwest::Error,
    },
    /// 返回非成功状态码
    #[error("请求 {url} 返回状态码 {status}")]
    BadStatus { url: String, status: u16 },
    /// 浏览器协议调用失败
    #[error("浏览器操作失败: {source}")]
    BrowserFailed {
        source: chromiumoxide::error::CdpError,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {message}")]
    BrowserConfigFailed { message: String },
    /// 页面脚本返回了无法解析的结果
    #[error("页面脚本结果解析失败: {source}")]
    ScriptResultInvalid { source: serde_json::Error },
    /// 超时
    #[error("抓取 {url} 超时 ({secs} 秒)")]
    Timeout { url: String, secs: u64 },
}

/// PDF 处理错误
#[derive(Debug, Error)]
pub enum PdfError {
    /// 写入本地文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
    /// 读取本地文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// 文本提取失败（文件损坏或格式不支持）
    #[error("文本提取失败 ({path}): {message}")]
    ParseFailed { path: String, message: String },
    /// 文本提取超时
    #[error("文本提取超时 ({path}, {secs} 秒)")]
    Timeout { path: String, secs: u64 },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        source: toml::de::Error,
    },
    /// 文件内容为空
    #[error("文件内容为空: {path}")]
    Empty { path: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// HTTP 客户端构建失败
    #[error("HTTP客户端构建失败: {source}")]
    HttpClientBuildFailed { source: reqwest::Error },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Fetch(SourceFetchError::BrowserFailed { source: err })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Fetch(SourceFetchError::ScriptResultInvalid { source: err })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求失败错误
    pub fn request_failed(url: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Fetch(SourceFetchError::RequestFailed {
            url: url.into(),
            source,
        })
    }

    /// 创建抓取超时错误
    pub fn fetch_timeout(url: impl Into<String>, secs: u64) -> Self {
        AppError::Fetch(SourceFetchError::Timeout {
            url: url.into(),
            secs,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
