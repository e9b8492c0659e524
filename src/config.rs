/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时抓取的来源数量
    pub max_concurrent_sources: usize,
    /// 同时下载解析的 PDF 数量
    pub max_concurrent_downloads: usize,
    /// 单次刷新最多处理的试卷数量
    pub max_papers_per_refresh: usize,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 无头浏览器渲染总超时（秒）
    pub render_timeout_secs: u64,
    /// 等待 networkIdle 的超时（秒）
    pub network_idle_timeout_secs: u64,
    /// 单个 PDF 文本提取超时（秒）
    pub pdf_parse_timeout_secs: u64,
    /// 缓存新鲜期（小时）
    pub cache_ttl_hours: i64,
    /// search 返回的最大条数（超过 5 时按 5 处理）
    pub max_results: usize,
    /// 题目之后作为答案上下文的字符数
    pub answer_window_chars: usize,
    /// PDF 下载目录
    pub download_dir: String,
    /// 解析后是否保留下载的 PDF
    pub keep_downloads: bool,
    /// 缓存未命中时是否触发后台刷新
    pub refresh_on_miss: bool,
    /// 浏览器可执行文件路径（为空时由 chromiumoxide 自动查找）
    pub chrome_executable: Option<String>,
    /// 来源列表 TOML 文件（覆盖内置来源）
    pub sources_file: Option<String>,
    /// 备用题库 TOML 文件（覆盖内置备用题库）
    pub backup_dataset_path: Option<String>,
    pub user_agent: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_sources: 4,
            max_concurrent_downloads: 4,
            max_papers_per_refresh: 20,
            request_timeout_secs: 30,
            render_timeout_secs: 45,
            network_idle_timeout_secs: 10,
            pdf_parse_timeout_secs: 60,
            cache_ttl_hours: 24,
            max_results: 5,
            answer_window_chars: 500,
            download_dir: "cache/pdfs".to_string(),
            keep_downloads: false,
            refresh_on_miss: true,
            chrome_executable: None,
            sources_file: None,
            backup_dataset_path: None,
            user_agent: "Mozilla/5.0 (compatible; past-paper-search/0.1)".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_sources: env_parse("MAX_CONCURRENT_SOURCES").unwrap_or(default.max_concurrent_sources),
            max_concurrent_downloads: env_parse("MAX_CONCURRENT_DOWNLOADS").unwrap_or(default.max_concurrent_downloads),
            max_papers_per_refresh: env_parse("MAX_PAPERS_PER_REFRESH").unwrap_or(default.max_papers_per_refresh),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(default.request_timeout_secs),
            render_timeout_secs: env_parse("RENDER_TIMEOUT_SECS").unwrap_or(default.render_timeout_secs),
            network_idle_timeout_secs: env_parse("NETWORK_IDLE_TIMEOUT_SECS").unwrap_or(default.network_idle_timeout_secs),
            pdf_parse_timeout_secs: env_parse("PDF_PARSE_TIMEOUT_SECS").unwrap_or(default.pdf_parse_timeout_secs),
            cache_ttl_hours: env_parse("CACHE_TTL_HOURS").unwrap_or(default.cache_ttl_hours),
            max_results: env_parse("MAX_RESULTS").unwrap_or(default.max_results),
            answer_window_chars: env_parse("ANSWER_WINDOW_CHARS").unwrap_or(default.answer_window_chars),
            download_dir: std::env::var("DOWNLOAD_DIR").unwrap_or(default.download_dir),
            keep_downloads: env_parse("KEEP_DOWNLOADS").unwrap_or(default.keep_downloads),
            refresh_on_miss: env_parse("REFRESH_ON_MISS").unwrap_or(default.refresh_on_miss),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            sources_file: std::env::var("SOURCES_FILE").ok().or(default.sources_file),
            backup_dataset_path: std::env::var("BACKUP_DATASET_PATH").ok().or(default.backup_dataset_path),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|v| v.trim().parse().ok())
}
