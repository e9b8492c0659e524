/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info 级别。
/// 重复初始化会被忽略（测试中多次调用是安全的）。
pub fn init(verbose: bool) {
    let default_level = if verbose {
        "past_paper_search=debug,info"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录刷新开始信息
///
/// # 参数
/// - `sources`: 来源数量
pub fn log_refresh_start(sources: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始刷新题库");
    info!("📊 来源数量: {}", sources);
    info!("{}", "=".repeat(60));
}

/// 记录刷新完成统计
pub fn log_refresh_complete(succeeded: usize, failed: usize, papers: usize, questions: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 刷新完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功来源: {}", succeeded);
    info!("❌ 失败来源: {}", failed);
    info!("📄 处理试卷: {}", papers);
    info!("📝 提取题目: {}", questions);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("加速度是矢量", 3), "加速度...");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
