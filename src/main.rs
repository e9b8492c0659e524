use anyhow::Result;
use past_paper_search::utils::logging;
use past_paper_search::{Config, PastPaperSearch};

const USAGE: &str = "用法:
  past-paper-search search <query> [topic]
  past-paper-search refresh [topic]";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str);

    match command {
        Some("search") if args.len() >= 2 => {
            let app = PastPaperSearch::from_config(&config).await?;
            let topic = args.get(2).map(String::as_str).unwrap_or("");
            let results = app.search(&args[1], topic);
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Some("refresh") => {
            let app = PastPaperSearch::from_config(&config).await?;
            let topic = args.get(1).map(String::as_str).unwrap_or("");
            let count = app.refresh(topic).await;
            println!("已缓存 {} 道题", count);
        }
        _ => println!("{}", USAGE),
    }

    Ok(())
}
