pub mod http_fetcher;
pub mod js_executor;

pub use http_fetcher::HttpFetcher;
pub use js_executor::JsExecutor;
