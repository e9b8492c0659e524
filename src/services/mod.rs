pub mod classifier;
pub mod pdf_ingestor;
pub mod question_extractor;
pub mod scraper;
pub mod source_registry;

pub use classifier::{classify, classify_paper, classify_topic, extract_answer, TopicMatch};
pub use pdf_ingestor::{DocumentIngestor, PdfIngestor};
pub use question_extractor::{QuestionCandidate, QuestionExtractor};
pub use scraper::{LinkFetcher, ScrapeOutcome, Scraper, WebLinkFetcher};
pub use source_registry::SourceRegistry;
