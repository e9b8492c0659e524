pub mod backup;
pub mod loaders;
pub mod query;
pub mod question;
pub mod source;

pub use backup::BackupDataset;
pub use loaders::{load_backup_questions, load_sources};
pub use query::{normalize_topic_filter, SearchQuery, ALL_TOPICS_KEY};
pub use question::{PaperType, QuestionRecord, Topic, BACKUP_SOURCE_TAG, UNRESOLVED_ANSWER};
pub use source::{PaperLink, RawLink, RenderMode, SourceDescriptor};
