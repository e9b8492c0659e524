pub mod toml_loader;

pub use toml_loader::{load_backup_questions, load_sources};
