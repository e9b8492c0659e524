use crate::error::{AppResult, FileError};
use crate::models::question::{QuestionRecord, BACKUP_SOURCE_TAG};
use crate::models::source::SourceDescriptor;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 来源列表文件结构
///
/// ```toml
/// [[sources]]
/// name = "DBE"
/// base_url = "https://www.education.gov.za/..."
/// render_mode = "static"
/// ```
#[derive(Debug, Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<SourceDescriptor>,
}

/// 备用题库文件结构（`[[questions]]` 数组）
#[derive(Debug, Deserialize)]
struct BackupFile {
    #[serde(default)]
    questions: Vec<QuestionRecord>,
}

/// 读取 TOML 文件内容
async fn read_toml(path: &Path) -> AppResult<String> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
    Ok(content)
}

/// 从 TOML 文件加载来源列表
pub async fn load_sources(path: &Path) -> AppResult<Vec<SourceDescriptor>> {
    let content = read_toml(path).await?;
    let file: SourcesFile = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
        path: path.display().to_string(),
        source,
    })?;

    if file.sources.is_empty() {
        return Err(FileError::Empty {
            path: path.display().to_string(),
        }
        .into());
    }

    tracing::info!("成功加载 {} 个来源: {}", file.sources.len(), path.display());
    Ok(file.sources)
}

/// 从 TOML 文件加载备用题目
///
/// 缺少 `source` 字段的题目标记为 `backup`，题干为空的题目被丢弃。
pub async fn load_backup_questions(path: &Path) -> AppResult<Vec<QuestionRecord>> {
    let content = read_toml(path).await?;
    let file: BackupFile = toml::from_str(&content).map_err(|source| FileError::TomlParseFailed {
        path: path.display().to_string(),
        source,
    })?;

    let questions: Vec<QuestionRecord> = file
        .questions
        .into_iter()
        .filter(|q| !q.question_text.trim().is_empty())
        .map(|mut q| {
            if q.source_tag.is_empty() {
                q.source_tag = BACKUP_SOURCE_TAG.to_string();
            }
            q
        })
        .collect();

    tracing::info!("成功加载 {} 道备用题目", questions.len());
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{PaperType, Topic};
    use crate::models::source::RenderMode;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_sources_accepts_type_alias() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[sources]]
name = "Local"
base_url = "http://localhost/papers/"
type = "dynamic"
"#
        )
        .unwrap();

        let sources = load_sources(file.path()).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].render_mode, RenderMode::Dynamic);
    }

    #[tokio::test]
    async fn test_load_backup_questions_fills_source_tag() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[questions]]
year = 2020
paper = "Physical Sciences P2 (Chemistry)"
question = "Define a Lewis base."
topic = "Chemical Change"
subtopic = "acids and bases"
answer = "An electron pair donor."

[[questions]]
year = 2020
paper = "Physics"
question = "   "
topic = "mechanics"
subtopic = "kinematics"
answer = ""
"#
        )
        .unwrap();

        let questions = load_backup_questions(file.path()).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].paper_type, PaperType::Chemistry);
        assert_eq!(questions[0].topic, Topic::ChemicalChange);
        assert_eq!(questions[0].source_tag, BACKUP_SOURCE_TAG);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = load_sources(Path::new("/definitely/missing.toml")).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::File(FileError::NotFound { .. })
        ));
    }
}
