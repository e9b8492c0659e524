//! 内置备用题库
//!
//! 缓存为空或抓取不到任何题目时使用，保证 search 总能给出结果。

use std::path::Path;

use tracing::{info, warn};

use super::loaders::load_backup_questions;
use super::question::{PaperType, QuestionRecord, Topic, BACKUP_SOURCE_TAG};

/// 备用题库（始终非空）
#[derive(Debug, Clone)]
pub struct BackupDataset {
    records: Vec<QuestionRecord>,
}

impl BackupDataset {
    /// 随程序发布的五道题
    pub fn shipped() -> Self {
        Self {
            records: vec![
                backup_record(
                    2023,
                    PaperType::Physics,
                    "A 2 kg object is subjected to a net force of 10 N. Calculate the acceleration of the object.",
                    Topic::Mechanics,
                    "newton's laws",
                    "Using Newton's Second Law: F = ma\na = F/m = 10 N / 2 kg = 5 m/s²",
                ),
                backup_record(
                    2022,
                    PaperType::Physics,
                    "A circuit has a resistance of 5 Ω and a potential difference of 20 V. Calculate the current flowing through the circuit.",
                    Topic::ElectricityMagnetism,
                    "electric circuits",
                    "Using Ohm's Law: V = IR\nI = V/R = 20 V / 5 Ω = 4 A",
                ),
                backup_record(
                    2023,
                    PaperType::Chemistry,
                    "Calculate the pH of a solution with a hydrogen ion concentration of 1 × 10⁻³ mol·dm⁻³.",
                    Topic::ChemicalChange,
                    "acids and bases",
                    "pH = -log[H⁺]\npH = -log(1 × 10⁻³)\npH = 3",
                ),
                backup_record(
                    2021,
                    PaperType::Chemistry,
                    "Draw the structural formula for propan-1-ol.",
                    Topic::OrganicChemistry,
                    "alcohols",
                    "CH₃CH₂CH₂OH",
                ),
                backup_record(
                    2022,
                    PaperType::Physics,
                    "A car accelerates uniformly from rest to 20 m/s in 5 seconds. Calculate the distance traveled during this time.",
                    Topic::Mechanics,
                    "kinematics",
                    "Using x = ut + ½at²\nWhere u = 0 m/s, t = 5 s, and a = v/t = 20/5 = 4 m/s²\nx = 0(5) + ½(4)(5)² = 50 m",
                ),
            ],
        }
    }

    /// 用指定记录构建备用题库，记录为空时退回内置题库
    pub fn from_records(records: Vec<QuestionRecord>) -> Self {
        if records.is_empty() {
            warn!("⚠️ 备用题库为空，使用内置备用题库");
            return Self::shipped();
        }
        Self { records }
    }

    /// 从 TOML 文件加载备用题库，失败或为空时退回内置题库
    pub async fn load_or_shipped(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::shipped();
        };

        match load_backup_questions(Path::new(path)).await {
            Ok(records) => {
                info!("✓ 已加载备用题库 {} ({} 道题)", path, records.len());
                Self::from_records(records)
            }
            Err(e) => {
                warn!("⚠️ 加载备用题库失败，使用内置备用题库: {}", e);
                Self::shipped()
            }
        }
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for BackupDataset {
    fn default() -> Self {
        Self::shipped()
    }
}

fn backup_record(
    year: i32,
    paper_type: PaperType,
    question: &str,
    topic: Topic,
    subtopic: &str,
    answer: &str,
) -> QuestionRecord {
    QuestionRecord {
        year,
        paper_type,
        question_text: question.to_string(),
        topic,
        subtopic: subtopic.to_string(),
        answer_text: answer.to_string(),
        provenance_url: None,
        source_tag: BACKUP_SOURCE_TAG.to_string(),
    }
}
