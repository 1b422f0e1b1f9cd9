use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::jobs::JobId;

pub const BLANK_TITLE: &str = "New Assessment";

/// Identifier wrapper for sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn generate() -> Self {
        Self(format!("s-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Question identifiers are unique across the whole assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn generate() -> Self {
        Self(format!("q-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    ShortText,
    LongText,
    SingleChoice,
    MultiChoice,
    Numeric,
}

impl QuestionKind {
    pub const fn is_choice(self) -> bool {
        matches!(self, QuestionKind::SingleChoice | QuestionKind::MultiChoice)
    }

    pub const fn label(self) -> &'static str {
        match self {
            QuestionKind::ShortText => "Short Text",
            QuestionKind::LongText => "Long Text",
            QuestionKind::SingleChoice => "Single Choice",
            QuestionKind::MultiChoice => "Multiple Choice",
            QuestionKind::Numeric => "Numeric",
        }
    }
}

/// Bounds only apply to numeric questions. An absent bound is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Validation {
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Validation {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }
}

/// Show the owning question only when `question_id` was answered with
/// exactly `required_answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditional {
    #[serde(alias = "questionId")]
    pub question_id: QuestionId,
    #[serde(default, alias = "requiredAnswer")]
    pub required_answer: String,
}

/// A question as stored. Older records without `validation` or `conditional`
/// are migrated on load, so both are always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawQuestion")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub label: String,
    /// Kept across type changes; only choice kinds render them.
    pub options: Vec<String>,
    pub validation: Validation,
    pub conditional: Option<Conditional>,
}

impl Question {
    pub fn new(kind: QuestionKind, label: impl Into<String>) -> Self {
        Self {
            id: QuestionId::generate(),
            kind,
            label: label.into(),
            options: if kind.is_choice() {
                vec!["Option 1".to_string()]
            } else {
                Vec::new()
            },
            validation: Validation::default(),
            conditional: None,
        }
    }

    pub fn depends_on(&self) -> Option<&QuestionId> {
        self.conditional
            .as_ref()
            .map(|conditional| &conditional.question_id)
    }
}

#[derive(Deserialize)]
struct RawQuestion {
    id: QuestionId,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default)]
    label: String,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    validation: Option<Validation>,
    /// Pre-validation records stored the flag at the top level.
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    conditional: Option<RawConditional>,
}

#[derive(Deserialize)]
struct RawConditional {
    #[serde(default, alias = "questionId")]
    question_id: Option<String>,
    #[serde(default, alias = "requiredAnswer")]
    required_answer: Option<String>,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        let validation = match (raw.validation, raw.required) {
            (Some(validation), _) => validation,
            (None, Some(required)) => Validation {
                required,
                ..Validation::default()
            },
            (None, None) => Validation::default(),
        };

        let conditional = raw.conditional.and_then(|conditional| {
            let question_id = conditional.question_id.filter(|id| !id.trim().is_empty())?;
            Some(Conditional {
                question_id: QuestionId(question_id),
                required_answer: conditional.required_answer.unwrap_or_default(),
            })
        });

        Self {
            id: raw.id,
            kind: raw.kind,
            label: raw.label,
            options: raw.options.unwrap_or_default(),
            validation,
            conditional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SectionId::generate(),
            title: title.into(),
            questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentStructure {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Default for AssessmentStructure {
    fn default() -> Self {
        Self::blank()
    }
}

impl AssessmentStructure {
    pub fn blank() -> Self {
        Self {
            title: BLANK_TITLE.to_string(),
            sections: Vec::new(),
        }
    }

    /// Section-major concatenation of every question.
    pub fn flattened(&self) -> impl Iterator<Item = &Question> + '_ {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.flattened().find(|question| &question.id == id)
    }

    /// Questions strictly before `id` in flattened order, i.e. the only
    /// legal dependency targets for it. Empty when `id` is unknown.
    pub fn candidate_dependencies(&self, id: &QuestionId) -> Vec<&Question> {
        let flattened: Vec<&Question> = self.flattened().collect();
        match flattened.iter().position(|question| &question.id == id) {
            Some(index) => flattened[..index].to_vec(),
            None => Vec::new(),
        }
    }

    /// Structural checks run before a structure may be persisted.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(&section.id) {
                return Err(SchemaError::DuplicateSection(section.id.clone()));
            }
        }

        let mut earlier: HashSet<&QuestionId> = HashSet::new();
        for question in self.flattened() {
            if earlier.contains(&question.id) {
                return Err(SchemaError::DuplicateQuestion(question.id.clone()));
            }
            if let Some(depends_on) = question.depends_on() {
                if !earlier.contains(depends_on) {
                    return Err(SchemaError::InvalidDependency {
                        question: question.id.clone(),
                        depends_on: depends_on.clone(),
                    });
                }
            }
            if question.kind.is_choice() && question.options.is_empty() {
                return Err(SchemaError::MissingOptions(question.id.clone()));
            }
            if let (Some(min), Some(max)) = (question.validation.min, question.validation.max) {
                if question.kind == QuestionKind::Numeric && min > max {
                    return Err(SchemaError::InvertedRange(question.id.clone()));
                }
            }
            earlier.insert(&question.id);
        }

        Ok(())
    }
}

/// Stored assessment, keyed 1:1 by job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub job_id: JobId,
    pub structure: AssessmentStructure,
}

impl Assessment {
    pub fn blank(job_id: JobId) -> Self {
        Self {
            job_id,
            structure: AssessmentStructure::blank(),
        }
    }
}

/// Rejected structure edit or save.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("section {0} does not exist")]
    SectionOutOfRange(usize),
    #[error("question {question} does not exist in section {section}")]
    QuestionOutOfRange { section: usize, question: usize },
    #[error("option {index} does not exist on question '{question}'")]
    OptionOutOfRange { question: QuestionId, index: usize },
    #[error("question '{0}' has no dependency to compare against")]
    NoDependency(QuestionId),
    #[error("question '{question}' depends on '{depends_on}', which does not precede it")]
    InvalidDependency {
        question: QuestionId,
        depends_on: QuestionId,
    },
    #[error("section id '{0}' is used more than once")]
    DuplicateSection(SectionId),
    #[error("question id '{0}' is used more than once")]
    DuplicateQuestion(QuestionId),
    #[error("choice question '{0}' needs at least one option")]
    MissingOptions(QuestionId),
    #[error("question '{0}' has a minimum above its maximum")]
    InvertedRange(QuestionId),
}
