use serde::Serialize;

use super::schema::{AssessmentStructure, Question, QuestionId, QuestionKind};

const UNTITLED: &str = "Assessment Preview";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub title: String,
    pub sections: Vec<PreviewSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSection {
    pub title: String,
    pub items: Vec<PreviewItem>,
}

/// What the builder's preview pane shows for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum PreviewItem {
    Field {
        question_id: QuestionId,
        kind: QuestionKind,
        label: String,
        required: bool,
        /// Empty for non-choice kinds even if options are stored.
        options: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Conditional {
        question_id: QuestionId,
        description: String,
    },
}

pub fn preview(structure: &AssessmentStructure) -> Preview {
    let title = if structure.title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        structure.title.clone()
    };

    let sections = structure
        .sections
        .iter()
        .map(|section| PreviewSection {
            title: section.title.clone(),
            items: section
                .questions
                .iter()
                .map(|question| preview_item(structure, question))
                .collect(),
        })
        .collect();

    Preview { title, sections }
}

fn preview_item(structure: &AssessmentStructure, question: &Question) -> PreviewItem {
    let dependency = question.conditional.as_ref().and_then(|conditional| {
        structure
            .question(&conditional.question_id)
            .map(|depends_on| (depends_on, conditional))
    });

    if let Some((depends_on, conditional)) = dependency {
        return PreviewItem::Conditional {
            question_id: question.id.clone(),
            description: format!(
                "Question \"{}\" will show if \"{}\" is answered with \"{}\".",
                question.label, depends_on.label, conditional.required_answer
            ),
        };
    }

    let numeric = question.kind == QuestionKind::Numeric;
    PreviewItem::Field {
        question_id: question.id.clone(),
        kind: question.kind,
        label: question.label.clone(),
        required: question.validation.required,
        options: if question.kind.is_choice() {
            question.options.clone()
        } else {
            Vec::new()
        },
        min: question.validation.min.filter(|_| numeric),
        max: question.validation.max.filter(|_| numeric),
    }
}
