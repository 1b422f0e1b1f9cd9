use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::schema::{AssessmentStructure, Question, QuestionId, QuestionKind};

/// A respondent's raw value for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Number(f64),
    Choices(Vec<String>),
}

impl Answer {
    fn is_blank(&self) -> bool {
        match self {
            Answer::Text(text) => text.trim().is_empty(),
            Answer::Number(_) => false,
            Answer::Choices(choices) => choices.is_empty(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        let value = match self {
            Answer::Text(text) => text.trim().parse::<f64>().ok(),
            Answer::Number(value) => Some(*value),
            Answer::Choices(_) => None,
        };
        value.filter(|value| value.is_finite())
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Text(value.to_string())
    }
}

/// Answers keyed by question id.
pub type AnswerSet = BTreeMap<QuestionId, Answer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    MissingRequired,
    OutOfRange,
    NotANumber,
}

impl FailureReason {
    pub const fn message(self) -> &'static str {
        match self {
            FailureReason::MissingRequired => "an answer is required",
            FailureReason::OutOfRange => "the number is outside the allowed range",
            FailureReason::NotANumber => "the answer is not a number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(FailureReason),
}

impl ValidationResult {
    pub fn is_valid(self) -> bool {
        self == ValidationResult::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFailure {
    pub question_id: QuestionId,
    pub reason: FailureReason,
}

/// Visible when the question has no rule, otherwise only when the dependency
/// holds exactly the required text. No coercion, no membership test for
/// multi-choice answers, and an unanswered dependency never matches.
pub fn is_visible(question: &Question, answers: &AnswerSet) -> bool {
    match &question.conditional {
        None => true,
        Some(conditional) => matches!(
            answers.get(&conditional.question_id),
            Some(Answer::Text(answer)) if *answer == conditional.required_answer
        ),
    }
}

/// Checks the question's own constraints. Hidden questions are always valid.
pub fn validate(question: &Question, answers: &AnswerSet) -> ValidationResult {
    if !is_visible(question, answers) {
        return ValidationResult::Valid;
    }
    check_constraints(question, answers.get(&question.id))
}

fn check_constraints(question: &Question, answer: Option<&Answer>) -> ValidationResult {
    let answer = answer.filter(|answer| !answer.is_blank());

    let Some(answer) = answer else {
        return if question.validation.required {
            ValidationResult::Invalid(FailureReason::MissingRequired)
        } else {
            ValidationResult::Valid
        };
    };

    if question.kind != QuestionKind::Numeric {
        return ValidationResult::Valid;
    }

    let Some(value) = answer.as_number() else {
        return ValidationResult::Invalid(FailureReason::NotANumber);
    };
    let below = question.validation.min.is_some_and(|min| value < min);
    let above = question.validation.max.is_some_and(|max| value > max);
    if below || above {
        ValidationResult::Invalid(FailureReason::OutOfRange)
    } else {
        ValidationResult::Valid
    }
}

/// Per-question result of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutcome<'a> {
    pub question: &'a Question,
    pub visible: bool,
    pub result: ValidationResult,
}

/// Single forward pass over the flattened questions. A question is visible
/// only if its dependency was already seen and visible and the answer
/// matches; a forward, self, or unknown reference leaves it hidden.
pub fn evaluate<'a>(
    structure: &'a AssessmentStructure,
    answers: &AnswerSet,
) -> Vec<QuestionOutcome<'a>> {
    let mut shown: HashSet<&QuestionId> = HashSet::new();
    let mut outcomes = Vec::new();

    for question in structure.flattened() {
        let visible = match question.depends_on() {
            None => true,
            Some(depends_on) => shown.contains(depends_on) && is_visible(question, answers),
        };

        let result = if visible {
            shown.insert(&question.id);
            check_constraints(question, answers.get(&question.id))
        } else {
            ValidationResult::Valid
        };

        outcomes.push(QuestionOutcome {
            question,
            visible,
            result,
        });
    }

    outcomes
}

pub fn visible_questions<'a>(
    structure: &'a AssessmentStructure,
    answers: &AnswerSet,
) -> Vec<&'a Question> {
    evaluate(structure, answers)
        .into_iter()
        .filter(|outcome| outcome.visible)
        .map(|outcome| outcome.question)
        .collect()
}

/// Every failing visible question, in flattened order.
pub fn failures(structure: &AssessmentStructure, answers: &AnswerSet) -> Vec<QuestionFailure> {
    evaluate(structure, answers)
        .into_iter()
        .filter_map(|outcome| match outcome.result {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(QuestionFailure {
                question_id: outcome.question.id.clone(),
                reason,
            }),
        })
        .collect()
}
