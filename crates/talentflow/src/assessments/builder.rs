//! Immutable edits on an [`AssessmentStructure`]. Every operation borrows the
//! current draft and returns a new one, leaving the original untouched.

use std::collections::HashSet;

use super::schema::{
    AssessmentStructure, Conditional, Question, QuestionId, QuestionKind, SchemaError, Section,
    Validation,
};

pub const NEW_SECTION_TITLE: &str = "New Section";
pub const NEW_QUESTION_LABEL: &str = "New Question";

/// A single field change addressed to one question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionEdit {
    Label(String),
    /// Options survive the change so switching back to a choice kind is lossless.
    Kind(QuestionKind),
    Options(Vec<String>),
    AddOption,
    RenameOption { index: usize, value: String },
    RemoveOption(usize),
    Validation(Validation),
    /// `None` (or a blank id) drops the rule, comparison value included.
    DependsOn(Option<QuestionId>),
    RequiredAnswer(String),
}

impl AssessmentStructure {
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.title = title.into();
        next
    }

    /// Back to a blank form.
    pub fn cleared(&self) -> Self {
        Self::blank()
    }

    pub fn add_section(&self) -> Self {
        let mut next = self.clone();
        next.sections.push(Section::new(NEW_SECTION_TITLE));
        next
    }

    pub fn set_section_title(
        &self,
        section: usize,
        title: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let mut next = self.clone();
        next.section_mut(section)?.title = title.into();
        Ok(next)
    }

    /// Splices the section out. Later sections keep their ids; rules that
    /// pointed at removed questions are dropped.
    pub fn remove_section(&self, section: usize) -> Result<Self, SchemaError> {
        let mut next = self.clone();
        next.section_mut(section)?;
        let removed = next.sections.remove(section);
        next.drop_rules_targeting(removed.questions.iter().map(|question| &question.id));
        Ok(next)
    }

    /// Appends a fresh question to `section`, returning the new draft and the
    /// generated question id.
    pub fn add_question(
        &self,
        section: usize,
        kind: QuestionKind,
    ) -> Result<(Self, QuestionId), SchemaError> {
        let mut next = self.clone();
        let question = Question::new(kind, NEW_QUESTION_LABEL);
        let id = question.id.clone();
        next.section_mut(section)?.questions.push(question);
        Ok((next, id))
    }

    pub fn remove_question(&self, section: usize, question: usize) -> Result<Self, SchemaError> {
        let mut next = self.clone();
        next.question_mut(section, question)?;
        let removed = next.sections[section].questions.remove(question);
        next.drop_rules_targeting(std::iter::once(&removed.id));
        Ok(next)
    }

    pub fn edit_question(
        &self,
        section: usize,
        question: usize,
        edit: QuestionEdit,
    ) -> Result<Self, SchemaError> {
        let mut next = self.clone();

        if let QuestionEdit::DependsOn(Some(depends_on)) = &edit {
            if !depends_on.as_str().trim().is_empty() {
                let id = next.question_mut(section, question)?.id.clone();
                let allowed = self
                    .candidate_dependencies(&id)
                    .iter()
                    .any(|candidate| &candidate.id == depends_on);
                if !allowed {
                    return Err(SchemaError::InvalidDependency {
                        question: id,
                        depends_on: depends_on.clone(),
                    });
                }
            }
        }

        let target = next.question_mut(section, question)?;
        match edit {
            QuestionEdit::Label(label) => target.label = label,
            QuestionEdit::Kind(kind) => target.kind = kind,
            QuestionEdit::Options(options) => target.options = options,
            QuestionEdit::AddOption => {
                let label = format!("Option {}", target.options.len() + 1);
                target.options.push(label);
            }
            QuestionEdit::RenameOption { index, value } => {
                if index >= target.options.len() {
                    return Err(SchemaError::OptionOutOfRange {
                        question: target.id.clone(),
                        index,
                    });
                }
                target.options[index] = value;
            }
            QuestionEdit::RemoveOption(index) => {
                if index >= target.options.len() {
                    return Err(SchemaError::OptionOutOfRange {
                        question: target.id.clone(),
                        index,
                    });
                }
                target.options.remove(index);
            }
            QuestionEdit::Validation(validation) => target.validation = validation,
            QuestionEdit::DependsOn(depends_on) => {
                target.conditional = match depends_on {
                    Some(id) if !id.as_str().trim().is_empty() => Some(Conditional {
                        question_id: id,
                        required_answer: target
                            .conditional
                            .take()
                            .map(|conditional| conditional.required_answer)
                            .unwrap_or_default(),
                    }),
                    _ => None,
                };
            }
            QuestionEdit::RequiredAnswer(answer) => match target.conditional.as_mut() {
                Some(conditional) => conditional.required_answer = answer,
                None => return Err(SchemaError::NoDependency(target.id.clone())),
            },
        }

        Ok(next)
    }

    fn section_mut(&mut self, section: usize) -> Result<&mut Section, SchemaError> {
        self.sections
            .get_mut(section)
            .ok_or(SchemaError::SectionOutOfRange(section))
    }

    fn question_mut(
        &mut self,
        section: usize,
        question: usize,
    ) -> Result<&mut Question, SchemaError> {
        self.section_mut(section)?
            .questions
            .get_mut(question)
            .ok_or(SchemaError::QuestionOutOfRange { section, question })
    }

    fn drop_rules_targeting<'a, I>(&mut self, removed: I)
    where
        I: IntoIterator<Item = &'a QuestionId>,
    {
        let removed: HashSet<&QuestionId> = removed.into_iter().collect();
        if removed.is_empty() {
            return;
        }
        for question in self
            .sections
            .iter_mut()
            .flat_map(|section| section.questions.iter_mut())
        {
            if question
                .depends_on()
                .is_some_and(|depends_on| removed.contains(depends_on))
            {
                question.conditional = None;
            }
        }
    }
}
