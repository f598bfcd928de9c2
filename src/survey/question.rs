//! Question records and the immutable question set

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::SurveyError;

/// Question identifier (unique within a set)
pub type QuestionId = u32;

/// Bundled question configuration
const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.json");

/// How a question is answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    MultipleChoice,
    Text,
    /// Star rating, answered with the star count as a string
    Rating,
    /// Any type tag this build doesn't know about
    Other(String),
}

impl From<String> for QuestionKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "multiple-choice" | "mcq" => QuestionKind::MultipleChoice,
            "text" => QuestionKind::Text,
            "rating" => QuestionKind::Rating,
            _ => QuestionKind::Other(tag),
        }
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice => "multiple-choice".to_string(),
            QuestionKind::Text => "text".to_string(),
            QuestionKind::Rating => "rating".to_string(),
            QuestionKind::Other(tag) => tag,
        }
    }
}

impl QuestionKind {
    /// Label shown on the responses screen
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::Text => "Text Response",
            QuestionKind::Rating => "Rating",
            QuestionKind::Other(_) => "Response",
        }
    }
}

/// Explicit point values attached to a question
/// (whole numbers in practice; fractions are rounded when scoring)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Points {
    /// Same award whatever the answer
    Flat(f64),
    /// Award keyed by option text
    ByAnswer(BTreeMap<String, f64>),
}

/// A single survey question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    /// Choices, in display order (multiple-choice only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Points>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_per_star: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stars: Option<u32>,
}

impl Question {
    /// Letter badge for the option at `index` (A, B, C, ...)
    pub fn option_letter(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }

    /// Star count for rating questions
    pub fn star_count(&self) -> u32 {
        self.max_stars.unwrap_or(5).max(1)
    }
}

/// Ordered, validated, read-only question sequence
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validate ids and wrap the questions
    pub fn new(questions: Vec<Question>) -> Result<Self, SurveyError> {
        if questions.is_empty() {
            return Err(SurveyError::Empty);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id) {
                return Err(SurveyError::DuplicateQuestionId(q.id));
            }
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of questions
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The question set shipped with the app
    pub fn builtin() -> Result<Self, SurveyError> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a constructed set
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }
}
