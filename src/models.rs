use crate::errors::{Field, LoadError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One multiple-choice question as stored in `questions.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(rename = "answers")]
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_option_index: usize,
}

impl Question {
    pub fn new(text: &str, options: &[&str], correct_option_index: usize) -> Self {
        Self {
            text: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_option_index,
        }
    }

    pub fn correct_text(&self) -> &str {
        self.options
            .get(self.correct_option_index)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    InProgress,
    Answered {
        chosen: usize,
        correct: bool,
    },
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizSession {
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub score: usize,
    pub phase: QuizPhase,
}

impl QuizSession {
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::InProgress | QuizPhase::Answered { .. } => {
                self.questions.get(self.current_index)
            }
            QuizPhase::NotStarted | QuizPhase::Finished => None,
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Next(Question),
    Done { final_score: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    ZeroOrMany,
    One,
    Few,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CarId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct CarEntry {
    pub id: CarId,
    pub brand: Option<String>,
    pub model: String,
    pub year: Option<i32>,
    pub power_kw: f64,
    pub power_hp: u32,
}

/// Raw form input. Every field is text exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarEntryDraft {
    pub brand: String,
    pub model: String,
    pub year: String,
    pub power_kw: String,
}

/// A trusted record from `cars.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(alias = "name")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "powerKW")]
    pub power_kw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    Brand,
    Model,
    Name,
    Year,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub criterion: SortCriterion,
    pub direction: SortDirection,
}

/// Which car form fields are required and how the model field is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub require_brand: bool,
    pub require_year: bool,
    pub model_field: Field,
    pub year_from: i32,
    pub year_to: i32,
}

impl FieldSchema {
    /// Brand, model, year and power, as in the full garage form.
    pub const FULL: FieldSchema = FieldSchema {
        require_brand: true,
        require_year: true,
        model_field: Field::Model,
        year_from: 1950,
        year_to: 2024,
    };

    /// Only name and power.
    pub const SIMPLE: FieldSchema = FieldSchema {
        require_brand: false,
        require_year: false,
        model_field: Field::Name,
        year_from: 1950,
        year_to: 2024,
    };
}

impl Default for FieldSchema {
    fn default() -> Self {
        FieldSchema::FULL
    }
}

/// Data set a load, or an error reported next to it, belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTarget {
    Questions,
    Cars,
}

#[derive(Debug)]
pub enum LoadRequest {
    Questions { path: PathBuf },
    Cars { path: PathBuf },
}

#[derive(Debug)]
pub enum LoadResponse {
    Questions(Result<Vec<Question>, LoadError>),
    Cars(Result<Vec<CarRecord>, LoadError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Quiz,
    QuizQuitConfirm,
    Summary,
    Garage,
}
