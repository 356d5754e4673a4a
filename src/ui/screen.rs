use crate::models::{CarEntry, LoadTarget, PluralCategory};
use crate::render::{RenderInstruction, Renderer};

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackView {
    pub correct: bool,
    pub chosen: usize,
    pub correct_index: usize,
    pub correct_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultView {
    pub score: usize,
    pub total: usize,
    pub category: PluralCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// Terminal-side state built from render instructions; the draw functions
/// read only from here.
#[derive(Debug, Default)]
pub struct Screen {
    pub pool_size: usize,
    pub question: Option<QuestionView>,
    pub feedback: Option<FeedbackView>,
    pub result: Option<ResultView>,
    pub cars: Vec<CarEntry>,
    questions: TargetStatus,
    cars_status: TargetStatus,
}

impl Screen {
    pub fn status(&self, target: LoadTarget) -> &TargetStatus {
        match target {
            LoadTarget::Questions => &self.questions,
            LoadTarget::Cars => &self.cars_status,
        }
    }

    fn status_mut(&mut self, target: LoadTarget) -> &mut TargetStatus {
        match target {
            LoadTarget::Questions => &mut self.questions,
            LoadTarget::Cars => &mut self.cars_status,
        }
    }

    pub fn is_loading(&self, target: LoadTarget) -> bool {
        self.status(target).loading
    }

    pub fn error(&self, target: LoadTarget) -> Option<&str> {
        self.status(target).error.as_deref()
    }
}

impl Renderer for Screen {
    fn render(&mut self, instruction: RenderInstruction) {
        match instruction {
            RenderInstruction::ShowStart { pool_size } => {
                self.pool_size = pool_size;
                self.question = None;
                self.feedback = None;
                self.result = None;
                self.questions = TargetStatus::default();
            }
            RenderInstruction::ShowQuestion {
                number,
                total,
                text,
                options,
            } => {
                self.question = Some(QuestionView {
                    number,
                    total,
                    text,
                    options,
                });
                self.feedback = None;
                self.result = None;
                self.questions.error = None;
            }
            RenderInstruction::ShowFeedback {
                correct,
                chosen,
                correct_index,
                correct_text,
            } => {
                self.feedback = Some(FeedbackView {
                    correct,
                    chosen,
                    correct_index,
                    correct_text,
                });
                self.questions.error = None;
            }
            RenderInstruction::ShowResult {
                score,
                total,
                category,
            } => {
                self.result = Some(ResultView {
                    score,
                    total,
                    category,
                });
                self.question = None;
                self.feedback = None;
            }
            RenderInstruction::ShowCars(cars) => {
                self.cars = cars;
                self.cars_status = TargetStatus::default();
            }
            RenderInstruction::ShowLoading(target) => {
                *self.status_mut(target) = TargetStatus {
                    loading: true,
                    error: None,
                };
            }
            RenderInstruction::ShowError(target, message) => {
                *self.status_mut(target) = TargetStatus {
                    loading: false,
                    error: Some(message),
                };
            }
        }
    }
}
