use crate::models::{CarEntry, LoadTarget, PluralCategory};
use crate::quiz::plural_category;

/// What the adapters ask a front end to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    ShowStart {
        pool_size: usize,
    },
    ShowQuestion {
        number: usize,
        total: usize,
        text: String,
        options: Vec<String>,
    },
    ShowFeedback {
        correct: bool,
        chosen: usize,
        correct_index: usize,
        correct_text: String,
    },
    ShowResult {
        score: usize,
        total: usize,
        category: PluralCategory,
    },
    ShowCars(Vec<CarEntry>),
    ShowLoading(LoadTarget),
    ShowError(LoadTarget, String),
}

pub trait Renderer {
    fn render(&mut self, instruction: RenderInstruction);
}

/// Records instructions in order.
impl Renderer for Vec<RenderInstruction> {
    fn render(&mut self, instruction: RenderInstruction) {
        self.push(instruction);
    }
}

pub fn question_noun(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::One => "pytanie",
        PluralCategory::Few => "pytania",
        PluralCategory::ZeroOrMany => "pytań",
    }
}

pub fn result_message(score: usize, total: usize) -> String {
    format!(
        "Poprawnie odpowiedziano na {} {} z {}.",
        score,
        question_noun(plural_category(score)),
        total
    )
}
