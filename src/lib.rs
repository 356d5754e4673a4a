pub mod cars;
pub mod config;
pub mod data;
pub mod errors;
pub mod garage;
pub mod load_worker;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod render;
pub mod session;
pub mod ui;
pub mod utils;


// Re-exports for convenience
pub use cars::{kw_to_hp, CarList};
pub use config::Config;
pub use errors::{ConfigError, Field, LoadError, PreconditionViolation, QuizError, ValidationError};
pub use garage::{handle_garage_input, GarageController};
pub use load_worker::spawn_load_worker;
pub use models::{AppState, CarEntry, CarEntryDraft, CarRecord, FieldSchema, Question, QuizSession};
pub use quiz::{IndexSource, RandomIndices, ScriptedIndices};
pub use render::{RenderInstruction, Renderer};
pub use session::{handle_quiz_input, handle_summary_input, QuizController};
pub use ui::{draw_garage, draw_menu, draw_quit_confirmation, draw_quiz, draw_summary, Screen};
