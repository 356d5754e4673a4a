use crate::errors::{LoadError, QuizError};
use crate::logger;
use crate::models::{
    AdvanceOutcome, AnswerOutcome, AppState, LoadRequest, LoadState, LoadTarget, Question,
    QuizPhase, QuizSession,
};
use crate::quiz::{self, IndexSource, RandomIndices};
use crate::render::{RenderInstruction, Renderer};
use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::ThreadRng;
use std::path::PathBuf;

/// Drives one quiz: owns the question pool, the running session and the
/// answer currently highlighted by the player.
#[derive(Debug)]
pub struct QuizController<S: IndexSource = RandomIndices<ThreadRng>> {
    pub pool: Vec<Question>,
    pub session: QuizSession,
    pub sample_size: usize,
    pub selected: Option<usize>,
    pub load_state: LoadState,
    pub questions_path: PathBuf,
    pub load_tx: Option<Sender<LoadRequest>>,
    indices: S,
}

impl<S: IndexSource> QuizController<S> {
    pub fn new(indices: S, sample_size: usize, questions_path: PathBuf) -> Self {
        Self {
            pool: Vec::new(),
            session: QuizSession::default(),
            sample_size,
            selected: None,
            load_state: LoadState::Idle,
            questions_path,
            load_tx: None,
            indices,
        }
    }

    pub fn with_load_channel(mut self, load_tx: Sender<LoadRequest>) -> Self {
        self.load_tx = Some(load_tx);
        self
    }

    /// Asks the worker for the question pool. Returns false when a load is
    /// already pending or could not be sent.
    pub fn request_load(&mut self, renderer: &mut impl Renderer) -> bool {
        if self.load_state == LoadState::Pending {
            logger::log("Question load already pending, ignoring request");
            return false;
        }

        let sent = self.load_tx.as_ref().is_some_and(|tx| {
            tx.send(LoadRequest::Questions {
                path: self.questions_path.clone(),
            })
            .is_ok()
        });
        if !sent {
            self.fail_load(LoadError::WorkerUnavailable, renderer);
            return false;
        }

        logger::log(&format!(
            "Requested question pool from {}",
            self.questions_path.display()
        ));
        self.load_state = LoadState::Pending;
        renderer.render(RenderInstruction::ShowLoading(LoadTarget::Questions));
        true
    }

    pub fn process_load_response(
        &mut self,
        result: Result<Vec<Question>, LoadError>,
        renderer: &mut impl Renderer,
    ) {
        match result {
            Ok(pool) => {
                logger::log(&format!("Loaded {} questions", pool.len()));
                self.pool = pool;
                self.load_state = LoadState::Loaded;
                renderer.render(RenderInstruction::ShowStart {
                    pool_size: self.pool.len(),
                });
            }
            Err(e) => self.fail_load(e, renderer),
        }
    }

    fn fail_load(&mut self, error: LoadError, renderer: &mut impl Renderer) {
        let message = format!("Could not load questions: {}", error);
        logger::log(&message);
        self.load_state = LoadState::Failed(message.clone());
        renderer.render(RenderInstruction::ShowError(LoadTarget::Questions, message));
    }

    pub fn start(&mut self, renderer: &mut impl Renderer) {
        self.session = quiz::start(&self.pool, self.sample_size, &mut self.indices);
        self.selected = None;
        logger::log(&format!(
            "Quiz started with {} of {} questions",
            self.session.total(),
            self.pool.len()
        ));

        if self.session.is_finished() {
            renderer.render(RenderInstruction::ShowError(
                LoadTarget::Questions,
                "No questions available".to_string(),
            ));
            self.render_result(renderer);
        } else {
            self.render_current_question(renderer);
        }
    }

    pub fn restart(&mut self, renderer: &mut impl Renderer) {
        self.start(renderer);
    }

    pub fn back_to_start(&mut self, renderer: &mut impl Renderer) {
        quiz::reset(&mut self.session);
        self.selected = None;
        renderer.render(RenderInstruction::ShowStart {
            pool_size: self.pool.len(),
        });
    }

    pub fn select(&mut self, option: usize) {
        if let Some(question) = self.session.current_question()
            && option < question.options.len()
            && self.session.phase == QuizPhase::InProgress
        {
            self.selected = Some(option);
        }
    }

    pub fn move_selection(&mut self, forward: bool) {
        let Some(count) = self.session.current_question().map(|q| q.options.len()) else {
            return;
        };
        if count == 0 || self.session.phase != QuizPhase::InProgress {
            return;
        }
        self.selected = Some(match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
    }

    pub fn answer(&mut self, renderer: &mut impl Renderer) -> Result<AnswerOutcome, QuizError> {
        match quiz::submit_answer(&mut self.session, self.selected) {
            Ok(outcome) => {
                let correct_text = self
                    .session
                    .current_question()
                    .map(|q| q.correct_text().to_string())
                    .unwrap_or_default();
                renderer.render(RenderInstruction::ShowFeedback {
                    correct: outcome.is_correct,
                    chosen: self.selected.unwrap_or(outcome.correct_index),
                    correct_index: outcome.correct_index,
                    correct_text,
                });
                Ok(outcome)
            }
            Err(e) => {
                logger::log(&format!("Answer rejected: {}", e));
                renderer.render(RenderInstruction::ShowError(
                    LoadTarget::Questions,
                    e.to_string(),
                ));
                Err(e)
            }
        }
    }

    /// Moves on; returns true once the quiz is finished.
    pub fn next(&mut self, renderer: &mut impl Renderer) -> bool {
        match quiz::advance(&mut self.session) {
            Ok(AdvanceOutcome::Next(_)) => {
                self.selected = None;
                self.render_current_question(renderer);
                false
            }
            Ok(AdvanceOutcome::Done { final_score }) => {
                logger::log(&format!(
                    "Quiz finished with {}/{}",
                    final_score,
                    self.session.total()
                ));
                self.render_result(renderer);
                true
            }
            Err(e) => {
                renderer.render(RenderInstruction::ShowError(
                    LoadTarget::Questions,
                    e.to_string(),
                ));
                false
            }
        }
    }

    fn render_current_question(&self, renderer: &mut impl Renderer) {
        if let Some(question) = self.session.current_question() {
            renderer.render(RenderInstruction::ShowQuestion {
                number: self.session.current_index + 1,
                total: self.session.total(),
                text: question.text.clone(),
                options: question.options.clone(),
            });
        }
    }

    fn render_result(&self, renderer: &mut impl Renderer) {
        renderer.render(RenderInstruction::ShowResult {
            score: self.session.score,
            total: self.session.total(),
            category: quiz::plural_category(self.session.score),
        });
    }
}

pub fn handle_quiz_input<S: IndexSource>(
    controller: &mut QuizController<S>,
    key: KeyEvent,
    app_state: &mut AppState,
    renderer: &mut impl Renderer,
) {
    if key.code == KeyCode::Esc {
        *app_state = AppState::QuizQuitConfirm;
        return;
    }

    match controller.session.phase {
        QuizPhase::NotStarted => match key.code {
            KeyCode::Enter if !controller.pool.is_empty() => {
                controller.start(renderer);
                if controller.session.is_finished() {
                    *app_state = AppState::Summary;
                }
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                controller.request_load(renderer);
            }
            _ => {}
        },
        QuizPhase::InProgress => match key.code {
            KeyCode::Up => controller.move_selection(false),
            KeyCode::Down => controller.move_selection(true),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                if let Some(digit) = c.to_digit(10) {
                    controller.select(digit as usize - 1);
                }
            }
            KeyCode::Enter => {
                let _ = controller.answer(renderer);
            }
            KeyCode::Right => {
                if controller.next(renderer) {
                    *app_state = AppState::Summary;
                }
            }
            _ => {}
        },
        QuizPhase::Answered { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Right) && controller.next(renderer) {
                *app_state = AppState::Summary;
            }
        }
        QuizPhase::Finished => {
            *app_state = AppState::Summary;
        }
    }
}

pub fn handle_summary_input<S: IndexSource>(
    controller: &mut QuizController<S>,
    key: KeyEvent,
    app_state: &mut AppState,
    renderer: &mut impl Renderer,
) {
    match key.code {
        KeyCode::Char('r') => {
            controller.restart(renderer);
            if !controller.session.is_finished() {
                *app_state = AppState::Quiz;
            }
        }
        KeyCode::Char('s') => {
            controller.back_to_start(renderer);
            *app_state = AppState::Quiz;
        }
        KeyCode::Char('m') | KeyCode::Esc => {
            controller.back_to_start(renderer);
            *app_state = AppState::Menu;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{PreconditionViolation, ValidationError};
    use crate::models::PluralCategory;
    use crate::quiz::ScriptedIndices;
    use crossterm::event::KeyModifiers;

    fn pool() -> Vec<Question> {
        vec![
            Question::new("2+2?", &["3", "4"], 1),
            Question::new("Capital of Poland?", &["Warsaw", "Berlin"], 0),
            Question::new("Largest planet?", &["Mars", "Jupiter", "Venus"], 1),
        ]
    }

    fn controller(sample_size: usize) -> QuizController<ScriptedIndices> {
        let mut controller =
            QuizController::new(ScriptedIndices::identity(), sample_size, PathBuf::from("q.json"));
        controller.pool = pool();
        controller
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_start_renders_first_question() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        controller.start(&mut out);

        assert_eq!(
            out,
            vec![RenderInstruction::ShowQuestion {
                number: 1,
                total: 2,
                text: "2+2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
            }]
        );
    }

    #[test]
    fn test_answer_without_selection_renders_error() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        controller.start(&mut out);
        out.clear();

        let result = controller.answer(&mut out);
        assert_eq!(
            result,
            Err(QuizError::Validation(ValidationError::NoSelection))
        );
        assert_eq!(
            out,
            vec![RenderInstruction::ShowError(
                LoadTarget::Questions,
                "no answer selected".to_string()
            )]
        );
        assert_eq!(controller.session.phase, QuizPhase::InProgress);
    }

    #[test]
    fn test_answer_renders_feedback_with_correct_text() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        controller.start(&mut out);
        controller.select(0);
        out.clear();

        let outcome = controller.answer(&mut out).unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(
            out,
            vec![RenderInstruction::ShowFeedback {
                correct: false,
                chosen: 0,
                correct_index: 1,
                correct_text: "4".to_string(),
            }]
        );
    }

    #[test]
    fn test_full_playthrough_renders_result() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        controller.start(&mut out);
        controller.select(1);
        controller.answer(&mut out).unwrap();
        assert!(!controller.next(&mut out));
        assert_eq!(controller.selected, None);
        controller.select(0);
        controller.answer(&mut out).unwrap();
        assert!(controller.next(&mut out));

        assert_eq!(
            out.last(),
            Some(&RenderInstruction::ShowResult {
                score: 2,
                total: 2,
                category: PluralCategory::Few,
            })
        );
    }

    #[test]
    fn test_start_with_empty_pool_reports_and_finishes() {
        let mut controller = controller(5);
        controller.pool.clear();
        let mut out = Vec::new();
        controller.start(&mut out);

        assert!(controller.session.is_finished());
        assert_eq!(
            out,
            vec![
                RenderInstruction::ShowError(
                    LoadTarget::Questions,
                    "No questions available".to_string()
                ),
                RenderInstruction::ShowResult {
                    score: 0,
                    total: 0,
                    category: PluralCategory::ZeroOrMany,
                },
            ]
        );
    }

    #[test]
    fn test_back_to_start_resets_session() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        controller.start(&mut out);
        controller.select(1);
        controller.answer(&mut out).unwrap();

        controller.back_to_start(&mut out);
        assert_eq!(controller.session, QuizSession::default());
        assert_eq!(controller.selected, None);
        assert_eq!(out.last(), Some(&RenderInstruction::ShowStart { pool_size: 3 }));
    }

    #[test]
    fn test_next_before_start_is_rejected() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        assert!(!controller.next(&mut out));
        assert_eq!(
            out,
            vec![RenderInstruction::ShowError(
                LoadTarget::Questions,
                PreconditionViolation::NotStarted.to_string()
            )]
        );
    }

    #[test]
    fn test_move_selection_wraps() {
        let mut controller = controller(1);
        let mut out = Vec::new();
        controller.start(&mut out);

        controller.move_selection(false);
        assert_eq!(controller.selected, Some(1));
        controller.move_selection(true);
        assert_eq!(controller.selected, Some(0));
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let mut controller = controller(1);
        let mut out = Vec::new();
        controller.start(&mut out);
        controller.select(5);
        assert_eq!(controller.selected, None);
    }

    #[test]
    fn test_request_load_is_single_flight() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut controller = controller(2).with_load_channel(tx);
        let mut out = Vec::new();

        assert!(controller.request_load(&mut out));
        assert!(!controller.request_load(&mut out));
        assert_eq!(controller.load_state, LoadState::Pending);
        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(
            out,
            vec![RenderInstruction::ShowLoading(LoadTarget::Questions)]
        );
    }

    #[test]
    fn test_request_load_without_worker_fails_observably() {
        let mut controller = controller(2);
        let mut out = Vec::new();
        assert!(!controller.request_load(&mut out));
        assert!(matches!(controller.load_state, LoadState::Failed(_)));
    }

    #[test]
    fn test_failed_load_keeps_previous_pool() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut controller = controller(2).with_load_channel(tx);
        let mut out = Vec::new();
        controller.request_load(&mut out);

        controller.process_load_response(Err(LoadError::WorkerUnavailable), &mut out);
        assert!(matches!(controller.load_state, LoadState::Failed(_)));
        assert_eq!(controller.pool, pool());

        assert!(controller.request_load(&mut out));
    }

    #[test]
    fn test_successful_load_replaces_pool() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut controller = controller(2).with_load_channel(tx);
        let mut out = Vec::new();
        controller.request_load(&mut out);

        let fresh = vec![Question::new("New?", &["yes", "no"], 0)];
        controller.process_load_response(Ok(fresh.clone()), &mut out);
        assert_eq!(controller.load_state, LoadState::Loaded);
        assert_eq!(controller.pool, fresh);
        assert_eq!(out.last(), Some(&RenderInstruction::ShowStart { pool_size: 1 }));
    }

    #[test]
    fn test_keys_drive_quiz_to_summary() {
        let mut controller = controller(1);
        let mut app_state = AppState::Quiz;
        let mut out = Vec::new();

        handle_quiz_input(&mut controller, key(KeyCode::Enter), &mut app_state, &mut out);
        assert_eq!(controller.session.phase, QuizPhase::InProgress);

        handle_quiz_input(&mut controller, key(KeyCode::Char('2')), &mut app_state, &mut out);
        assert_eq!(controller.selected, Some(1));

        handle_quiz_input(&mut controller, key(KeyCode::Enter), &mut app_state, &mut out);
        assert_eq!(controller.session.score, 1);

        handle_quiz_input(&mut controller, key(KeyCode::Enter), &mut app_state, &mut out);
        assert_eq!(app_state, AppState::Summary);
        assert!(controller.session.is_finished());
    }

    #[test]
    fn test_esc_asks_for_quit_confirmation() {
        let mut controller = controller(1);
        let mut app_state = AppState::Quiz;
        let mut out = Vec::new();
        handle_quiz_input(&mut controller, key(KeyCode::Esc), &mut app_state, &mut out);
        assert_eq!(app_state, AppState::QuizQuitConfirm);
    }

    #[test]
    fn test_summary_restart_starts_new_session() {
        let mut controller = controller(1);
        let mut out = Vec::new();
        controller.start(&mut out);
        controller.next(&mut out);
        let mut app_state = AppState::Summary;

        handle_summary_input(&mut controller, key(KeyCode::Char('r')), &mut app_state, &mut out);
        assert_eq!(app_state, AppState::Quiz);
        assert_eq!(controller.session.phase, QuizPhase::InProgress);
        assert_eq!(controller.session.score, 0);
    }

    #[test]
    fn test_summary_menu_resets_and_leaves() {
        let mut controller = controller(1);
        let mut out = Vec::new();
        controller.start(&mut out);
        let mut app_state = AppState::Summary;

        handle_summary_input(&mut controller, key(KeyCode::Char('m')), &mut app_state, &mut out);
        assert_eq!(app_state, AppState::Menu);
        assert_eq!(controller.session.phase, QuizPhase::NotStarted);
    }
}
