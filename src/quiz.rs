use crate::errors::{PreconditionViolation, QuizError, ValidationError};
use crate::models::{AdvanceOutcome, AnswerOutcome, PluralCategory, Question, QuizPhase, QuizSession};
use rand::Rng;

/// Source of the random indices used by the shuffle.
pub trait IndexSource {
    /// Returns an index in `0..=upper`.
    fn next_index(&mut self, upper: usize) -> usize;
}

/// `IndexSource` backed by any `rand` generator.
#[derive(Debug)]
pub struct RandomIndices<R: Rng>(pub R);

impl RandomIndices<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> IndexSource for RandomIndices<R> {
    fn next_index(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..=upper)
    }
}

/// Replays a fixed list of indices, clamped to the requested bound.
/// Once the script runs out every draw returns `upper`, which leaves
/// the element in place.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIndices {
    script: Vec<usize>,
    position: usize,
}

impl ScriptedIndices {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            position: 0,
        }
    }

    /// A source that never moves anything.
    pub fn identity() -> Self {
        Self::default()
    }
}

impl IndexSource for ScriptedIndices {
    fn next_index(&mut self, upper: usize) -> usize {
        let value = self.script.get(self.position).copied().unwrap_or(upper);
        self.position += 1;
        value.min(upper)
    }
}

pub fn shuffle<T>(items: &mut [T], indices: &mut impl IndexSource) {
    for i in (1..items.len()).rev() {
        let j = indices.next_index(i);
        items.swap(i, j);
    }
}

/// Starts a session with `min(sample_size, pool.len())` questions drawn
/// without replacement. An empty selection is finished on arrival.
pub fn start(pool: &[Question], sample_size: usize, indices: &mut impl IndexSource) -> QuizSession {
    let mut questions = pool.to_vec();
    shuffle(&mut questions, indices);
    questions.truncate(sample_size.min(pool.len()));

    let phase = if questions.is_empty() {
        QuizPhase::Finished
    } else {
        QuizPhase::InProgress
    };

    QuizSession {
        questions,
        current_index: 0,
        score: 0,
        phase,
    }
}

pub fn submit_answer(
    session: &mut QuizSession,
    chosen: Option<usize>,
) -> Result<AnswerOutcome, QuizError> {
    match session.phase {
        QuizPhase::NotStarted => return Err(PreconditionViolation::NotStarted.into()),
        QuizPhase::Finished => return Err(PreconditionViolation::AlreadyFinished.into()),
        QuizPhase::Answered { .. } => return Err(PreconditionViolation::AlreadyAnswered.into()),
        QuizPhase::InProgress => {}
    }

    let question = session
        .questions
        .get(session.current_index)
        .ok_or(PreconditionViolation::AlreadyFinished)?;
    let chosen = chosen.ok_or(ValidationError::NoSelection)?;
    if chosen >= question.options.len() {
        return Err(ValidationError::OptionOutOfRange {
            chosen,
            available: question.options.len(),
        }
        .into());
    }

    let is_correct = chosen == question.correct_option_index;
    let correct_index = question.correct_option_index;
    if is_correct {
        session.score += 1;
    }
    session.phase = QuizPhase::Answered {
        chosen,
        correct: is_correct,
    };

    Ok(AnswerOutcome {
        is_correct,
        correct_index,
    })
}

pub fn advance(session: &mut QuizSession) -> Result<AdvanceOutcome, PreconditionViolation> {
    match session.phase {
        QuizPhase::NotStarted => Err(PreconditionViolation::NotStarted),
        QuizPhase::Finished => Ok(AdvanceOutcome::Done {
            final_score: session.score,
        }),
        QuizPhase::InProgress | QuizPhase::Answered { .. } => {
            if session.current_index + 1 < session.questions.len() {
                session.current_index += 1;
                session.phase = QuizPhase::InProgress;
                Ok(AdvanceOutcome::Next(
                    session.questions[session.current_index].clone(),
                ))
            } else {
                session.current_index = session.questions.len();
                session.phase = QuizPhase::Finished;
                Ok(AdvanceOutcome::Done {
                    final_score: session.score,
                })
            }
        }
    }
}

pub fn reset(session: &mut QuizSession) {
    *session = QuizSession::default();
}

pub fn plural_category(score: usize) -> PluralCategory {
    match score {
        1 => PluralCategory::One,
        2..=4 => PluralCategory::Few,
        _ => PluralCategory::ZeroOrMany,
    }
}
