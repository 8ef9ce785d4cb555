use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::error::QuizError;
use crate::session::history::HistoryRecord;
use crate::session::question::Question;
use crate::session::quiz::{AnswerFeedback, QuizSession, QuizSummary, QuizType, SessionPhase};
use crate::session::stats::{IdentityMode, StatsRecorder, WordKey};
use crate::session::timer::AdvanceTimer;
use crate::store::WordStore;
use crate::vocab::Word;

pub const DEFAULT_ANSWER_DELAY: Duration = Duration::from_millis(1000);

/// What happened when a session moved past an answered question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    Finished(QuizSummary),
}

/// Drives quiz sessions against an injected store.
///
/// Sessions are plain values held by the caller. The engine owns the pieces
/// that outlive a single session: the store, the id counter, and the pending
/// advance timer, which is keyed by session id so a replaced session can
/// never be advanced by a stale timer.
pub struct SessionEngine<S: WordStore> {
    store: S,
    identity: IdentityMode,
    answer_delay: Duration,
    next_session_id: u64,
    timer: AdvanceTimer,
}

impl<S: WordStore> SessionEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            identity: IdentityMode::default(),
            answer_delay: DEFAULT_ANSWER_DELAY,
            next_session_id: 1,
            timer: AdvanceTimer::default(),
        }
    }

    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = delay;
        self
    }

    pub fn with_identity(mut self, identity: IdentityMode) -> Self {
        self.identity = identity;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn identity(&self) -> IdentityMode {
        self.identity
    }

    /// Time left before the pending advance fires, if any.
    pub fn pending_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn cancel_pending(&mut self) {
        self.timer.cancel();
    }

    /// Begin a quiz over `words` in the given order.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        quiz_type: QuizType,
        words: Vec<Word>,
        rng: &mut R,
    ) -> Result<QuizSession, QuizError> {
        if words.is_empty() {
            return Err(QuizError::EmptySession);
        }
        self.timer.cancel();

        let id = self.next_session_id;
        self.next_session_id += 1;

        let mut session = QuizSession::new(id, quiz_type, words);
        self.present(&mut session, rng);
        info!(
            session = id,
            quiz_type = quiz_type.label(),
            questions = session.total(),
            "Quiz started"
        );
        Ok(session)
    }

    /// Draw `count` words from `pool` without replacement, in random order,
    /// and start a quiz over them.
    pub fn start_from_pool<R: Rng + ?Sized>(
        &mut self,
        quiz_type: QuizType,
        pool: &[Word],
        count: usize,
        rng: &mut R,
    ) -> Result<QuizSession, QuizError> {
        if pool.is_empty() {
            return Err(QuizError::EmptyPool);
        }
        let mut sample = pool.to_vec();
        sample.shuffle(rng);
        sample.truncate(count);
        self.start(quiz_type, sample, rng)
    }

    /// Restart with the missed words of a finished session, shuffled.
    pub fn retry<R: Rng + ?Sized>(
        &mut self,
        finished: &QuizSession,
        rng: &mut R,
    ) -> Result<QuizSession, QuizError> {
        if finished.wrong_list.is_empty() {
            return Err(QuizError::NothingToRetry);
        }
        let mut words = finished.wrong_list.clone();
        words.shuffle(rng);
        self.start(finished.quiz_type, words, rng)
    }

    /// Accept one answer for the current question. Returns `None` when the
    /// session is not running or an answer is already being shown.
    pub fn answer(
        &mut self,
        session: &mut QuizSession,
        selected: &str,
        now: Instant,
    ) -> Option<AnswerFeedback> {
        if !session.is_running() || session.answering {
            return None;
        }
        let question = session.question.as_ref()?;
        let word = question.word.clone();
        let correct_answer = question.correct_answer.clone();
        let is_correct = question.is_correct(selected);
        session.answering = true;

        let key = WordKey::for_word(&word, self.identity);
        if let Err(e) = StatsRecorder::new(&self.store).record_answer(key, is_correct) {
            warn!(error = %e, en = %word.en, "Failed to persist word stats");
        }
        session.tally(&word, is_correct);

        debug!(
            session = session.id,
            index = session.current_index,
            en = %word.en,
            is_correct,
            "Answer recorded"
        );

        let feedback = AnswerFeedback {
            selected: selected.to_string(),
            correct_answer,
            is_correct,
        };
        session.feedback = Some(feedback.clone());
        self.timer.schedule(session.id, now, self.answer_delay);
        Some(feedback)
    }

    /// Apply the scheduled advance if it is due and belongs to `session`.
    pub fn poll<R: Rng + ?Sized>(
        &mut self,
        session: &mut QuizSession,
        now: Instant,
        rng: &mut R,
    ) -> Option<Advance> {
        if self.timer.take_due(session.id, now) {
            self.advance(session, rng)
        } else {
            None
        }
    }

    /// Move past the answered question right away. No-op unless an answer is
    /// being shown.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        session: &mut QuizSession,
        rng: &mut R,
    ) -> Option<Advance> {
        if !session.is_running() || !session.answering {
            return None;
        }
        if self.timer.is_pending_for(session.id) {
            self.timer.cancel();
        }

        session.current_index += 1;
        if session.current_index < session.words.len() {
            self.present(session, rng);
            Some(Advance::Next)
        } else {
            Some(Advance::Finished(self.finish(session)))
        }
    }

    fn present<R: Rng + ?Sized>(&self, session: &mut QuizSession, rng: &mut R) {
        let collection = self.store.load_words();
        session.question = session
            .current_word()
            .map(|word| Question::build(word, session.quiz_type, &collection, rng));
        session.feedback = None;
        session.answering = false;
    }

    fn finish(&mut self, session: &mut QuizSession) -> QuizSummary {
        let summary = session.summary();
        session.phase = SessionPhase::Finished;
        session.question = None;
        session.answering = false;

        let record = HistoryRecord::from_summary(&summary, session.quiz_type);
        if let Err(e) = self.store.append_history(record) {
            warn!(error = %e, "Failed to append quiz history");
        }
        info!(
            session = session.id,
            correct = summary.correct,
            total = summary.total,
            score = summary.score_percent,
            "Quiz finished"
        );
        summary
    }
}
