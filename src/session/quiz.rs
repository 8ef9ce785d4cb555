use serde::{Deserialize, Serialize};

use crate::session::question::Question;
use crate::vocab::Word;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizType {
    EnToZh,
    ZhToEn,
}

impl QuizType {
    pub fn label(self) -> &'static str {
        match self {
            QuizType::EnToZh => "EN \u{2192} ZH",
            QuizType::ZhToEn => "ZH \u{2192} EN",
        }
    }

    pub fn prompt_of(self, word: &Word) -> &str {
        match self {
            QuizType::EnToZh => &word.en,
            QuizType::ZhToEn => &word.zh,
        }
    }

    pub fn answer_of(self, word: &Word) -> &str {
        match self {
            QuizType::EnToZh => &word.zh,
            QuizType::ZhToEn => &word.en,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizSummary {
    pub correct: usize,
    pub total: usize,
    pub score_percent: u8,
}

impl QuizSummary {
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct,
            total,
            score_percent: score_percent(correct, total),
        }
    }
}

/// `round(100 * correct / total)`, 0 for an empty quiz.
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (correct as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// One quiz run. Owned by the caller; the engine only mutates it through the
/// operations in `session::engine`.
#[derive(Clone, Debug)]
pub struct QuizSession {
    pub id: u64,
    pub quiz_type: QuizType,
    pub words: Vec<Word>,
    pub current_index: usize,
    pub correct_count: usize,
    pub wrong_list: Vec<Word>,
    pub phase: SessionPhase,
    pub question: Option<Question>,
    pub feedback: Option<AnswerFeedback>,
    /// Set between an accepted answer and the advance to the next question.
    pub(crate) answering: bool,
}

impl QuizSession {
    pub(crate) fn new(id: u64, quiz_type: QuizType, words: Vec<Word>) -> Self {
        Self {
            id,
            quiz_type,
            words,
            current_index: 0,
            correct_count: 0,
            wrong_list: Vec::new(),
            phase: SessionPhase::Running,
            question: None,
            feedback: None,
            answering: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    pub fn is_answering(&self) -> bool {
        self.answering
    }

    pub fn total(&self) -> usize {
        self.words.len()
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.current_index)
    }

    pub fn answered(&self) -> usize {
        self.correct_count + self.wrong_list.len()
    }

    /// Fraction of questions answered, for the progress bar.
    pub fn progress(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.answered() as f64 / self.words.len() as f64
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary::new(self.correct_count, self.answered())
    }

    pub(crate) fn tally(&mut self, word: &Word, is_correct: bool) {
        if is_correct {
            self.correct_count += 1;
        } else {
            self.wrong_list.push(word.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_rounds_half_up() {
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 2), 50);
        assert_eq!(score_percent(3, 3), 100);
    }

    #[test]
    fn score_zero_when_nothing_answered() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(QuizSummary::new(0, 0).score_percent, 0);
    }

    #[test]
    fn tally_splits_correct_and_wrong() {
        let words = vec![Word::new("1", "a", "甲"), Word::new("1", "b", "乙")];
        let mut session = QuizSession::new(1, QuizType::EnToZh, words.clone());
        session.tally(&words[0], true);
        session.tally(&words[1], false);
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.wrong_list, vec![words[1].clone()]);
        assert_eq!(session.answered(), 2);
        assert!((session.progress() - 1.0).abs() < f64::EPSILON);
        assert_eq!(session.summary().score_percent, 50);
    }

    #[test]
    fn direction_selects_fields() {
        let w = Word::new("113", "dog", "狗");
        assert_eq!(QuizType::EnToZh.prompt_of(&w), "dog");
        assert_eq!(QuizType::EnToZh.answer_of(&w), "狗");
        assert_eq!(QuizType::ZhToEn.prompt_of(&w), "狗");
        assert_eq!(QuizType::ZhToEn.answer_of(&w), "dog");
    }
}
