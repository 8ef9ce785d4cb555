use rand::Rng;
use rand::seq::SliceRandom;

use crate::session::quiz::QuizType;
use crate::vocab::Word;

pub const MAX_DISTRACTORS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub word: Word,
    pub prompt: String,
    pub correct_answer: String,
    /// Correct answer plus up to three distractors, shuffled. Texts are unique.
    pub options: Vec<String>,
}

impl Question {
    pub fn build<R: Rng + ?Sized>(
        word: &Word,
        quiz_type: QuizType,
        collection: &[Word],
        rng: &mut R,
    ) -> Self {
        let prompt = quiz_type.prompt_of(word).to_string();
        let correct_answer = quiz_type.answer_of(word).to_string();

        // Distractors come from the whole collection, not the quiz pool.
        let mut candidates: Vec<&Word> = collection.iter().filter(|w| w.en != word.en).collect();
        candidates.shuffle(rng);

        let mut options = vec![correct_answer.clone()];
        for candidate in candidates {
            if options.len() > MAX_DISTRACTORS {
                break;
            }
            let text = quiz_type.answer_of(candidate);
            if !options.iter().any(|o| o == text) {
                options.push(text.to_string());
            }
        }
        options.shuffle(rng);

        Self {
            word: word.clone(),
            prompt,
            correct_answer,
            options,
        }
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }
}
