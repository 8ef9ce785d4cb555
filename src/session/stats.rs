use anyhow::Result;
use tracing::debug;

use crate::store::WordStore;
use crate::vocab::Word;

/// How an answered word is matched back to its stored entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// Match the first stored word with the same English text. Words sharing
    /// a spelling share counters.
    #[default]
    English,
    /// Match by synthetic id when the word has one, else fall back to English.
    StableId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordKey<'a> {
    English(&'a str),
    Id(u64),
}

impl<'a> WordKey<'a> {
    pub fn for_word(word: &'a Word, mode: IdentityMode) -> Self {
        match (mode, word.id) {
            (IdentityMode::StableId, Some(id)) => WordKey::Id(id),
            _ => WordKey::English(&word.en),
        }
    }

    fn matches(&self, word: &Word) -> bool {
        match *self {
            WordKey::English(en) => word.en == en,
            WordKey::Id(id) => word.id == Some(id),
        }
    }
}

pub struct StatsRecorder<'s, S: WordStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: WordStore + ?Sized> StatsRecorder<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Bump the counter of the first stored word matching `key` and persist
    /// the whole collection. Returns `Ok(false)` when nothing matched.
    pub fn record_answer(&self, key: WordKey<'_>, is_correct: bool) -> Result<bool> {
        let mut words = self.store.load_words();
        let Some(word) = words.iter_mut().find(|w| key.matches(w)) else {
            debug!(?key, "No stored word for answered key");
            return Ok(false);
        };
        if is_correct {
            word.correct_count += 1;
        } else {
            word.wrong_count += 1;
        }
        self.store.save_words(&words)?;
        Ok(true)
    }
}
