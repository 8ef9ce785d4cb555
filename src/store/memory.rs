use std::cell::RefCell;

use anyhow::Result;

use crate::session::history::HistoryRecord;
use crate::store::WordStore;
use crate::vocab::Word;

/// In-process store. Used by tests and as the fallback when the data
/// directory is not writable.
#[derive(Default)]
pub struct MemoryStore {
    words: RefCell<Vec<Word>>,
    history: RefCell<Vec<HistoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words(words: Vec<Word>) -> Self {
        Self {
            words: RefCell::new(words),
            history: RefCell::new(Vec::new()),
        }
    }
}

impl WordStore for MemoryStore {
    fn load_words(&self) -> Vec<Word> {
        self.words.borrow().clone()
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        *self.words.borrow_mut() = words.to_vec();
        Ok(())
    }

    fn load_history(&self) -> Vec<HistoryRecord> {
        self.history.borrow().clone()
    }

    fn save_history(&self, records: &[HistoryRecord]) -> Result<()> {
        *self.history.borrow_mut() = records.to_vec();
        Ok(())
    }
}
