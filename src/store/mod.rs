pub mod json_store;
pub mod memory;

use anyhow::Result;

use crate::session::history::{HistoryRecord, push_record};
use crate::vocab::Word;

/// Persistence for the word collection and the quiz history log.
///
/// Loads never fail: a missing or unreadable record reads as empty. Saves
/// overwrite the whole record.
pub trait WordStore {
    fn load_words(&self) -> Vec<Word>;
    fn save_words(&self, words: &[Word]) -> Result<()>;
    fn load_history(&self) -> Vec<HistoryRecord>;
    fn save_history(&self, records: &[HistoryRecord]) -> Result<()>;

    fn append_history(&self, record: HistoryRecord) -> Result<()> {
        let mut records = self.load_history();
        push_record(&mut records, record);
        self.save_history(&records)
    }
}

impl<S: WordStore + ?Sized> WordStore for &S {
    fn load_words(&self) -> Vec<Word> {
        (**self).load_words()
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        (**self).save_words(words)
    }

    fn load_history(&self) -> Vec<HistoryRecord> {
        (**self).load_history()
    }

    fn save_history(&self, records: &[HistoryRecord]) -> Result<()> {
        (**self).save_history(records)
    }
}

impl<S: WordStore + ?Sized> WordStore for Box<S> {
    fn load_words(&self) -> Vec<Word> {
        (**self).load_words()
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        (**self).save_words(words)
    }

    fn load_history(&self) -> Vec<HistoryRecord> {
        (**self).load_history()
    }

    fn save_history(&self, records: &[HistoryRecord]) -> Result<()> {
        (**self).save_history(records)
    }
}
