pub mod fetch;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::error::FeedError;
use crate::store::WordStore;
use crate::vocab::Word;
use crate::vocab::word::{fill_missing_ids, parse_lines};

pub use fetch::fetch_url;

/// Word list compiled into the binary, used to seed an empty store.
pub const BUNDLED_WORDS: &str = include_str!("../../assets/words.txt");

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedSource {
    Remote(String),
    File(PathBuf),
    Bundled,
}

impl FeedSource {
    /// Pick the source from the command line first, then config. Remote
    /// sources collapse to `Bundled` when running offline.
    pub fn resolve(cli_feed: Option<&str>, config_url: Option<&str>, offline: bool) -> Self {
        let source = match cli_feed.or(config_url) {
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                FeedSource::Remote(s.to_string())
            }
            Some(s) if !s.trim().is_empty() => FeedSource::File(PathBuf::from(s)),
            _ => FeedSource::Bundled,
        };
        match source {
            FeedSource::Remote(_) if offline => FeedSource::Bundled,
            other => other,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FeedSource::Remote(url) => url.clone(),
            FeedSource::File(path) => path.display().to_string(),
            FeedSource::Bundled => "bundled word list".to_string(),
        }
    }
}

/// Fetch and parse a feed. A feed without a single valid line is an error so
/// callers keep their current collection.
pub fn load_source(source: &FeedSource, timeout: Duration) -> Result<Vec<Word>, FeedError> {
    let text = match source {
        FeedSource::Remote(url) => fetch_url(url, timeout)?,
        FeedSource::File(path) => fs::read_to_string(path)?,
        FeedSource::Bundled => BUNDLED_WORDS.to_string(),
    };
    let (words, rejected) = parse_lines(&text);
    if rejected > 0 {
        debug!(rejected, source = %source.describe(), "Dropped malformed feed lines");
    }
    if words.is_empty() {
        return Err(FeedError::Empty);
    }
    Ok(words)
}

/// Load `source` on a background thread and hand the outcome to `on_done`.
pub fn spawn_refresh<F>(source: FeedSource, timeout: Duration, on_done: F) -> JoinHandle<()>
where
    F: FnOnce(Result<Vec<Word>, FeedError>) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = load_source(&source, timeout);
        on_done(outcome);
    })
}

/// Carry counters and ids from `existing` onto `incoming` entries with the
/// same `(year, en)`. When several existing entries share a key the first
/// one wins. Each existing entry is carried onto at most one incoming entry.
pub fn merge_counters(existing: &[Word], mut incoming: Vec<Word>) -> Vec<Word> {
    let mut by_key: HashMap<(&str, &str), &Word> = HashMap::new();
    for word in existing {
        by_key.entry((word.year.as_str(), word.en.as_str())).or_insert(word);
    }
    for word in &mut incoming {
        if let Some(old) = by_key.remove(&(word.year.as_str(), word.en.as_str())) {
            word.wrong_count = old.wrong_count;
            word.correct_count = old.correct_count;
            word.id = old.id;
        }
    }
    incoming
}

/// Replace the stored collection with a fresh feed. Returns the new size.
pub fn apply_feed<S: WordStore + ?Sized>(
    store: &S,
    incoming: Vec<Word>,
    stable_ids: bool,
) -> Result<usize> {
    let mut merged = merge_counters(&store.load_words(), incoming);
    if stable_ids {
        fill_missing_ids(&mut merged);
    }
    store.save_words(&merged)?;
    info!(words = merged.len(), "Word list refreshed");
    Ok(merged.len())
}

/// Write the bundled list when the store has no words yet. Returns how many
/// words were seeded.
pub fn seed_if_empty<S: WordStore + ?Sized>(store: &S, stable_ids: bool) -> Result<usize> {
    if !store.load_words().is_empty() {
        return Ok(0);
    }
    let (mut words, _) = parse_lines(BUNDLED_WORDS);
    if stable_ids {
        fill_missing_ids(&mut words);
    }
    store.save_words(&words)?;
    info!(words = words.len(), "Seeded store from bundled word list");
    Ok(words.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::io::Write;
    use std::sync::mpsc;

    #[test]
    fn bundled_list_parses_cleanly() {
        let (words, rejected) = parse_lines(BUNDLED_WORDS);
        assert!(words.len() >= 3);
        assert_eq!(rejected, 0);
        assert!(words.iter().any(|w| w.en == "dog" && w.zh == "狗"));
    }

    #[test]
    fn resolve_prefers_cli_and_honors_offline() {
        assert_eq!(
            FeedSource::resolve(Some("https://a/b.txt"), Some("https://c/d.txt"), false),
            FeedSource::Remote("https://a/b.txt".into())
        );
        assert_eq!(
            FeedSource::resolve(None, Some("https://c/d.txt"), true),
            FeedSource::Bundled
        );
        assert_eq!(
            FeedSource::resolve(Some("words.txt"), None, true),
            FeedSource::File(PathBuf::from("words.txt"))
        );
        assert_eq!(FeedSource::resolve(None, None, false), FeedSource::Bundled);
    }

    #[test]
    fn file_source_drops_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "113/dog/狗\nbroken\n113/cat/貓").unwrap();
        let source = FeedSource::File(file.path().to_path_buf());
        let words = load_source(&source, Duration::from_secs(1)).unwrap();
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn empty_feed_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nothing useful here").unwrap();
        let source = FeedSource::File(file.path().to_path_buf());
        assert!(matches!(
            load_source(&source, Duration::from_secs(1)),
            Err(FeedError::Empty)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = FeedSource::File(PathBuf::from("/definitely/not/here.txt"));
        assert!(matches!(
            load_source(&source, Duration::from_secs(1)),
            Err(FeedError::Io(_))
        ));
    }

    #[test]
    fn refresh_reports_through_callback() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_refresh(FeedSource::Bundled, Duration::from_secs(1), move |outcome| {
            let _ = tx.send(outcome.map(|w| w.len()));
        });
        handle.join().unwrap();
        let count = rx.recv().unwrap().unwrap();
        assert!(count > 0);
    }

    #[test]
    fn merge_carries_counters_by_year_and_english() {
        let mut dog = Word::new("113", "dog", "狗");
        dog.wrong_count = 3;
        dog.correct_count = 1;
        let mut old_cat = Word::new("112", "cat", "貓");
        old_cat.wrong_count = 5;

        let incoming = vec![
            Word::new("113", "dog", "小狗"),
            Word::new("113", "cat", "貓"),
        ];
        let merged = merge_counters(&[dog, old_cat], incoming);
        assert_eq!(merged[0].zh, "小狗");
        assert_eq!(merged[0].wrong_count, 3);
        assert_eq!(merged[0].correct_count, 1);
        // different year, no carry-over
        assert_eq!(merged[1].wrong_count, 0);
    }

    #[test]
    fn repeated_key_inherits_only_once() {
        let mut bank = Word::new("113", "bank", "銀行");
        bank.id = Some(1);
        bank.wrong_count = 4;
        let store = MemoryStore::with_words(vec![bank]);
        apply_feed(
            &store,
            vec![Word::new("113", "bank", "銀行"), Word::new("113", "bank", "河岸")],
            true,
        )
        .unwrap();
        let words = store.load_words();
        assert_eq!(words[0].id, Some(1));
        assert_eq!(words[0].wrong_count, 4);
        assert_eq!(words[1].id, Some(2));
        assert_eq!(words[1].wrong_count, 0);
    }

    #[test]
    fn apply_feed_replaces_collection() {
        let mut dog = Word::new("113", "dog", "狗");
        dog.wrong_count = 2;
        let store = MemoryStore::with_words(vec![dog, Word::new("100", "old", "舊")]);
        let n = apply_feed(
            &store,
            vec![Word::new("113", "dog", "狗"), Word::new("113", "cat", "貓")],
            false,
        )
        .unwrap();
        assert_eq!(n, 2);
        let words = store.load_words();
        assert!(words.iter().all(|w| w.en != "old"));
        assert_eq!(words[0].wrong_count, 2);
    }

    #[test]
    fn apply_feed_assigns_ids_when_enabled() {
        let store = MemoryStore::default();
        apply_feed(&store, vec![Word::new("113", "dog", "狗")], true).unwrap();
        assert_eq!(store.load_words()[0].id, Some(1));
    }

    #[test]
    fn seed_only_when_empty() {
        let store = MemoryStore::default();
        assert!(seed_if_empty(&store, false).unwrap() > 0);
        let seeded = store.load_words().len();
        assert_eq!(seed_if_empty(&store, false).unwrap(), 0);
        assert_eq!(store.load_words().len(), seeded);
    }
}
