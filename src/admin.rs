use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::store::WordStore;
use crate::vocab::Word;
use crate::vocab::word::{fill_missing_ids, parse_lines};

/// Compare against the configured passcode. This gates the admin screen
/// against casual use only.
pub fn verify_passcode(config: &Config, input: &str) -> bool {
    input == config.admin_passcode
}

/// Parsed import block, shown to the admin before committing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportPreview {
    pub words: Vec<Word>,
    pub rejected: usize,
}

impl ImportPreview {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub fn preview_import(text: &str) -> ImportPreview {
    let (words, rejected) = parse_lines(text);
    ImportPreview { words, rejected }
}

/// Append the previewed words to the stored collection. Duplicates are kept.
pub fn commit_import<S: WordStore + ?Sized>(
    store: &S,
    preview: &ImportPreview,
    stable_ids: bool,
) -> Result<usize> {
    if preview.is_empty() {
        return Ok(0);
    }
    let mut words = store.load_words();
    words.extend(preview.words.iter().cloned());
    if stable_ids {
        fill_missing_ids(&mut words);
    }
    store.save_words(&words)?;
    info!(added = preview.words.len(), total = words.len(), "Imported words");
    Ok(preview.words.len())
}

/// Remove the word at `index` in stored order.
pub fn delete_at<S: WordStore + ?Sized>(store: &S, index: usize) -> Result<Option<Word>> {
    let mut words = store.load_words();
    if index >= words.len() {
        return Ok(None);
    }
    let removed = words.remove(index);
    store.save_words(&words)?;
    info!(en = %removed.en, year = %removed.year, "Deleted word");
    Ok(Some(removed))
}

/// Headless import of a word file. Returns `(added, rejected)`.
pub fn import_file<S: WordStore + ?Sized>(
    store: &S,
    path: &Path,
    stable_ids: bool,
) -> Result<(usize, usize)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let preview = preview_import(&text);
    let added = commit_import(store, &preview, stable_ids)?;
    Ok((added, preview.rejected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn passcode_must_match_exactly() {
        let config = Config::default();
        assert!(verify_passcode(&config, "12345678"));
        assert!(!verify_passcode(&config, "1234567"));
        assert!(!verify_passcode(&config, " 12345678"));
    }

    #[test]
    fn preview_counts_rejected_lines() {
        let preview = preview_import("113/dog/狗\nbad line\n113/cat/貓\n");
        assert_eq!(preview.words.len(), 2);
        assert_eq!(preview.rejected, 1);
    }

    #[test]
    fn commit_appends_without_merging() {
        let store = MemoryStore::with_words(vec![Word::new("113", "dog", "狗")]);
        let preview = preview_import("113/dog/狗\n112/bird/鳥");
        assert_eq!(commit_import(&store, &preview, false).unwrap(), 2);
        let words = store.load_words();
        assert_eq!(words.len(), 3);
        assert_eq!(words.iter().filter(|w| w.en == "dog").count(), 2);
        assert_eq!(words[2].en, "bird");
    }

    #[test]
    fn commit_assigns_ids_when_enabled() {
        let mut dog = Word::new("113", "dog", "狗");
        dog.id = Some(3);
        let store = MemoryStore::with_words(vec![dog]);
        commit_import(&store, &preview_import("112/bird/鳥"), true).unwrap();
        assert_eq!(store.load_words()[1].id, Some(4));
    }

    #[test]
    fn empty_preview_commits_nothing() {
        let store = MemoryStore::with_words(vec![Word::new("113", "dog", "狗")]);
        assert_eq!(commit_import(&store, &preview_import("junk"), false).unwrap(), 0);
        assert_eq!(store.load_words().len(), 1);
    }

    #[test]
    fn delete_removes_by_position() {
        let store = MemoryStore::with_words(vec![
            Word::new("112", "bank", "銀行"),
            Word::new("113", "bank", "河岸"),
        ]);
        let removed = delete_at(&store, 1).unwrap().unwrap();
        assert_eq!(removed.zh, "河岸");
        let words = store.load_words();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].zh, "銀行");
        assert_eq!(delete_at(&store, 5).unwrap(), None);
    }
}
