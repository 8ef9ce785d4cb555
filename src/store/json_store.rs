use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::session::history::HistoryRecord;
use crate::store::WordStore;
use crate::vocab::Word;

const WORDS_FILE: &str = "words.json";
const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(default_data_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Stored data is unreadable, treating as empty");
                T::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read stored data");
                T::default()
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl WordStore for JsonStore {
    fn load_words(&self) -> Vec<Word> {
        self.load(WORDS_FILE)
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        self.save(WORDS_FILE, words)
    }

    fn load_history(&self) -> Vec<HistoryRecord> {
        self.load(HISTORY_FILE)
    }

    fn save_history(&self, records: &[HistoryRecord]) -> Result<()> {
        self.save(HISTORY_FILE, records)
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordquiz")
}
