use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::stats::IdentityMode;
use crate::vocab::pool::{CountMode, FilterMode};
use crate::vocab::sort::VocabSort;

const MAX_ANSWER_DELAY_MS: u64 = 10_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Remote URL or local path of the word feed. Unset means the bundled list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(default = "default_feed_timeout_secs")]
    pub feed_timeout_secs: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    #[serde(default)]
    pub count_mode: CountMode,
    #[serde(default)]
    pub filter_mode: FilterMode,
    #[serde(default = "default_answer_delay_ms")]
    pub answer_delay_ms: u64,
    #[serde(default = "default_admin_passcode")]
    pub admin_passcode: String,
    #[serde(default)]
    pub stable_word_ids: bool,
    #[serde(default)]
    pub vocab_sort: VocabSort,
}

fn default_feed_timeout_secs() -> u64 {
    10
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_question_count() -> usize {
    10
}
fn default_answer_delay_ms() -> u64 {
    1000
}
fn default_admin_passcode() -> String {
    "12345678".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: None,
            feed_timeout_secs: default_feed_timeout_secs(),
            theme: default_theme(),
            default_question_count: default_question_count(),
            count_mode: CountMode::default(),
            filter_mode: FilterMode::default(),
            answer_delay_ms: default_answer_delay_ms(),
            admin_passcode: default_admin_passcode(),
            stable_word_ids: false,
            vocab_sort: VocabSort::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordquiz")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        self.answer_delay_ms = self.answer_delay_ms.min(MAX_ANSWER_DELAY_MS);
        self.default_question_count = self.default_question_count.max(1);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.feed_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.feed_url = None;
        }
    }

    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    pub fn identity_mode(&self) -> IdentityMode {
        if self.stable_word_ids {
            IdentityMode::StableId
        } else {
            IdentityMode::English
        }
    }
}
