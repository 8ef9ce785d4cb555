use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::vocab::word::Word;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    All,
    HighWrong,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All words",
            FilterMode::HighWrong => "Missed before",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            FilterMode::All => FilterMode::HighWrong,
            FilterMode::HighWrong => FilterMode::All,
        }
    }
}

/// Words whose year is selected and, in `HighWrong` mode, that were missed at
/// least once. Order follows the collection.
pub fn filter_pool(words: &[Word], selection: &YearSelection, mode: FilterMode) -> Vec<Word> {
    words
        .iter()
        .filter(|w| selection.contains(&w.year))
        .filter(|w| mode == FilterMode::All || w.wrong_count > 0)
        .cloned()
        .collect()
}

/// Newest first: numeric when both labels are integers, lexical otherwise.
pub fn compare_years_desc(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        _ => b.cmp(a),
    }
}

pub fn available_years(words: &[Word]) -> Vec<String> {
    let unique: BTreeSet<&str> = words.iter().map(|w| w.year.as_str()).collect();
    let mut years: Vec<String> = unique.into_iter().map(str::to_string).collect();
    years.sort_by(|a, b| compare_years_desc(a, b));
    years
}

/// Checked state of the year boxes on the quiz setup screen.
#[derive(Clone, Debug, Default)]
pub struct YearSelection {
    pub years: Vec<String>,
    checked: BTreeSet<String>,
}

impl YearSelection {
    /// All known years, all checked.
    pub fn all_of(words: &[Word]) -> Self {
        let years = available_years(words);
        let checked = years.iter().cloned().collect();
        Self { years, checked }
    }

    pub fn from_checked<I, S>(years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let checked: BTreeSet<String> = years.into_iter().map(Into::into).collect();
        let mut years: Vec<String> = checked.iter().cloned().collect();
        years.sort_by(|a, b| compare_years_desc(a, b));
        Self { years, checked }
    }

    pub fn contains(&self, year: &str) -> bool {
        self.checked.contains(year)
    }

    pub fn is_checked(&self, idx: usize) -> bool {
        self.years.get(idx).is_some_and(|y| self.checked.contains(y))
    }

    pub fn toggle(&mut self, idx: usize) {
        if let Some(year) = self.years.get(idx)
            && !self.checked.remove(year)
        {
            self.checked.insert(year.clone());
        }
    }

    pub fn select_all(&mut self) {
        self.checked = self.years.iter().cloned().collect();
    }

    pub fn select_none(&mut self) {
        self.checked.clear();
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountMode {
    /// Quiz the whole pool; the count is locked.
    #[default]
    Auto,
    Manual,
}

impl CountMode {
    pub fn label(self) -> &'static str {
        match self {
            CountMode::Auto => "Whole pool",
            CountMode::Manual => "Custom",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            CountMode::Auto => CountMode::Manual,
            CountMode::Manual => CountMode::Auto,
        }
    }
}

/// Result of validating the requested question count against a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountResolution {
    pub count: usize,
    /// Set when a manual request exceeded a non-empty pool and was lowered.
    pub clamped_from: Option<usize>,
}

/// The question-count field: either locked to the pool size or user-entered.
#[derive(Clone, Debug)]
pub struct CountSetting {
    pub mode: CountMode,
    /// Raw manual entry. Kept as text so partial input survives re-renders.
    pub input: String,
    pub default_count: usize,
}

impl CountSetting {
    pub fn new(mode: CountMode, default_count: usize) -> Self {
        Self {
            mode,
            input: default_count.to_string(),
            default_count,
        }
    }

    pub fn requested(&self) -> Option<usize> {
        self.input.trim().parse::<usize>().ok()
    }

    /// Clamp the current entry into `[1, pool_len]` (or lock to the pool in
    /// auto mode) and write the clamped value back.
    pub fn resolve(&mut self, pool_len: usize) -> CountResolution {
        let resolution = resolve_count(self.mode, self.requested(), pool_len);
        self.input = resolution.count.to_string();
        resolution
    }

    /// Reset a manual entry that no longer fits the pool after the filter
    /// changed. Auto mode just tracks the pool size.
    pub fn on_pool_changed(&mut self, pool_len: usize) {
        match self.mode {
            CountMode::Auto => self.input = pool_len.to_string(),
            CountMode::Manual => {
                let stale = match self.requested() {
                    None | Some(0) => true,
                    Some(n) => n > pool_len,
                };
                if stale {
                    self.input = self.default_count.min(pool_len).to_string();
                }
            }
        }
    }

    pub fn push_digit(&mut self, ch: char) {
        if self.mode == CountMode::Manual && ch.is_ascii_digit() && self.input.len() < 6 {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.mode == CountMode::Manual {
            self.input.pop();
        }
    }
}

pub fn resolve_count(mode: CountMode, requested: Option<usize>, pool_len: usize) -> CountResolution {
    match mode {
        CountMode::Auto => CountResolution {
            count: pool_len,
            clamped_from: None,
        },
        CountMode::Manual => match requested {
            Some(n) if n > pool_len => CountResolution {
                count: pool_len,
                clamped_from: (pool_len > 0).then_some(n),
            },
            Some(n) if n >= 1 => CountResolution {
                count: n,
                clamped_from: None,
            },
            _ => CountResolution {
                count: 1.min(pool_len),
                clamped_from: None,
            },
        },
    }
}
