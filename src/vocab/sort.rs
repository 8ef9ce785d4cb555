use serde::{Deserialize, Serialize};

use crate::vocab::word::Word;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabSort {
    #[default]
    YearDesc,
    YearAsc,
    EnglishAsc,
    EnglishDesc,
    MostWrong,
}

const ALL_SORTS: [VocabSort; 5] = [
    VocabSort::YearDesc,
    VocabSort::YearAsc,
    VocabSort::EnglishAsc,
    VocabSort::EnglishDesc,
    VocabSort::MostWrong,
];

impl VocabSort {
    pub fn label(self) -> &'static str {
        match self {
            VocabSort::YearDesc => "Year (newest)",
            VocabSort::YearAsc => "Year (oldest)",
            VocabSort::EnglishAsc => "A \u{2192} Z",
            VocabSort::EnglishDesc => "Z \u{2192} A",
            VocabSort::MostWrong => "Most missed",
        }
    }

    pub fn next(self) -> Self {
        let idx = ALL_SORTS.iter().position(|&s| s == self).unwrap_or(0);
        ALL_SORTS[(idx + 1) % ALL_SORTS.len()]
    }

    /// Stable sort; ties keep collection order.
    pub fn apply(self, words: &mut [Word]) {
        match self {
            VocabSort::YearDesc => words.sort_by_key(|w| std::cmp::Reverse(year_value(w))),
            VocabSort::YearAsc => words.sort_by_key(year_value),
            VocabSort::EnglishAsc => words.sort_by(|a, b| english_key(a).cmp(&english_key(b))),
            VocabSort::EnglishDesc => words.sort_by(|a, b| english_key(b).cmp(&english_key(a))),
            VocabSort::MostWrong => words.sort_by_key(|w| std::cmp::Reverse(w.wrong_count)),
        }
    }
}

// Unparsable years sort as 0.
fn year_value(word: &Word) -> i64 {
    word.year.trim().parse().unwrap_or(0)
}

fn english_key(word: &Word) -> (String, &str) {
    (word.en.to_lowercase(), word.en.as_str())
}
