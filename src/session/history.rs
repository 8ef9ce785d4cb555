use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::session::quiz::{QuizSummary, QuizType};

pub const HISTORY_LIMIT: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub time: DateTime<Local>,
    #[serde(rename = "type")]
    pub quiz_type: String,
    /// Percent correct, 0-100.
    pub score: u8,
    /// `"correct/total"`.
    pub detail: String,
}

impl HistoryRecord {
    pub fn from_summary(summary: &QuizSummary, quiz_type: QuizType) -> Self {
        Self {
            time: Local::now(),
            quiz_type: quiz_type.label().to_string(),
            score: summary.score_percent,
            detail: format!("{}/{}", summary.correct, summary.total),
        }
    }
}

/// Prepend `record` and drop anything past the limit.
pub fn push_record(records: &mut Vec<HistoryRecord>, record: HistoryRecord) {
    records.insert(0, record);
    records.truncate(HISTORY_LIMIT);
}
