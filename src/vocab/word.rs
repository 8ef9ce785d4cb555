use serde::{Deserialize, Serialize};

/// A single vocabulary entry. Counters serialize as `wrongCount` and
/// `correctCount`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Free-form year label; compared as a string, never as a number.
    pub year: String,
    pub en: String,
    pub zh: String,
    #[serde(default)]
    pub wrong_count: u32,
    #[serde(default)]
    pub correct_count: u32,
    /// Synthetic identifier, only assigned when stable ids are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl Word {
    pub fn new(year: &str, en: &str, zh: &str) -> Self {
        Self {
            year: year.to_string(),
            en: en.to_string(),
            zh: zh.to_string(),
            wrong_count: 0,
            correct_count: 0,
            id: None,
        }
    }
}

/// Parse one `year/english/chinese` line. Anything other than exactly three
/// slash-separated fields is rejected. Fields are trimmed but may be empty.
pub fn parse_line(line: &str) -> Option<Word> {
    let parts: Vec<&str> = line.split('/').map(str::trim).collect();
    match parts.as_slice() {
        [year, en, zh] => Some(Word::new(year, en, zh)),
        _ => None,
    }
}

/// Parse a whole feed or import block. Returns the accepted words in order and
/// the number of non-blank lines that were dropped.
pub fn parse_lines(text: &str) -> (Vec<Word>, usize) {
    let mut words = Vec::new();
    let mut rejected = 0;
    for line in text.trim().lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(word) => words.push(word),
            None => rejected += 1,
        }
    }
    (words, rejected)
}

/// Next free synthetic id for a collection.
pub fn next_id(words: &[Word]) -> u64 {
    words.iter().filter_map(|w| w.id).max().map_or(1, |max| max + 1)
}

/// Give every word without an id a fresh one, in collection order.
pub fn fill_missing_ids(words: &mut [Word]) {
    let mut next = next_id(words);
    for word in words.iter_mut().filter(|w| w.id.is_none()) {
        word.id = Some(next);
        next += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_trims_fields() {
        let word = parse_line(" 113 / dog /  狗 ").unwrap();
        assert_eq!(word.year, "113");
        assert_eq!(word.en, "dog");
        assert_eq!(word.zh, "狗");
        assert_eq!(word.wrong_count, 0);
        assert_eq!(word.correct_count, 0);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_line("113/dog").is_none());
        assert!(parse_line("113/dog/狗/extra").is_none());
        assert!(parse_line("").is_none());
    }

    #[test]
    fn keeps_empty_fields() {
        let word = parse_line("113/dog/").unwrap();
        assert_eq!((word.year.as_str(), word.en.as_str(), word.zh.as_str()), ("113", "dog", ""));
        let (words, rejected) = parse_lines("113//狗");
        assert_eq!(rejected, 0);
        assert_eq!(words, vec![Word::new("113", "", "狗")]);
    }

    #[test]
    fn every_three_field_line_becomes_a_trimmed_word() {
        let lines = [
            ("113/dog/狗", ("113", "dog", "狗")),
            ("  113 /  ice cream  / 冰淇淋 ", ("113", "ice cream", "冰淇淋")),
            ("\t112\t/\tbird/鳥\t", ("112", "bird", "鳥")),
            ("//", ("", "", "")),
            (" / dog / 狗", ("", "dog", "狗")),
            ("110/New  York/紐約", ("110", "New  York", "紐約")),
        ];
        for (line, (year, en, zh)) in lines {
            let word = parse_line(line).unwrap_or_else(|| panic!("rejected {line:?}"));
            assert_eq!(word, Word::new(year, en, zh), "line {line:?}");
            let (parsed, rejected) = parse_lines(line);
            assert_eq!(rejected, 0, "line {line:?}");
            assert_eq!(parsed, vec![word]);
        }
    }

    #[test]
    fn parse_lines_drops_malformed_and_counts_them() {
        let text = "113/dog/狗\nnot a word\n\n113/cat/貓\n112/bird/鳥/x\n";
        let (words, rejected) = parse_lines(text);
        let ens: Vec<&str> = words.iter().map(|w| w.en.as_str()).collect();
        assert_eq!(ens, vec!["dog", "cat"]);
        assert_eq!(rejected, 2);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let (words, rejected) = parse_lines("113/dog/狗\r\n113/cat/貓\r\n");
        assert_eq!(words.len(), 2);
        assert_eq!(rejected, 0);
        assert_eq!(words[0].zh, "狗");
    }

    #[test]
    fn deserializes_legacy_entries_without_counters() {
        let json = r#"[{"year":"112","en":"apple","zh":"蘋果","wrongCount":2}]"#;
        let words: Vec<Word> = serde_json::from_str(json).unwrap();
        assert_eq!(words[0].wrong_count, 2);
        assert_eq!(words[0].correct_count, 0);
        assert_eq!(words[0].id, None);
    }

    #[test]
    fn serializes_camel_case_without_absent_id() {
        let json = serde_json::to_string(&Word::new("113", "dog", "狗")).unwrap();
        assert!(json.contains("\"wrongCount\":0"));
        assert!(json.contains("\"correctCount\":0"));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn next_id_skips_past_existing() {
        let mut words = vec![Word::new("1", "a", "甲"), Word::new("1", "b", "乙")];
        assert_eq!(next_id(&words), 1);
        words[1].id = Some(7);
        assert_eq!(next_id(&words), 8);
    }

    #[test]
    fn fill_missing_ids_keeps_existing() {
        let mut words = vec![
            Word::new("1", "a", "甲"),
            Word::new("1", "b", "乙"),
            Word::new("1", "c", "丙"),
        ];
        words[1].id = Some(4);
        fill_missing_ids(&mut words);
        let ids: Vec<Option<u64>> = words.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![Some(5), Some(4), Some(6)]);
    }
}
