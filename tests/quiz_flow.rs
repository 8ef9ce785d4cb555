use std::fs;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tempfile::TempDir;

use wordquiz::admin;
use wordquiz::feed::{self, FeedSource};
use wordquiz::session::engine::{Advance, SessionEngine};
use wordquiz::session::history::HISTORY_LIMIT;
use wordquiz::session::quiz::QuizType;
use wordquiz::session::stats::{StatsRecorder, WordKey};
use wordquiz::store::WordStore;
use wordquiz::store::json_store::JsonStore;
use wordquiz::vocab::Word;
use wordquiz::vocab::pool::{CountMode, FilterMode, YearSelection, filter_pool, resolve_count};

const FEED: &str = "113/dog/狗\n113/cat/貓\n112/bird/鳥";

fn temp_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

fn load_feed(dir: &TempDir, text: &str) -> Vec<Word> {
    let path = dir.path().join("feed.txt");
    fs::write(&path, text).unwrap();
    feed::load_source(&FeedSource::File(path), Duration::from_secs(1)).unwrap()
}

/// Answer every question correctly, advancing immediately.
fn run_all_correct<S: WordStore>(
    engine: &mut SessionEngine<S>,
    session: &mut wordquiz::session::quiz::QuizSession,
    rng: &mut SmallRng,
) -> Option<Advance> {
    let mut last = None;
    while session.is_running() {
        let correct = session.question.as_ref().unwrap().correct_answer.clone();
        engine.answer(session, &correct, Instant::now()).unwrap();
        last = engine.advance(session, rng);
    }
    last
}

#[test]
fn year_113_quiz_scores_full_marks() {
    let (dir, store) = temp_store();
    let words = load_feed(&dir, FEED);
    feed::apply_feed(&store, words, false).unwrap();

    let collection = store.load_words();
    let years = YearSelection::from_checked(["113"]);
    let pool = filter_pool(&collection, &years, FilterMode::All);
    let mut ens: Vec<&str> = pool.iter().map(|w| w.en.as_str()).collect();
    ens.sort();
    assert_eq!(ens, vec!["cat", "dog"]);

    let count = resolve_count(CountMode::Manual, Some(2), pool.len()).count;
    let mut engine = SessionEngine::new(&store);
    let mut rng = SmallRng::seed_from_u64(113);
    let mut session = engine
        .start_from_pool(QuizType::EnToZh, &pool, count, &mut rng)
        .unwrap();

    let last = run_all_correct(&mut engine, &mut session, &mut rng);
    let Some(Advance::Finished(summary)) = last else {
        panic!("quiz did not finish: {last:?}");
    };
    assert_eq!(summary.score_percent, 100);
    assert_eq!(session.correct_count, 2);
    assert!(session.wrong_list.is_empty());

    let history = store.load_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].detail, "2/2");
    assert_eq!(history[0].score, 100);

    let stored = store.load_words();
    for en in ["dog", "cat"] {
        let word = stored.iter().find(|w| w.en == en).unwrap();
        assert_eq!(word.correct_count, 1);
        assert_eq!(word.wrong_count, 0);
    }
    assert_eq!(stored.iter().find(|w| w.en == "bird").unwrap().correct_count, 0);
}

#[test]
fn high_wrong_pool_is_subset_of_year_pool() {
    let (dir, store) = temp_store();
    feed::apply_feed(&store, load_feed(&dir, FEED), false).unwrap();
    StatsRecorder::new(&store)
        .record_answer(WordKey::English("cat"), false)
        .unwrap();

    let collection = store.load_words();
    let years = YearSelection::all_of(&collection);
    let all = filter_pool(&collection, &years, FilterMode::All);
    let missed = filter_pool(&collection, &years, FilterMode::HighWrong);
    assert_eq!(all.len(), 3);
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].en, "cat");
    assert!(missed.iter().all(|m| all.contains(m)));
}

#[test]
fn shared_spelling_updates_first_entry_only() {
    let (_dir, store) = temp_store();
    store
        .save_words(&[Word::new("112", "bank", "銀行"), Word::new("113", "bank", "河岸")])
        .unwrap();
    StatsRecorder::new(&store)
        .record_answer(WordKey::English("bank"), false)
        .unwrap();
    let words = store.load_words();
    assert_eq!(words[0].wrong_count, 1);
    assert_eq!(words[1].wrong_count, 0);
}

#[test]
fn history_keeps_newest_twenty() {
    let (dir, store) = temp_store();
    feed::apply_feed(&store, load_feed(&dir, FEED), false).unwrap();
    let pool = store.load_words();
    let mut engine = SessionEngine::new(&store).with_answer_delay(Duration::ZERO);
    let mut rng = SmallRng::seed_from_u64(7);

    for round in 0..=HISTORY_LIMIT {
        // Round 0 misses everything so its record is distinguishable.
        let mut session = engine
            .start_from_pool(QuizType::ZhToEn, &pool, 1, &mut rng)
            .unwrap();
        let answer = if round == 0 {
            "nothing".to_string()
        } else {
            session.question.as_ref().unwrap().correct_answer.clone()
        };
        engine.answer(&mut session, &answer, Instant::now()).unwrap();
        engine.advance(&mut session, &mut rng);
        assert!(session.is_finished());
    }

    let history = store.load_history();
    assert_eq!(history.len(), HISTORY_LIMIT);
    assert!(history.iter().all(|r| r.score == 100), "oldest record evicted");
    assert!(history.windows(2).all(|w| w[0].time >= w[1].time));
}

#[test]
fn malformed_feed_lines_never_reach_the_store() {
    let (dir, store) = temp_store();
    let words = load_feed(&dir, "113/dog/狗\n113/dog\n1/2/3/4\n\n112/bird/鳥\n");
    feed::apply_feed(&store, words, false).unwrap();
    let stored: Vec<String> = store.load_words().into_iter().map(|w| w.en).collect();
    assert_eq!(stored, vec!["dog".to_string(), "bird".to_string()]);
}

#[test]
fn import_and_delete_persist() {
    let (_dir, store) = temp_store();
    let preview = admin::preview_import("113/dog/狗\n113/dog/狗\nbad");
    assert_eq!(admin::commit_import(&store, &preview, true).unwrap(), 2);
    let words = store.load_words();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0].id, Some(1));
    assert_eq!(words[1].id, Some(2));

    let removed = admin::delete_at(&store, 0).unwrap().unwrap();
    assert_eq!(removed.id, Some(1));
    assert_eq!(store.load_words()[0].id, Some(2));
}

#[test]
fn import_into_fresh_store_skips_bundled_seed() {
    let (dir, store) = temp_store();
    let path = dir.path().join("import.txt");
    fs::write(&path, "113/dog/狗\n113/cat/貓\nbad").unwrap();

    assert_eq!(admin::import_file(&store, &path, false).unwrap(), (2, 1));
    assert_eq!(feed::seed_if_empty(&store, false).unwrap(), 0);
    let ens: Vec<String> = store.load_words().into_iter().map(|w| w.en).collect();
    assert_eq!(ens, vec!["dog".to_string(), "cat".to_string()]);
}
