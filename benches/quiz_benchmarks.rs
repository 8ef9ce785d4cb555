use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use wordquiz::session::question::Question;
use wordquiz::session::quiz::QuizType;
use wordquiz::vocab::Word;
use wordquiz::vocab::pool::{FilterMode, YearSelection, filter_pool};
use wordquiz::vocab::word::parse_lines;

fn make_collection(count: usize) -> Vec<Word> {
    let years = ["110", "111", "112", "113"];
    (0..count)
        .map(|i| {
            let mut word = Word::new(years[i % years.len()], &format!("word{i}"), &format!("詞{i}"));
            word.wrong_count = (i % 5 == 0) as u32; // ~20% missed before
            word
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let text: String = make_collection(2000)
        .iter()
        .map(|w| format!("{}/{}/{}\n", w.year, w.en, w.zh))
        .collect();

    c.bench_function("parse_lines (2000 lines)", |b| {
        b.iter(|| parse_lines(black_box(&text)))
    });
}

fn bench_filter(c: &mut Criterion) {
    let words = make_collection(5000);
    let years = YearSelection::from_checked(["112", "113"]);

    c.bench_function("filter_pool all (5000 words)", |b| {
        b.iter(|| filter_pool(black_box(&words), &years, FilterMode::All))
    });
    c.bench_function("filter_pool high-wrong (5000 words)", |b| {
        b.iter(|| filter_pool(black_box(&words), &years, FilterMode::HighWrong))
    });
}

fn bench_question(c: &mut Criterion) {
    let words = make_collection(5000);
    let mut rng = SmallRng::seed_from_u64(42);

    c.bench_function("Question::build (5000 word collection)", |b| {
        b.iter(|| Question::build(black_box(&words[17]), QuizType::EnToZh, &words, &mut rng))
    });
}

criterion_group!(benches, bench_parse, bench_filter, bench_question);
criterion_main!(benches);
