use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};

use crate::admin::{self, ImportPreview};
use crate::config::Config;
use crate::error::{FeedError, QuizError};
use crate::feed;
use crate::session::engine::{Advance, SessionEngine};
use crate::session::history::HistoryRecord;
use crate::session::quiz::{QuizSession, QuizSummary, QuizType};
use crate::store::WordStore;
use crate::ui::components::menu::Menu;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;
use crate::vocab::Word;
use crate::vocab::pool::{CountSetting, FilterMode, YearSelection, filter_pool};
use crate::vocab::sort::VocabSort;

const PASSCODE_MAX_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Vocab,
    QuizSetup,
    Quiz,
    QuizResult,
    History,
    AdminLogin,
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminTab {
    Import,
    Manage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub engine: SessionEngine<Box<dyn WordStore>>,
    /// Snapshot of the stored collection, refreshed after every change.
    pub words: Vec<Word>,
    pub session: Option<QuizSession>,
    pub last_summary: Option<QuizSummary>,
    pub quiz_type: QuizType,
    pub years: YearSelection,
    pub year_cursor: usize,
    pub filter_mode: FilterMode,
    pub count: CountSetting,
    pub pool_size: usize,
    pub option_selected: usize,
    pub vocab_sort: VocabSort,
    pub vocab_scroll: usize,
    pub history: Vec<HistoryRecord>,
    pub history_scroll: usize,
    pub passcode: LineInput,
    pub admin_tab: AdminTab,
    pub import_input: LineInput,
    pub import_preview: Option<ImportPreview>,
    pub manage_selected: usize,
    pub confirm_delete: bool,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, store: Box<dyn WordStore>, theme: &'static Theme) -> Self {
        Self::with_rng(config, store, theme, SmallRng::from_entropy())
    }

    pub fn with_rng(
        config: Config,
        store: Box<dyn WordStore>,
        theme: &'static Theme,
        rng: SmallRng,
    ) -> Self {
        let engine = SessionEngine::new(store)
            .with_answer_delay(config.answer_delay())
            .with_identity(config.identity_mode());
        let words = engine.store().load_words();
        let count = CountSetting::new(config.count_mode, config.default_question_count);

        Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            filter_mode: config.filter_mode,
            vocab_sort: config.vocab_sort,
            config,
            engine,
            words,
            session: None,
            last_summary: None,
            quiz_type: QuizType::EnToZh,
            years: YearSelection::default(),
            year_cursor: 0,
            count,
            pool_size: 0,
            option_selected: 0,
            vocab_scroll: 0,
            history: Vec::new(),
            history_scroll: 0,
            passcode: LineInput::new("").with_max_len(PASSCODE_MAX_LEN),
            admin_tab: AdminTab::Import,
            import_input: LineInput::new("").multiline(),
            import_preview: None,
            manage_selected: 0,
            confirm_delete: false,
            status: None,
            should_quit: false,
            rng,
        }
    }

    pub fn set_theme(&mut self, theme: &'static Theme) {
        self.theme = theme;
        self.menu.theme = theme;
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }

    fn warn(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Warning,
        });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Error,
        });
    }

    pub fn reload_words(&mut self) {
        self.words = self.engine.store().load_words();
    }

    /// Copy UI-adjusted preferences back into the config before it is saved.
    pub fn sync_config(&mut self) {
        self.config.vocab_sort = self.vocab_sort;
        self.config.filter_mode = self.filter_mode;
        self.config.count_mode = self.count.mode;
    }

    // --- navigation ---

    pub fn go_to_menu(&mut self) {
        self.engine.cancel_pending();
        self.session = None;
        self.confirm_delete = false;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_vocab(&mut self) {
        self.reload_words();
        self.vocab_scroll = 0;
        self.status = None;
        self.screen = AppScreen::Vocab;
    }

    pub fn go_to_quiz_setup(&mut self, quiz_type: QuizType) {
        self.engine.cancel_pending();
        self.session = None;
        self.reload_words();
        self.quiz_type = quiz_type;
        self.years = YearSelection::all_of(&self.words);
        self.year_cursor = 0;
        self.status = None;
        self.refresh_pool();
        self.screen = AppScreen::QuizSetup;
    }

    pub fn go_to_history(&mut self) {
        self.history = self.engine.store().load_history();
        self.history_scroll = 0;
        self.status = None;
        self.screen = AppScreen::History;
    }

    pub fn go_to_admin_login(&mut self) {
        self.passcode.clear();
        self.status = None;
        self.screen = AppScreen::AdminLogin;
    }

    // --- vocabulary ---

    pub fn sorted_words(&self) -> Vec<Word> {
        let mut words = self.words.clone();
        self.vocab_sort.apply(&mut words);
        words
    }

    pub fn cycle_vocab_sort(&mut self) {
        self.vocab_sort = self.vocab_sort.next();
        self.vocab_scroll = 0;
    }

    pub fn scroll_vocab(&mut self, delta: isize) {
        self.vocab_scroll = step(self.vocab_scroll, delta, self.words.len());
    }

    // --- quiz setup ---

    pub fn current_pool(&self) -> Vec<Word> {
        filter_pool(&self.words, &self.years, self.filter_mode)
    }

    pub fn refresh_pool(&mut self) {
        self.pool_size = self.current_pool().len();
        self.count.on_pool_changed(self.pool_size);
    }

    pub fn move_year_cursor(&mut self, delta: isize) {
        self.year_cursor = step(self.year_cursor, delta, self.years.years.len());
    }

    pub fn toggle_year(&mut self) {
        self.years.toggle(self.year_cursor);
        self.refresh_pool();
    }

    pub fn select_all_years(&mut self) {
        self.years.select_all();
        self.refresh_pool();
    }

    pub fn select_no_years(&mut self) {
        self.years.select_none();
        self.refresh_pool();
    }

    pub fn toggle_filter_mode(&mut self) {
        self.filter_mode = self.filter_mode.toggle();
        self.refresh_pool();
    }

    pub fn toggle_count_mode(&mut self) {
        self.count.mode = self.count.mode.toggle();
        self.count.on_pool_changed(self.pool_size);
    }

    pub fn toggle_quiz_type(&mut self) {
        self.quiz_type = match self.quiz_type {
            QuizType::EnToZh => QuizType::ZhToEn,
            QuizType::ZhToEn => QuizType::EnToZh,
        };
    }

    pub fn start_quiz(&mut self) {
        let pool = self.current_pool();
        let resolution = self.count.resolve(pool.len());
        match self
            .engine
            .start_from_pool(self.quiz_type, &pool, resolution.count, &mut self.rng)
        {
            Ok(session) => {
                if let Some(requested) = resolution.clamped_from {
                    self.warn(format!(
                        "Only {} words available, asked for {requested}",
                        resolution.count
                    ));
                } else {
                    self.status = None;
                }
                self.begin(session);
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn begin(&mut self, session: QuizSession) {
        self.session = Some(session);
        self.option_selected = 0;
        self.last_summary = None;
        self.screen = AppScreen::Quiz;
    }

    // --- quiz ---

    pub fn move_option(&mut self, delta: isize) {
        let len = self
            .session
            .as_ref()
            .and_then(|s| s.question.as_ref())
            .map_or(0, |q| q.options.len());
        self.option_selected = step(self.option_selected, delta, len);
    }

    pub fn answer_selected(&mut self) {
        self.answer_option(self.option_selected);
    }

    pub fn answer_option(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(selected) = session
            .question
            .as_ref()
            .and_then(|q| q.options.get(index))
            .cloned()
        else {
            return;
        };
        self.option_selected = index;
        if self
            .engine
            .answer(session, &selected, Instant::now())
            .is_some()
        {
            self.status = None;
        }
    }

    /// Skip the rest of the feedback pause.
    pub fn skip_wait(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let advance = self.engine.advance(session, &mut self.rng);
        self.on_advance(advance);
    }

    pub fn on_tick(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let advance = self.engine.poll(session, now, &mut self.rng);
        self.on_advance(advance);
    }

    fn on_advance(&mut self, advance: Option<Advance>) {
        match advance {
            Some(Advance::Next) => self.option_selected = 0,
            Some(Advance::Finished(summary)) => {
                self.last_summary = Some(summary);
                self.reload_words();
                self.screen = AppScreen::QuizResult;
            }
            None => {}
        }
    }

    pub fn retry_wrong(&mut self) {
        let Some(finished) = self.session.as_ref() else {
            return;
        };
        match self.engine.retry(finished, &mut self.rng) {
            Ok(session) => {
                self.status = None;
                self.begin(session);
            }
            Err(QuizError::NothingToRetry) => self.info("No missed words to retry"),
            Err(e) => self.error(e.to_string()),
        }
    }

    pub fn pending_remaining_ms(&self, now: Instant) -> Option<u128> {
        self.engine.pending_remaining(now).map(|d| d.as_millis())
    }

    // --- history ---

    pub fn scroll_history(&mut self, delta: isize) {
        self.history_scroll = step(self.history_scroll, delta, self.history.len());
    }

    // --- admin ---

    pub fn handle_passcode_input(&mut self, key: crossterm::event::KeyEvent) {
        match self.passcode.handle(key) {
            InputResult::Submit => self.submit_passcode(),
            InputResult::Cancel => self.go_to_menu(),
            InputResult::Continue => {}
        }
    }

    pub fn submit_passcode(&mut self) {
        let ok = admin::verify_passcode(&self.config, self.passcode.value());
        self.passcode.clear();
        if ok {
            info!("Admin panel unlocked");
            self.reload_words();
            self.admin_tab = AdminTab::Import;
            self.import_preview = None;
            self.manage_selected = 0;
            self.confirm_delete = false;
            self.status = None;
            self.screen = AppScreen::Admin;
        } else {
            warn!("Rejected admin passcode");
            self.error("Wrong passcode");
        }
    }

    pub fn switch_admin_tab(&mut self) {
        self.admin_tab = match self.admin_tab {
            AdminTab::Import => AdminTab::Manage,
            AdminTab::Manage => AdminTab::Import,
        };
        self.confirm_delete = false;
        self.import_preview = None;
    }

    pub fn handle_import_input(&mut self, key: crossterm::event::KeyEvent) {
        match self.import_input.handle(key) {
            InputResult::Submit => self.preview_import(),
            InputResult::Cancel => self.go_to_menu(),
            InputResult::Continue => {}
        }
    }

    pub fn preview_import(&mut self) {
        let preview = admin::preview_import(self.import_input.value());
        if preview.is_empty() {
            self.warn("No valid year/english/chinese lines to import");
            return;
        }
        self.status = None;
        self.import_preview = Some(preview);
    }

    pub fn cancel_import_preview(&mut self) {
        self.import_preview = None;
    }

    pub fn confirm_import(&mut self) {
        let Some(preview) = self.import_preview.take() else {
            return;
        };
        match admin::commit_import(self.engine.store(), &preview, self.config.stable_word_ids) {
            Ok(added) => {
                self.import_input.clear();
                self.reload_words();
                let skipped = if preview.rejected > 0 {
                    format!(", skipped {} lines", preview.rejected)
                } else {
                    String::new()
                };
                self.info(format!("Imported {added} words{skipped}"));
            }
            Err(e) => {
                warn!(error = %e, "Import failed");
                self.error(format!("Import failed: {e}"));
            }
        }
    }

    pub fn move_manage_cursor(&mut self, delta: isize) {
        self.manage_selected = step(self.manage_selected, delta, self.words.len());
    }

    pub fn request_delete(&mut self) {
        if !self.words.is_empty() {
            self.confirm_delete = true;
        }
    }

    pub fn confirm_delete_selected(&mut self) {
        self.confirm_delete = false;
        match admin::delete_at(self.engine.store(), self.manage_selected) {
            Ok(Some(removed)) => {
                self.reload_words();
                self.manage_selected = self.manage_selected.min(self.words.len().saturating_sub(1));
                self.info(format!("Deleted {} ({})", removed.en, removed.year));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Delete failed");
                self.error(format!("Delete failed: {e}"));
            }
        }
    }

    // --- feed ---

    pub fn on_feed(&mut self, outcome: Result<Vec<Word>, FeedError>) {
        match outcome {
            Ok(incoming) => {
                match feed::apply_feed(self.engine.store(), incoming, self.config.stable_word_ids) {
                    Ok(n) => {
                        self.reload_words();
                        if self.screen == AppScreen::QuizSetup {
                            self.years = YearSelection::all_of(&self.words);
                            self.year_cursor = 0;
                            self.refresh_pool();
                        }
                        self.info(format!("Word list updated ({n} words)"));
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to store refreshed word list");
                        self.error(format!("Could not save word list: {e}"));
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Word feed unavailable, keeping saved words");
                self.warn(format!("Offline: {e}. Using saved words"));
            }
        }
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::vocab::pool::CountMode;
    use std::time::Duration;

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn app_with(words: Vec<Word>) -> App {
        let mut config = Config::default();
        config.answer_delay_ms = 0;
        App::with_rng(
            config,
            Box::new(MemoryStore::with_words(words)),
            theme(),
            SmallRng::seed_from_u64(42),
        )
    }

    fn sample() -> Vec<Word> {
        vec![
            Word::new("113", "dog", "狗"),
            Word::new("113", "cat", "貓"),
            Word::new("112", "bird", "鳥"),
        ]
    }

    fn answer_current_correctly(app: &mut App) {
        let session = app.session.as_ref().unwrap();
        let q = session.question.as_ref().unwrap();
        let idx = q.options.iter().position(|o| *o == q.correct_answer).unwrap();
        app.answer_option(idx);
        app.on_tick(Instant::now() + Duration::from_millis(1));
    }

    #[test]
    fn setup_pool_follows_year_selection() {
        let mut app = app_with(sample());
        app.go_to_quiz_setup(QuizType::EnToZh);
        assert_eq!(app.years.years, vec!["113".to_string(), "112".to_string()]);
        assert_eq!(app.pool_size, 3);
        app.year_cursor = 1;
        app.toggle_year();
        assert_eq!(app.pool_size, 2);
        app.select_no_years();
        assert_eq!(app.pool_size, 0);
    }

    #[test]
    fn empty_pool_shows_error_and_stays() {
        let mut app = app_with(sample());
        app.go_to_quiz_setup(QuizType::EnToZh);
        app.select_no_years();
        app.start_quiz();
        assert_eq!(app.screen, AppScreen::QuizSetup);
        assert!(app.session.is_none());
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn manual_count_above_pool_warns() {
        let mut app = app_with(sample());
        app.go_to_quiz_setup(QuizType::EnToZh);
        app.toggle_count_mode();
        assert_eq!(app.count.mode, CountMode::Manual);
        app.count.input = "9".to_string();
        app.start_quiz();
        assert_eq!(app.screen, AppScreen::Quiz);
        assert_eq!(app.session.as_ref().unwrap().total(), 3);
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Warning);
    }

    #[test]
    fn quiz_runs_to_result_and_records_history() {
        let mut app = app_with(sample());
        app.go_to_quiz_setup(QuizType::ZhToEn);
        app.start_quiz();
        while app.screen == AppScreen::Quiz {
            answer_current_correctly(&mut app);
        }
        assert_eq!(app.screen, AppScreen::QuizResult);
        assert_eq!(app.last_summary.unwrap().score_percent, 100);
        app.go_to_history();
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].detail, "3/3");

        app.retry_wrong();
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn leaving_quiz_drops_session() {
        let mut app = app_with(sample());
        app.go_to_quiz_setup(QuizType::EnToZh);
        app.start_quiz();
        app.answer_option(0);
        app.go_to_menu();
        app.on_tick(Instant::now() + Duration::from_secs(5));
        assert!(app.session.is_none());
        assert_eq!(app.screen, AppScreen::Menu);
        assert!(app.engine.store().load_history().is_empty());
    }

    #[test]
    fn admin_flow_imports_and_deletes() {
        let mut app = app_with(sample());
        app.go_to_admin_login();
        for ch in "0000".chars() {
            app.passcode
                .handle(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char(ch)));
        }
        app.submit_passcode();
        assert_eq!(app.screen, AppScreen::AdminLogin);

        for ch in "12345678".chars() {
            app.passcode
                .handle(crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Char(ch)));
        }
        app.submit_passcode();
        assert_eq!(app.screen, AppScreen::Admin);

        app.import_input = LineInput::new("111/fish/魚\nbroken").multiline();
        app.preview_import();
        assert_eq!(app.import_preview.as_ref().unwrap().rejected, 1);
        app.confirm_import();
        assert_eq!(app.words.len(), 4);

        app.switch_admin_tab();
        app.manage_selected = 0;
        app.request_delete();
        assert!(app.confirm_delete);
        app.confirm_delete_selected();
        assert_eq!(app.words.len(), 3);
        assert!(app.words.iter().all(|w| w.en != "dog"));
    }

    #[test]
    fn feed_failure_keeps_words() {
        let mut app = app_with(sample());
        app.on_feed(Err(FeedError::Http(503)));
        assert_eq!(app.words.len(), 3);
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Warning);

        app.on_feed(Ok(vec![Word::new("114", "sun", "太陽")]));
        assert_eq!(app.words.len(), 1);
    }
}
