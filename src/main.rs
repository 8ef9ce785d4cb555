use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{debug, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use wordquiz::admin;
use wordquiz::app::{AdminTab, App, AppScreen, StatusKind};
use wordquiz::config::Config;
use wordquiz::event::{AppEvent, EventHandler};
use wordquiz::feed::{self, FeedSource};
use wordquiz::session::quiz::QuizType;
use wordquiz::store::WordStore;
use wordquiz::store::json_store::{JsonStore, default_data_dir};
use wordquiz::store::memory::MemoryStore;
use wordquiz::ui;
use wordquiz::ui::components::admin_panel::{ImportEditor, PasscodePrompt};
use wordquiz::ui::components::dashboard::Dashboard;
use wordquiz::ui::components::history_list::HistoryList;
use wordquiz::ui::components::menu::{MENU_HINTS, MenuAction};
use wordquiz::ui::components::progress_bar::ProgressBar;
use wordquiz::ui::components::question_card::QuestionCard;
use wordquiz::ui::components::quiz_setup::QuizSetup;
use wordquiz::ui::components::vocab_list::VocabList;
use wordquiz::ui::layout::{AppLayout, pack_hint_lines};
use wordquiz::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "wordquiz", version, about = "Terminal vocabulary flashcards and quizzes")]
struct Cli {
    #[arg(short, long, help = "Word feed URL or local file (year/english/chinese lines)")]
    feed: Option<String>,

    #[arg(long, help = "Skip the remote feed and use saved words")]
    offline: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_name = "FILE", help = "Append words from FILE and exit")]
    import: Option<PathBuf>,
}

fn setup_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "wordquiz.log");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    info!("Logging system initialized");
    Ok(())
}

fn open_store() -> Box<dyn WordStore> {
    match JsonStore::new() {
        Ok(store) => {
            debug!(dir = %store.base_dir().display(), "Using JSON store");
            Box::new(store)
        }
        Err(e) => {
            warn!(error = %e, "Data directory unavailable, progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

fn run_import(store: &dyn WordStore, path: &Path, stable_ids: bool) -> Result<()> {
    let (added, rejected) = admin::import_file(store, path, stable_ids)?;
    println!("Imported {added} words ({rejected} lines skipped)");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(&default_data_dir().join("logs")) {
        eprintln!("Logging disabled: {e}");
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Config unreadable, using defaults");
            Config::default()
        }
    };

    let store = open_store();
    if let Some(path) = cli.import.as_deref() {
        return run_import(store.as_ref(), path, config.stable_word_ids);
    }

    if let Err(e) = feed::seed_if_empty(store.as_ref(), config.stable_word_ids) {
        warn!(error = %e, "Failed to seed word list");
    }

    let theme_name = cli.theme.as_deref().unwrap_or(&config.theme);
    let theme = Theme::load(theme_name).unwrap_or_else(|| {
        warn!(theme = theme_name, "Unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let source = FeedSource::resolve(cli.feed.as_deref(), config.feed_url.as_deref(), cli.offline);
    let feed_timeout = config.feed_timeout();
    let mut app = App::new(config, store, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    if source != FeedSource::Bundled {
        info!(source = %source.describe(), "Refreshing word list");
        let tx = events.sender();
        feed::spawn_refresh(source, feed_timeout, move |outcome| {
            let _ = tx.send(AppEvent::Feed(outcome));
        });
    }

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.sync_config();
    if let Err(e) = app.config.save() {
        warn!(error = %e, "Failed to save config");
    }

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::Feed(outcome) => app.on_feed(outcome),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Vocab => handle_vocab_key(app, key),
        AppScreen::QuizSetup => handle_setup_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuizResult => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
        AppScreen::AdminLogin => app.handle_passcode_input(key),
        AppScreen::Admin => handle_admin_key(app, key),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Vocab => app.go_to_vocab(),
        MenuAction::QuizEnToZh => app.go_to_quiz_setup(QuizType::EnToZh),
        MenuAction::QuizZhToEn => app.go_to_quiz_setup(QuizType::ZhToEn),
        MenuAction::History => app.go_to_history(),
        MenuAction::Admin => app.go_to_admin_login(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            if let Some(action) = app.menu.selected_action() {
                run_menu_action(app, action);
            }
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_menu_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_vocab_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_vocab(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_vocab(-1),
        KeyCode::PageDown => app.scroll_vocab(10),
        KeyCode::PageUp => app.scroll_vocab(-10),
        KeyCode::Char('s') => app.cycle_vocab_sort(),
        _ => {}
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.move_year_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_year_cursor(-1),
        KeyCode::Char(' ') => app.toggle_year(),
        KeyCode::Char('a') => app.select_all_years(),
        KeyCode::Char('n') => app.select_no_years(),
        KeyCode::Char('f') => app.toggle_filter_mode(),
        KeyCode::Char('m') => app.toggle_count_mode(),
        KeyCode::Char('t') => app.toggle_quiz_type(),
        KeyCode::Char(ch) if ch.is_ascii_digit() => app.count.push_digit(ch),
        KeyCode::Backspace => app.count.backspace(),
        KeyCode::Enter => app.start_quiz(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        app.go_to_menu();
        return;
    }

    let answering = app.session.as_ref().is_some_and(|s| s.is_answering());
    if answering {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            app.skip_wait();
        }
        return;
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.move_option(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_option(-1),
        KeyCode::Enter | KeyCode::Char(' ') => app.answer_selected(),
        KeyCode::Char(ch @ '1'..='4') => app.answer_option(ch as usize - '1' as usize),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry_wrong(),
        KeyCode::Char('n') => app.go_to_quiz_setup(app.quiz_type),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_history(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_history(-1),
        _ => {}
    }
}

fn handle_admin_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::BackTab {
        app.switch_admin_tab();
        return;
    }

    match app.admin_tab {
        AdminTab::Import => {
            if app.import_preview.is_some() {
                match key.code {
                    KeyCode::Enter => app.confirm_import(),
                    KeyCode::Esc => app.cancel_import_preview(),
                    _ => {}
                }
            } else {
                app.handle_import_input(key);
            }
        }
        AdminTab::Manage => {
            if app.confirm_delete {
                match key.code {
                    KeyCode::Char('y') => app.confirm_delete_selected(),
                    KeyCode::Char('n') | KeyCode::Esc => app.confirm_delete = false,
                    _ => {}
                }
                return;
            }
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
                KeyCode::Down | KeyCode::Char('j') => app.move_manage_cursor(1),
                KeyCode::Up | KeyCode::Char('k') => app.move_manage_cursor(-1),
                KeyCode::PageDown => app.move_manage_cursor(10),
                KeyCode::PageUp => app.move_manage_cursor(-10),
                KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
                _ => {}
            }
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Vocab => render_vocab(frame, app),
        AppScreen::QuizSetup => render_setup(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::QuizResult => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
        AppScreen::AdminLogin => render_admin_login(frame, app),
        AppScreen::Admin => render_admin(frame, app),
    }
}

/// Split the frame, draw the header and footer, and hand back the body area.
fn frame_screen(frame: &mut ratatui::Frame, app: &App, title: &str, hints: &[&str]) -> Rect {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hint_lines = pack_hint_lines(hints, area.width as usize);
    let status_rows = u16::from(app.status.is_some());
    let layout = AppLayout::new(area, hint_lines.len() as u16 + status_rows);

    let header_info = format!(" {title} | {} words", app.words.len());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " wordquiz ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let mut footer_lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.success(),
            StatusKind::Warning => colors.warning(),
            StatusKind::Error => colors.error(),
        };
        footer_lines.push(Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }
    footer_lines.extend(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted())))),
    );
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);

    layout.main
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let main = frame_screen(
        frame,
        app,
        "Menu",
        MENU_HINTS,
    );
    let menu_area = ui::layout::centered_rect(50, 90, main);
    frame.render_widget(&app.menu, menu_area);
}

fn render_vocab(frame: &mut ratatui::Frame, app: &App) {
    let title = format!("Words \u{00b7} sorted by {}", app.vocab_sort.label());
    let main = frame_screen(
        frame,
        app,
        &title,
        &["[j/k] Scroll", "[s] Change sort", "[q] Back"],
    );
    let words = app.sorted_words();
    let list = VocabList::new("Vocabulary", &words, app.vocab_scroll, app.theme)
        .with_selected(app.vocab_scroll);
    frame.render_widget(list, main);
}

fn render_setup(frame: &mut ratatui::Frame, app: &App) {
    let main = frame_screen(
        frame,
        app,
        "Quiz setup",
        &[
            "[Space] Toggle year",
            "[a/n] All/None",
            "[f] Filter",
            "[m] Count mode",
            "[0-9] Count",
            "[t] Direction",
            "[Enter] Start",
            "[q] Back",
        ],
    );
    let area = ui::layout::centered_rect(70, 80, main);
    let setup = QuizSetup {
        quiz_type: app.quiz_type,
        years: &app.years,
        year_cursor: app.year_cursor,
        filter_mode: app.filter_mode,
        count: &app.count,
        pool_size: app.pool_size,
        theme: app.theme,
    };
    frame.render_widget(setup, area);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let hints: &[&str] = if session.is_answering() {
        &["[Enter] Next", "[q] Quit quiz"]
    } else {
        &["[j/k] Move", "[Enter] Answer", "[1-4] Pick", "[q] Quit quiz"]
    };
    let title = format!(
        "{} | {} correct, {} missed",
        session.quiz_type.label(),
        session.correct_count,
        session.wrong_list.len()
    );
    let main = frame_screen(frame, app, &title, hints);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(main);

    let label = format!("Question {}", (session.current_index + 1).min(session.total()));
    let progress = ProgressBar::new(&label, session.answered(), session.total(), app.theme);
    frame.render_widget(progress, layout[0]);

    if let Some(question) = session.question.as_ref() {
        let card_area = ui::layout::centered_rect(60, 90, layout[1]);
        let card = QuestionCard::new(
            question,
            session.feedback.as_ref(),
            app.option_selected,
            app.theme,
        );
        frame.render_widget(card, card_area);
    }
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let main = frame_screen(frame, app, "Results", &[]);
    if let (Some(summary), Some(session)) = (app.last_summary, app.session.as_ref()) {
        let area = ui::layout::centered_rect(60, 80, main);
        let dashboard = Dashboard::new(summary, session.quiz_type, &session.wrong_list, app.theme);
        frame.render_widget(dashboard, area);
    }
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let main = frame_screen(frame, app, "History", &["[j/k] Scroll", "[q] Back"]);
    let area = ui::layout::centered_rect(70, 90, main);
    frame.render_widget(HistoryList::new(&app.history, app.history_scroll, app.theme), area);
}

fn render_admin_login(frame: &mut ratatui::Frame, app: &App) {
    let main = frame_screen(frame, app, "Admin", &[]);
    let area = ui::layout::centered_rect(40, 30, main);
    frame.render_widget(
        PasscodePrompt {
            input: &app.passcode,
            theme: app.theme,
        },
        area,
    );
}

fn render_admin(frame: &mut ratatui::Frame, app: &App) {
    let hints: &[&str] = match (app.admin_tab, app.confirm_delete) {
        (AdminTab::Import, _) => &["[Shift+Tab] Manage words", "[Esc] Menu"],
        (AdminTab::Manage, true) => &["[y] Delete", "[n] Keep"],
        (AdminTab::Manage, false) => &[
            "[j/k] Move",
            "[x] Delete",
            "[Shift+Tab] Import",
            "[q] Menu",
        ],
    };
    let title = match app.admin_tab {
        AdminTab::Import => "Admin \u{00b7} Import",
        AdminTab::Manage => "Admin \u{00b7} Manage",
    };
    let main = frame_screen(frame, app, title, hints);

    match app.admin_tab {
        AdminTab::Import => {
            let editor = ImportEditor {
                input: &app.import_input,
                preview: app.import_preview.as_ref(),
                theme: app.theme,
            };
            frame.render_widget(editor, main);
        }
        AdminTab::Manage => {
            let title = if app.confirm_delete {
                let target = app
                    .words
                    .get(app.manage_selected)
                    .map(|w| format!("{} ({})", w.en, w.year))
                    .unwrap_or_default();
                format!("Delete {target}? [y/n]")
            } else {
                "Stored words".to_string()
            };
            let list = VocabList::new(&title, &app.words, app.manage_selected, app.theme)
                .with_selected(app.manage_selected);
            frame.render_widget(list, main);
        }
    }
}
