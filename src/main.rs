pub mod config;
pub mod drill;
pub mod feed;
pub mod letter;
pub mod record;
pub mod recovery;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod unit;
pub mod util;
pub mod viewport;
pub mod wrap;

use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::feed::{Dictionary, UnitFeed};
use crate::letter::MaskMode;
use crate::record::{CsvPracticeLog, MultiSink, RecordSink, SqliteRecordStore};
use crate::runtime::{CrosstermEventSource, FixedTicker, Runner, TrainerEvent};
use crate::session::{Session, SessionEvent};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};

/// terminal typing trainer with dictation masking and article practice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing trainer: practice word lists or whole article paragraphs, hide letters dictation-style, and track your mistakes and speed over time."
)]
pub struct Cli {
    /// bundled dictionary to practice from
    #[clap(short = 'd', long, default_value = "starter")]
    dictionary: String,

    /// chapter to practice (dictionaries are split into chapters of 20)
    #[clap(short = 'c', long, default_value_t = 1)]
    chapter: usize,

    /// hide letters you haven't typed yet, dictation style
    #[clap(short = 'm', long, value_enum)]
    mask_mode: Option<MaskMode>,

    /// compare input case-insensitively
    #[clap(long)]
    ignore_case: bool,

    /// strip punctuation from article text
    #[clap(long)]
    hide_punctuation: bool,

    /// disable the Tab reveal for masked letters
    #[clap(long)]
    no_reveal: bool,

    /// number of lines visible at once in article mode
    #[clap(long)]
    visible_lines: Option<usize>,

    /// list bundled dictionaries and exit
    #[clap(long)]
    list: bool,
}

impl Cli {
    /// Layer CLI switches over the stored configuration
    fn apply(&self, cfg: &mut Config) {
        if let Some(mask) = self.mask_mode {
            cfg.mask_mode = mask;
        }
        if self.ignore_case {
            cfg.case_insensitive = true;
        }
        if self.hide_punctuation {
            cfg.hide_punctuation_in_articles = true;
        }
        if self.no_reveal {
            cfg.reveal_on_hover = false;
        }
        if let Some(lines) = self.visible_lines {
            cfg.visible_line_count = lines.max(1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Summary,
}

pub struct App {
    pub session: Session,
    pub feed: UnitFeed,
    pub state: AppState,
    pub tip_visible: bool,
    pub trans: Option<String>,
    pub finished_units: usize,
    pub skipped_units: usize,
    pub total_mistakes: usize,
    pub avg_wpm: Option<f64>,
    pub most_missed: Vec<(String, i64)>,
}

impl App {
    pub fn new(cli: &Cli, config: Config, window_width_px: f64) -> Result<Self, Box<dyn Error>> {
        let dict = Dictionary::load(&cli.dictionary)?;
        let chapter = cli.chapter.saturating_sub(1).min(dict.chapter_count().saturating_sub(1));
        let feed = UnitFeed::new(dict, chapter);

        let mut sinks: Vec<Box<dyn RecordSink>> = vec![Box::new(CsvPracticeLog::new())];
        if let Ok(store) = SqliteRecordStore::new() {
            sinks.push(Box::new(store));
        }
        let session = Session::new(config, Box::new(MultiSink::new(sinks)), window_width_px);

        let mut app = Self {
            session,
            feed,
            state: AppState::Typing,
            tip_visible: false,
            trans: None,
            finished_units: 0,
            skipped_units: 0,
            total_mistakes: 0,
            avg_wpm: None,
            most_missed: Vec::new(),
        };
        app.seed_current();
        Ok(app)
    }

    fn seed_current(&mut self) {
        match self.feed.current() {
            Some(entry) => {
                self.trans = entry.trans.clone();
                self.session.seed_unit(
                    &entry.name,
                    self.feed.is_article(),
                    self.feed.chapter_index(),
                    self.feed.word_index(),
                );
            }
            None => self.finish(),
        }
    }

    fn advance_unit(&mut self) {
        if self.feed.advance() {
            self.seed_current();
        } else {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.state = AppState::Summary;
        if let Ok(store) = SqliteRecordStore::new() {
            self.avg_wpm = store.average_wpm().unwrap_or(None);
            self.most_missed = store.most_missed(5).unwrap_or_default();
        }
    }

    fn restart_chapter(&mut self) {
        let chapter = self.feed.chapter_index();
        let dict = self.feed.dict().clone();
        self.feed = UnitFeed::new(dict, chapter);
        self.state = AppState::Typing;
        self.tip_visible = false;
        self.finished_units = 0;
        self.skipped_units = 0;
        self.total_mistakes = 0;
        self.seed_current();
    }

    fn apply_events(&mut self, events: Vec<SessionEvent>) {
        for event in events {
            match event {
                SessionEvent::CorrectKey => {}
                SessionEvent::Mistake => self.total_mistakes += 1,
                SessionEvent::ShowTip => self.tip_visible = true,
                SessionEvent::UnitComplete => {
                    self.finished_units += 1;
                    self.advance_unit();
                }
                SessionEvent::ShouldSkip => {
                    self.skipped_units += 1;
                    self.advance_unit();
                }
            }
        }
    }
}

/// Terminal cells approximate glyphs of the configured font
pub fn window_width_px(cols: u16, font_size: f64) -> f64 {
    f64::from(cols) * font_size * 0.6
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list {
        for name in Dictionary::available() {
            println!("{name}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut config = FileConfigStore::new().load();
    cli.apply(&mut config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let cols = terminal.size().map(|s| s.width).unwrap_or(80);
    let font_size = config.font_size;
    let app = App::new(&cli, config, window_width_px(cols, font_size));

    let result = match app {
        Ok(mut app) => start_tui(&mut terminal, &mut app, font_size),
        Err(e) => Err(e),
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    font_size: f64,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            TrainerEvent::Tick => {
                app.session.on_tick(Instant::now());
            }
            TrainerEvent::Resize(cols, _) => {
                app.session.set_window_width(window_width_px(cols, font_size));
            }
            TrainerEvent::Key(key) => match app.state {
                AppState::Typing => match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Tab => app.session.toggle_reveal(),
                    KeyCode::Backspace => app.session.backspace(),
                    KeyCode::Char(c) => {
                        let events = app.session.handle_char(c);
                        app.apply_events(events);
                    }
                    _ => {}
                },
                AppState::Summary => match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('r') => app.restart_chapter(),
                    _ => {}
                },
            },
        }
    }

    Ok(())
}
