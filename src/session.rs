use crate::config::Config;
use crate::drill::{Drill, Keystroke};
use crate::letter::{self, LetterState};
use crate::record::{RecordSink, UnitRecord};
use crate::recovery::RecoveryTimer;
use crate::unit::TypingUnit;
use crate::util::{inter_key_intervals_ms, std_dev, words_per_minute};
use crate::viewport;
use crate::wrap::{self, WrappedLine};
use chrono::{DateTime, Local};
use std::ops::Range;
use std::time::Instant;

/// Mistakes on one unit before the caller is told to skip it
pub const SKIP_MISTAKES: usize = 4;
/// Mistakes on the very first unit of the very first chapter before the
/// one-time hint is surfaced
pub const TIP_MISTAKES: usize = 3;

/// Semantic feedback emitted by the session; sound and UI hooks subscribe
/// to these, the session itself never plays or draws anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    CorrectKey,
    Mistake,
    UnitComplete,
    ShouldSkip,
    ShowTip,
}

/// Drives one unit at a time: seeds state on unit change, feeds keystrokes
/// to the drill, schedules lockout recovery, tracks the typewriter viewport
/// and emits a record when the unit finishes.
pub struct Session {
    config: Config,
    sink: Box<dyn RecordSink>,
    drill: Drill,
    random_mask: Vec<bool>,
    timer: RecoveryTimer,
    lines: Vec<WrappedLine>,
    max_chars: usize,
    current_line: usize,
    revealing: bool,
    chapter_index: usize,
    word_index: usize,
    next_unit_id: u64,
    tip_shown: bool,
}

impl Session {
    pub fn new(config: Config, sink: Box<dyn RecordSink>, window_width_px: f64) -> Self {
        let max_chars = wrap::max_chars_per_line(window_width_px, config.font_size);
        let drill = Drill::new(TypingUnit::new(0, "", false, false), config.case_insensitive);
        Self {
            config,
            sink,
            drill,
            random_mask: Vec::new(),
            timer: RecoveryTimer::new(),
            lines: Vec::new(),
            max_chars,
            current_line: 0,
            revealing: false,
            chapter_index: 0,
            word_index: 0,
            next_unit_id: 1,
            tip_shown: false,
        }
    }

    /// Replace the active unit. Cancels any pending recovery so a stale
    /// timer can never touch the new unit's state.
    pub fn seed_unit(&mut self, headword: &str, is_article: bool, chapter: usize, word_index: usize) {
        let id = self.next_unit_id;
        self.next_unit_id += 1;

        self.timer.cancel();
        let unit = TypingUnit::new(
            id,
            headword,
            is_article,
            self.config.hide_punctuation_in_articles,
        );
        self.random_mask = letter::random_mask(unit.len());
        self.lines = wrap::wrap_lines(&unit.display_text, self.max_chars, is_article);
        self.drill = Drill::new(unit, self.config.case_insensitive);
        self.current_line = 0;
        self.revealing = false;
        self.chapter_index = chapter;
        self.word_index = word_index;
    }

    pub fn drill(&self) -> &Drill {
        &self.drill
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handle_char(&mut self, c: char) -> Vec<SessionEvent> {
        self.handle_char_at(c, Local::now(), Instant::now())
    }

    /// Keystroke entry point with explicit clocks, used directly by tests
    pub fn handle_char_at(
        &mut self,
        c: char,
        wall: DateTime<Local>,
        mono: Instant,
    ) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        match self.drill.type_char(c, wall) {
            Keystroke::Rejected => return events,
            Keystroke::Correct => events.push(SessionEvent::CorrectKey),
            Keystroke::Finished => {
                self.emit_record();
                events.push(SessionEvent::UnitComplete);
            }
            Keystroke::Wrong { locked } => {
                events.push(SessionEvent::Mistake);
                if locked {
                    self.timer.schedule(self.drill.unit().id, mono);
                }
                if self.drill.wrong_count >= SKIP_MISTAKES {
                    events.push(SessionEvent::ShouldSkip);
                }
                if self.chapter_index == 0
                    && self.word_index == 0
                    && self.drill.wrong_count >= TIP_MISTAKES
                    && !self.tip_shown
                {
                    self.tip_shown = true;
                    events.push(SessionEvent::ShowTip);
                }
            }
        }

        self.refresh_current_line();
        events
    }

    pub fn backspace(&mut self) {
        self.drill.backspace();
        // the lockout was lifted, so the pending recovery no longer applies
        self.timer.cancel();
        self.refresh_current_line();
    }

    /// Tick callback; returns true when a lockout recovery ran so the
    /// caller knows to redraw.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.timer.fire_if_due(self.drill.unit().id, now) {
            self.drill.recover();
            self.refresh_current_line();
            return true;
        }
        false
    }

    /// Resize recomputes geometry only; typing state is never touched
    pub fn set_window_width(&mut self, window_width_px: f64) {
        self.max_chars = wrap::max_chars_per_line(window_width_px, self.config.font_size);
        self.lines = wrap::wrap_lines(
            &self.drill.unit().display_text,
            self.max_chars,
            self.drill.unit().is_article,
        );
        self.refresh_current_line();
    }

    pub fn set_reveal(&mut self, revealing: bool) {
        self.revealing = revealing;
    }

    pub fn toggle_reveal(&mut self) {
        self.revealing = !self.revealing;
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    pub fn letter_visible(&self, index: usize) -> bool {
        let letter = match self.drill.display_chars().get(index) {
            Some(&c) => c,
            None => return true,
        };
        let state = self
            .drill
            .letter_states
            .get(index)
            .copied()
            .unwrap_or(LetterState::Normal);
        let revealing = self.config.reveal_on_hover && self.revealing;
        letter::letter_visible(
            index,
            letter,
            state,
            self.config.mask_mode,
            &self.random_mask,
            revealing,
        )
    }

    pub fn lines(&self) -> &[WrappedLine] {
        &self.lines
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    pub fn visible_range(&self) -> Range<usize> {
        if !self.drill.unit().is_article {
            return 0..self.lines.len().min(1);
        }
        viewport::visible_range(
            self.current_line,
            self.config.visible_line_count,
            self.lines.len(),
        )
    }

    pub fn random_mask(&self) -> &[bool] {
        &self.random_mask
    }

    fn refresh_current_line(&mut self) {
        self.current_line = viewport::line_index_for(self.drill.input.len(), &self.lines);
    }

    fn emit_record(&mut self) {
        let drill = &self.drill;
        let unit = drill.unit();
        let finished_at = drill.finished_at.unwrap_or_else(Local::now);
        let elapsed_secs = (finished_at - drill.started_at).num_milliseconds() as f64 / 1000.0;
        let wpm = words_per_minute(unit.len(), elapsed_secs);
        let rhythm = std_dev(&inter_key_intervals_ms(&drill.letter_times)).unwrap_or(0.0);

        let record = UnitRecord {
            headword: unit.headword.clone(),
            is_article: unit.is_article,
            wrong_count: drill.wrong_count,
            letter_times: drill.letter_times.clone(),
            mistakes: drill.mistakes.clone(),
            wpm,
            rhythm_std_dev: rhythm,
            finished_at,
        };

        let _ = self.sink.record(&record);
    }
}
