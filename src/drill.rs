use crate::letter::LetterState;
use crate::unit::{is_boundary, TypingUnit, EXPLICIT_SPACE};
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// What happened to one keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    /// Dropped by policy: no state change
    Rejected,
    Correct,
    /// The correct final character: the unit is done
    Finished,
    /// `locked` means the mistake triggered the lockout and a recovery
    /// timer should be scheduled
    Wrong { locked: bool },
}

/// Mutable typing state for one unit, owned by a single writer for the
/// lifetime of that unit. Discarded when the next unit is seeded.
#[derive(Debug)]
pub struct Drill {
    unit: TypingUnit,
    chars: Vec<char>,
    /// Characters accepted so far; spaces are stored as the explicit glyph
    pub input: Vec<char>,
    /// One entry per character of the display text
    pub letter_states: Vec<LetterState>,
    /// An uncorrected mistake currently blocks input
    pub has_wrong: bool,
    pub correct_count: usize,
    pub wrong_count: usize,
    /// Position -> every incorrect character typed there, in order
    pub mistakes: HashMap<usize, Vec<char>>,
    /// One timestamp per accepted letter; cleared on a non-article mistake
    pub letter_times: Vec<DateTime<Local>>,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    case_insensitive: bool,
}

impl Drill {
    pub fn new(unit: TypingUnit, case_insensitive: bool) -> Self {
        let chars = unit.chars();
        let letter_states = vec![LetterState::Normal; chars.len()];
        Self {
            unit,
            chars,
            input: Vec::new(),
            letter_states,
            has_wrong: false,
            correct_count: 0,
            wrong_count: 0,
            mistakes: HashMap::new(),
            letter_times: Vec::new(),
            started_at: Local::now(),
            finished_at: None,
            case_insensitive,
        }
    }

    pub fn unit(&self) -> &TypingUnit {
        &self.unit
    }

    pub fn display_chars(&self) -> &[char] {
        &self.chars
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn any_wrong(&self) -> bool {
        self.letter_states.contains(&LetterState::Wrong)
    }

    fn chars_equal(&self, typed: char, expected: char) -> bool {
        if self.case_insensitive {
            typed.to_lowercase().eq(expected.to_lowercase())
        } else {
            typed == expected
        }
    }

    /// Append one typed character and classify it.
    ///
    /// Append policy: in non-article mode any input is rejected while an
    /// uncorrected mistake is pending; in article mode only a space is
    /// rejected while a wrong letter exists, so the word can still be
    /// finished but the boundary cannot be crossed.
    pub fn type_char(&mut self, c: char, now: DateTime<Local>) -> Keystroke {
        if self.is_finished() || self.chars.is_empty() || self.input.len() >= self.chars.len() {
            return Keystroke::Rejected;
        }

        if self.unit.is_article {
            if c == ' ' && (self.has_wrong || self.any_wrong()) {
                return Keystroke::Rejected;
            }
        } else if self.has_wrong {
            return Keystroke::Rejected;
        }

        let stored = if c == ' ' { EXPLICIT_SPACE } else { c };
        self.input.push(stored);

        let pos = self.input.len() - 1;
        let expected = self.chars[pos];

        if self.chars_equal(stored, expected) {
            self.letter_states[pos] = LetterState::Correct;
            self.letter_times.push(now);
            self.correct_count += 1;

            if self.input.len() == self.chars.len() {
                self.finished_at = Some(now);
                return Keystroke::Finished;
            }
            return Keystroke::Correct;
        }

        self.letter_states[pos] = LetterState::Wrong;
        self.wrong_count += 1;
        self.mistakes.entry(pos).or_default().push(stored);

        let locked = if self.unit.is_article {
            // A mistake locks only at a word edge; strictly inside a word the
            // user may keep typing toward the boundary
            match self.chars.get(pos + 1) {
                None => true,
                Some(&next) => is_boundary(next),
            }
        } else {
            self.letter_times.clear();
            true
        };

        if locked {
            self.has_wrong = true;
        }

        Keystroke::Wrong { locked }
    }

    /// Remove the last character; a pending lockout is lifted since the
    /// flagged position is no longer covered by the buffer.
    pub fn backspace(&mut self) {
        if self.input.pop().is_none() {
            return;
        }
        let len = self.input.len();
        if let Some(state) = self.letter_states.get_mut(len) {
            *state = LetterState::Normal;
        }
        self.has_wrong = false;
    }

    /// Timed recovery after a lockout. Non-article units reset completely;
    /// article units truncate back to the start of the current word, keeping
    /// every earlier position marked correct.
    pub fn recover(&mut self) {
        if self.unit.is_article {
            // the last typed position holds the mistake; a boundary character
            // there belongs to the failed word, not to the reset point
            let mut word_start = 0;
            for i in (0..self.input.len().saturating_sub(1)).rev() {
                if is_boundary(self.chars[i]) {
                    word_start = i + 1;
                    break;
                }
            }

            self.input = self.chars[..word_start.min(self.chars.len())].to_vec();
            for (i, state) in self.letter_states.iter_mut().enumerate() {
                *state = if i < word_start {
                    LetterState::Correct
                } else {
                    LetterState::Normal
                };
            }
        } else {
            self.input.clear();
            for state in &mut self.letter_states {
                *state = LetterState::Normal;
            }
        }
        self.has_wrong = false;
    }
}
