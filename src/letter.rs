use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Per-position classification of a typed character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState {
    Normal,
    Correct,
    Wrong,
}

/// Dictation visibility policy for not-yet-typed letters
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum MaskMode {
    #[default]
    None,
    HideAll,
    HideVowel,
    HideConsonant,
    RandomHide,
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U')
}

/// Per-unit random visibility mask for `MaskMode::RandomHide`, decided once
/// at seed time with a 60% reveal probability.
pub fn random_mask(len: usize) -> Vec<bool> {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_bool(0.6)).collect()
}

/// Decide whether one character position is shown. Correct letters and the
/// reveal override always win over the mask.
pub fn letter_visible(
    index: usize,
    letter: char,
    state: LetterState,
    mask: MaskMode,
    random_mask: &[bool],
    revealing: bool,
) -> bool {
    if state == LetterState::Correct || revealing {
        return true;
    }

    match mask {
        MaskMode::None => true,
        MaskMode::HideAll => false,
        MaskMode::HideVowel => !is_vowel(letter),
        MaskMode::HideConsonant => is_vowel(letter),
        MaskMode::RandomHide => random_mask.get(index).copied().unwrap_or(true),
    }
}
