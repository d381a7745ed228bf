use chrono::{DateTime, Local};
use itertools::Itertools;

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population standard deviation; None on an empty slice. Applied to
/// inter-key gaps this is the rhythm-consistency figure in a unit record.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    let mu = mean(data)?;
    let variance = data.iter().map(|v| (mu - v) * (mu - v)).sum::<f64>() / data.len() as f64;
    Some(variance.sqrt())
}

/// Standard chars-per-word convention: 5 characters count as one word
pub fn words_per_minute(char_count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (char_count as f64 / 5.0) * (60.0 / elapsed_secs)
}

/// Millisecond gaps between consecutive accepted-letter timestamps
pub fn inter_key_intervals_ms(times: &[DateTime<Local>]) -> Vec<f64> {
    times
        .iter()
        .tuple_windows()
        .map(|(a, b)| (*b - *a).num_milliseconds() as f64)
        .collect()
}
