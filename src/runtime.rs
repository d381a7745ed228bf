use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Tick cadence of the main loop. Recovery deadlines are 300 ms, so a
/// lockout resolves within three or four ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the main loop reacts to: keys and resizes from the terminal,
/// plus a tick whenever the terminal stays quiet for an interval.
#[derive(Clone, Debug)]
pub enum TrainerEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Where trainer events come from. An implementation waits at most `wait`
/// before giving up; `None` means nothing arrived in time, or the source is
/// gone for good. The runner treats both as a tick.
pub trait EventSource: Send + 'static {
    fn poll(&self, wait: Duration) -> Option<TrainerEvent>;
}

fn translate(ev: CtEvent) -> Option<TrainerEvent> {
    match ev {
        CtEvent::Key(key) => Some(TrainerEvent::Key(key)),
        CtEvent::Resize(cols, rows) => Some(TrainerEvent::Resize(cols, rows)),
        _ => None,
    }
}

/// Terminal-backed source. crossterm's `read` blocks without a timeout, so
/// a reader thread forwards events into a channel the loop can wait on.
pub struct CrosstermEventSource {
    rx: Receiver<TrainerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(_) => break,
            };
            if let Some(ev) = translate(ev) {
                if tx.send(ev).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn poll(&self, wait: Duration) -> Option<TrainerEvent> {
        self.rx.recv_timeout(wait).ok()
    }
}

/// Channel-fed source for driving the loop without a terminal attached
pub struct TestEventSource {
    rx: Receiver<TrainerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TrainerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn poll(&self, wait: Duration) -> Option<TrainerEvent> {
        self.rx.recv_timeout(wait).ok()
    }
}

/// Decides how long the loop waits before synthesizing a tick
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Pairs a source with a ticker. `step` hands back the next event, or a
/// tick once the interval passes without one. A closed source also degrades
/// to ticks, which lets a headless driver drain a canned channel and then
/// fall through to tick handling.
pub struct Runner<E: EventSource, T: Ticker> {
    source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(source: E, ticker: T) -> Self {
        Self { source, ticker }
    }

    pub fn step(&self) -> TrainerEvent {
        self.source
            .poll(self.ticker.interval())
            .unwrap_or(TrainerEvent::Tick)
    }
}
