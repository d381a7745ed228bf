use crossterm::event::{KeyCode, KeyEvent};
use keydrill::config::Config;
use keydrill::record::NullSink;
use keydrill::runtime::{FixedTicker, Runner, TestEventSource, TrainerEvent};
use keydrill::session::Session;
use std::sync::mpsc;
use std::time::Duration;

/// Drive a session through the runner the way the binary does, without a
/// terminal attached.
#[test]
fn keystrokes_flow_from_runner_into_session() {
    let (tx, rx) = mpsc::channel();
    for c in "cancel".chars() {
        tx.send(TrainerEvent::Key(KeyEvent::from(KeyCode::Char(c))))
            .unwrap();
    }
    drop(tx);

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    let mut session = Session::new(Config::default(), Box::new(NullSink), 1200.0);
    session.seed_unit("cancel", false, 0, 0);

    loop {
        match runner.step() {
            TrainerEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    session.handle_char(c);
                }
            }
            TrainerEvent::Resize(cols, _) => {
                session.set_window_width(f64::from(cols) * 9.6);
            }
            // channel drained: the runner degrades to ticks
            TrainerEvent::Tick => break,
        }
    }

    assert!(session.drill().is_finished());
    assert_eq!(session.drill().correct_count, 6);
    assert_eq!(session.drill().wrong_count, 0);
}

#[test]
fn resize_events_change_geometry_only() {
    let (tx, rx) = mpsc::channel();
    tx.send(TrainerEvent::Resize(20, 10)).unwrap();
    drop(tx);

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    let mut session = Session::new(Config::default(), Box::new(NullSink), 1200.0);
    session.seed_unit(
        "the quick brown fox jumps over the lazy dog again and again",
        true,
        0,
        0,
    );
    let lines_before = session.lines().len();
    session.handle_char('t');

    if let TrainerEvent::Resize(cols, _) = runner.step() {
        session.set_window_width(f64::from(cols) * 9.6);
    } else {
        panic!("expected resize event");
    }

    assert!(session.lines().len() > lines_before);
    // typing state untouched by the resize
    assert_eq!(session.drill().input, vec!['t']);
}
