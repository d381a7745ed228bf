use keydrill::config::Config;
use keydrill::feed::{Dictionary, UnitFeed};
use keydrill::letter::MaskMode;
use keydrill::record::{RecordSink, UnitRecord};
use keydrill::recovery::RECOVERY_DELAY;
use keydrill::session::{Session, SessionEvent};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Sink whose captured records stay inspectable after the session takes
/// ownership of its half
#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<UnitRecord>>>);

impl RecordSink for SharedSink {
    fn record(&mut self, rec: &UnitRecord) -> Result<(), Box<dyn Error>> {
        self.0.lock().unwrap().push(rec.clone());
        Ok(())
    }
}

fn type_all(session: &mut Session, text: &str) -> Vec<SessionEvent> {
    text.chars().flat_map(|c| session.handle_char(c)).collect()
}

#[test]
fn chapter_walkthrough_emits_one_record_per_word() {
    let sink = SharedSink::default();
    let records = sink.0.clone();
    let mut session = Session::new(Config::default(), Box::new(sink), 1200.0);

    let dict = Dictionary::load("starter").unwrap();
    let mut feed = UnitFeed::new(dict, 0);

    for _ in 0..5 {
        let entry = feed.current().unwrap().clone();
        session.seed_unit(&entry.name, false, feed.chapter_index(), feed.word_index());

        let events = type_all(&mut session, &entry.name);
        assert_eq!(events.last(), Some(&SessionEvent::UnitComplete));
        feed.advance();
    }

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 5);
    for rec in records.iter() {
        assert_eq!(rec.wrong_count, 0);
        assert!(!rec.is_article);
        assert_eq!(rec.letter_times.len(), rec.headword.chars().count());
        assert!(rec.mistakes.is_empty());
    }
}

#[test]
fn article_paragraph_completes_with_partial_recoveries() {
    let sink = SharedSink::default();
    let records = sink.0.clone();
    let mut session = Session::new(Config::default(), Box::new(sink), 1200.0);

    let dict = Dictionary::load("articles").unwrap();
    let entry = dict.entries[0].clone();
    session.seed_unit(&entry.name, true, 0, 0);

    // wrapped lines must reassemble the display text exactly
    let display = session.drill().unit().display_text.clone();
    let joined: String = session.lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(joined, display);

    // make a boundary mistake inside the first word, then let it recover
    let first_word_len = display
        .chars()
        .position(|c| c == '␣')
        .unwrap_or(display.chars().count());
    let chars: Vec<char> = display.chars().collect();
    let mono = Instant::now();
    for &c in &chars[..first_word_len - 1] {
        session.handle_char(c);
    }
    session.handle_char_at('~', chrono::Local::now(), mono);
    assert!(session.drill().has_wrong);
    assert!(session.on_tick(mono + RECOVERY_DELAY));
    assert!(session.drill().input.is_empty());

    // now type the whole paragraph cleanly
    for &c in &chars {
        let typed = if c == '␣' { ' ' } else { c };
        session.handle_char(typed);
    }

    assert!(session.drill().is_finished());
    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].wrong_count, 1);
    assert!(records[0].is_article);
}

#[test]
fn dictation_mask_example_cat_dog() {
    let mut config = Config::default();
    config.mask_mode = MaskMode::HideVowel;
    let mut session = Session::new(config, Box::new(SharedSink::default()), 1200.0);
    session.seed_unit("cat dog", false, 0, 0);

    let visible: Vec<bool> = (0..7).map(|i| session.letter_visible(i)).collect();
    assert_eq!(visible, vec![true, false, true, true, true, false, true]);

    let events = type_all(&mut session, "cat dog");
    assert_eq!(events.last(), Some(&SessionEvent::UnitComplete));
    assert_eq!(session.drill().correct_count, 7);
    assert_eq!(session.drill().wrong_count, 0);
    // every letter visible once typed
    assert!((0..7).all(|i| session.letter_visible(i)));
}

#[test]
fn real_time_lockout_recovery() {
    let mut session = Session::new(Config::default(), Box::new(SharedSink::default()), 1200.0);
    session.seed_unit("hello world", false, 0, 0);

    type_all(&mut session, "hellx");
    assert!(session.drill().has_wrong);
    assert_eq!(session.drill().input.len(), 5);

    // before the delay elapses nothing moves
    assert!(!session.on_tick(Instant::now()));

    std::thread::sleep(RECOVERY_DELAY + std::time::Duration::from_millis(50));
    assert!(session.on_tick(Instant::now()));
    assert!(session.drill().input.is_empty());
    assert!(!session.drill().has_wrong);
    assert_eq!(session.drill().wrong_count, 1);
}
