use std::time::Duration;

use assert_matches::assert_matches;
use wordpace::controller::{Controller, Phase, SessionEvent, Transition};
use wordpace::error::SessionError;
use wordpace::narrator::RecordingNarrator;
use wordpace::runtime::{CountingTimer, ManualClock};
use wordpace::samples::SampleSet;
use wordpace::session::{TimeBudget, WordStatus};
use wordpace::ui::window::{visible_window, window_bounds};

struct Rig {
    controller: Controller,
    narrator: RecordingNarrator,
    timer: CountingTimer,
    clock: ManualClock,
}

fn rig() -> Rig {
    let narrator = RecordingNarrator::new();
    let timer = CountingTimer::new();
    let clock = ManualClock::new();
    let controller = Controller::new(
        SampleSet::builtin().unwrap(),
        Box::new(narrator.clone()),
        Box::new(timer.clone()),
        Box::new(clock.clone()),
    )
    .with_seed(1);
    Rig {
        controller,
        narrator,
        timer,
        clock,
    }
}

fn start(c: &mut Controller, text: &str, secs: u32) -> Result<Transition, SessionError> {
    c.dispatch(SessionEvent::StartRequested {
        text: text.into(),
        budget: TimeBudget::new(secs).unwrap(),
    })
}

/// Replays keystrokes the way the input surface reports them.
fn keystrokes(c: &mut Controller, text: &str) -> Vec<Transition> {
    let mut buffer = String::new();
    text.chars()
        .map(|ch| {
            buffer.push(ch);
            let t = c.input_changed(&buffer);
            if ch == ' ' {
                buffer.clear();
            }
            t
        })
        .collect()
}

fn check_counts(c: &Controller) {
    assert_eq!(c.correct() + c.incorrect(), c.current_index());
    if let Some(s) = c.session() {
        assert!(c.current_index() <= s.words().len());
    }
}

#[test]
fn cat_dog_finishes_when_words_run_out() {
    let mut r = rig();
    start(&mut r.controller, "cat dog", 60).unwrap();

    let transitions = keystrokes(&mut r.controller, "cat dg ");
    assert_eq!(transitions[3], Transition::Advanced(WordStatus::Correct));
    assert_matches!(transitions.last(), Some(Transition::Finished(summary)) => {
        assert_eq!(summary.words_typed, 2);
        assert_eq!(summary.accuracy, 50);
    });
    assert_eq!(r.controller.correct(), 1);
    assert_eq!(r.controller.incorrect(), 1);
    assert_eq!(r.controller.current_index(), 2);
    assert_eq!(r.controller.phase(), Phase::Finished);
}

#[test]
fn empty_text_uses_builtin_passage() {
    let mut r = rig();
    assert_matches!(start(&mut r.controller, "", 30), Ok(Transition::Started));
    assert!(!r.controller.session().unwrap().words().is_empty());
}

#[test]
fn ten_quiet_seconds_yield_zero_results() {
    let mut r = rig();
    start(&mut r.controller, "quiet please", 10).unwrap();

    let mut last = Transition::Ignored;
    for _ in 0..10 {
        r.clock.advance(Duration::from_secs(1));
        last = r.controller.dispatch(SessionEvent::TickElapsed).unwrap();
    }

    assert_matches!(last, Transition::Finished(summary) => {
        assert_eq!(summary.correct, 0);
        assert_eq!(summary.incorrect, 0);
        assert_eq!(summary.accuracy, 0);
        assert_eq!(summary.wpm, 0);
        assert_eq!(summary.elapsed_secs, 10);
    });
    assert_eq!((r.timer.arms(), r.timer.disarms()), (1, 1));
}

#[test]
fn counts_track_index_through_a_mixed_session() {
    let mut r = rig();
    start(&mut r.controller, "The quick brown fox jumps over the lazy dog", 120).unwrap();

    for (i, chunk) in ["the ", "quick ", "brwn ", " ", "jumps ", "ovr"]
        .iter()
        .enumerate()
    {
        r.clock.advance(Duration::from_secs(2));
        keystrokes(&mut r.controller, chunk);
        check_counts(&r.controller);
        let live = r.controller.live_stats();
        assert!(live.accuracy <= 100, "step {i}");
    }

    assert_eq!(r.controller.correct(), 2);
    assert_eq!(r.controller.incorrect(), 3);
}

#[test]
fn reset_is_idempotent() {
    let mut r = rig();
    for _ in 0..3 {
        assert_eq!(
            r.controller.dispatch(SessionEvent::ResetRequested).unwrap(),
            Transition::Reset
        );
        assert_eq!(r.controller.current_index(), 0);
        assert_eq!(r.controller.correct() + r.controller.incorrect(), 0);
    }

    start(&mut r.controller, "a b c", 60).unwrap();
    keystrokes(&mut r.controller, "a x ");
    r.controller.dispatch(SessionEvent::ResetRequested).unwrap();
    r.controller.dispatch(SessionEvent::ResetRequested).unwrap();

    assert_eq!(r.controller.phase(), Phase::Idle);
    assert_eq!(r.controller.current_index(), 0);
    assert_eq!(r.controller.correct(), 0);
    assert_eq!(r.controller.incorrect(), 0);
    assert_eq!(r.timer.disarms(), 1);
}

#[test]
fn muting_mid_session_only_silences_speech() {
    let mut r = rig();
    r.controller.set_voice_enabled(true);
    start(&mut r.controller, "red green blue", 60).unwrap();
    keystrokes(&mut r.controller, "red ");

    r.controller.set_voice_enabled(false);
    let transitions = keystrokes(&mut r.controller, "green blue ");

    assert_eq!(r.narrator.spoken(), vec!["red", "green"]);
    assert_matches!(transitions.last(), Some(Transition::Finished(summary)) => {
        assert_eq!(summary.correct, 3);
    });
}

#[test]
fn window_matches_anchor_rule() {
    assert_eq!(window_bounds(5, 20), 3..10);

    let mut r = rig();
    let text = (0..20).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    start(&mut r.controller, &text, 60).unwrap();
    keystrokes(&mut r.controller, "w0 w1 w2 w3 w4 ");

    let (bounds, views) = visible_window(r.controller.session().unwrap(), true);
    assert_eq!(bounds, 3..10);
    assert_eq!(views.len(), 7);
}
