use std::time::Duration;

use crate::session::Session;

/// Rate per minute, rounded half away from zero. Zero when no time has passed.
fn per_minute(count: usize, elapsed_minutes: f64) -> u32 {
    if elapsed_minutes > 0.0 {
        (count as f64 / elapsed_minutes).round() as u32
    } else {
        0
    }
}

/// Correct share of typed words as a whole percentage, 0 when nothing was typed.
pub fn accuracy(correct: usize, words_typed: usize) -> u32 {
    if words_typed > 0 {
        ((correct as f64 / words_typed as f64) * 100.0).round() as u32
    } else {
        0
    }
}

/// Stats shown while a session is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveStats {
    pub wpm: u32,
    pub cpm: u32,
    pub accuracy: u32,
}

impl LiveStats {
    pub fn compute(correct: usize, incorrect: usize, chars_typed: usize, elapsed: Duration) -> Self {
        let words_typed = correct + incorrect;
        let elapsed_minutes = elapsed.as_secs_f64() / 60.0;

        Self {
            wpm: per_minute(words_typed, elapsed_minutes),
            cpm: per_minute(chars_typed, elapsed_minutes),
            accuracy: accuracy(correct, words_typed),
        }
    }

    pub fn of_session(session: &Session, elapsed: Duration) -> Self {
        Self::compute(
            session.correct(),
            session.incorrect(),
            session.chars_typed(),
            elapsed,
        )
    }
}

/// Results shown once a session has finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalSummary {
    pub wpm: u32,
    pub accuracy: u32,
    pub words_typed: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub elapsed_secs: u32,
}

impl FinalSummary {
    /// Elapsed time is the part of the budget consumed by ticks, not wall time.
    pub fn of_session(session: &Session) -> Self {
        let elapsed_secs = session.budget_elapsed_secs();
        let words_typed = session.words_typed();

        Self {
            wpm: per_minute(words_typed, elapsed_secs as f64 / 60.0),
            accuracy: accuracy(session.correct(), words_typed),
            words_typed,
            correct: session.correct(),
            incorrect: session.incorrect(),
            elapsed_secs,
        }
    }
}

/// `"<N> seconds"` under a minute, zero padded `MM:SS` otherwise.
pub fn format_timer(secs: u32) -> String {
    if secs < 60 {
        format!("{secs} seconds")
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
