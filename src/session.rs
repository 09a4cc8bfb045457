use std::fmt;
use std::time::Instant;

use crate::error::SessionError;

/// Splits source text on runs of whitespace, dropping empty fragments.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordStatus {
    Pending,
    Correct,
    Incorrect,
}

/// A whole-second time budget drawn from a fixed set of options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeBudget(u32);

impl TimeBudget {
    pub const OPTIONS: [TimeBudget; 7] = [
        TimeBudget(10),
        TimeBudget(15),
        TimeBudget(30),
        TimeBudget(45),
        TimeBudget(60),
        TimeBudget(120),
        TimeBudget(300),
    ];

    pub fn new(secs: u32) -> Result<Self, SessionError> {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|b| b.0 == secs)
            .ok_or_else(|| SessionError::UnsupportedBudget {
                secs,
                options: Self::OPTIONS
                    .iter()
                    .map(|b| b.0.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn secs(self) -> u32 {
        self.0
    }

    fn position(self) -> usize {
        Self::OPTIONS.iter().position(|b| *b == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::OPTIONS[(self.position() + 1) % Self::OPTIONS.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::OPTIONS.len();
        Self::OPTIONS[(self.position() + len - 1) % len]
    }
}

impl Default for TimeBudget {
    fn default() -> Self {
        TimeBudget(60)
    }
}

impl fmt::Display for TimeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::stats::format_timer(self.0))
    }
}

/// One practice run, from start until finish or reset.
#[derive(Debug, Clone)]
pub struct Session {
    words: Vec<String>,
    statuses: Vec<WordStatus>,
    current: usize,
    budget: TimeBudget,
    seconds_remaining: u32,
    started_at: Instant,
    correct: usize,
    incorrect: usize,
    chars_typed: usize,
    pending_input: String,
}

impl Session {
    pub fn new(text: &str, budget: TimeBudget, started_at: Instant) -> Result<Self, SessionError> {
        let words = split_words(text);
        if words.is_empty() {
            return Err(SessionError::NoWords);
        }

        Ok(Self {
            statuses: vec![WordStatus::Pending; words.len()],
            words,
            current: 0,
            budget,
            seconds_remaining: budget.secs(),
            started_at,
            correct: 0,
            incorrect: 0,
            chars_typed: 0,
            pending_input: String::new(),
        })
    }

    /// Classifies `typed` against the current word and advances past it.
    /// Returns `None` when every word has already been resolved.
    pub fn submit(&mut self, typed: &str) -> Option<WordStatus> {
        let target = self.words.get(self.current)?;

        let status = if typed == target.as_str() {
            self.correct += 1;
            WordStatus::Correct
        } else {
            self.incorrect += 1;
            WordStatus::Incorrect
        };

        self.chars_typed += typed.chars().count();
        self.statuses[self.current] = status;
        self.current += 1;
        self.pending_input.clear();

        Some(status)
    }

    pub fn set_pending_input(&mut self, input: &str) {
        self.pending_input.clear();
        self.pending_input.push_str(input);
    }

    /// Counts one second off the budget and returns what is left.
    pub fn tick(&mut self) -> u32 {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.current >= self.words.len()
    }

    pub fn is_out_of_time(&self) -> bool {
        self.seconds_remaining == 0
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn statuses(&self) -> &[WordStatus] {
        &self.statuses
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current).map(String::as_str)
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn budget(&self) -> TimeBudget {
        self.budget
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn incorrect(&self) -> usize {
        self.incorrect
    }

    pub fn words_typed(&self) -> usize {
        self.correct + self.incorrect
    }

    pub fn chars_typed(&self) -> usize {
        self.chars_typed
    }

    /// Seconds of the budget used so far, as counted by ticks.
    pub fn budget_elapsed_secs(&self) -> u32 {
        self.budget.secs() - self.seconds_remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> Session {
        Session::new(text, TimeBudget::default(), Instant::now()).unwrap()
    }

    fn assert_invariants(s: &Session) {
        assert_eq!(s.correct() + s.incorrect(), s.current_index());
        assert!(s.current_index() <= s.words().len());
        for (idx, status) in s.statuses().iter().enumerate() {
            if idx < s.current_index() {
                assert_ne!(*status, WordStatus::Pending);
            } else {
                assert_eq!(*status, WordStatus::Pending);
            }
        }
    }

    #[test]
    fn test_split_words_collapses_whitespace() {
        assert_eq!(
            split_words("  the\tquick \n\n brown  "),
            vec!["the", "quick", "brown"]
        );
        assert!(split_words(" \t\n").is_empty());
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_new_session_is_pending() {
        let s = session("one two three");

        assert_eq!(s.words().len(), 3);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.current_word(), Some("one"));
        assert_eq!(s.seconds_remaining(), 60);
        assert_eq!(s.chars_typed(), 0);
        assert_invariants(&s);
    }

    #[test]
    fn test_new_session_rejects_blank_text() {
        let err = Session::new("   ", TimeBudget::default(), Instant::now()).unwrap_err();
        assert_eq!(err, SessionError::NoWords);
    }

    #[test]
    fn test_submit_is_case_sensitive() {
        let mut s = session("the end");

        assert_eq!(s.submit("The"), Some(WordStatus::Incorrect));
        assert_eq!(s.submit("end"), Some(WordStatus::Correct));
        assert_eq!(s.correct(), 1);
        assert_eq!(s.incorrect(), 1);
        assert_invariants(&s);
    }

    #[test]
    fn test_submit_counts_chars_without_space() {
        let mut s = session("alpha beta gamma");

        s.submit("alpha");
        s.submit("bet");
        s.submit("gammaray");

        assert_eq!(s.chars_typed(), 5 + 3 + 8);
        assert!(s.is_exhausted());
        assert_invariants(&s);
    }

    #[test]
    fn test_submit_counts_unicode_scalars() {
        let mut s = session("café");
        s.submit("café");
        assert_eq!(s.chars_typed(), 4);
    }

    #[test]
    fn test_empty_submission_is_incorrect() {
        let mut s = session("word");
        assert_eq!(s.submit(""), Some(WordStatus::Incorrect));
        assert_eq!(s.chars_typed(), 0);
    }

    #[test]
    fn test_submit_past_end_is_rejected() {
        let mut s = session("solo");
        s.submit("solo");
        assert_eq!(s.submit("extra"), None);
        assert_eq!(s.current_index(), 1);
        assert_invariants(&s);
    }

    #[test]
    fn test_submit_clears_pending_input() {
        let mut s = session("one two");
        s.set_pending_input("on");
        assert_eq!(s.pending_input(), "on");

        s.submit("one");
        assert_eq!(s.pending_input(), "");
    }

    #[test]
    fn test_tick_counts_down_and_saturates() {
        let mut s = Session::new("a", TimeBudget::new(15).unwrap(), Instant::now()).unwrap();

        for expected in (0..15).rev() {
            assert_eq!(s.tick(), expected);
        }
        assert!(s.is_out_of_time());
        assert_eq!(s.tick(), 0);
        assert_eq!(s.budget_elapsed_secs(), 15);
    }

    #[test]
    fn test_time_budget_options() {
        assert_eq!(TimeBudget::new(10).unwrap().secs(), 10);
        assert_eq!(TimeBudget::new(30).unwrap().secs(), 30);
        assert!(matches!(
            TimeBudget::new(31),
            Err(SessionError::UnsupportedBudget { secs: 31, .. })
        ));
        assert_eq!(TimeBudget::default().secs(), 60);
    }

    #[test]
    fn test_time_budget_cycles() {
        let first = TimeBudget::OPTIONS[0];
        let last = TimeBudget::OPTIONS[TimeBudget::OPTIONS.len() - 1];

        assert_eq!(last.next(), first);
        assert_eq!(first.prev(), last);
        assert_eq!(first.next().prev(), first);
    }

    #[test]
    fn test_time_budget_display() {
        assert_eq!(TimeBudget::new(45).unwrap().to_string(), "45 seconds");
        assert_eq!(TimeBudget::new(120).unwrap().to_string(), "02:00");
    }
}
