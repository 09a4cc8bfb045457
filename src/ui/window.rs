use std::ops::Range;

use crate::session::{Session, WordStatus};

/// Most words on screen at once.
pub const VISIBLE_WORDS: usize = 7;
/// Resolved words kept in view before the current one.
pub const TRAILING_WORDS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordView<'a> {
    Correct(&'a str),
    Incorrect(&'a str),
    /// `typed` is what the user entered, cut to the word's length; `remaining`
    /// is the untyped tail of the target word.
    Current { typed: String, remaining: &'a str },
    Upcoming(&'a str),
}

impl WordView<'_> {
    /// Characters as painted, without the separating space.
    pub fn display_text(&self) -> String {
        match self {
            WordView::Correct(w) | WordView::Incorrect(w) | WordView::Upcoming(w) => {
                (*w).to_string()
            }
            WordView::Current { typed, remaining } => format!("{typed}{remaining}"),
        }
    }
}

pub fn window_bounds(current: usize, word_count: usize) -> Range<usize> {
    let start = current.saturating_sub(TRAILING_WORDS).min(word_count);
    let end = word_count.min(start + VISIBLE_WORDS);
    start..end
}

/// Words to paint for `session`. With `highlight_current` off (finished
/// sessions) the word at the cursor is drawn as upcoming.
pub fn visible_window(session: &Session, highlight_current: bool) -> (Range<usize>, Vec<WordView<'_>>) {
    let words = session.words();
    let current = session.current_index();
    let bounds = window_bounds(current, words.len());

    let views = bounds
        .clone()
        .map(|idx| {
            let word = words[idx].as_str();
            match session.statuses()[idx] {
                WordStatus::Correct => WordView::Correct(word),
                WordStatus::Incorrect => WordView::Incorrect(word),
                WordStatus::Pending if highlight_current && idx == current => {
                    current_word_view(word, session.pending_input())
                }
                WordStatus::Pending => WordView::Upcoming(word),
            }
        })
        .collect();

    (bounds, views)
}

fn current_word_view<'a>(word: &'a str, pending_input: &str) -> WordView<'a> {
    let typed = pending_input.trim();
    let typed_len = typed.chars().count();
    let shown = typed_len.min(word.chars().count());

    let remaining = word
        .char_indices()
        .nth(typed_len)
        .map_or("", |(byte_idx, _)| &word[byte_idx..]);

    WordView::Current {
        typed: typed.chars().take(shown).collect(),
        remaining,
    }
}
