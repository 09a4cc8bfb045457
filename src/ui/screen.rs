use ratatui::Frame;

use crate::{app::App, controller::Phase, ui::caret_position};

/// A UI Screen boundary: responsible for painting one phase of the app
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Pre-session form: text, time budget and voice toggle
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Running session, with the terminal caret parked on the current word
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let area = f.area();
        f.render_widget(app, area);
        if let Some(position) = caret_position(app, area) {
            f.set_cursor_position(position);
        }
    }
}

/// Final summary once the words or the time ran out
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle => Box::new(IdleScreen),
        Phase::Active => Box::new(TypingScreen),
        Phase::Finished => Box::new(SummaryScreen),
    }
}
