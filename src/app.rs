use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{Controller, Phase, SessionEvent, Transition};
use crate::input::InputBuffer;
use crate::session::TimeBudget;

/// Settings resolved from the config file and command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub budget: TimeBudget,
    pub voice_enabled: bool,
    pub custom_text: String,
    pub start_immediately: bool,
    pub speech_command: Option<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            budget: TimeBudget::default(),
            voice_enabled: false,
            custom_text: String::new(),
            start_immediately: false,
            speech_command: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Everything the screen shows: the controller plus the pre-session form.
pub struct App {
    pub controller: Controller,
    pub input: InputBuffer,
    pub custom_text: String,
    pub budget: TimeBudget,
    pub speech_command: Option<String>,
    /// Message for the idle screen, e.g. why a start was refused.
    pub notice: Option<String>,
}

impl App {
    pub fn new(settings: RuntimeSettings, controller: Controller) -> Self {
        let mut app = Self {
            controller: controller.with_voice(settings.voice_enabled),
            input: InputBuffer::new(),
            custom_text: settings.custom_text,
            budget: settings.budget,
            speech_command: settings.speech_command,
            notice: None,
        };

        if settings.start_immediately {
            app.start();
        }
        app
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// Current preferences, for saving on exit.
    pub fn settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            budget: self.budget,
            voice_enabled: self.controller.voice_enabled(),
            custom_text: self.custom_text.clone(),
            start_immediately: false,
            speech_command: self.speech_command.clone(),
        }
    }

    pub fn start(&mut self) {
        self.input.clear();
        match self.controller.dispatch(SessionEvent::StartRequested {
            text: self.custom_text.clone(),
            budget: self.budget,
        }) {
            Ok(_) => self.notice = None,
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    /// Reset and restart share this path.
    pub fn reset(&mut self) {
        self.input.clear();
        // reset never fails
        let _ = self.controller.dispatch(SessionEvent::ResetRequested);
    }

    pub fn on_tick(&mut self) -> Transition {
        self.controller
            .dispatch(SessionEvent::TickElapsed)
            .unwrap_or(Transition::Ignored)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
            KeyCode::Char('v') if ctrl => {
                let on = self.controller.toggle_voice();
                tracing::debug!(voice = on, "voice toggled");
                return KeyOutcome::Continue;
            }
            _ => {}
        }

        match self.phase() {
            Phase::Idle => self.on_idle_key(key, ctrl || alt),
            Phase::Active => {
                self.on_active_key(key, ctrl || alt);
                KeyOutcome::Continue
            }
            Phase::Finished => {
                match key.code {
                    KeyCode::Char('r') | KeyCode::Esc => self.reset(),
                    KeyCode::Char('q') => return KeyOutcome::Quit,
                    _ => {}
                }
                KeyOutcome::Continue
            }
        }
    }

    /// Pasted text only feeds the idle form; a running session is typed, not pasted.
    pub fn on_paste(&mut self, text: &str) {
        if self.phase() != Phase::Idle {
            tracing::debug!(phase = %self.phase(), "paste ignored");
            return;
        }
        self.custom_text.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
        self.notice = None;
    }

    fn on_idle_key(&mut self, key: KeyEvent, modified: bool) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Enter => self.start(),
            KeyCode::Tab | KeyCode::Right => self.budget = self.budget.next(),
            KeyCode::BackTab | KeyCode::Left => self.budget = self.budget.prev(),
            KeyCode::Backspace => {
                self.custom_text.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.custom_text.clear()
            }
            KeyCode::Char(c) if !modified => {
                self.custom_text.push(c);
                self.notice = None;
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn on_active_key(&mut self, key: KeyEvent, modified: bool) {
        let event = match key.code {
            KeyCode::Esc => {
                self.reset();
                return;
            }
            KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.delete_word()
            }
            KeyCode::Char(c) if !modified => self.input.push(c),
            KeyCode::Backspace => self.input.backspace(),
            _ => return,
        };

        if let Err(err) = self.controller.dispatch(event) {
            tracing::warn!(%err, "input rejected");
        }
    }
}
