use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::SessionError;
use crate::narrator::Narrator;
use crate::runtime::{Clock, Timer};
use crate::samples::SampleSet;
use crate::session::{Session, TimeBudget, WordStatus};
use crate::stats::{FinalSummary, LiveStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Active,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StartRequested { text: String, budget: TimeBudget },
    PartialInput(String),
    WordSubmitted(String),
    TickElapsed,
    ResetRequested,
}

impl SessionEvent {
    /// Classifies the live input buffer: a trailing space completes the word.
    pub fn from_input(buffer: &str) -> Self {
        if buffer.ends_with(' ') {
            SessionEvent::WordSubmitted(buffer.trim().to_string())
        } else {
            SessionEvent::PartialInput(buffer.to_string())
        }
    }
}

/// What a dispatched event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The event does not apply in the current phase.
    Ignored,
    Started,
    Typing,
    Advanced(WordStatus),
    Ticked { seconds_remaining: u32 },
    Finished(FinalSummary),
    Reset,
}

/// Drives one typing session at a time through Idle, Active and Finished.
pub struct Controller {
    phase: Phase,
    session: Option<Session>,
    live: LiveStats,
    summary: Option<FinalSummary>,
    voice_enabled: bool,
    samples: SampleSet,
    rng: StdRng,
    narrator: Box<dyn Narrator>,
    timer: Box<dyn Timer>,
    clock: Box<dyn Clock>,
}

impl Controller {
    pub fn new(
        samples: SampleSet,
        narrator: Box<dyn Narrator>,
        timer: Box<dyn Timer>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            phase: Phase::Idle,
            session: None,
            live: LiveStats::default(),
            summary: None,
            voice_enabled: false,
            samples,
            rng: StdRng::from_entropy(),
            narrator,
            timer,
            clock,
        }
    }

    pub fn with_voice(mut self, enabled: bool) -> Self {
        self.voice_enabled = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn live_stats(&self) -> LiveStats {
        self.live
    }

    pub fn summary(&self) -> Option<&FinalSummary> {
        self.summary.as_ref()
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    /// Takes effect at the next word boundary.
    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.voice_enabled = enabled;
    }

    pub fn toggle_voice(&mut self) -> bool {
        self.voice_enabled = !self.voice_enabled;
        self.voice_enabled
    }

    pub fn correct(&self) -> usize {
        self.session.as_ref().map_or(0, Session::correct)
    }

    pub fn incorrect(&self) -> usize {
        self.session.as_ref().map_or(0, Session::incorrect)
    }

    pub fn current_index(&self) -> usize {
        self.session.as_ref().map_or(0, Session::current_index)
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Result<Transition, SessionError> {
        match (self.phase, event) {
            (Phase::Idle, SessionEvent::StartRequested { text, budget }) => {
                self.start(&text, budget)
            }
            (Phase::Active, SessionEvent::PartialInput(buffer)) => Ok(self.on_partial(&buffer)),
            (Phase::Active, SessionEvent::WordSubmitted(word)) => Ok(self.on_submit(&word)),
            (Phase::Active, SessionEvent::TickElapsed) => Ok(self.on_tick()),
            (_, SessionEvent::ResetRequested) => Ok(self.reset()),
            _ => Ok(Transition::Ignored),
        }
    }

    /// Feeds the raw input buffer, as edited by the input surface.
    pub fn input_changed(&mut self, buffer: &str) -> Transition {
        // only WordSubmitted/PartialInput can come out of from_input, neither can fail
        self.dispatch(SessionEvent::from_input(buffer))
            .unwrap_or(Transition::Ignored)
    }

    fn start(&mut self, text: &str, budget: TimeBudget) -> Result<Transition, SessionError> {
        let text = self.samples.resolve(text, &mut self.rng).to_owned();

        let session = match Session::new(&text, budget, self.clock.now()) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(%err, "refusing to start session");
                return Err(err);
            }
        };

        tracing::info!(
            words = session.words().len(),
            budget_secs = budget.secs(),
            "session started"
        );

        self.session = Some(session);
        self.summary = None;
        self.live = LiveStats::default();
        self.phase = Phase::Active;
        self.timer.arm();
        self.refresh_live();
        self.speak_current();

        Ok(Transition::Started)
    }

    fn on_partial(&mut self, buffer: &str) -> Transition {
        if let Some(session) = self.session.as_mut() {
            session.set_pending_input(buffer);
        }
        self.refresh_live();
        Transition::Typing
    }

    fn on_submit(&mut self, word: &str) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Transition::Ignored;
        };
        let Some(status) = session.submit(word) else {
            return Transition::Ignored;
        };

        tracing::debug!(
            index = session.current_index() - 1,
            ?status,
            "word submitted"
        );

        if session.is_exhausted() {
            return self.finish();
        }

        self.refresh_live();
        self.speak_current();
        Transition::Advanced(status)
    }

    fn on_tick(&mut self) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Transition::Ignored;
        };
        let seconds_remaining = session.tick();
        self.refresh_live();

        if seconds_remaining == 0 {
            return self.finish();
        }
        Transition::Ticked { seconds_remaining }
    }

    fn finish(&mut self) -> Transition {
        self.timer.disarm();
        self.phase = Phase::Finished;
        self.narrator.cancel();

        let summary = self
            .session
            .as_ref()
            .map(FinalSummary::of_session)
            .unwrap_or_default();

        tracing::info!(
            wpm = summary.wpm,
            accuracy = summary.accuracy,
            words_typed = summary.words_typed,
            elapsed_secs = summary.elapsed_secs,
            "session finished"
        );

        self.summary = Some(summary);
        Transition::Finished(summary)
    }

    fn reset(&mut self) -> Transition {
        if self.phase == Phase::Active {
            self.timer.disarm();
        }
        self.narrator.cancel();

        if self.phase != Phase::Idle {
            tracing::info!(from = %self.phase, "session reset");
        }

        self.session = None;
        self.summary = None;
        self.live = LiveStats::default();
        self.phase = Phase::Idle;
        Transition::Reset
    }

    fn refresh_live(&mut self) {
        if let Some(session) = self.session.as_ref() {
            let elapsed = self.clock.now().saturating_duration_since(session.started_at());
            self.live = LiveStats::of_session(session, elapsed);
        }
    }

    /// Voice is checked here, not when the session started.
    fn speak_current(&mut self) {
        if !self.voice_enabled {
            return;
        }
        if let Some(word) = self.session.as_ref().and_then(Session::current_word) {
            self.narrator.speak(word);
        }
    }
}
