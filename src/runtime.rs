use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Session clock cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Bracketed paste, delivered in one piece.
    Paste(String),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait AppEventSource: Send + 'static {
    /// Block until an event arrives.
    fn recv(&self) -> Result<AppEvent, RecvError>;
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // release/repeat events are reported on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(AppEvent::Key(key))
                }
                Ok(CtEvent::Paste(text)) => tx.send(AppEvent::Paste(text)),
                Ok(CtEvent::Resize(_, _)) => tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(%err, "terminal event stream failed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
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

impl AppEventSource for CrosstermEventSource {
    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv(&self) -> Result<AppEvent, RecvError> {
        self.rx.recv()
    }

    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Wall clock used for live stats.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Periodic session clock as seen by the controller.
pub trait Timer {
    fn arm(&mut self);
    fn disarm(&mut self);
}

/// Deadline of the next tick, shared between the runner and the controller's timer.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_tick: Rc<Cell<Option<Instant>>>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: Rc::new(Cell::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick.get()
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick.get().is_some()
    }

    /// Handle for the controller; arming it starts the cadence from now.
    pub fn timer(&self) -> ScheduleTimer {
        ScheduleTimer {
            schedule: self.clone(),
        }
    }

    fn fired(&self, deadline: Instant) {
        self.next_tick.set(Some(deadline + self.interval));
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleTimer {
    schedule: TickSchedule,
}

impl Timer for ScheduleTimer {
    fn arm(&mut self) {
        let schedule = &self.schedule;
        schedule
            .next_tick
            .set(Some(Instant::now() + schedule.interval));
    }

    fn disarm(&mut self) {
        self.schedule.next_tick.set(None);
    }
}

/// Counts arm/disarm calls instead of scheduling anything. Clones share counts.
#[derive(Debug, Default, Clone)]
pub struct CountingTimer {
    arms: Rc<Cell<usize>>,
    disarms: Rc<Cell<usize>>,
}

impl CountingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arms(&self) -> usize {
        self.arms.get()
    }

    pub fn disarms(&self) -> usize {
        self.disarms.get()
    }

    pub fn is_armed(&self) -> bool {
        self.arms.get() > self.disarms.get()
    }
}

impl Timer for CountingTimer {
    fn arm(&mut self) {
        self.arms.set(self.arms.get() + 1);
    }

    fn disarm(&mut self) {
        self.disarms.set(self.disarms.get() + 1);
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: AppEventSource> {
    event_source: E,
    schedule: TickSchedule,
}

impl<E: AppEventSource> Runner<E> {
    pub fn new(event_source: E, schedule: TickSchedule) -> Self {
        Self {
            event_source,
            schedule,
        }
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    /// Returns the next event, or Tick once the armed deadline passes.
    /// While disarmed this blocks on input alone. `None` once the source is gone.
    pub fn step(&self) -> Option<AppEvent> {
        let Some(deadline) = self.schedule.next_tick() else {
            return self.event_source.recv().ok();
        };

        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => {
                self.schedule.fired(deadline);
                Some(AppEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
