//! Best-effort speech for the word about to be typed.
//!
//! At most one utterance is alive at a time: speaking a new word silences the
//! previous one first. Nothing here reports errors back to the session.

use std::cell::RefCell;
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

pub trait Narrator {
    /// Replace whatever is being said with `word`.
    fn speak(&mut self, word: &str);
    fn cancel(&mut self);
}

/// Narrator used when no speech engine is wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&mut self, _word: &str) {}
    fn cancel(&mut self) {}
}

/// Speaks by running an external text-to-speech program once per word.
#[derive(Debug)]
pub struct CommandNarrator {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
        }
    }

    /// The platform speech program, slowed to 0.9x its usual rate.
    pub fn system_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", vec!["-r".into(), "160".into()])
        } else {
            Self::new("espeak-ng", vec!["-s".into(), "157".into()])
        }
    }

    /// Parses a user supplied command line such as `"espeak -v en-gb"`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_owned);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, word: &str) {
        self.cancel();

        match Command::new(&self.program)
            .args(&self.args)
            .arg(word)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => self.child = Some(child),
            Err(err) => {
                tracing::debug!(program = %self.program, %err, "speech unavailable");
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            // the utterance may already be over; either way reap it
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    Spoken(String),
    Cancelled,
}

/// Records calls instead of speaking. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingNarrator {
    log: Rc<RefCell<Vec<Utterance>>>,
}

impl RecordingNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Vec<Utterance> {
        self.log.borrow().clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|u| match u {
                Utterance::Spoken(word) => Some(word.clone()),
                Utterance::Cancelled => None,
            })
            .collect()
    }
}

impl Narrator for RecordingNarrator {
    fn speak(&mut self, word: &str) {
        self.log.borrow_mut().push(Utterance::Spoken(word.to_string()));
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(Utterance::Cancelled);
    }
}
