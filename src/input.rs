use crate::controller::SessionEvent;

/// Live text-entry buffer for the word being typed.
///
/// Every edit yields the event the controller should see. A trailing space
/// submits the word and empties the buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn push(&mut self, c: char) -> SessionEvent {
        self.text.push(c);
        self.changed()
    }

    pub fn backspace(&mut self) -> SessionEvent {
        self.text.pop();
        self.changed()
    }

    /// Ctrl-W. The buffer never holds more than the current word.
    pub fn delete_word(&mut self) -> SessionEvent {
        self.text.clear();
        self.changed()
    }

    fn changed(&mut self) -> SessionEvent {
        let event = SessionEvent::from_input(&self.text);
        if matches!(event, SessionEvent::WordSubmitted(_)) {
            self.text.clear();
        }
        event
    }
}
