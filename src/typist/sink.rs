use serde::Serialize;

/// The text box the simulator types into.
///
/// Mutations do not imply notification: the simulator calls
/// [`InputSink::notify_changed`] explicitly after each one.
pub trait InputSink {
    /// Whether it is currently the player's turn.
    fn is_active(&self) -> bool;
    fn set_text(&mut self, text: &str);
    fn append_char(&mut self, c: char);
    fn delete_last_char(&mut self);
    fn notify_changed(&mut self);
    fn submit(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum SinkEvent {
    SetText(String),
    Append(char),
    DeleteLast,
    Notify,
    Submit,
}

impl SinkEvent {
    /// True for events that change the text.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::SetText(_) | Self::Append(_) | Self::DeleteLast)
    }
}

/// A sink that keeps the text in memory and records every call.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub active: bool,
    text: String,
    events: Vec<SinkEvent>,
    submitted: Vec<String>,
}

impl MemorySink {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    /// Texts present at each `submit` call.
    pub fn submitted(&self) -> &[String] {
        &self.submitted
    }

    pub fn mutation_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_mutation()).count()
    }
}

impl InputSink for MemorySink {
    fn is_active(&self) -> bool {
        self.active
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.events.push(SinkEvent::SetText(text.to_string()));
    }

    fn append_char(&mut self, c: char) {
        self.text.push(c);
        self.events.push(SinkEvent::Append(c));
    }

    fn delete_last_char(&mut self) {
        self.text.pop();
        self.events.push(SinkEvent::DeleteLast);
    }

    fn notify_changed(&mut self) {
        self.events.push(SinkEvent::Notify);
    }

    fn submit(&mut self) {
        self.submitted.push(self.text.clone());
        self.events.push(SinkEvent::Submit);
    }
}
