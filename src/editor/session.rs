//! State of one open file in the editor: the text buffer plus the record
//! lists the structured mode derives from it.
//!
//! Every record mutation regenerates the buffer right away, so the buffer
//! is always the single source of truth and the lists are a disposable view.

use tracing::debug;

use super::event_list::{generate_events_html, parse_events, Event};
use super::schedule::{generate_schedule_html, parse_schedule, ScheduleItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Code,
    Structured,
}

#[derive(Debug, Default)]
pub struct EditorSession {
    file_path: String,
    buffer: String,
    saved: String,
    mode: EditorMode,
    events: Vec<Event>,
    schedule: Vec<ScheduleItem>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with a freshly loaded file. Records from the
    /// previous file are discarded.
    pub fn load(&mut self, file_path: impl Into<String>, content: impl Into<String>) {
        let content = content.into();
        self.file_path = file_path.into();
        self.saved = content.clone();
        self.buffer = content;
        self.mode = EditorMode::Code;
        self.events.clear();
        self.schedule.clear();
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn schedule(&self) -> &[ScheduleItem] {
        &self.schedule
    }

    /// Raw text edit from the code view.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn has_changes(&self) -> bool {
        self.buffer != self.saved
    }

    pub fn mark_saved(&mut self) {
        self.saved = self.buffer.clone();
    }

    /// Seed both record lists from the current buffer.
    pub fn enter_structured_mode(&mut self) {
        self.events = parse_events(&self.buffer);
        self.schedule = parse_schedule(&self.buffer);
        self.mode = EditorMode::Structured;
        debug!(
            file = %self.file_path,
            events = self.events.len(),
            schedule = self.schedule.len(),
            "Entered structured mode"
        );
    }

    pub fn enter_code_mode(&mut self) {
        self.mode = EditorMode::Code;
    }

    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
        self.buffer = generate_events_html(&self.buffer, &self.events);
    }

    pub fn set_schedule(&mut self, schedule: Vec<ScheduleItem>) {
        self.schedule = schedule;
        self.buffer = generate_schedule_html(&self.buffer, &self.schedule);
    }

    /// Append a placeholder event and return its id.
    pub fn add_event(&mut self) -> String {
        let event = Event::placeholder();
        let id = event.id.clone();
        let mut events = std::mem::take(&mut self.events);
        events.push(event);
        self.set_events(events);
        id
    }

    /// Returns false when no event has `id`.
    pub fn update_event<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut Event),
    {
        let mut events = std::mem::take(&mut self.events);
        let found = match events.iter_mut().find(|e| e.id == id) {
            Some(event) => {
                edit(event);
                true
            }
            None => false,
        };
        self.set_events(events);
        found
    }

    pub fn remove_event(&mut self, id: &str) -> bool {
        let mut events = std::mem::take(&mut self.events);
        let before = events.len();
        events.retain(|e| e.id != id);
        let removed = events.len() != before;
        self.set_events(events);
        removed
    }

    /// Move an event to `index`, clamped to the end of the list.
    pub fn move_event(&mut self, id: &str, index: usize) -> bool {
        let mut events = std::mem::take(&mut self.events);
        let moved = move_item(&mut events, |e| e.id == id, index);
        self.set_events(events);
        moved
    }

    pub fn add_schedule_item(&mut self) -> String {
        let item = ScheduleItem::placeholder();
        let id = item.id.clone();
        let mut schedule = std::mem::take(&mut self.schedule);
        schedule.push(item);
        self.set_schedule(schedule);
        id
    }

    pub fn update_schedule_item<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut ScheduleItem),
    {
        let mut schedule = std::mem::take(&mut self.schedule);
        let found = match schedule.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                edit(item);
                true
            }
            None => false,
        };
        self.set_schedule(schedule);
        found
    }

    pub fn remove_schedule_item(&mut self, id: &str) -> bool {
        let mut schedule = std::mem::take(&mut self.schedule);
        let before = schedule.len();
        schedule.retain(|i| i.id != id);
        let removed = schedule.len() != before;
        self.set_schedule(schedule);
        removed
    }

    pub fn move_schedule_item(&mut self, id: &str, index: usize) -> bool {
        let mut schedule = std::mem::take(&mut self.schedule);
        let moved = move_item(&mut schedule, |i| i.id == id, index);
        self.set_schedule(schedule);
        moved
    }
}

fn move_item<T, P>(items: &mut Vec<T>, matches: P, index: usize) -> bool
where
    P: Fn(&T) -> bool,
{
    match items.iter().position(matches) {
        Some(from) => {
            let item = items.remove(from);
            let to = index.min(items.len());
            items.insert(to, item);
            true
        }
        None => false,
    }
}
