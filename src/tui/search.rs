use crate::debounce::Debouncer;
use std::time::{Duration, Instant};

pub const PLACEHOLDER: &str = "Search movies...";
pub const CLEAR_LABEL: &str = "Clear search";

/// Search input state for the TUI.
///
/// Every edit schedules a commit through the debouncer; `poll_commit`
/// returns the trimmed text once typing has paused. An empty commit means
/// the search was cleared.
pub struct SearchInput {
    pub query: String,
    pub cursor_pos: usize,
    pub focused: bool,
    debounce: Debouncer<()>,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new(crate::debounce::DEFAULT_DEBOUNCE)
    }
}

impl SearchInput {
    pub fn new(delay: Duration) -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
            focused: true,
            debounce: Debouncer::new(delay),
        }
    }

    /// Clear control is only offered when there is something to clear
    pub fn show_clear(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn poll_commit(&mut self, now: Instant) -> Option<String> {
        self.debounce
            .poll(now)
            .map(|()| self.query.trim().to_string())
    }

    /// Replace the whole text, as a paste would
    pub fn set_value(&mut self, value: &str, now: Instant) {
        self.query = value.to_string();
        self.cursor_pos = self.query.len();
        self.changed(now);
    }

    pub fn clear(&mut self, now: Instant) {
        self.query.clear();
        self.cursor_pos = 0;
        self.changed(now);
    }

    pub fn insert_char(&mut self, c: char, now: Instant) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.changed(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.cursor_pos > 0 {
            let prev = self.prev_boundary();
            self.query.remove(prev);
            self.cursor_pos = prev;
            self.changed(now);
        }
    }

    pub fn delete(&mut self, now: Instant) {
        if self.cursor_pos < self.query.len() {
            self.query.remove(self.cursor_pos);
            self.changed(now);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            let next = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
            self.cursor_pos = next;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Display columns before the cursor
    pub fn cursor_column(&self) -> usize {
        unicode_width::UnicodeWidthStr::width(&self.query[..self.cursor_pos])
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn changed(&mut self, now: Instant) {
        self.debounce.push((), now);
    }
}
