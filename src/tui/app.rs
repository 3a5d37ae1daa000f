use crate::api::MovieApi;
use crate::error::MovieError;
use crate::models::{Movie, MovieResponse, SearchQuery};
use crate::store::MovieStore;
use crate::tui::grid::GridState;
use crate::tui::pagination::Pagination;
use crate::tui::search::SearchInput;
use crate::tui::ui;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Messages from background threads
pub enum BgMessage {
    Loaded {
        generation: u64,
        query: SearchQuery,
        result: Result<MovieResponse<Movie>, MovieError>,
    },
}

/// Which panel receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Favorites,
}

pub struct App {
    pub store: MovieStore,

    // Sub-states
    pub search: SearchInput,
    pub results: GridState,
    pub favorites: GridState,
    pub focus: Focus,

    /// Last search text that was committed (trimmed)
    pub committed_query: String,
    pub status_message: String,
    pub error: Option<String>,

    api: Arc<dyn MovieApi>,

    // Every dispatched fetch gets a new generation; only the latest is applied
    generation: u64,
    in_flight: bool,

    // Channel
    bg_receiver: Receiver<BgMessage>,
    bg_sender: Sender<BgMessage>,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(store: MovieStore, api: Arc<dyn MovieApi>, debounce: Duration) -> Self {
        let (tx, rx) = unbounded();
        Self {
            store,
            search: SearchInput::new(debounce),
            results: GridState::default(),
            favorites: GridState::default(),
            focus: Focus::Search,
            committed_query: String::new(),
            status_message: "Ready".to_string(),
            error: None,
            api,
            generation: 0,
            in_flight: false,
            bg_receiver: rx,
            bg_sender: tx,
            should_quit: false,
        }
    }

    /// Show whatever was persisted and request fresh data for that page
    pub fn mount(&mut self) {
        if !self.store.movies().is_empty() {
            self.results.select_first();
        }
        let page = self.store.page().max(1);
        self.fetch(page);
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        self.mount();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                tracing::info!("quit requested");
                return Ok(());
            }
        }
    }

    /// Apply finished fetches and fire a debounced search if one is due
    pub fn tick(&mut self, now: Instant) {
        self.process_messages();
        if let Some(query) = self.search.poll_commit(now) {
            self.commit_search(query);
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.store.page(), self.store.total_pages())
    }

    /// New search text: back to page 1 with the trimmed title.
    /// An unchanged non-empty title keeps the current page.
    pub fn commit_search(&mut self, query: String) {
        let trimmed = query.trim();
        if !trimmed.is_empty() && trimmed == self.committed_query {
            tracing::debug!(query = %trimmed, "search unchanged, keeping page");
            return;
        }
        tracing::info!(query = %trimmed, "search committed");
        self.committed_query = trimmed.to_string();
        self.fetch(1);
    }

    pub fn next_page(&mut self) {
        if let Some(page) = self.pagination().next_page() {
            self.fetch(page);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(page) = self.pagination().previous_page() {
            self.fetch(page);
        }
    }

    fn fetch(&mut self, page: u32) {
        self.generation += 1;
        self.in_flight = true;
        self.store.set_loading(true);
        self.status_message = format!("Loading page {}...", page);

        let generation = self.generation;
        let query = SearchQuery::page(page).with_title(&self.committed_query);
        let api = Arc::clone(&self.api);
        let tx = self.bg_sender.clone();

        tracing::debug!(generation, ?query, "dispatching fetch");

        thread::spawn(move || {
            let result = api.search_movies(Some(&query));
            let _ = tx.send(BgMessage::Loaded {
                generation,
                query,
                result,
            });
        });
    }

    pub fn process_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.bg_receiver.try_recv() {
            self.handle_message(msg);
            handled += 1;
        }
        handled
    }

    pub fn handle_message(&mut self, msg: BgMessage) {
        match msg {
            BgMessage::Loaded {
                generation,
                query,
                result,
            } => {
                if generation != self.generation {
                    tracing::debug!(generation, latest = self.generation, ?query, "discarding stale response");
                    return;
                }

                self.in_flight = false;
                self.store.set_loading(false);

                match result {
                    Ok(response) => {
                        tracing::info!(
                            page = response.page,
                            total = response.total,
                            items = response.data.len(),
                            "results loaded"
                        );
                        self.store.load_results(response);
                        self.error = None;
                        self.scroll_to_top();
                        self.status_message = format!("{} movies", self.store.total());
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, ?query, "fetch failed, keeping previous results");
                        self.error = Some(e.status_text());
                        self.status_message = "Request failed".to_string();
                    }
                }
            }
        }
    }

    fn scroll_to_top(&mut self) {
        self.results.select_first();
        self.results.clamp(self.store.movies().len());
        self.favorites.clamp(self.store.favorite_movies().len());
        if self.focus == Focus::Favorites && self.store.favorite_movies().is_empty() {
            self.focus = Focus::Results;
        }
    }

    /// Message to show instead of the card grid, if any
    pub fn empty_message(&self) -> Option<String> {
        if !self.store.movies().is_empty() {
            return None;
        }
        if self.store.loading() {
            return Some("Loading movies...".to_string());
        }
        if self.committed_query.is_empty() {
            Some("No movies found".to_string())
        } else {
            Some(format!("No movies found for \"{}\"", self.committed_query))
        }
    }

    pub fn favorites_visible(&self) -> bool {
        !self.store.favorite_movies().is_empty()
    }

    /// Movie under the cursor in the focused panel
    pub fn selected_movie(&self) -> Option<&Movie> {
        match self.focus {
            Focus::Favorites => self
                .favorites
                .selected
                .and_then(|i| self.store.favorite_movies().get(i).copied()),
            _ => self
                .results
                .selected
                .and_then(|i| self.store.movies().get(i)),
        }
    }

    pub fn toggle_selected_favorite(&mut self) {
        let Some(id) = self.selected_movie().map(|m| m.imdb_id.clone()) else {
            return;
        };

        match self.store.toggle_favorite(&id) {
            Ok(now_favorite) => {
                self.status_message = if now_favorite {
                    format!("Added {} to favorites", id)
                } else {
                    format!("Removed {} from favorites", id)
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "toggle favorite failed");
                self.status_message = e.to_string();
            }
        }

        let remaining = self.store.favorite_movies().len();
        self.favorites.clamp(remaining);
        if remaining == 0 && self.focus == Focus::Favorites {
            self.focus = Focus::Results;
        }
    }

    fn open_selected(&mut self) {
        let Some(url) = self.selected_movie().map(Movie::imdb_url) else {
            return;
        };
        match open::that_detached(&url) {
            Ok(()) => self.status_message = format!("Opened {}", url),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "could not open browser");
                self.status_message = format!("Could not open {}: {}", url, e);
            }
        }
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Search => Focus::Results,
            Focus::Results if self.favorites_visible() => Focus::Favorites,
            Focus::Results | Focus::Favorites => Focus::Search,
        };
        self.search.focused = self.focus == Focus::Search;

        if self.focus == Focus::Results && self.results.selected.is_none() {
            self.results.clamp(self.store.movies().len());
            if !self.store.movies().is_empty() {
                self.results.select_first();
            }
        }
        if self.focus == Focus::Favorites && self.favorites.selected.is_none() {
            self.favorites.select_first();
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.search.focused = focus == Focus::Search;
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.focus == Focus::Search && self.search.show_clear() {
                    self.search.clear(now);
                } else if self.focus == Focus::Search {
                    self.set_focus(Focus::Results);
                } else {
                    self.should_quit = true;
                }
                return;
            }
            KeyCode::Tab => {
                self.cycle_focus();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key, now),
            Focus::Results | Focus::Favorites => self.handle_grid_key(key, now),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.clear(now);
            }
            KeyCode::Char(c) => self.search.insert_char(c, now),
            KeyCode::Backspace => self.search.backspace(now),
            KeyCode::Delete => self.search.delete(now),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.move_home(),
            KeyCode::End => self.search.move_end(),
            KeyCode::Down | KeyCode::Enter => self.cycle_focus(),
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent, now: Instant) {
        let total = match self.focus {
            Focus::Favorites => self.store.favorite_movies().len(),
            _ => self.store.movies().len(),
        };
        let grid = match self.focus {
            Focus::Favorites => &mut self.favorites,
            _ => &mut self.results,
        };

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => grid.select_prev(),
            KeyCode::Right | KeyCode::Char('l') => grid.select_next(total),
            KeyCode::Up | KeyCode::Char('k') => grid.select_up(),
            KeyCode::Down | KeyCode::Char('j') => grid.select_down(total),
            KeyCode::PageUp => grid.page_up(),
            KeyCode::PageDown => grid.page_down(total),
            KeyCode::Home => grid.select_first(),
            KeyCode::End => grid.select_last(total),

            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('f') => {
                self.toggle_selected_favorite()
            }
            KeyCode::Char('n') | KeyCode::Char(']') => self.next_page(),
            KeyCode::Char('p') | KeyCode::Char('[') => self.previous_page(),
            KeyCode::Char('o') => self.open_selected(),
            KeyCode::Char('/') => self.set_focus(Focus::Search),

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.set_focus(Focus::Search);
                self.search.move_end();
                self.search.insert_char(c, now);
            }

            _ => {}
        }
    }

    /// Block until one background message arrives and handle it
    #[cfg(test)]
    pub(crate) fn wait_for_message(&mut self, timeout: Duration) -> bool {
        match self.bg_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.handle_message(msg);
                true
            }
            Err(_) => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}
