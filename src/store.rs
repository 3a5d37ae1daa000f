//! Application state store
//!
//! Holds the current page of results, pagination metadata, favorites and
//! the loading flag. Mutations go through the methods below; each one that
//! touches persisted fields writes the projection back to storage.

use crate::error::{MovieError, Result};
use crate::models::{is_valid_external_id, Movie, MovieResponse};
use crate::storage::{read_persisted, write_persisted, PersistedState, StateStorage, STORAGE_KEY};
use indexmap::IndexSet;

pub struct MovieStore {
    loading: bool,
    results: MovieResponse<Movie>,
    favorites: IndexSet<String>,
    storage: Box<dyn StateStorage>,
    last_persist_error: Option<String>,
}

impl MovieStore {
    /// Fresh store with default state; storage is only written, never read
    pub fn new(storage: Box<dyn StateStorage>) -> Self {
        Self {
            loading: true,
            results: MovieResponse::default(),
            favorites: IndexSet::new(),
            storage,
            last_persist_error: None,
        }
    }

    /// Store seeded from the persisted projection, falling back to defaults
    pub fn hydrate(storage: Box<dyn StateStorage>) -> Self {
        let mut store = Self::new(storage);
        match read_persisted(store.storage.as_ref()) {
            Ok(Some(state)) => {
                tracing::info!(
                    page = state.page,
                    items = state.data.len(),
                    favorites = state.favorites.len(),
                    "restored persisted state"
                );
                store.results = state.response();
                store.favorites = state.favorites.into_iter().collect();
            }
            Ok(None) => tracing::debug!("no persisted state"),
            Err(e) => tracing::warn!(error = %e, "discarding persisted state"),
        }
        store
    }

    // --- Reads ---

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn page(&self) -> u32 {
        self.results.page
    }

    pub fn per_page(&self) -> u32 {
        self.results.per_page
    }

    pub fn total(&self) -> u32 {
        self.results.total
    }

    pub fn total_pages(&self) -> u32 {
        self.results.total_pages
    }

    pub fn movies(&self) -> &[Movie] {
        &self.results.data
    }

    /// Favorite ids in the order they were added
    pub fn favorites(&self) -> &IndexSet<String> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Loaded movies that are favorites, in result order
    pub fn favorite_movies(&self) -> Vec<&Movie> {
        self.results
            .data
            .iter()
            .filter(|m| self.is_favorite(&m.imdb_id))
            .collect()
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            page: self.results.page,
            per_page: self.results.per_page,
            total: self.results.total,
            total_pages: self.results.total_pages,
            data: self.results.data.clone(),
            favorites: self.favorites.iter().cloned().collect(),
        }
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    // --- Mutations ---

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replace the result set and pagination fields with `response`
    pub fn load_results(&mut self, response: MovieResponse<Movie>) {
        self.results = response;
        self.persist();
    }

    /// Reset results and pagination; favorites are kept
    pub fn clear(&mut self) {
        self.results = MovieResponse::default();
        self.persist();
    }

    /// Add or remove `id` from favorites. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        if !is_valid_external_id(id) {
            return Err(MovieError::InvalidExternalId(id.to_string()));
        }

        let now_favorite = if self.favorites.shift_remove(id) {
            false
        } else {
            self.favorites.insert(id.to_string());
            true
        };

        tracing::debug!(id, now_favorite, "toggled favorite");
        self.persist();
        Ok(now_favorite)
    }

    /// Drop the persisted projection. In-memory state is left alone.
    pub fn reset_storage(&mut self) -> Result<()> {
        self.storage.remove_item(STORAGE_KEY)
    }

    fn persist(&mut self) {
        match write_persisted(self.storage.as_ref(), &self.snapshot()) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::error!(error = %e, "failed to persist state");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }
}
