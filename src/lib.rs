//! movie-browser - terminal client for a paginated movie catalog
//!
//! Searches the catalog's REST API, shows results as cards, keeps a list of
//! favorites and remembers the current page, results and favorites between
//! runs in a small JSON state file.
//!
//! # Features
//!
//! - **Search as you type**: input is debounced and trimmed before a request is made
//! - **Pagination**: previous/next over the server's pages, clamped to the valid range
//! - **Favorites**: toggle per movie, shown in their own panel
//! - **Persistence**: page, results and favorites survive restarts
//!
//! # Example
//!
//! ```no_run
//! use movie_browser::{HttpMovieClient, MovieApi, MovieStore, FileStorage, SearchQuery};
//! use movie_browser::config::Config;
//!
//! fn main() -> movie_browser::Result<()> {
//!     let config = Config::default();
//!     let client = HttpMovieClient::new(&config.api)?;
//!     let mut store = MovieStore::hydrate(Box::new(FileStorage::new(config.state_path())));
//!
//!     let query = SearchQuery::page(1).with_title("spider");
//!     store.load_results(client.search_movies(Some(&query))?);
//!     store.set_loading(false);
//!
//!     for movie in store.movies() {
//!         println!("{} ({}) {}", movie.title, movie.year, movie.imdb_id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;
pub mod tui;

// Re-export main types
pub use api::{HttpMovieClient, MovieApi};
pub use debounce::Debouncer;
pub use error::{MovieError, Result};
pub use models::{is_valid_external_id, Movie, MovieResponse, SearchQuery};
pub use storage::{FileStorage, MemoryStorage, PersistedState, StateStorage, STORAGE_KEY};
pub use store::MovieStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
