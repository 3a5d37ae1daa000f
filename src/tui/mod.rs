//! Interactive terminal UI

pub mod app;
pub mod cards;
pub mod colors;
pub mod grid;
pub mod pagination;
pub mod search;
pub mod ui;

use crate::api::HttpMovieClient;
use crate::config::Config;
use crate::storage::FileStorage;
use crate::store::MovieStore;
use app::App;
use std::sync::Arc;

/// Open the terminal UI and block until the user quits
pub fn run(config: &Config) -> crate::Result<()> {
    let api = Arc::new(HttpMovieClient::new(&config.api)?);
    let store = MovieStore::hydrate(Box::new(FileStorage::new(config.state_path())));
    let mut app = App::new(store, api, config.search.debounce());

    crate::logging::separator("TUI");

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    if let Some(err) = app.store.last_persist_error() {
        tracing::warn!(error = err, "last state write failed");
    }
    result
}
