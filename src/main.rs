//! movie-browser CLI
//!
//! Opens the interactive browser by default; subcommands give one-shot
//! access to the catalog and the persisted state.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use movie_browser::config::Config;
use movie_browser::storage::read_persisted;
use movie_browser::{
    logging, FileStorage, HttpMovieClient, Movie, MovieApi, SearchQuery, StateStorage, STORAGE_KEY,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// movie-browser - search a movie catalog from the terminal
///
/// Results are paginated by the server; favorites and the last page are
/// remembered between runs.
#[derive(Parser)]
#[command(name = "movie-browser")]
#[command(author = "Movie Browser Contributors")]
#[command(version)]
#[command(about = "Terminal movie catalog browser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog API base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// State file holding page, results and favorites
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `movie_browser=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive browser (default)
    Tui,

    /// Print one page of search results
    Search {
        /// Title to search for
        #[arg(short, long, allow_hyphen_values = true)]
        title: Option<String>,

        /// Page number
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Print the raw page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single movie by its IMDb id
    Show {
        /// IMDb id, e.g. tt0145487
        id: String,
    },

    /// List persisted favorites
    Favorites,

    /// Delete the persisted state
    Reset,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| {
        if let Err(e) = logging::init(&config.log_path(), &config.log_level) {
            eprintln!(
                "{} could not open log file {}: {}",
                style("Warning:").yellow().bold(),
                config.log_path().display(),
                e
            );
        }

        match cli.command {
            None | Some(Commands::Tui) => movie_browser::tui::run(&config),
            Some(Commands::Search { title, page, json }) => {
                cmd_search(&config, title.as_deref(), page, json)
            }
            Some(Commands::Show { id }) => cmd_show(&config, &id),
            Some(Commands::Favorites) => cmd_favorites(&config),
            Some(Commands::Reset) => cmd_reset(&config),
        }
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> movie_browser::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(state) = &cli.state {
        config.storage.path = state.display().to_string();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_movie(index: usize, movie: &Movie, is_favorite: bool) {
    let marker = if is_favorite {
        style("\u{2605}").yellow()
    } else {
        style(" ").dim()
    };
    println!(
        "  {:>3}. {} {} {} {}",
        index,
        marker,
        style(&movie.title).bold(),
        style(format!("({})", movie.year)).dim(),
        style(&movie.imdb_id).cyan()
    );
}

/// Search command implementation
fn cmd_search(config: &Config, title: Option<&str>, page: u32, json: bool) -> movie_browser::Result<()> {
    let client = HttpMovieClient::new(&config.api)?;
    let query = SearchQuery::page(page.max(1)).with_title(title.unwrap_or_default());
    let start = Instant::now();

    let pb = (!json).then(|| {
        spinner(match &query.title {
            Some(t) => format!("Searching for '{}'...", t),
            None => "Fetching movies...".to_string(),
        })
    });
    let result = client.search_movies(Some(&query));
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let response = result?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).map_err(std::io::Error::other)?
        );
        return Ok(());
    }

    let favorites = read_persisted(&FileStorage::new(config.state_path()))
        .ok()
        .flatten()
        .map(|state| state.favorites)
        .unwrap_or_default();

    println!(
        "{} {} movies, page {} of {} ({})",
        style("\u{2192}").cyan().bold(),
        style(response.total).yellow(),
        response.page,
        response.total_pages,
        HumanDuration(start.elapsed())
    );
    if response.data.is_empty() {
        println!("  {}", style("No movies found").dim());
        return Ok(());
    }

    let offset = response.offset();
    for (i, movie) in response.data.iter().enumerate() {
        print_movie(offset.saturating_add(i + 1), movie, favorites.contains(&movie.imdb_id));
    }
    Ok(())
}

/// Show command implementation
fn cmd_show(config: &Config, id: &str) -> movie_browser::Result<()> {
    let client = HttpMovieClient::new(&config.api)?;

    let pb = spinner(format!("Looking up {}...", id));
    let result = client.get_movie_by_id(id);
    pb.finish_and_clear();
    let movie = result?;

    println!("{}", style(&movie.title).bold());
    println!("  {} {}", style("Year:").bold(), movie.year);
    println!("  {} {}", style("IMDb id:").bold(), style(&movie.imdb_id).cyan());
    println!("  {} {}", style("Link:").bold(), movie.imdb_url());
    Ok(())
}

/// Favorites command implementation
fn cmd_favorites(config: &Config) -> movie_browser::Result<()> {
    let storage = FileStorage::new(config.state_path());
    let Some(state) = read_persisted(&storage)? else {
        println!("{} No saved state at {}", style("\u{2192}").cyan().bold(), storage.path().display());
        return Ok(());
    };

    if state.favorites.is_empty() {
        println!("{} No favorites yet", style("\u{2192}").cyan().bold());
        return Ok(());
    }

    println!(
        "{} {} favorites",
        style("\u{2605}").yellow().bold(),
        state.favorites.len()
    );
    for (i, id) in state.favorites.iter().enumerate() {
        match state.data.iter().find(|m| &m.imdb_id == id) {
            Some(movie) => print_movie(i + 1, movie, true),
            None => println!("  {:>3}.   {}", i + 1, style(id).cyan()),
        }
    }
    Ok(())
}

/// Reset command implementation
fn cmd_reset(config: &Config) -> movie_browser::Result<()> {
    let storage = FileStorage::new(config.state_path());
    storage.remove_item(STORAGE_KEY)?;
    tracing::info!(path = %storage.path().display(), "persisted state removed");
    println!(
        "{} Cleared saved state in {}",
        style("\u{2713}").green().bold(),
        storage.path().display()
    );
    Ok(())
}
