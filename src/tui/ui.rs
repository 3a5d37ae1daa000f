use crate::tui::app::{App, Focus};
use crate::tui::cards::{self, CARD_HEIGHT};
use crate::tui::colors;
use crate::tui::search::{CLEAR_LABEL, PLACEHOLDER};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let favorites_height = if app.favorites_visible() {
        CARD_HEIGHT + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                // Search bar
            Constraint::Length(favorites_height), // Favorites panel
            Constraint::Min(CARD_HEIGHT),         // Results grid
            Constraint::Length(1),                // Pagination
            Constraint::Length(1),                // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    if favorites_height > 0 {
        draw_favorites(frame, app, chunks[1]);
    }
    draw_results(frame, app, chunks[2]);
    draw_pagination(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    if app.focus == Focus::Search {
        if let Some(position) = search_cursor(chunks[0], app.search.cursor_column()) {
            frame.set_cursor_position(position);
        }
    }
}

/// Cursor cell inside the search bar, or `None` when it would fall outside the box
fn search_cursor(area: Rect, column: usize) -> Option<Position> {
    // border (1) + leading space (1)
    let x = area
        .x
        .saturating_add(2)
        .saturating_add(u16::try_from(column).unwrap_or(u16::MAX));
    (x < area.right().saturating_sub(1)).then(|| Position::new(x, area.y.saturating_add(1)))
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut block = panel_block(" Search ".to_string(), app.focus == Focus::Search);
    if app.search.show_clear() {
        block = block.title(
            Line::from(Span::styled(
                format!(" Esc: {} ", CLEAR_LABEL),
                Style::default().fg(Color::Gray),
            ))
            .right_aligned(),
        );
    }

    let line = if app.search.query.is_empty() {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(app.search.query.as_str(), Style::default().fg(Color::White)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_favorites(frame: &mut Frame, app: &mut App, area: Rect) {
    let movies = app.store.favorite_movies();
    let focused = app.focus == Focus::Favorites;
    let block = panel_block(format!(" {} ", cards::favorites_title(movies.len())), focused)
        .style(Style::default().bg(colors::PANEL_BG));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let store = &app.store;
    cards::draw_card_grid(
        frame,
        inner,
        &movies,
        &mut app.favorites,
        |id| store.is_favorite(id),
        focused,
    );
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Results;
    let title = if app.committed_query.is_empty() {
        format!(" Movies ({}) ", app.store.total())
    } else {
        format!(" Movies matching \"{}\" ({}) ", app.committed_query, app.store.total())
    };
    let block = panel_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(message) = app.empty_message() {
        let y = inner.y + inner.height / 2;
        let line_area = Rect::new(inner.x, y, inner.width, 1).intersection(inner);
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, line_area);
        return;
    }

    let store = &app.store;
    let movies: Vec<_> = store.movies().iter().collect();
    cards::draw_card_grid(
        frame,
        inner,
        &movies,
        &mut app.results,
        |id| store.is_favorite(id),
        focused,
    );
}

fn draw_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let pagination = app.pagination();
    let control = |enabled: bool| {
        if enabled {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut spans = vec![
        Span::styled(" \u{2039} Previous [p] ", control(pagination.can_previous())),
        Span::styled(
            format!(" {} ", pagination.label()),
            Style::default().fg(Color::White),
        ),
        Span::styled(" [n] Next \u{203A} ", control(pagination.can_next())),
    ];
    if app.is_fetching() {
        spans.push(Span::styled(" Loading...", Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let right_text = match app.focus {
        Focus::Search => " Tab:Results  Esc:Clear  Ctrl+C:Quit ",
        _ => " Enter:Favorite  n/p:Page  o:IMDb  /:Search  Esc:Quit ",
    };

    let (left_text, style) = match &app.error {
        Some(err) => (
            format!(" \u{26A0} {}", err),
            Style::default().fg(Color::White).bg(Color::Red),
        ),
        None => {
            let text = match app.selected_movie() {
                Some(movie) if app.focus != Focus::Search => {
                    format!(" {} ({}) {}", movie.title, movie.year, movie.imdb_id)
                }
                _ => format!(" {}", app.status_message),
            };
            (text, Style::default().fg(Color::White).bg(colors::HEADER_BG))
        }
    };

    let available_width = area.width as usize;
    let left = cards::truncate_to_width(&left_text, available_width);
    let left_len = unicode_width::UnicodeWidthStr::width(left.as_str());
    let right_len = right_text.len();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left, "", right_text, padding = padding)
    } else {
        left
    };

    frame.render_widget(
        Paragraph::new(status_str).style(style),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movie, MovieResponse};
    use crate::storage::MemoryStorage;
    use crate::tui::app::tests::{app_with, FakeApi};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    fn loaded_app() -> App {
        let mut app = app_with(Arc::new(FakeApi::new(3)), Arc::new(MemoryStorage::new()));
        app.store.load_results(MovieResponse {
            page: 1,
            per_page: 3,
            total: 5,
            total_pages: 2,
            data: vec![
                Movie::new("Spiderman", 2002, "tt0145487"),
                Movie::new("Spiderman 2", 2004, "tt0316654"),
                Movie::new("Spiderman 3", 2007, "tt0413300"),
            ],
        });
        app.store.set_loading(false);
        app
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_search_cursor_stays_inside_box() {
        let area = Rect::new(0, 0, 20, 3);
        assert_eq!(search_cursor(area, 0), Some(Position::new(2, 1)));
        assert_eq!(search_cursor(area, 16), Some(Position::new(18, 1)));
        assert_eq!(search_cursor(area, 17), None);
        assert_eq!(search_cursor(area, usize::MAX), None);

        let far = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(search_cursor(far, 70_000), None);
    }

    #[test]
    fn test_long_query_renders_without_cursor_overflow() {
        let mut app = loaded_app();
        app.search.set_value(&"x".repeat(70_000), std::time::Instant::now());
        let screen = render(&mut app);
        assert!(screen.contains("Clear search"));
    }

    #[test]
    fn test_placeholder_without_clear_control() {
        let mut app = loaded_app();
        let screen = render(&mut app);
        assert!(screen.contains("Search movies..."));
        assert!(!screen.contains("Clear search"));
        assert!(!screen.contains("Favorites ("));
    }

    #[test]
    fn test_typing_shows_clear_control() {
        let mut app = loaded_app();
        app.search.set_value("spider", std::time::Instant::now());
        let screen = render(&mut app);
        assert!(screen.contains("spider"));
        assert!(screen.contains("Clear search"));
        assert!(!screen.contains("Search movies..."));
    }

    #[test]
    fn test_cards_and_pagination() {
        let mut app = loaded_app();
        let screen = render(&mut app);
        assert!(screen.contains("Spiderman 2"));
        assert!(screen.contains("2004"));
        assert!(screen.contains("tt0413300"));
        assert!(screen.contains("Add to favorites"));
        assert!(screen.contains("Page 1 of 2"));
    }

    #[test]
    fn test_favorites_panel_appears() {
        let mut app = loaded_app();
        app.store.toggle_favorite("tt0145487").unwrap();
        let screen = render(&mut app);
        assert!(screen.contains("Favorites (1)"));
        assert!(screen.contains("Remove from favorites"));

        app.store.toggle_favorite("tt0145487").unwrap();
        let screen = render(&mut app);
        assert!(!screen.contains("Favorites ("));
        assert!(!screen.contains("Remove from favorites"));
    }

    #[test]
    fn test_empty_state_and_error() {
        let mut app = loaded_app();
        app.store.load_results(MovieResponse::default());
        app.committed_query = "zzzz".to_string();
        app.error = Some("Server error (500)".to_string());
        let screen = render(&mut app);
        assert!(screen.contains("No movies found for \"zzzz\""));
        assert!(screen.contains("Server error (500)"));
        assert!(screen.contains("Page - of -"));
    }
}
