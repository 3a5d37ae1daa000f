//! Movie cards and the favorites panel

use crate::models::Movie;
use crate::tui::colors;
use crate::tui::grid::GridState;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const ADD_LABEL: &str = "Add to favorites";
pub const REMOVE_LABEL: &str = "Remove from favorites";

pub const CARD_WIDTH: u16 = 32;
/// Three content lines plus borders
pub const CARD_HEIGHT: u16 = 5;

/// Label of the favorite toggle for the current state
pub fn favorite_label(is_favorite: bool) -> &'static str {
    if is_favorite {
        REMOVE_LABEL
    } else {
        ADD_LABEL
    }
}

pub fn favorites_title(count: usize) -> String {
    format!("Favorites ({})", count)
}

/// Number of card columns that fit in `width`
pub fn grid_columns(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// Number of card rows that fit in `height`
pub fn grid_rows(height: u16) -> usize {
    (height / CARD_HEIGHT).max(1) as usize
}

/// Cut `text` to at most `width` display columns, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// Content lines of one card, sized for `inner_width` columns
pub fn card_lines(movie: &Movie, is_favorite: bool, inner_width: usize) -> Vec<Line<'static>> {
    let title = truncate_to_width(&movie.title, inner_width);
    let info = truncate_to_width(&format!("{} \u{00B7} {}", movie.year, movie.imdb_id), inner_width);
    let toggle = truncate_to_width(
        &format!("{} {}", colors::star(is_favorite), favorite_label(is_favorite)),
        inner_width,
    );

    vec![
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            info,
            Style::default().fg(colors::color_for_year(movie.year)),
        )),
        Line::from(Span::styled(
            toggle,
            Style::default().fg(colors::star_color(is_favorite)),
        )),
    ]
}

/// Draw `movies` as a grid of cards. Updates the grid layout for `area`.
pub fn draw_card_grid(
    frame: &mut Frame,
    area: Rect,
    movies: &[&Movie],
    grid: &mut GridState,
    is_favorite: impl Fn(&str) -> bool,
    focused: bool,
) {
    let columns = grid_columns(area.width);
    grid.set_layout(columns, grid_rows(area.height));

    let card_width = area.width / columns as u16;
    let range = grid.visible_range(movies.len());
    let first = range.start;

    for index in range {
        let slot = index - first;
        let col = (slot % columns) as u16;
        let row = (slot / columns) as u16;
        let rect = Rect::new(
            area.x + col * card_width,
            area.y + row * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT,
        )
        .intersection(area);
        if rect.height < CARD_HEIGHT {
            break;
        }

        let movie = movies[index];
        let favorite = is_favorite(&movie.imdb_id);
        let selected = focused && grid.selected == Some(index);

        let border_style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if favorite {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let bg = if selected { colors::SELECTED_BG } else { Color::Reset };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(bg));
        let inner_width = block.inner(rect).width as usize;

        let paragraph = Paragraph::new(card_lines(movie, favorite, inner_width)).block(block);
        frame.render_widget(paragraph, rect);
    }
}
