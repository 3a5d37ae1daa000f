use ratatui::style::Color;

pub const STAR_FILLED: &str = "\u{2605}";
pub const STAR_EMPTY: &str = "\u{2606}";

pub const HEADER_BG: Color = Color::Rgb(0, 95, 135);
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
pub const PANEL_BG: Color = Color::Rgb(25, 25, 35);

pub fn star(is_favorite: bool) -> &'static str {
    if is_favorite {
        STAR_FILLED
    } else {
        STAR_EMPTY
    }
}

pub fn star_color(is_favorite: bool) -> Color {
    if is_favorite {
        Color::Yellow
    } else {
        Color::DarkGray
    }
}

pub fn color_for_year(year: i32) -> Color {
    match year {
        ..=1959 => Color::Gray,
        1960..=1979 => Color::LightYellow,
        1980..=1999 => Color::LightMagenta,
        2000..=2009 => Color::LightCyan,
        _ => Color::LightGreen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star() {
        assert_eq!(star(true), STAR_FILLED);
        assert_eq!(star(false), STAR_EMPTY);
        assert_eq!(star_color(true), Color::Yellow);
    }

    #[test]
    fn test_year_colors() {
        assert_eq!(color_for_year(1989), Color::LightMagenta);
        assert_eq!(color_for_year(2002), Color::LightCyan);
        assert_eq!(color_for_year(1955), Color::Gray);
    }
}
