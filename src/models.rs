//! Catalog data model
//!
//! Wire names follow the movie API (`Title`, `Year`, `imdbID`, `per_page`, ...),
//! which is also the shape written to the persisted state.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// A single catalog entry. Identity is `imdb_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

impl Movie {
    pub fn new(title: impl Into<String>, year: i32, imdb_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year,
            imdb_id: imdb_id.into(),
        }
    }

    /// Public IMDb page for this movie
    pub fn imdb_url(&self) -> String {
        format!("https://www.imdb.com/title/{}/", self.imdb_id)
    }
}

/// One page of results as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieResponse<T> {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<T>,
}

impl<T> Default for MovieResponse<T> {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 0,
            total: 0,
            total_pages: 0,
            data: Vec::new(),
        }
    }
}

impl<T> MovieResponse<T> {
    /// Zero-based position of the first item of this page in the whole result set
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize)
    }
}

/// Parameters for a search request. `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub page: Option<u32>,
    pub title: Option<String>,
}

impl SearchQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            title: None,
        }
    }

    /// Attach a title filter; blank titles are dropped
    pub fn with_title(mut self, title: &str) -> Self {
        let trimmed = title.trim();
        self.title = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

fn external_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^tt[0-9]+$").expect("static regex"))
}

/// True for catalog identifiers of the form `tt` + digits
pub fn is_valid_external_id(id: &str) -> bool {
    external_id_regex().is_match(id)
}

/// The API sends `Year` as a number, some mirrors as `"2002"` or `"2002–2005"`.
fn deserialize_year<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawYear {
        Number(i32),
        Text(String),
    }

    match RawYear::deserialize(deserializer)? {
        RawYear::Number(n) => Ok(n),
        RawYear::Text(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits
                .parse::<i32>()
                .map_err(|_| serde::de::Error::custom(format!("invalid year '{}'", s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_wire_names() {
        let json = r#"{"Title":"Spiderman","Year":2002,"imdbID":"tt0145487"}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie, Movie::new("Spiderman", 2002, "tt0145487"));

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["Title"], "Spiderman");
        assert_eq!(value["Year"], 2002);
        assert_eq!(value["imdbID"], "tt0145487");
    }

    #[test]
    fn test_year_as_string() {
        let json = r#"{"Title":"Spider-Man: The Animated Series","Year":"1994–1998","imdbID":"tt0112175"}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.year, 1994);

        let bad = r#"{"Title":"x","Year":"n/a","imdbID":"tt1"}"#;
        assert!(serde_json::from_str::<Movie>(bad).is_err());
    }

    #[test]
    fn test_response_shape() {
        let json = r#"{
            "page": 1, "per_page": 10, "total": 13, "total_pages": 2,
            "data": [{"Title":"Italian Spiderman","Year":2007,"imdbID":"tt2705436"}]
        }"#;
        let response: MovieResponse<Movie> = serde_json::from_str(json).unwrap();
        assert_eq!(response.page, 1);
        assert_eq!(response.total_pages, 2);
        assert_eq!(response.data[0].imdb_id, "tt2705436");
        assert_eq!(response.offset(), 0);
    }

    #[test]
    fn test_offset_saturates_on_huge_pages() {
        let response = MovieResponse::<Movie> {
            page: 3,
            per_page: 10,
            ..MovieResponse::default()
        };
        assert_eq!(response.offset(), 20);

        let response = MovieResponse::<Movie> {
            page: u32::MAX,
            per_page: u32::MAX,
            ..MovieResponse::default()
        };
        assert_eq!(
            response.offset(),
            ((u32::MAX - 1) as usize).saturating_mul(u32::MAX as usize)
        );
        assert_eq!(MovieResponse::<Movie>::default().offset(), 0);
    }

    #[test]
    fn test_external_id_validation() {
        assert!(is_valid_external_id("tt0145487"));
        assert!(!is_valid_external_id("tt"));
        assert!(!is_valid_external_id("nm0000123"));
        assert!(!is_valid_external_id(" tt0145487"));
        assert!(!is_valid_external_id("tt01454x7"));
        // non-ASCII digits
        assert!(!is_valid_external_id("tt\u{0661}\u{0662}"));
        assert!(!is_valid_external_id("tt\u{FF11}\u{FF12}"));
    }

    #[test]
    fn test_query_title_is_trimmed() {
        let q = SearchQuery::page(1).with_title("  spider  ");
        assert_eq!(q.title.as_deref(), Some("spider"));
        assert_eq!(SearchQuery::page(1).with_title("   ").title, None);
    }
}
