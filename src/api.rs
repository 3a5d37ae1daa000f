//! Movie catalog API client
//!
//! Thin blocking wrapper over the catalog's REST endpoints. Errors are
//! returned to the caller as-is; there is no retry.

use crate::config::{ApiConfig, EndpointStyle};
use crate::error::{MovieError, Result};
use crate::models::{Movie, MovieResponse, SearchQuery};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Read access to the movie catalog
pub trait MovieApi: Send + Sync {
    /// Fetch one page of search results. `None` fetches the default listing.
    fn search_movies(&self, query: Option<&SearchQuery>) -> Result<MovieResponse<Movie>>;

    /// Fetch a single movie by its external id
    fn get_movie_by_id(&self, id: &str) -> Result<Movie>;
}

/// `MovieApi` over HTTP
pub struct HttpMovieClient {
    client: Client,
    base_url: String,
    endpoint: EndpointStyle,
}

impl HttpMovieClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("movie-browser/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MovieError::Transport {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            endpoint: config.endpoint,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path and query pairs for a search request
    pub fn search_request(&self, query: Option<&SearchQuery>) -> (String, Vec<(&'static str, String)>) {
        let (path, title_param) = match self.endpoint {
            EndpointStyle::Search => ("/movies/search", "Title"),
            EndpointStyle::List => ("/movies", "search"),
        };

        let mut params = Vec::new();
        if let Some(query) = query {
            if let Some(page) = query.page {
                params.push(("page", page.to_string()));
            }
            if let Some(title) = &query.title {
                params.push((title_param, title.clone()));
            }
        }

        (format!("{}{}", self.base_url, path), params)
    }

    pub fn movie_url(&self, id: &str) -> String {
        format!("{}/movies/{}", self.base_url, urlencoding::encode(id))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        tracing::debug!(url, ?params, "GET");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .map_err(|e| {
                tracing::warn!(url, error = %e, "request failed");
                MovieError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(url, "not found");
            return Err(MovieError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            tracing::warn!(url, %status, "unexpected status");
            return Err(MovieError::Http {
                status,
                url: url.to_string(),
            });
        }

        response.json::<T>().map_err(|e| {
            tracing::warn!(url, error = %e, "undecodable body");
            MovieError::Decode {
                url: url.to_string(),
                source: e,
            }
        })
    }
}

impl MovieApi for HttpMovieClient {
    fn search_movies(&self, query: Option<&SearchQuery>) -> Result<MovieResponse<Movie>> {
        let (url, params) = self.search_request(query);
        let response: MovieResponse<Movie> = self.get_json(&url, &params)?;
        tracing::debug!(
            page = response.page,
            total = response.total,
            items = response.data.len(),
            "search results"
        );
        Ok(response)
    }

    fn get_movie_by_id(&self, id: &str) -> Result<Movie> {
        let url = self.movie_url(id);
        match self.get_json(&url, &[]) {
            Err(MovieError::NotFound(_)) => Err(MovieError::NotFound(id.to_string())),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: EndpointStyle) -> HttpMovieClient {
        HttpMovieClient::new(&ApiConfig {
            base_url: "http://localhost:9/api/".to_string(),
            endpoint,
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_search_without_query_sends_no_params() {
        let c = client(EndpointStyle::Search);
        let (url, params) = c.search_request(None);
        assert_eq!(url, "http://localhost:9/api/movies/search");
        assert!(params.is_empty());
    }

    #[test]
    fn test_search_with_page_and_title() {
        let c = client(EndpointStyle::Search);
        let query = SearchQuery::page(2).with_title("Spiderman");
        let (_, params) = c.search_request(Some(&query));
        assert_eq!(
            params,
            vec![("page", "2".to_string()), ("Title", "Spiderman".to_string())]
        );
    }

    #[test]
    fn test_list_endpoint_uses_search_param() {
        let c = client(EndpointStyle::List);
        let query = SearchQuery::default().with_title("Batman");
        let (url, params) = c.search_request(Some(&query));
        assert_eq!(url, "http://localhost:9/api/movies");
        assert_eq!(params, vec![("search", "Batman".to_string())]);
    }

    #[test]
    fn test_movie_url_encodes_id() {
        let c = client(EndpointStyle::Search);
        assert_eq!(c.movie_url("tt0145487"), "http://localhost:9/api/movies/tt0145487");
        assert_eq!(c.movie_url("a/b"), "http://localhost:9/api/movies/a%2Fb");
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        let c = client(EndpointStyle::Search);
        let err = c.search_movies(None).unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err}");
    }
}
