//! Domain types for the movie catalog.

/// One page of the movie catalog plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    /// Page number (1-indexed for remote data, 0 for the empty catalog).
    pub page: i64,
    /// Total number of pages reported by the API.
    pub total_pages: i64,
    /// Movies on this page, in API order.
    pub movies: Vec<Movie>,
}

impl Catalog {
    /// Create a catalog page.
    pub fn new(page: i64, total_pages: i64, movies: Vec<Movie>) -> Self {
        Self {
            page,
            total_pages,
            movies,
        }
    }

    /// The catalog returned when nothing usable is cached.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this page holds no movies.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: i64,
    /// Movie title.
    pub title: String,
    /// Poster path (relative to the TMDB image base URL).
    pub poster_path: String,
}

impl Movie {
    /// Create a movie.
    pub fn new(id: i64, title: impl Into<String>, poster_path: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: poster_path.into(),
        }
    }
}
