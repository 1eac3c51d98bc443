use serde::{Deserialize, Serialize};

/// Sentinel for metadata the provider could not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Movie row as read from the source CSV. Title and genres may be missing;
/// the transform stage substitutes defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMovie {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub title: Option<String>,
    pub genres: Option<String>,
}

/// Rating row as read from the source CSV.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub rating: f64,
    pub timestamp: i64,
}

/// Provider metadata for one movie. Every field holds either the provider's
/// value or the "N/A" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieDetails {
    pub director: String,
    pub plot: String,
    pub box_office: String,
    pub runtime: String,
    pub country: String,
    pub imdb_rating: String,
}

impl MovieDetails {
    /// The all-sentinel record substituted when enrichment fails.
    pub fn not_available() -> Self {
        Self {
            director: NOT_AVAILABLE.to_string(),
            plot: NOT_AVAILABLE.to_string(),
            box_office: NOT_AVAILABLE.to_string(),
            runtime: NOT_AVAILABLE.to_string(),
            country: NOT_AVAILABLE.to_string(),
            imdb_rating: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Fully transformed and enriched movie, ready for loading.
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub clean_title: String,
    pub year: Option<i32>,
    pub decade: Option<i32>,
    /// Original pipe-delimited genre string, kept for the denormalized column.
    pub genres: String,
    pub genre_list: Vec<String>,
    pub details: MovieDetails,
    pub box_office_amount: Option<i64>,
}

/// Entry in the global genre dictionary. Ids are contiguous 1..N in
/// lexicographic name order and stable only within a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
}

/// Movie-to-genre link; one row per distinct genre attached to a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MovieGenre {
    pub movie_id: i64,
    pub genre_id: i64,
}
