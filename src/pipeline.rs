use crate::enrich::RateLimitedEnricher;
use crate::error::Result;
use crate::load::Loader;
use crate::transform::{currency, genre, title};
use crate::types::{Movie, MovieDetails, RawMovie, Rating};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;
use tracing::info;

/// Run-level metrics reported after a pipeline run.
#[derive(Debug, Serialize)]
pub struct RunMetrics {
    pub movies_processed: usize,
    pub ratings_loaded: usize,
    pub genres_identified: usize,
    pub api_calls: u64,
    pub duration_secs: f64,
}

/// Sequences transform -> enrich -> normalize -> load over extracted rows.
/// Enrichment failures degrade per movie; everything past that point either
/// fully succeeds or fails the run.
pub struct Pipeline {
    enricher: RateLimitedEnricher,
    loader: Box<dyn Loader>,
    max_movies: Option<usize>,
}

impl Pipeline {
    pub fn new(
        enricher: RateLimitedEnricher,
        loader: Box<dyn Loader>,
        max_movies: Option<usize>,
    ) -> Self {
        Self {
            enricher,
            loader,
            max_movies,
        }
    }

    pub async fn run(&mut self, movies: Vec<RawMovie>, ratings: Vec<Rating>) -> Result<RunMetrics> {
        let t_run = Instant::now();

        let mut movies = movies;
        if let Some(cap) = self.max_movies {
            if cap > 0 && movies.len() > cap {
                movies.truncate(cap);
                info!("Limited to {} movies for processing", cap);
            }
        }

        info!("PHASE 2: TRANSFORMING DATA");
        println!("🔧 Transforming {} movies...", movies.len());
        let mut transformed: Vec<Movie> = movies.into_iter().map(transform_movie).collect();
        info!("Extracted years, cleaned titles, parsed genres");

        info!("Enriching data with OMDb API...");
        println!("📡 Making API calls for {} movies...", transformed.len());
        let total = transformed.len();
        for (i, movie) in transformed.iter_mut().enumerate() {
            info!(
                "  [{}/{}] Fetching: {} ({:?})",
                i + 1,
                total,
                movie.clean_title,
                movie.year
            );
            movie.details = self.enricher.enrich(&movie.clean_title, movie.year).await;
            movie.box_office_amount =
                currency::parse_box_office(Some(movie.details.box_office.as_str()));
        }
        let api_calls = self.enricher.calls_made();
        info!("Completed {} API calls", api_calls);
        println!("✅ Completed {} API calls", api_calls);

        info!("PHASE 3: LOADING DATA INTO DATABASE");

        // Ratings for movies outside the processed set are dropped, never
        // loaded with a dangling reference.
        let movie_ids: HashSet<i64> = transformed.iter().map(|m| m.movie_id).collect();
        let ratings: Vec<Rating> = ratings
            .into_iter()
            .filter(|r| movie_ids.contains(&r.movie_id))
            .collect();
        info!("Filtered to {} relevant ratings", ratings.len());

        // Second pass: the genre dictionary needs the vocabulary of the
        // complete movie set before any link can be resolved.
        info!("Creating normalized genres table...");
        let dict = genre::GenreDictionary::build(&transformed);
        let links = genre::build_movie_genres(&transformed, &dict)?;
        info!(
            "Identified {} genres, {} movie-genre relationships",
            dict.len(),
            links.len()
        );

        println!("💾 Writing to database tables...");
        let summary = self
            .loader
            .load(&transformed, &dict.genres(), &links, &ratings)?;

        let metrics = RunMetrics {
            movies_processed: summary.movies,
            ratings_loaded: summary.ratings,
            genres_identified: summary.genres,
            api_calls,
            duration_secs: t_run.elapsed().as_secs_f64(),
        };
        info!(
            "Pipeline completed: {} movies, {} ratings, {} genres in {:.2}s",
            metrics.movies_processed,
            metrics.ratings_loaded,
            metrics.genres_identified,
            metrics.duration_secs
        );
        Ok(metrics)
    }
}

/// Pure per-movie transform: defaults for missing fields, year extraction,
/// decade, genre list. Enrichment fields start at the sentinel and are
/// overwritten by the enrich step.
fn transform_movie(raw: RawMovie) -> Movie {
    let title = raw.title.unwrap_or_else(|| "Unknown".to_string());
    let genres = raw.genres.unwrap_or_default();
    let year = title::extract_year(&title);

    Movie {
        movie_id: raw.movie_id,
        clean_title: title::clean_title(&title),
        year,
        decade: year.map(|y| y / 10 * 10),
        genre_list: genre::parse_genres(&genres),
        genres,
        title,
        details: MovieDetails::not_available(),
        box_office_amount: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(movie_id: i64, title: Option<&str>, genres: Option<&str>) -> RawMovie {
        RawMovie {
            movie_id,
            title: title.map(str::to_string),
            genres: genres.map(str::to_string),
        }
    }

    #[test]
    fn test_transform_movie() {
        let movie = transform_movie(raw(1, Some("Toy Story (1995)"), Some("Adventure|Animation")));
        assert_eq!(movie.title, "Toy Story (1995)");
        assert_eq!(movie.clean_title, "Toy Story");
        assert_eq!(movie.year, Some(1995));
        assert_eq!(movie.decade, Some(1990));
        assert_eq!(movie.genre_list, vec!["Adventure", "Animation"]);
        assert_eq!(movie.details, MovieDetails::not_available());
    }

    #[test]
    fn test_transform_movie_defaults_missing_fields() {
        let movie = transform_movie(raw(2, None, None));
        assert_eq!(movie.title, "Unknown");
        assert_eq!(movie.clean_title, "Unknown");
        assert_eq!(movie.year, None);
        assert_eq!(movie.decade, None);
        assert!(movie.genre_list.is_empty());
        assert!(movie.genres.is_empty());
    }
}
