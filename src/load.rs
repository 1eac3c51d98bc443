use crate::error::Result;
use crate::types::{Genre, Movie, MovieGenre, Rating};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

const SCHEMA_SQL: &str = r#"
CREATE TABLE movies (
    movieId INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    clean_title TEXT,
    year INTEGER,
    decade INTEGER,
    genres TEXT,
    Director TEXT,
    Plot TEXT,
    BoxOffice TEXT,
    BoxOfficeParsed INTEGER,
    Runtime TEXT,
    Country TEXT,
    imdbRating TEXT
);

CREATE TABLE genres (
    genre_id INTEGER PRIMARY KEY,
    genre_name TEXT UNIQUE NOT NULL
);

CREATE TABLE movie_genres (
    movie_id INTEGER NOT NULL,
    genre_id INTEGER NOT NULL,
    PRIMARY KEY (movie_id, genre_id),
    FOREIGN KEY (movie_id) REFERENCES movies(movieId),
    FOREIGN KEY (genre_id) REFERENCES genres(genre_id)
);

CREATE TABLE ratings (
    userId INTEGER,
    movieId INTEGER,
    rating REAL,
    timestamp INTEGER,
    FOREIGN KEY(movieId) REFERENCES movies(movieId)
);

CREATE INDEX idx_movies_year ON movies(year);
CREATE INDEX idx_movies_director ON movies(Director);
CREATE INDEX idx_ratings_movie ON ratings(movieId);
"#;

/// Row counts written by a load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSummary {
    pub movies: usize,
    pub genres: usize,
    pub movie_genres: usize,
    pub ratings: usize,
}

/// Persistence seam for the pipeline. The shipped implementation is a
/// destructive full refresh; alternate strategies (upsert, versioned tables)
/// substitute here without touching the transform/enrich logic.
pub trait Loader {
    fn load(
        &mut self,
        movies: &[Movie],
        genres: &[Genre],
        movie_genres: &[MovieGenre],
        ratings: &[Rating],
    ) -> Result<LoadSummary>;
}

/// Full-refresh SQLite loader: drop-if-exists, recreate, bulk-insert. Drop
/// and create phases each commit as one unit; a failure mid-run leaves
/// already-committed phases in place.
pub struct SqliteLoader {
    conn: Connection,
}

impl SqliteLoader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn drop_tables(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        // Children before parents
        for table in ["movie_genres", "ratings", "genres", "movies"] {
            tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn create_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.commit()?;
        Ok(())
    }

    fn insert_movies(&mut self, movies: &[Movie]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO movies (movieId, title, clean_title, year, decade, genres, \
                 Director, Plot, BoxOffice, BoxOfficeParsed, Runtime, Country, imdbRating) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )?;
            for movie in movies {
                stmt.execute(params![
                    movie.movie_id,
                    movie.title,
                    movie.clean_title,
                    movie.year,
                    movie.decade,
                    movie.genres,
                    movie.details.director,
                    movie.details.plot,
                    movie.details.box_office,
                    movie.box_office_amount,
                    movie.details.runtime,
                    movie.details.country,
                    movie.details.imdb_rating,
                ])?;
            }
        }
        tx.commit()?;
        Ok(movies.len())
    }

    fn insert_genres(&mut self, genres: &[Genre]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO genres (genre_id, genre_name) VALUES (?1, ?2)")?;
            for genre in genres {
                stmt.execute(params![genre.genre_id, genre.genre_name])?;
            }
        }
        tx.commit()?;
        Ok(genres.len())
    }

    fn insert_movie_genres(&mut self, movie_genres: &[MovieGenre]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO movie_genres (movie_id, genre_id) VALUES (?1, ?2)")?;
            for link in movie_genres {
                stmt.execute(params![link.movie_id, link.genre_id])?;
            }
        }
        tx.commit()?;
        Ok(movie_genres.len())
    }

    fn insert_ratings(&mut self, ratings: &[Rating]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO ratings (userId, movieId, rating, timestamp) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for rating in ratings {
                stmt.execute(params![
                    rating.user_id,
                    rating.movie_id,
                    rating.rating,
                    rating.timestamp,
                ])?;
            }
        }
        tx.commit()?;
        Ok(ratings.len())
    }
}

impl Loader for SqliteLoader {
    fn load(
        &mut self,
        movies: &[Movie],
        genres: &[Genre],
        movie_genres: &[MovieGenre],
        ratings: &[Rating],
    ) -> Result<LoadSummary> {
        info!("Clearing existing data...");
        self.drop_tables()?;

        info!("Creating tables...");
        self.create_schema()?;

        // Parents before children so no orphaned reference ever persists
        // between phases.
        let mut summary = LoadSummary::default();
        summary.movies = self.insert_movies(movies)?;
        info!("Loaded {} movies", summary.movies);
        summary.genres = self.insert_genres(genres)?;
        info!("Loaded {} genres", summary.genres);
        summary.movie_genres = self.insert_movie_genres(movie_genres)?;
        info!("Loaded {} movie-genre relationships", summary.movie_genres);
        summary.ratings = self.insert_ratings(ratings)?;
        info!("Loaded {} ratings", summary.ratings);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieDetails;

    fn sample_movie(movie_id: i64) -> Movie {
        Movie {
            movie_id,
            title: format!("Movie {movie_id} (1995)"),
            clean_title: format!("Movie {movie_id}"),
            year: Some(1995),
            decade: Some(1990),
            genres: "Action".to_string(),
            genre_list: vec!["Action".to_string()],
            details: MovieDetails::not_available(),
            box_office_amount: None,
        }
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_load_writes_all_four_tables() {
        let mut loader = SqliteLoader::in_memory().unwrap();
        let movies = vec![sample_movie(1), sample_movie(2)];
        let genres = vec![Genre {
            genre_id: 1,
            genre_name: "Action".to_string(),
        }];
        let links = vec![
            MovieGenre { movie_id: 1, genre_id: 1 },
            MovieGenre { movie_id: 2, genre_id: 1 },
        ];
        let ratings = vec![Rating {
            user_id: 1,
            movie_id: 1,
            rating: 4.5,
            timestamp: 964982703,
        }];

        let summary = loader.load(&movies, &genres, &links, &ratings).unwrap();
        assert_eq!(summary.movies, 2);
        assert_eq!(summary.genres, 1);
        assert_eq!(summary.movie_genres, 2);
        assert_eq!(summary.ratings, 1);

        let conn = loader.connection();
        assert_eq!(count(conn, "movies"), 2);
        assert_eq!(count(conn, "ratings"), 1);
        let year: i64 = conn
            .query_row("SELECT year FROM movies WHERE movieId = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(year, 1995);
    }

    #[test]
    fn test_reload_is_a_full_refresh() {
        let mut loader = SqliteLoader::in_memory().unwrap();
        let genres = vec![Genre {
            genre_id: 1,
            genre_name: "Action".to_string(),
        }];

        loader
            .load(&[sample_movie(1), sample_movie(2)], &genres, &[], &[])
            .unwrap();
        loader.load(&[sample_movie(3)], &genres, &[], &[]).unwrap();

        // Counts reflect only the second run's input
        assert_eq!(count(loader.connection(), "movies"), 1);
        let movie_id: i64 = loader
            .connection()
            .query_row("SELECT movieId FROM movies", [], |row| row.get(0))
            .unwrap();
        assert_eq!(movie_id, 3);
    }
}
