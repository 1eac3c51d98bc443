use crate::error::Result;
use crate::types::{RawMovie, Rating};
use std::path::Path;
use tracing::info;

/// Read the movie source file (movieId,title,genres with a header row).
pub fn read_movies<P: AsRef<Path>>(path: P) -> Result<Vec<RawMovie>> {
    let mut reader = csv::Reader::from_path(&path)?;
    let mut movies = Vec::new();
    for row in reader.deserialize() {
        movies.push(row?);
    }
    info!("Loaded {} movies from {}", movies.len(), path.as_ref().display());
    Ok(movies)
}

/// Read the rating source file (userId,movieId,rating,timestamp with a header row).
pub fn read_ratings<P: AsRef<Path>>(path: P) -> Result<Vec<Rating>> {
    let mut reader = csv::Reader::from_path(&path)?;
    let mut ratings = Vec::new();
    for row in reader.deserialize() {
        ratings.push(row?);
    }
    info!("Loaded {} ratings from {}", ratings.len(), path.as_ref().display());
    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_movies_with_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "movieId,title,genres").unwrap();
        writeln!(file, "1,Toy Story (1995),Adventure|Animation").unwrap();
        writeln!(file, "2,,").unwrap();
        drop(file);

        let movies = read_movies(&path).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].movie_id, 1);
        assert_eq!(movies[0].title.as_deref(), Some("Toy Story (1995)"));
        assert!(movies[1].title.as_deref().unwrap_or("").is_empty());
    }

    #[test]
    fn test_read_ratings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "userId,movieId,rating,timestamp").unwrap();
        writeln!(file, "1,1,4.0,964982703").unwrap();
        drop(file);

        let ratings = read_ratings(&path).unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].user_id, 1);
        assert_eq!(ratings[0].rating, 4.0);
    }
}
