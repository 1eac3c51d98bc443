use crate::error::{EtlError, Result};
use crate::types::{Genre, Movie, MovieGenre};
use std::collections::{BTreeMap, BTreeSet};

/// Literal the source files use for movies without genre data.
pub const NO_GENRES_SENTINEL: &str = "(no genres listed)";

/// Split a pipe-delimited genre field into an ordered, trimmed list, dropping
/// empty segments and the "(no genres listed)" sentinel.
pub fn parse_genres(field: &str) -> Vec<String> {
    field
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES_SENTINEL)
        .map(str::to_string)
        .collect()
}

/// Global genre vocabulary with ids 1..N assigned in lexicographic name order.
///
/// Ids depend on the vocabulary of the whole run, so construction takes the
/// complete movie collection rather than a stream. Ids are not stable across
/// runs.
#[derive(Debug)]
pub struct GenreDictionary {
    by_name: BTreeMap<String, i64>,
}

impl GenreDictionary {
    /// Build the dictionary from every per-movie genre list. This is the
    /// second pass over the movie set and must run after all lists are
    /// computed.
    pub fn build(movies: &[Movie]) -> Self {
        let names: BTreeSet<&str> = movies
            .iter()
            .flat_map(|m| m.genre_list.iter().map(String::as_str))
            .collect();

        let by_name = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), i as i64 + 1))
            .collect();

        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// All dictionary entries in id order.
    pub fn genres(&self) -> Vec<Genre> {
        self.by_name
            .iter()
            .map(|(name, id)| Genre {
                genre_id: *id,
                genre_name: name.clone(),
            })
            .collect()
    }
}

/// Resolve each movie's genre list through the dictionary and emit one link
/// per (movie, genre) pair. An unresolvable name means the dictionary was not
/// built from these movies; that is a sequencing bug and aborts the run.
pub fn build_movie_genres(movies: &[Movie], dict: &GenreDictionary) -> Result<Vec<MovieGenre>> {
    let mut links = Vec::new();
    for movie in movies {
        for name in &movie.genre_list {
            let genre_id = dict.resolve(name).ok_or_else(|| EtlError::GenreResolution {
                movie_id: movie.movie_id,
                name: name.clone(),
            })?;
            links.push(MovieGenre {
                movie_id: movie.movie_id,
                genre_id,
            });
        }
    }
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieDetails;

    fn movie(movie_id: i64, genre_list: &[&str]) -> Movie {
        Movie {
            movie_id,
            title: format!("Movie {movie_id}"),
            clean_title: format!("Movie {movie_id}"),
            year: None,
            decade: None,
            genres: genre_list.join("|"),
            genre_list: genre_list.iter().map(|g| g.to_string()).collect(),
            details: MovieDetails::not_available(),
            box_office_amount: None,
        }
    }

    #[test]
    fn test_parse_genres() {
        assert_eq!(
            parse_genres("Adventure|Animation|(no genres listed)"),
            vec!["Adventure", "Animation"]
        );
        assert_eq!(parse_genres(""), Vec::<String>::new());
        assert_eq!(parse_genres("(no genres listed)"), Vec::<String>::new());
        assert_eq!(parse_genres(" Action | Crime "), vec!["Action", "Crime"]);
    }

    #[test]
    fn test_dictionary_is_sorted_union_with_contiguous_ids() {
        let movies = vec![
            movie(1, &["Crime", "Action"]),
            movie(2, &["Action", "Adventure"]),
            movie(3, &[]),
        ];
        let dict = GenreDictionary::build(&movies);

        assert_eq!(dict.len(), 3);
        let genres = dict.genres();
        let names: Vec<&str> = genres.iter().map(|g| g.genre_name.as_str()).collect();
        let ids: Vec<i64> = genres.iter().map(|g| g.genre_id).collect();
        assert_eq!(names, vec!["Action", "Adventure", "Crime"]);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_build_movie_genres_links_every_pair() {
        let movies = vec![movie(1, &["Adventure", "Animation"]), movie(2, &["Action", "Crime"])];
        let dict = GenreDictionary::build(&movies);
        let links = build_movie_genres(&movies, &dict).unwrap();

        assert_eq!(links.len(), 4);
        for link in &links {
            assert!(dict.genres().iter().any(|g| g.genre_id == link.genre_id));
        }
    }

    #[test]
    fn test_unresolvable_genre_is_fatal() {
        let dict = GenreDictionary::build(&[movie(1, &["Action"])]);
        let stale = vec![movie(2, &["Western"])];
        let err = build_movie_genres(&stale, &dict).unwrap_err();
        assert!(matches!(
            err,
            EtlError::GenreResolution { movie_id: 2, .. }
        ));
    }
}
