//! Demo provider implementation for offline sessions.

use async_trait::async_trait;
use reelscout_core::MovieSummary;
use reelscout_core::trending::NewTrendEntry;

use super::MovieProvider;
use crate::errors::MovieQueryError;

/// Built-in catalog: (id, title, poster path, popularity, rating, release date)
const CATALOG: &[(u64, &str, &str, f64, f64, &str)] = &[
    (268, "Batman", "/cij4dd21v2Rk2YtUQbV5kW69WB2.jpg", 40.1, 7.2, "1989-06-21"),
    (414906, "The Batman", "/74xTEgt7R36Fpooo50r9T25onhq.jpg", 91.4, 7.7, "2022-03-01"),
    (155, "The Dark Knight", "/qJ2tW6WMUDux911r6m7haRef0WH.jpg", 88.2, 8.5, "2008-07-16"),
    (438631, "Dune", "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg", 75.0, 7.8, "2021-09-15"),
    (693134, "Dune: Part Two", "/1pdfLvkbY9ohJlCjQH2CZjjYVvJ.jpg", 120.3, 8.2, "2024-02-27"),
    (949, "Heat", "/umSVjVdbVwtx5ryCA2QXL44Durm.jpg", 30.7, 7.9, "1995-12-15"),
    (348, "Alien", "/vfrQk5IPloGg1v9Rzbh2Eg3VGyM.jpg", 45.6, 8.1, "1979-05-25"),
    (603, "The Matrix", "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg", 70.9, 8.2, "1999-03-31"),
];

/// Seeded search counters: (search term, catalog movie id, count)
const TRENDING_SEED: &[(&str, u64, u64)] = &[
    ("heat", 949, 3),
    ("batman", 268, 7),
    ("dune", 693134, 5),
    ("the matrix", 603, 5),
    ("alien", 348, 2),
];

/// Demo provider for development without a provider API key.
///
/// Serves a small fixed catalog: searches match titles case-insensitively,
/// an empty query lists everything by popularity.
#[derive(Debug, Default)]
pub struct DemoProvider;

impl DemoProvider {
    /// Creates the demo provider.
    pub fn new() -> Self {
        Self
    }

    /// Search counters matching the catalog, for seeding a demo trend store.
    ///
    /// Poster URLs are built from `image_base_url` like recorded hits.
    pub fn trending_seed(&self, image_base_url: &str) -> Vec<(NewTrendEntry, u64)> {
        TRENDING_SEED
            .iter()
            .filter_map(|&(term, movie_id, count)| {
                let movie = Self::catalog().find(|movie| movie.id == movie_id)?;
                let entry = NewTrendEntry {
                    search_term: term.to_string(),
                    movie_id,
                    poster_url: movie.poster_url(image_base_url).unwrap_or_default(),
                };
                Some((entry, count))
            })
            .collect()
    }

    fn catalog() -> impl Iterator<Item = MovieSummary> {
        CATALOG
            .iter()
            .map(|&(id, title, poster, popularity, rating, released)| MovieSummary {
                id,
                title: title.to_string(),
                poster_path: Some(poster.to_string()),
                popularity,
                vote_average: Some(rating),
                release_date: Some(released.to_string()),
                original_language: Some("en".to_string()),
            })
    }
}

#[async_trait]
impl MovieProvider for DemoProvider {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<MovieSummary>, MovieQueryError> {
        let needle = query.trim().to_lowercase();

        let mut movies: Vec<MovieSummary> = Self::catalog()
            .filter(|movie| needle.is_empty() || movie.title.to_lowercase().contains(&needle))
            .collect();

        if query.is_empty() {
            movies.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        }

        Ok(movies)
    }
}
