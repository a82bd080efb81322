//! Movie data model shared by the provider client and the trend recorder.

use serde::{Deserialize, Serialize};

/// A single movie as returned by the metadata provider.
///
/// Deserialized verbatim from the provider's result objects and never
/// mutated locally; each fetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Provider identifier
    pub id: u64,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Poster path relative to the image CDN, e.g. `/abc.jpg`
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Provider popularity score
    #[serde(default)]
    pub popularity: f64,
    /// Average user rating (0.0-10.0)
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Release date as `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// ISO 639-1 language code
    #[serde(default)]
    pub original_language: Option<String>,
}

impl MovieSummary {
    /// Builds the full poster URL from an image base such as
    /// `https://image.tmdb.org/t/p/w500`.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url.trim_end_matches('/'), path))
    }

    /// Release year parsed from the release date.
    pub fn release_year(&self) -> Option<u16> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_provider_object_with_missing_fields() {
        let json = r#"{"id": 268, "title": "Batman", "poster_path": null, "popularity": 41.5, "adult": false}"#;
        let movie: MovieSummary = serde_json::from_str(json).unwrap();

        assert_eq!(movie.id, 268);
        assert_eq!(movie.title, "Batman");
        assert!(movie.poster_path.is_none());
        assert!(movie.vote_average.is_none());
        assert_eq!(movie.poster_url("https://image.tmdb.org/t/p/w500"), None);
    }

    #[test]
    fn test_poster_url_and_year() {
        let movie = MovieSummary {
            id: 1,
            title: "The Batman".to_string(),
            poster_path: Some("/74xTEgt7R36Fpooo50r9T25onhq.jpg".to_string()),
            popularity: 100.0,
            vote_average: Some(7.7),
            release_date: Some("2022-03-01".to_string()),
            original_language: Some("en".to_string()),
        };

        assert_eq!(
            movie.poster_url("https://image.tmdb.org/t/p/w500/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/74xTEgt7R36Fpooo50r9T25onhq.jpg")
        );
        assert_eq!(movie.release_year(), Some(2022));
    }
}
