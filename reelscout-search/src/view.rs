//! Plain-text rendering of the session view.

use reelscout_core::MovieSummary;

use crate::controller::{SearchResultState, ViewState};

/// Renders the view as text: a trending section when there are entries,
/// followed by the main movie section.
pub fn render_view(state: &ViewState) -> String {
    let mut out = String::new();

    if !state.trending.is_empty() {
        out.push_str("Trending Movies\n");
        for (index, entry) in state.trending.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {}  {}\n",
                index + 1,
                entry.search_term,
                entry.poster_url
            ));
        }
        out.push('\n');
    }

    out.push_str("All Movies\n");
    match &state.results {
        SearchResultState::Idle => {}
        SearchResultState::Loading => out.push_str("  Loading...\n"),
        SearchResultState::Error(message) => out.push_str(&format!("  {message}\n")),
        SearchResultState::Ready(movies) => {
            for movie in movies {
                out.push_str(&format!("  {}\n", movie_card(movie)));
            }
        }
    }

    out
}

fn movie_card(movie: &MovieSummary) -> String {
    let rating = movie
        .vote_average
        .map_or_else(|| "N/A".to_string(), |rating| format!("{rating:.1}"));
    let language = movie.original_language.as_deref().unwrap_or("N/A");
    let year = movie
        .release_year()
        .map_or_else(|| "N/A".to_string(), |year| year.to_string());

    format!("{} | {rating} • {language} • {year}", movie.title)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use reelscout_core::TrendEntry;

    use super::*;

    fn movie(title: &str, rating: Option<f64>, released: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 1,
            title: title.to_string(),
            poster_path: None,
            popularity: 1.0,
            vote_average: rating,
            release_date: released.map(str::to_string),
            original_language: Some("en".to_string()),
        }
    }

    fn entry(term: &str, count: u64) -> TrendEntry {
        TrendEntry {
            id: format!("doc-{term}"),
            search_term: term.to_string(),
            count,
            movie_id: 1,
            poster_url: format!("https://image.tmdb.org/t/p/w500/{term}.jpg"),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_idle_renders_heading_only() {
        let rendered = render_view(&ViewState::default());
        assert_eq!(rendered, "All Movies\n");
    }

    #[test]
    fn test_loading_and_error() {
        let loading = ViewState {
            results: SearchResultState::Loading,
            ..ViewState::default()
        };
        assert!(render_view(&loading).contains("Loading..."));

        let failed = ViewState {
            results: SearchResultState::Error("Invalid API key".to_string()),
            ..ViewState::default()
        };
        let rendered = render_view(&failed);
        assert!(rendered.contains("Invalid API key"));
        assert!(!rendered.contains("Loading..."));
    }

    #[test]
    fn test_ready_cards_show_rating_language_and_year() {
        let state = ViewState {
            results: SearchResultState::Ready(vec![
                movie("Batman", Some(7.24), Some("1989-06-23")),
                movie("Untitled", None, None),
            ]),
            ..ViewState::default()
        };

        let rendered = render_view(&state);
        assert!(rendered.contains("Batman | 7.2 • en • 1989"));
        assert!(rendered.contains("Untitled | N/A • en • N/A"));
    }

    #[test]
    fn test_trending_section_is_numbered_in_order() {
        let state = ViewState {
            trending: vec![entry("batman", 3), entry("dune", 2)],
            ..ViewState::default()
        };

        let rendered = render_view(&state);
        let batman = rendered.find("1. batman").unwrap();
        let dune = rendered.find("2. dune").unwrap();
        assert!(rendered.starts_with("Trending Movies\n"));
        assert!(batman < dune);
        assert!(rendered.contains("https://image.tmdb.org/t/p/w500/dune.jpg"));
    }
}
