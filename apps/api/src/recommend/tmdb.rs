//! TMDB client. The only place that talks to The Movie Database.
//!
//! Movies are discovered by genre (derived from the emotion), filtered for
//! quality, shuffled, and truncated client-side.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const TMDB_API_URL: &str = "https://api.themoviedb.org/3";
const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const LANGUAGE: &str = "ko-KR";
const MIN_VOTE_COUNT: u32 = 10;
const MIN_POPULARITY: f64 = 10.0;

#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

// Request URLs carry `api_key`, so they are stripped before the error is stored.
impl From<reqwest::Error> for TmdbError {
    fn from(e: reqwest::Error) -> Self {
        TmdbError::Http(e.without_url())
    }
}

/// Genre a given emotion name maps to. Anything unrecognised gets Family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genre {
    Action,
    Drama,
    Thriller,
    Family,
}

impl Genre {
    pub fn for_emotion(emotion: &str) -> Self {
        match emotion.trim().to_ascii_lowercase().as_str() {
            "anger" => Genre::Action,
            "sadness" => Genre::Drama,
            "anxiety" => Genre::Thriller,
            _ => Genre::Family,
        }
    }

    pub fn tmdb_id(&self) -> u32 {
        match self {
            Genre::Action => 28,
            Genre::Drama => 18,
            Genre::Thriller => 53,
            Genre::Family => 10751,
        }
    }
}

/// Movie as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDto {
    pub title: String,
    pub poster_url: String,
    pub overview: String,
    pub rating_percent: i32,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
}

/// Source of movie recommendations. `AppState` carries an `Arc<dyn MovieCatalog>`.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    async fn recommend_movies(&self, emotion: &str, count: usize)
        -> Result<Vec<MovieDto>, TmdbError>;
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Result<Self, TmdbError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(15)).build()?,
            api_key,
            base_url: TMDB_API_URL.to_string(),
        })
    }

    pub async fn discover(&self, genre: Genre) -> Result<Vec<TmdbMovie>, TmdbError> {
        let url = format!("{}/discover/movie", self.base_url);
        let genre_id = genre.tmdb_id().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("with_genres", genre_id.as_str()),
                ("language", LANGUAGE),
                ("sort_by", "popularity.desc"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TmdbError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DiscoverResponse = response.json().await?;
        debug!(
            "TMDB discover returned {} movies for genre {:?}",
            body.results.len(),
            genre
        );
        Ok(body.results)
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn recommend_movies(
        &self,
        emotion: &str,
        count: usize,
    ) -> Result<Vec<MovieDto>, TmdbError> {
        let results = self.discover(Genre::for_emotion(emotion)).await?;
        Ok(select_movies(&results, count, &mut rand::thread_rng()))
    }
}

/// TMDB's 0–10 vote average as a rounded percentage.
pub fn rating_percent(vote_average: f64) -> i32 {
    (vote_average * 10.0).round() as i32
}

/// Dedupes by title, drops entries without a poster or with too little
/// engagement, then returns up to `count` of the survivors in random order.
pub fn select_movies<R: Rng + ?Sized>(
    results: &[TmdbMovie],
    count: usize,
    rng: &mut R,
) -> Vec<MovieDto> {
    let mut seen = HashSet::new();
    let mut movies: Vec<MovieDto> = Vec::new();

    for item in results {
        if !seen.insert(item.title.as_str()) {
            continue;
        }
        let poster_path = match item.poster_path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => continue,
        };
        if item.vote_count < MIN_VOTE_COUNT || item.popularity < MIN_POPULARITY {
            continue;
        }
        movies.push(MovieDto {
            title: item.title.clone(),
            poster_url: format!("{POSTER_BASE_URL}{poster_path}"),
            overview: item.overview.clone(),
            rating_percent: rating_percent(item.vote_average),
        });
    }

    movies.shuffle(rng);
    movies.truncate(count);
    movies
}
