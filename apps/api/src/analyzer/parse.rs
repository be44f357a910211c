//! Parsing of the line-oriented output the inference scripts print.
//!
//! Score scripts print debug lines first and the numeric score last.
//! The recommendation script prints exactly four lines:
//! songs (with `\n` escaped), movie title, poster URL, rating percent.

use tracing::warn;

/// Interprets the last non-blank output line as a score.
/// Returns `None` when there is no output or the line is not a number.
pub fn parse_last_line_score(lines: &[String]) -> Option<f64> {
    let last = lines.iter().rev().find(|l| !l.trim().is_empty())?;
    match last.trim().parse::<f64>() {
        Ok(score) if score.is_finite() => Some(score),
        _ => {
            warn!("Could not parse score from script output line: {last}");
            None
        }
    }
}

/// Songs plus one movie, as returned by the recommendation script.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub songs: String,
    pub movie_title: String,
    pub poster_url: String,
    pub rating_percent: i32,
}

impl Recommendation {
    /// Placeholder stored when the script cannot be run at all.
    pub fn failed() -> Self {
        Self {
            songs: "추천 실패".to_string(),
            movie_title: "추천 실패".to_string(),
            poster_url: String::new(),
            rating_percent: 0,
        }
    }
}

pub fn parse_recommendation(lines: &[String]) -> Recommendation {
    let line = |i: usize| lines.get(i).map(|l| l.trim()).unwrap_or("");

    let rating_percent = match lines.get(3) {
        Some(raw) => raw.trim().parse::<i32>().unwrap_or_else(|_| {
            warn!("Could not parse movie rating percent: {raw}");
            0
        }),
        None => 0,
    };

    Recommendation {
        songs: line(0).replace("\\n", "\n"),
        movie_title: line(1).to_string(),
        poster_url: line(2).to_string(),
        rating_percent,
    }
}
