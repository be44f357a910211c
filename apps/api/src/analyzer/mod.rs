//! Emotion inference via external scripts.
//!
//! Scoring and recommendation live in Python. This module owns the process
//! boundary: spawning, timeouts, and turning printed lines into values.
//! `AppState` holds an `Arc<dyn EmotionAnalyzer>` so handlers never spawn
//! processes directly.

pub mod parse;
pub mod runner;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::analyzer::parse::{parse_last_line_score, parse_recommendation, Recommendation};
use crate::analyzer::runner::{script_arg, ScriptRunner};
use crate::assessment::emotion::Emotion;

pub const AUDIO_SCRIPT: &str = "predict_emotion_from_audio.py";
pub const VIDEO_SCRIPT: &str = "predict_emotion_from_video.py";
pub const RECOMMEND_SCRIPT: &str = "recommend_songs.py";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("{script} produced no output")]
    EmptyOutput { script: String },

    #[error("{script} printed a non-numeric score: {line}")]
    BadScore { script: String, line: String },
}

#[async_trait]
pub trait EmotionAnalyzer: Send + Sync {
    /// Voice stress score (0–100) for an uploaded audio clip.
    /// Missing or unparseable output is an error.
    async fn analyze_audio(&self, path: &Path) -> Result<f64, ScriptError>;

    /// Facial stress score (0–100) for an uploaded video.
    /// Returns `None` when the script ran but printed nothing usable.
    async fn analyze_video(&self, path: &Path) -> Result<Option<f64>, ScriptError>;

    /// Songs and one movie for the given emotion.
    async fn recommend(&self, emotion: Emotion) -> Result<Recommendation, ScriptError>;
}

/// Runs the bundled Python scripts.
pub struct PythonAnalyzer {
    runner: ScriptRunner,
}

impl PythonAnalyzer {
    pub fn new(runner: ScriptRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl EmotionAnalyzer for PythonAnalyzer {
    async fn analyze_audio(&self, path: &Path) -> Result<f64, ScriptError> {
        let arg = script_arg(path);
        let lines = self.runner.run(AUDIO_SCRIPT, &[&arg]).await?;
        let last = lines
            .iter()
            .rev()
            .find(|l| !l.is_empty())
            .ok_or_else(|| ScriptError::EmptyOutput {
                script: AUDIO_SCRIPT.to_string(),
            })?;
        parse_last_line_score(&lines).ok_or_else(|| ScriptError::BadScore {
            script: AUDIO_SCRIPT.to_string(),
            line: last.clone(),
        })
    }

    async fn analyze_video(&self, path: &Path) -> Result<Option<f64>, ScriptError> {
        let arg = script_arg(path);
        let lines = self.runner.run(VIDEO_SCRIPT, &[&arg]).await?;
        Ok(parse_last_line_score(&lines))
    }

    async fn recommend(&self, emotion: Emotion) -> Result<Recommendation, ScriptError> {
        let lines = self.runner.run(RECOMMEND_SCRIPT, &[emotion.as_str()]).await?;
        if lines.is_empty() {
            return Err(ScriptError::EmptyOutput {
                script: RECOMMEND_SCRIPT.to_string(),
            });
        }
        Ok(parse_recommendation(&lines))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Builds an analyzer whose "scripts" are shell snippets run by `sh`.
    fn analyzer_with(scripts: &[(&str, &str)]) -> (tempfile::TempDir, PythonAnalyzer) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in scripts {
            std::fs::write(dir.path().join(name), body).unwrap();
        }
        let runner = ScriptRunner::new("sh", dir.path(), Duration::from_secs(5));
        (dir, PythonAnalyzer::new(runner))
    }

    #[tokio::test]
    async fn test_audio_score_from_last_line() {
        let (_dir, analyzer) = analyzer_with(&[(
            AUDIO_SCRIPT,
            "echo \"emotion probs: {}\"\necho \"63.25\"\n",
        )]);
        let score = analyzer.analyze_audio(Path::new("a.wav")).await.unwrap();
        assert!((score - 63.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_audio_without_output_is_error() {
        let (_dir, analyzer) = analyzer_with(&[(AUDIO_SCRIPT, "true\n")]);
        let err = analyzer.analyze_audio(Path::new("a.wav")).await.unwrap_err();
        assert!(matches!(err, ScriptError::EmptyOutput { .. }));
    }

    #[tokio::test]
    async fn test_audio_with_garbage_is_bad_score() {
        let (_dir, analyzer) = analyzer_with(&[(AUDIO_SCRIPT, "echo oops\n")]);
        let err = analyzer.analyze_audio(Path::new("a.wav")).await.unwrap_err();
        assert!(matches!(err, ScriptError::BadScore { ref line, .. } if line == "oops"));
    }

    #[tokio::test]
    async fn test_stderr_warnings_do_not_displace_score() {
        let (_dir, analyzer) = analyzer_with(&[(
            AUDIO_SCRIPT,
            "echo 10\necho 'WARN tf: cuda not found' 1>&2\n",
        )]);
        let score = analyzer.analyze_audio(Path::new("a.wav")).await.unwrap();
        assert_eq!(score, 10.0);
    }

    #[tokio::test]
    async fn test_video_without_output_is_none() {
        let (_dir, analyzer) = analyzer_with(&[(VIDEO_SCRIPT, "true\n")]);
        let score = analyzer.analyze_video(Path::new("v.mp4")).await.unwrap();
        assert_eq!(score, None);
    }

    #[tokio::test]
    async fn test_recommend_passes_emotion_name() {
        let (_dir, analyzer) = analyzer_with(&[(
            RECOMMEND_SCRIPT,
            "echo \"song for $1\"\necho \"Movie\"\necho \"\"\necho 55\n",
        )]);
        let rec = analyzer.recommend(Emotion::Sadness).await.unwrap();
        assert_eq!(rec.songs, "song for Sadness");
        assert_eq!(rec.movie_title, "Movie");
        assert_eq!(rec.poster_url, "");
        assert_eq!(rec.rating_percent, 55);
    }
}
