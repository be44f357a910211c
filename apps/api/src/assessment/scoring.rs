//! Composite stress score and the threshold tables that bucket it.
//!
//! Two tables exist. The three-signal composite (face, voice, questionnaire)
//! uses quarter-width bands. The older face/voice average used by
//! `/api/scores/recommend` has its own, higher, cut-offs.

use crate::assessment::emotion::Emotion;

#[derive(Debug, Clone)]
pub struct ScoringWeights {
    pub face: f64,
    pub voice: f64,
    pub question: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            face: 0.4,
            voice: 0.4,
            question: 0.2,
        }
    }
}

/// Weighted composite of the three signals, rounded to the nearest integer.
/// A signal that was never recorded contributes 0.
pub fn compute_final_score(
    face: Option<f64>,
    voice: Option<f64>,
    question: Option<f64>,
    weights: &ScoringWeights,
) -> i32 {
    let weighted = weights.face * face.unwrap_or(0.0)
        + weights.voice * voice.unwrap_or(0.0)
        + weights.question * question.unwrap_or(0.0);
    weighted.round() as i32
}

/// Rounded mean of the voice and face scores.
pub fn compute_average_score(voice: f64, face: f64) -> i32 {
    ((voice + face) / 2.0).round() as i32
}

/// Composite score → emotion: ≥75 Anger, ≥50 Anxiety, ≥25 Sadness.
pub fn emotion_for_final_score(score: i32) -> Emotion {
    match score {
        s if s >= 75 => Emotion::Anger,
        s if s >= 50 => Emotion::Anxiety,
        s if s >= 25 => Emotion::Sadness,
        _ => Emotion::Normal,
    }
}

/// Face/voice average → emotion: ≥85 Anger, ≥70 Anxiety, ≥50 Sadness.
pub fn emotion_for_average_score(score: i32) -> Emotion {
    match score {
        s if s >= 85 => Emotion::Anger,
        s if s >= 70 => Emotion::Anxiety,
        s if s >= 50 => Emotion::Sadness,
        _ => Emotion::Normal,
    }
}

/// Questionnaire score: 20 points per "yes" in a comma-separated answer list.
pub fn question_score_from_answers(answers: &str) -> f64 {
    let yes = answers
        .split(',')
        .map(str::trim)
        .filter(|a| *a == "예" || a.eq_ignore_ascii_case("yes"))
        .count();
    (yes * 20) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_score_weights() {
        let w = ScoringWeights::default();
        // 0.4*80 + 0.4*60 + 0.2*40 = 32 + 24 + 8 = 64
        assert_eq!(compute_final_score(Some(80.0), Some(60.0), Some(40.0), &w), 64);
    }

    #[test]
    fn test_final_score_rounds_half_up() {
        let w = ScoringWeights::default();
        // 0.4*51.25 = 20.5
        assert_eq!(compute_final_score(Some(51.25), None, None, &w), 21);
    }

    #[test]
    fn test_missing_signals_count_as_zero() {
        let w = ScoringWeights::default();
        assert_eq!(compute_final_score(None, None, Some(100.0), &w), 20);
        assert_eq!(compute_final_score(None, None, None, &w), 0);
    }

    #[test]
    fn test_final_thresholds() {
        assert_eq!(emotion_for_final_score(100), Emotion::Anger);
        assert_eq!(emotion_for_final_score(75), Emotion::Anger);
        assert_eq!(emotion_for_final_score(74), Emotion::Anxiety);
        assert_eq!(emotion_for_final_score(50), Emotion::Anxiety);
        assert_eq!(emotion_for_final_score(49), Emotion::Sadness);
        assert_eq!(emotion_for_final_score(25), Emotion::Sadness);
        assert_eq!(emotion_for_final_score(24), Emotion::Normal);
        assert_eq!(emotion_for_final_score(0), Emotion::Normal);
    }

    #[test]
    fn test_average_thresholds() {
        assert_eq!(emotion_for_average_score(85), Emotion::Anger);
        assert_eq!(emotion_for_average_score(84), Emotion::Anxiety);
        assert_eq!(emotion_for_average_score(70), Emotion::Anxiety);
        assert_eq!(emotion_for_average_score(69), Emotion::Sadness);
        assert_eq!(emotion_for_average_score(50), Emotion::Sadness);
        assert_eq!(emotion_for_average_score(49), Emotion::Normal);
    }

    #[test]
    fn test_average_score_rounds() {
        assert_eq!(compute_average_score(70.0, 71.0), 71);
        assert_eq!(compute_average_score(10.2, 10.2), 10);
    }

    #[test]
    fn test_question_score_counts_yes_answers() {
        assert_eq!(question_score_from_answers("예,아니오,예,예,아니오"), 60.0);
        assert_eq!(question_score_from_answers(" 예 , yes ,no"), 40.0);
        assert_eq!(question_score_from_answers(""), 0.0);
    }
}
