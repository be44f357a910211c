use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Emotion category a stress score is bucketed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Emotion {
    Anger,
    Anxiety,
    Sadness,
    Normal,
}

impl Emotion {
    #[cfg(test)]
    pub const ALL: [Emotion; 4] = [
        Emotion::Anger,
        Emotion::Anxiety,
        Emotion::Sadness,
        Emotion::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Anger => "Anger",
            Emotion::Anxiety => "Anxiety",
            Emotion::Sadness => "Sadness",
            Emotion::Normal => "Normal",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anger" => Ok(Emotion::Anger),
            "anxiety" => Ok(Emotion::Anxiety),
            "sadness" => Ok(Emotion::Sadness),
            "normal" => Ok(Emotion::Normal),
            other => Err(format!("unknown emotion '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ANGER".parse::<Emotion>().unwrap(), Emotion::Anger);
        assert_eq!(" sadness ".parse::<Emotion>().unwrap(), Emotion::Sadness);
    }

    #[test]
    fn test_unknown_emotion_rejected() {
        assert!("joy".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_display_matches_stored_name() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.to_string().parse::<Emotion>().unwrap(), emotion);
        }
    }
}
