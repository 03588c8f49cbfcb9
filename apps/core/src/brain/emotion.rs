//! Emotional tone detection.
//!
//! Picks the dominant emotion in a message so the formatter can append a
//! matching emoji. Keyword lists are checked in order; the first hit wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Anxious,
    Tired,
    Confused,
}

impl Emotion {
    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "💙",
            Emotion::Angry => "🤝",
            Emotion::Anxious => "🌿",
            Emotion::Tired => "😴",
            Emotion::Confused => "🤔",
        }
    }
}

const KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Sad,
        &[
            "sad", "depressed", "lonely", "heartbroken", "miserable", "hopeless", "crying",
            "cried", "down", "unhappy", "grief",
        ],
    ),
    (
        Emotion::Anxious,
        &[
            "anxious", "anxiety", "worried", "nervous", "scared", "afraid", "stressed",
            "overwhelmed", "panic",
        ],
    ),
    (
        Emotion::Angry,
        &["angry", "furious", "mad", "annoyed", "frustrated", "irritated", "upset"],
    ),
    (Emotion::Tired, &["tired", "exhausted", "sleepy", "drained", "burnt out", "burned out"]),
    (Emotion::Confused, &["confused", "lost", "puzzled", "don't understand"]),
    (
        Emotion::Happy,
        &["happy", "excited", "glad", "thrilled", "great", "awesome", "joyful", "grateful"],
    ),
];

/// Returns the first emotion whose keyword appears as a whole word or phrase.
pub fn detect(text: &str) -> Option<Emotion> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    KEYWORDS.iter().find_map(|(emotion, keywords)| {
        keywords
            .iter()
            .any(|kw| {
                if kw.contains(' ') {
                    lowered.contains(kw)
                } else {
                    words.contains(kw)
                }
            })
            .then_some(*emotion)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_primary_emotion() {
        assert_eq!(detect("I'm feeling so lonely tonight"), Some(Emotion::Sad));
        assert_eq!(detect("really nervous about tomorrow"), Some(Emotion::Anxious));
        assert_eq!(detect("I am completely burnt out"), Some(Emotion::Tired));
        assert_eq!(detect("so excited for the trip!"), Some(Emotion::Happy));
    }

    #[test]
    fn test_whole_words_only() {
        // "madness" must not trigger "mad"
        assert_eq!(detect("the madness of crowds"), None);
        assert_eq!(detect("Explain photosynthesis"), None);
    }

    #[test]
    fn test_sad_wins_over_happy() {
        assert_eq!(detect("I used to be happy but now I'm sad"), Some(Emotion::Sad));
    }
}
