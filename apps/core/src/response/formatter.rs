use crate::brain::{emotion, IntentTag};

/// Marker used to avoid appending the disclaimer twice.
pub const MEDICAL_DISCLAIMER_MARKER: &str = "Medical Disclaimer";

const MEDICAL_DISCLAIMER: &str = "⚠️ **Medical Disclaimer:** This information is for general \
educational purposes only and is not a diagnosis. Please consult a qualified healthcare \
professional for advice about your situation.";

/// Deterministic post-processing of a reply, keyed by intent tag.
#[derive(Debug, Clone)]
pub struct ResponseFormatter {
    essay_target_words: usize,
}

impl ResponseFormatter {
    pub fn new(essay_target_words: usize) -> Self {
        Self {
            essay_target_words: essay_target_words.max(1),
        }
    }

    /// Applies the tag's transformation to `reply`. `user_message` is only
    /// consulted for emotional tone.
    pub fn format(&self, tag: IntentTag, reply: &str, user_message: &str) -> String {
        let reply = reply.trim();
        match tag {
            IntentTag::Medical => with_disclaimer(reply),
            IntentTag::Essay => self.fit_essay(reply),
            IntentTag::Emotional => with_emoji(reply, user_message),
            _ => reply.to_string(),
        }
    }

    /// Trims long essays at a paragraph boundary and flags short ones.
    ///
    /// Essays within 50%..150% of the target pass through unchanged.
    pub fn fit_essay(&self, essay: &str) -> String {
        let target = self.essay_target_words;
        let words = word_count(essay);

        if words * 2 < target {
            return format!(
                "{}\n\n*(This is shorter than the usual ~{} words. Ask me to expand any part.)*",
                essay, target
            );
        }
        if words * 2 <= target * 3 {
            return essay.to_string();
        }

        let mut kept: Vec<&str> = Vec::new();
        let mut kept_words = 0;
        for paragraph in essay.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            let paragraph_words = word_count(paragraph);
            if kept_words + paragraph_words > target && !kept.is_empty() {
                break;
            }
            kept.push(paragraph);
            kept_words += paragraph_words;
        }

        let mut trimmed = kept.join("\n\n");
        if kept_words > target {
            // A single oversized paragraph: cut at the word limit.
            trimmed = trimmed
                .split_whitespace()
                .take(target)
                .collect::<Vec<_>>()
                .join(" ");
            trimmed.push('…');
        }
        trimmed
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn with_disclaimer(reply: &str) -> String {
    if reply.contains(MEDICAL_DISCLAIMER_MARKER) {
        return reply.to_string();
    }
    format!("{}\n\n{}", reply, MEDICAL_DISCLAIMER)
}

fn with_emoji(reply: &str, user_message: &str) -> String {
    match emotion::detect(user_message) {
        Some(emotion) if !reply.contains(emotion.emoji()) => {
            format!("{} {}", reply, emotion.emoji())
        }
        _ => reply.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_medical_gets_disclaimer_once() {
        let formatter = ResponseFormatter::new(200);

        let once = formatter.format(IntentTag::Medical, "Rest and fluids.", "I have a fever");
        assert!(once.starts_with("Rest and fluids."));
        assert!(once.contains(MEDICAL_DISCLAIMER_MARKER));

        let twice = formatter.format(IntentTag::Medical, &once, "I have a fever");
        assert_eq!(twice.matches(MEDICAL_DISCLAIMER_MARKER).count(), 1);
    }

    #[test]
    fn test_general_is_passthrough() {
        let formatter = ResponseFormatter::new(200);
        assert_eq!(formatter.format(IntentTag::General, "  Paris.  ", "capital?"), "Paris.");
    }

    #[test]
    fn test_essay_within_band_is_unchanged() {
        let formatter = ResponseFormatter::new(100);
        let essay = words(120);
        assert_eq!(formatter.fit_essay(&essay), essay);
    }

    #[test]
    fn test_long_essay_trimmed_at_paragraph() {
        let formatter = ResponseFormatter::new(100);
        let essay = format!("{}\n\n{}\n\n{}", words(60), words(30), words(80));

        let trimmed = formatter.fit_essay(&essay);
        assert_eq!(word_count(&trimmed), 90);
        assert_eq!(trimmed.matches("\n\n").count(), 1);
    }

    #[test]
    fn test_single_huge_paragraph_cut_at_target() {
        let formatter = ResponseFormatter::new(50);
        let trimmed = formatter.fit_essay(&words(400));
        assert!(trimmed.ends_with('…'));
        assert_eq!(word_count(&trimmed), 50);
    }

    #[test]
    fn test_short_essay_is_flagged() {
        let formatter = ResponseFormatter::new(200);
        let padded = formatter.fit_essay(&words(20));
        assert!(padded.contains("~200 words"));
    }

    #[test]
    fn test_emotional_reply_gets_emoji() {
        let formatter = ResponseFormatter::new(200);
        let reply = formatter.format(IntentTag::Emotional, "I'm here for you.", "I feel so lonely");
        assert!(reply.ends_with(emotion::Emotion::Sad.emoji()));

        let neutral = formatter.format(IntentTag::Emotional, "Tell me more.", "I feel something");
        assert_eq!(neutral, "Tell me more.");
    }
}
