//! Intent classification using ordered regex groups.
//!
//! Groups are tested in a fixed priority order and the first group with a
//! matching pattern wins. There is no scoring: ambiguous input resolves to
//! whichever category is checked first.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Fixed enumeration of intent tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    /// Hello, hi, good morning...
    Greeting,
    /// Questions about the assistant itself
    Identity,
    /// Health, symptoms, medication
    Medical,
    /// Requests for essays and long-form writing
    Essay,
    /// Statements of feeling
    Emotional,
    /// Arithmetic and prime-number questions
    Math,
    /// Nothing matched
    General,
}

impl IntentTag {
    pub fn label(&self) -> &'static str {
        match self {
            IntentTag::Greeting => "greeting",
            IntentTag::Identity => "identity",
            IntentTag::Medical => "medical",
            IntentTag::Essay => "essay",
            IntentTag::Emotional => "emotional",
            IntentTag::Math => "math",
            IntentTag::General => "general",
        }
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tag: IntentTag,
    /// Text fragment that triggered the match, if any
    pub matched: Option<String>,
}

struct PatternGroup {
    tag: IntentTag,
    patterns: &'static [Regex],
}

static GREETING_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)^\s*(hello|hi|hey|hiya|greetings|howdy|yo)\b")
            .expect("Invalid regex: greeting words"),
        Regex::new(r"(?i)^\s*good\s+(morning|afternoon|evening|day)\b")
            .expect("Invalid regex: time-of-day greetings"),
        Regex::new(r"(?i)^\s*(what'?s up|sup|namaste|hola|bonjour)\b")
            .expect("Invalid regex: informal greetings"),
    ]
});

static IDENTITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bwho\s+are\s+you\b").expect("Invalid regex: who are you"),
        Regex::new(r"(?i)\bwhat\s+(are\s+you|is\s+your\s+name)\b")
            .expect("Invalid regex: what are you"),
        Regex::new(r"(?i)\byour\s+name\b").expect("Invalid regex: your name"),
        Regex::new(r"(?i)\bwho\s+(made|created|built|developed|trained)\s+you\b")
            .expect("Invalid regex: creator"),
        Regex::new(r"(?i)\bare\s+you\s+(a\s+)?(bot|robot|human|real|an?\s+ai)\b")
            .expect("Invalid regex: nature"),
        Regex::new(r"(?i)\bintroduce\s+yourself\b").expect("Invalid regex: introduce yourself"),
    ]
});

static MEDICAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(symptoms?|diagnos(is|e|ed)|disease|illness|infection|syndrome)\b")
            .expect("Invalid regex: medical conditions"),
        Regex::new(r"(?i)\b(medicine|medication|prescription|dosage|dose|pills?|tablets?|antibiotics?|side\s+effects?)\b")
            .expect("Invalid regex: medication"),
        Regex::new(r"(?i)\b(doctor|physician|hospital|clinic|treatment|therapy|surgery)\b")
            .expect("Invalid regex: care"),
        Regex::new(r"(?i)\b(fever|headache|migraine|cough|nausea|rash|diabetes|cancer|asthma|blood\s+pressure|chest\s+pain)\b")
            .expect("Invalid regex: ailments"),
    ]
});

static ESSAY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bessays?\b").expect("Invalid regex: essay"),
        Regex::new(r"(?i)\b(write|compose|draft)\b.*\b(article|composition|report|paragraphs?)\b")
            .expect("Invalid regex: long-form writing"),
        Regex::new(r"(?i)\b\d+[\s-]words?\b").expect("Invalid regex: word count"),
    ]
});

static EMOTIONAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\bi\s+(feel|am\s+feeling|'m\s+feeling)\b").expect("Invalid regex: i feel"),
        Regex::new(r"(?i)\b(i\s+am|i'm|im)\s+(so\s+|very\s+|really\s+)?(sad|depressed|lonely|anxious|stressed|angry|upset|worried|scared|tired|exhausted|happy|excited|frustrated|confused|overwhelmed)\b")
            .expect("Invalid regex: i am <emotion>"),
        Regex::new(r"(?i)\b(heartbroken|miserable|hopeless|lonely|anxiety|depression|crying|cried)\b")
            .expect("Invalid regex: distress words"),
    ]
});

static MATH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Bare expression: 3+5, (2+3)*4, 2^10, 5**2
        Regex::new(r"^\s*[\d(][\d\s.()]*([+\-*/^]|\*\*)[\d\s.()+\-*/^]*[\d)]\s*[?=!.]?\s*$")
            .expect("Invalid regex: bare expression"),
        // Prefixed expression: what is 15 * 8 - 10?
        Regex::new(r"(?i)\b(what\s+is|what's|calculate|solve|compute|evaluate)\s+[\d(][\d\s.()]*([+\-*/^]|\*\*)\s*[\d(]")
            .expect("Invalid regex: prefixed expression"),
        Regex::new(r"(?i)\b(prime\s+(numbers?|from|between)|primes)\b")
            .expect("Invalid regex: primes"),
    ]
});

/// Intent classifier using ordered regex groups
pub struct IntentClassifier {
    groups: Vec<PatternGroup>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Priority order: greeting, identity, medical, essay, emotional, math.
    pub fn new() -> Self {
        let groups = vec![
            PatternGroup {
                tag: IntentTag::Greeting,
                patterns: GREETING_PATTERNS.as_slice(),
            },
            PatternGroup {
                tag: IntentTag::Identity,
                patterns: IDENTITY_PATTERNS.as_slice(),
            },
            PatternGroup {
                tag: IntentTag::Medical,
                patterns: MEDICAL_PATTERNS.as_slice(),
            },
            PatternGroup {
                tag: IntentTag::Essay,
                patterns: ESSAY_PATTERNS.as_slice(),
            },
            PatternGroup {
                tag: IntentTag::Emotional,
                patterns: EMOTIONAL_PATTERNS.as_slice(),
            },
            PatternGroup {
                tag: IntentTag::Math,
                patterns: MATH_PATTERNS.as_slice(),
            },
        ];

        Self { groups }
    }

    /// Classify a message. Never fails; unmatched input is `General`.
    pub fn classify(&self, text: &str) -> Classification {
        let text = text.trim();

        if text.is_empty() {
            return Classification {
                tag: IntentTag::General,
                matched: None,
            };
        }

        for group in &self.groups {
            for pattern in group.patterns {
                if let Some(m) = pattern.find(text) {
                    return Classification {
                        tag: group.tag,
                        matched: Some(m.as_str().trim().to_string()),
                    };
                }
            }
        }

        Classification {
            tag: IntentTag::General,
            matched: None,
        }
    }
}
