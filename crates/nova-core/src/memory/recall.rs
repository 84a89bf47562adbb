//! Recall interceptor: answers "what is my X?" questions from the memory
//! store without a round trip to the chat service.

use regex::Regex;

use super::store::MemoryStore;

/// A question answered from memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recall {
    /// The key with the casing it was stored under.
    pub key: String,
    pub value: String,
}

impl Recall {
    /// The sentence spoken back to the user.
    pub fn reply(&self) -> String {
        format!("Based on my records, your {} is: {}", self.key, self.value)
    }
}

/// Matches recall questions against an ordered list of phrasings.
#[derive(Debug, Clone)]
pub struct RecallInterceptor {
    patterns: Vec<Regex>,
}

const RECALL_PATTERNS: [&str; 5] = [
    r"(?i)what is my (.+)\?",
    r"(?i)what's my (.+)\?",
    r"(?i)what did i tell you about (.+)\?",
    r"(?i)recall my (.+)",
    r"(?i)do you remember my (.+)\?",
];

impl RecallInterceptor {
    pub fn new() -> Self {
        let patterns = RECALL_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("recall pattern is valid"))
            .collect();
        Self { patterns }
    }

    /// Try every phrasing in order. The first one whose captured key has a
    /// non-empty stored value wins; a phrasing that matches a missing key
    /// falls through to the next.
    pub fn intercept(&self, text: &str, memory: &MemoryStore) -> Option<Recall> {
        let text = text.trim();
        self.patterns.iter().find_map(|pattern| {
            let subject = pattern.captures(text)?.get(1)?.as_str().trim().to_lowercase();
            let (key, value) = memory.recall(&subject)?;
            (!value.is_empty()).then(|| Recall {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
    }
}

impl Default for RecallInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> MemoryStore {
        let mut memory = MemoryStore::new();
        memory.remember("Favorite Color", "blue");
        memory.remember("dog's name", "Rex");
        memory
    }

    #[test]
    fn test_what_is_my() {
        let recall = RecallInterceptor::new()
            .intercept("What is my favorite color?", &memory())
            .unwrap();
        assert_eq!(recall.key, "Favorite Color");
        assert_eq!(recall.reply(), "Based on my records, your Favorite Color is: blue");
    }

    #[test]
    fn test_other_phrasings() {
        let interceptor = RecallInterceptor::new();
        let memory = memory();
        for question in [
            "what's my dog's name?",
            "What did I tell you about dog's name?",
            "recall my dog's name",
            "Do you remember my dog's name?",
        ] {
            let recall = interceptor.intercept(question, &memory);
            assert_eq!(recall.map(|r| r.value), Some("Rex".to_string()), "{question}");
        }
    }

    #[test]
    fn test_requires_question_mark() {
        let interceptor = RecallInterceptor::new();
        assert!(interceptor.intercept("what is my favorite color", &memory()).is_none());
    }

    #[test]
    fn test_unknown_key_falls_through() {
        let interceptor = RecallInterceptor::new();
        assert!(interceptor.intercept("What is my shoe size?", &memory()).is_none());
    }

    #[test]
    fn test_empty_value_is_not_recalled() {
        let mut memory = MemoryStore::new();
        memory.remember("nickname", "");
        let interceptor = RecallInterceptor::new();
        assert!(interceptor.intercept("what is my nickname?", &memory).is_none());
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let recall = RecallInterceptor::new()
            .intercept("   recall my  favorite color  ", &memory())
            .unwrap();
        assert_eq!(recall.value, "blue");
    }
}
