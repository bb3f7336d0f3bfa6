//! Lexical diversity measures
//!
//! Type-token ratio, its log-transformed variant and MTLD (measure of textual
//! lexical diversity, McCarthy & Jarvis 2010).

use std::collections::HashSet;

/// Value returned by MTLD when no factor could be formed.
pub const MTLD_UNDEFINED: f64 = -1.0;

/// Default TTR threshold at which an MTLD factor is closed.
pub const DEFAULT_MTLD_THRESHOLD: f64 = 0.72;

/// Vocabulary richness over an ordered sequence of word forms.
pub trait LexicalDiversity: Send + Sync {
    /// Distinct forms divided by total forms.
    fn ttr(&self, words: &[String]) -> f64;

    /// Mean length of word runs that keep their TTR above a threshold.
    fn mtld(&self, words: &[String]) -> f64;

    /// `log10(types) / log10(tokens)`.
    fn log_ttr(&self, words: &[String]) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct StandardDiversity {
    mtld_threshold: f64,
}

impl StandardDiversity {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_MTLD_THRESHOLD)
    }

    pub fn with_threshold(mtld_threshold: f64) -> Self {
        StandardDiversity { mtld_threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.mtld_threshold
    }

    /// One directional MTLD pass.
    fn mtld_pass<'a>(&self, words: impl Iterator<Item = &'a String>) -> f64 {
        let mut types: HashSet<String> = HashSet::new();
        let mut token_count = 0usize;
        let mut current_ttr = 1.0;
        let mut factors = 0.0;
        let mut total = 0usize;

        for word in words {
            total += 1;
            token_count += 1;
            types.insert(word.to_lowercase());
            current_ttr = types.len() as f64 / token_count as f64;
            if current_ttr <= self.mtld_threshold {
                factors += 1.0;
                token_count = 0;
                types.clear();
                current_ttr = 1.0;
            }
        }

        // The unfinished tail counts as a partial factor.
        let excess = 1.0 - current_ttr;
        let excess_range = 1.0 - self.mtld_threshold;
        factors += excess / excess_range;

        if factors != 0.0 {
            total as f64 / factors
        } else {
            MTLD_UNDEFINED
        }
    }
}

impl Default for StandardDiversity {
    fn default() -> Self {
        Self::new()
    }
}

fn type_count(words: &[String]) -> usize {
    words.iter().collect::<HashSet<_>>().len()
}

fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

impl LexicalDiversity for StandardDiversity {
    fn ttr(&self, words: &[String]) -> f64 {
        safe_divide(type_count(words) as f64, words.len() as f64)
    }

    fn mtld(&self, words: &[String]) -> f64 {
        let forward = self.mtld_pass(words.iter());
        let backward = self.mtld_pass(words.iter().rev());
        (forward + backward) / 2.0
    }

    fn log_ttr(&self, words: &[String]) -> f64 {
        if words.is_empty() {
            return 0.0;
        }
        let types = type_count(words) as f64;
        safe_divide(types.log10(), (words.len() as f64).log10())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_ttr() {
        let d = StandardDiversity::new();
        assert_eq!(d.ttr(&words("a b a b")), 0.5);
        assert_eq!(d.ttr(&words("a b c")), 1.0);
        assert_eq!(d.ttr(&[]), 0.0);
    }

    #[test]
    fn test_log_ttr() {
        let d = StandardDiversity::new();
        assert_eq!(d.log_ttr(&words("word")), 0.0);
        assert!((d.log_ttr(&words("a b a b")) - 0.5).abs() < 1e-12);
        assert_eq!(d.log_ttr(&words("a b c d")), 1.0);
    }

    #[test]
    fn test_mtld_all_distinct_is_undefined() {
        let d = StandardDiversity::new();
        assert_eq!(d.mtld(&words("one two three")), MTLD_UNDEFINED);
    }

    #[test]
    fn test_mtld_repetitive_text() {
        let d = StandardDiversity::new();
        // Forward and backward: "a a" closes a factor at TTR 0.5 each time.
        let value = d.mtld(&words("a a a a"));
        assert!((value - 2.0).abs() < 1e-12, "got {}", value);
    }

    #[test]
    fn test_mtld_partial_factor() {
        let d = StandardDiversity::new();
        // "a b a": TTR 1, 1, 0.667 -> one full factor, empty tail. 3 / 1 = 3.
        let value = d.mtld(&words("a b a"));
        assert!((value - 3.0).abs() < 1e-12, "got {}", value);
    }
}
