//! Syllable counting

/// Counts syllables in a single word. Implementations must return at least 1.
pub trait SyllableCounter: Send + Sync {
    fn count(&self, word: &str) -> usize;
}

/// Orthographic syllable estimate: one syllable per run of vowels, a silent
/// final `e` dropped, never below one.
#[derive(Debug, Clone, Copy, Default)]
pub struct VowelGroupCounter;

impl VowelGroupCounter {
    pub fn new() -> Self {
        VowelGroupCounter
    }
}

fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'y' | 'à' | 'á' | 'â' | 'ä' | 'è' | 'é' | 'ê' | 'ë' | 'ì'
            | 'í' | 'î' | 'ï' | 'ò' | 'ó' | 'ô' | 'ö' | 'ù' | 'ú' | 'û' | 'ü'
    )
}

impl SyllableCounter for VowelGroupCounter {
    fn count(&self, word: &str) -> usize {
        let letters: Vec<char> = word
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphabetic())
            .collect();

        let mut groups = 0;
        let mut in_group = false;
        for c in &letters {
            let vowel = is_vowel(*c);
            if vowel && !in_group {
                groups += 1;
            }
            in_group = vowel;
        }

        // "make" -> 1, but "table" and "see" keep their final vowel group.
        let n = letters.len();
        if groups > 1
            && n >= 3
            && letters[n - 1] == 'e'
            && !is_vowel(letters[n - 2])
            && !(letters[n - 2] == 'l' && !is_vowel(letters[n - 3]))
        {
            groups -= 1;
        }

        groups.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_words() {
        let counter = VowelGroupCounter::new();
        assert_eq!(counter.count("cat"), 1);
        assert_eq!(counter.count("make"), 1);
        assert_eq!(counter.count("table"), 2);
        assert_eq!(counter.count("see"), 1);
        assert_eq!(counter.count("reading"), 2);
        assert_eq!(counter.count("complexity"), 4);
    }

    #[test]
    fn test_never_below_one() {
        let counter = VowelGroupCounter::new();
        assert_eq!(counter.count("hmm"), 1);
        assert_eq!(counter.count("42"), 1);
        assert_eq!(counter.count(""), 1);
    }
}
