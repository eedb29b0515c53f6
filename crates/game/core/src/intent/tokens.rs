use crate::state::RoomNumber;

/// Name words too common to identify a target on their own.
const STOPWORDS: [&str; 5] = ["the", "and", "of", "a", "an"];

/// Lowercased word sequence of a player action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens {
    words: Vec<String>,
}

impl Tokens {
    pub fn new(text: &str) -> Self {
        let words = text
            .to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '#'))
            .filter(|word| !word.is_empty())
            .map(str::to_owned)
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Whether `pattern` occurs as a contiguous phrase.
    ///
    /// Pattern words are separated by spaces; a trailing `*` on a word
    /// matches any word with that prefix (`lock*` matches `locked`).
    pub fn matches(&self, pattern: &str) -> bool {
        let parts: Vec<&str> = pattern.split_whitespace().collect();
        self.contains_sequence(&parts, |word, part| match part.strip_suffix('*') {
            Some(prefix) => word.starts_with(prefix),
            None => word == *part,
        })
    }

    fn contains_sequence<P>(&self, parts: &[P], eq: impl Fn(&str, &P) -> bool) -> bool {
        if parts.is_empty() || parts.len() > self.words.len() {
            return false;
        }
        self.words
            .windows(parts.len())
            .any(|window| window.iter().zip(parts).all(|(word, part)| eq(word.as_str(), part)))
    }

    /// Explicit room reference: `room 3`, `room #3` or `#3`.
    pub fn room_reference(&self) -> Option<RoomNumber> {
        for (index, word) in self.words.iter().enumerate() {
            if let Some(number) = word.strip_prefix('#')
                && let Ok(number) = number.parse()
            {
                return Some(number);
            }
            if word == "room"
                && let Some(next) = self.words.get(index + 1)
                && let Ok(number) = next.trim_start_matches('#').parse()
            {
                return Some(number);
            }
        }
        None
    }
}

/// Finds the candidate named in `tokens`.
///
/// A full-name match anywhere in the text wins over a partial one; a partial
/// match needs one name word of three or more letters that is not a stopword.
pub fn match_name<T: Copy>(tokens: &Tokens, candidates: &[(T, &str)]) -> Option<T> {
    let named: Vec<(T, Tokens)> = candidates
        .iter()
        .map(|&(id, name)| (id, Tokens::new(name)))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    named
        .iter()
        .find(|(_, name)| tokens.contains_sequence(name.words(), |word, part| word == part.as_str()))
        .or_else(|| {
            named.iter().find(|(_, name)| {
                name.words().iter().any(|part| {
                    part.len() >= 3 && !STOPWORDS.contains(&part.as_str()) && tokens.contains_word(part)
                })
            })
        })
        .map(|(id, _)| *id)
}
