//! Free-text normalization ahead of symptom matching.

/// English stopwords removed before matching.
const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Lowercase `text`, strip ASCII punctuation, drop stopwords and collapse
/// whitespace.
///
/// Punctuation is removed before splitting, so `"don't"` becomes `"dont"`
/// (kept) while `"i'm"` becomes `"im"` (kept as well). Returns an empty string
/// when nothing but stopwords remains.
#[must_use]
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| !is_stop_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("I have a HIGH fever!!", "high fever")]
    #[case("  my   head\thurts,\n badly.  ", "head hurts badly")]
    #[case("Skin-rash & itching", "skinrash itching")]
    #[case("I've been vomiting", "ive vomiting")]
    #[case("Fièvre élevée", "fièvre élevée")]
    fn normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("And then I was there")]
    #[case("?!...,")]
    fn empty_or_stopword_only_yields_empty(#[case] input: &str) {
        assert_eq!(normalize(input), "");
    }

    #[test]
    fn deterministic() {
        let text = "Joint pain, chills and a runny nose";
        assert_eq!(normalize(text), normalize(text));
        assert_eq!(normalize(text), "joint pain chills runny nose");
    }

    #[test]
    fn stopwords_are_lowercase() {
        assert!(STOP_WORDS.iter().all(|w| w.to_lowercase() == *w));
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("fever"));
    }
}
