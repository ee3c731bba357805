/// A small closed stop-word list for keyword-retention scoring. Not meant
/// to be exhaustive, only to exclude the highest-frequency function words
/// that would otherwise dominate every retention score.
pub const STOPWORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "from", "have", "were", "will", "would", "could",
    "should", "their", "there", "about", "which", "when", "what", "where", "your", "they",
    "them", "been", "into", "then", "than", "also", "some", "such", "just", "more", "most",
    "over", "only", "other", "these", "those", "does", "did", "doing",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}
