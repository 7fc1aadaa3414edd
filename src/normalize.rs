/// Strip ASCII punctuation, lowercase, collapse whitespace runs to one space
/// and trim both ends.
///
/// The same function runs over corpus lines at ingestion and over prefixes at
/// query time, so the two sides always compare like with like.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for token in text.split_whitespace() {
        let mut word = token
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .flat_map(char::to_lowercase)
            .peekable();
        if word.peek().is_none() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word);
    }
    out
}

/// First space-delimited token of already normalized text.
pub fn first_word(normalized: &str) -> &str {
    normalized.split(' ').next().unwrap_or_default()
}
