//! Text analysis: lexical statistics, majority-script language tagging,
//! lexicon sentiment, and frequency-ranked keyword extraction.
//!
//! Every function here is a single pass over the input. Input size is capped
//! upstream by the codec layer, so worst-case work is bounded.

use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

/// Keywords reported per analysis. Hard bound is 10; 5 is the default cut.
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Serialize)]
pub struct TextStats {
    pub char_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub language: String,
    pub sentiment: String,
    pub keywords: Vec<String>,
    /// Wall-clock duration in whole ms. Diagnostic only, never a correctness
    /// signal.
    pub processing_time: u64,
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "perfect",
    "beautiful", "nice", "lovely", "happy", "joy", "love", "like", "enjoy",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disgusting", "hate", "dislike",
    "sad", "angry", "furious", "upset", "disappointed", "worried", "scared",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
    "with", "is", "are", "was", "were", "it", "this", "that", "as", "by",
];

pub fn analyze_text(text: &str) -> TextStats {
    let started = Instant::now();

    let char_count = text.chars().count();
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len();
    let sentence_count = count_sentences(text);
    let language = detect_script(text).to_string();
    let sentiment = classify_sentiment(&words).to_string();
    let keywords = extract_keywords(&words);

    TextStats {
        char_count,
        word_count,
        sentence_count,
        language,
        sentiment,
        keywords,
        processing_time: started.elapsed().as_millis() as u64,
    }
}

/// Sentences are segments delimited by `.`, `!`, `?`. A trailing delimiter
/// leaves an empty segment, which is not counted; non-empty input always
/// reports at least one sentence.
fn count_sentences(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    let counted = text
        .split(['.', '!', '?'])
        .filter(|seg| seg.chars().any(|c| !c.is_whitespace()))
        .count();
    counted.max(1)
}

/// Coarse language identification: classify alphabetic scalars into a closed
/// set of script ranges and report the majority script.
fn detect_script(text: &str) -> &'static str {
    const TAGS: [&str; 5] = ["latin", "cyrillic", "arabic", "hebrew", "cjk"];
    let mut counts = [0usize; 5];
    for c in text.chars() {
        let idx = match c as u32 {
            0x0041..=0x005A | 0x0061..=0x007A | 0x00C0..=0x024F => 0,
            0x0400..=0x04FF => 1,
            0x0600..=0x06FF | 0x0750..=0x077F => 2,
            0x0590..=0x05FF => 3,
            0x3040..=0x30FF | 0x4E00..=0x9FFF | 0xAC00..=0xD7AF => 4,
            _ => continue,
        };
        counts[idx] += 1;
    }
    match counts.iter().enumerate().max_by_key(|(_, &n)| n) {
        Some((i, &n)) if n > 0 => TAGS[i],
        _ => "unknown",
    }
}

/// Majority vote over fixed marker lexicons; ties resolve to neutral.
fn classify_sentiment(words: &[&str]) -> &'static str {
    let mut positive = 0usize;
    let mut negative = 0usize;
    for word in words {
        let token = normalize(word);
        if POSITIVE_WORDS.contains(&token.as_str()) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&token.as_str()) {
            negative += 1;
        }
    }
    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => "positive",
        std::cmp::Ordering::Less => "negative",
        std::cmp::Ordering::Equal => "neutral",
    }
}

/// Rank normalized tokens by frequency, ties broken by first occurrence, and
/// keep the top `MAX_KEYWORDS`. Stop words and tokens of one or two chars are
/// dropped before counting.
fn extract_keywords(words: &[&str]) -> Vec<String> {
    let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
    for (pos, word) in words.iter().enumerate() {
        let token = normalize(word);
        if token.chars().count() <= 2 || STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        let entry = freq.entry(token).or_insert((0, pos));
        entry.0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> =
        freq.into_iter().map(|(w, (n, first))| (w, n, first)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(MAX_KEYWORDS).map(|(w, _, _)| w).collect()
}

/// Lowercase and strip anything that is not alphanumeric.
fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_counts() {
        let stats = analyze_text("This is a test message. It has three sentences. Hello world!");
        assert_eq!(stats.word_count, 11);
        assert_eq!(stats.sentence_count, 3);
        assert!(stats.char_count >= stats.word_count);
    }

    #[test]
    fn test_empty_input_boundary() {
        let stats = analyze_text("");
        assert_eq!(stats.char_count, 0);
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.sentence_count, 0);
        assert_eq!(stats.sentiment, "neutral");
        assert!(stats.keywords.is_empty());
    }

    #[test]
    fn test_trailing_delimiter_not_counted() {
        assert_eq!(count_sentences("One. Two."), 2);
        assert_eq!(count_sentences("One. Two. "), 2);
        assert_eq!(count_sentences("no punctuation"), 1);
        assert_eq!(count_sentences("???"), 1);
    }

    #[test]
    fn test_char_count_is_scalars_not_bytes() {
        let stats = analyze_text("héllo");
        assert_eq!(stats.char_count, 5);
    }

    #[test]
    fn test_script_detection() {
        assert_eq!(detect_script("hello world"), "latin");
        assert_eq!(detect_script("Привет мир"), "cyrillic");
        assert_eq!(detect_script("سلام دنیا"), "arabic");
        assert_eq!(detect_script("שלום"), "hebrew");
        assert_eq!(detect_script("你好世界"), "cjk");
        assert_eq!(detect_script("123 456"), "unknown");
    }

    #[test]
    fn test_sentiment_lexicon() {
        assert_eq!(analyze_text("I love this! It is amazing!").sentiment, "positive");
        assert_eq!(analyze_text("I hate this! It is terrible!").sentiment, "negative");
        assert_eq!(analyze_text("This is an ordinary message.").sentiment, "neutral");
        // One marker each way ties back to neutral.
        assert_eq!(analyze_text("good bad").sentiment, "neutral");
    }

    #[test]
    fn test_keyword_ranking_and_ties() {
        let stats = analyze_text("rust rust rust engine engine parser tokens tokens engine");
        // rust and engine both appear three times; rust occurs first.
        assert_eq!(stats.keywords[0], "rust");
        assert_eq!(stats.keywords[1], "engine");
        // "tokens" appears twice, "parser" once; frequency wins, then first
        // occurrence breaks the remaining order.
        assert_eq!(stats.keywords[2], "tokens");
        assert_eq!(stats.keywords[3], "parser");
        assert!(stats.keywords.len() <= MAX_KEYWORDS);
    }

    #[test]
    fn test_keywords_skip_stop_words_and_short_tokens() {
        let stats = analyze_text("the cat on a mat is ok");
        assert!(!stats.keywords.contains(&"the".to_string()));
        assert!(!stats.keywords.contains(&"ok".to_string()));
        assert!(stats.keywords.contains(&"cat".to_string()));
    }

    #[test]
    fn test_idempotence() {
        let input = "Stable inputs give stable outputs. Always.";
        let a = analyze_text(input);
        let b = analyze_text(input);
        assert_eq!(a.char_count, b.char_count);
        assert_eq!(a.word_count, b.word_count);
        assert_eq!(a.sentence_count, b.sentence_count);
        assert_eq!(a.keywords, b.keywords);
    }

    #[test]
    fn test_append_monotonicity() {
        let base = analyze_text("some text here");
        let extended = analyze_text("some text here and more words");
        assert!(extended.char_count >= base.char_count);
        assert!(extended.word_count >= base.word_count);
    }
}
