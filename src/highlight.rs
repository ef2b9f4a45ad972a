//! Ingredient highlighting.
//!
//! Whole-word occurrences of ingredient words are wrapped in `<strong>` tags.
//! Text that is already markup (a `<strong>…</strong>` span or any other tag)
//! is never matched into, so running the highlighter on its own output is a
//! no-op.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Existing emphasis spans and bare tags.
static RE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<strong>.*?</strong>|<[^>]*>").unwrap());

/// Words shorter than this are never highlighted.
const MIN_WORD_LEN: usize = 4;

/// Normalized words to highlight, in declaration order, without duplicates.
///
/// Each ingredient is split on spaces; a word is kept when both the raw word
/// and its letters-only lowercase form are at least four characters long.
pub fn ingredient_words<S: AsRef<str>>(ingredients: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for ingredient in ingredients {
        for word in ingredient.as_ref().split(' ') {
            if word.chars().count() < MIN_WORD_LEN {
                continue;
            }
            let clean: String = word
                .chars()
                .filter(char::is_ascii_alphabetic)
                .collect::<String>()
                .to_lowercase();
            if clean.len() >= MIN_WORD_LEN && seen.insert(clean.clone()) {
                words.push(clean);
            }
        }
    }

    words
}

/// Compiled word patterns for one ingredient list.
///
/// Build it once per document and apply it to every ingredient and step.
#[derive(Debug, Clone)]
pub struct Highlighter {
    patterns: Vec<Regex>,
}

impl Highlighter {
    pub fn new<S: AsRef<str>>(ingredients: &[S]) -> Self {
        let patterns = ingredient_words(ingredients)
            .iter()
            .filter_map(|word| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))).ok())
            .collect();
        Self { patterns }
    }

    /// Wraps each ingredient word in `text` with `<strong>` tags.
    pub fn apply(&self, text: &str) -> String {
        self.patterns
            .iter()
            .fold(text.to_string(), |result, re| replace_outside_markup(&result, re))
    }
}

/// One-off form of [`Highlighter::apply`].
pub fn highlight<S: AsRef<str>>(text: &str, ingredients: &[S]) -> String {
    Highlighter::new(ingredients).apply(text)
}

fn replace_outside_markup(text: &str, re: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for markup in RE_MARKUP.find_iter(text) {
        out.push_str(&wrap_matches(&text[last..markup.start()], re));
        out.push_str(markup.as_str());
        last = markup.end();
    }
    out.push_str(&wrap_matches(&text[last..], re));

    out
}

fn wrap_matches(segment: &str, re: &Regex) -> String {
    re.replace_all(segment, |caps: &Captures| format!("<strong>{}</strong>", &caps[0]))
        .into_owned()
}
