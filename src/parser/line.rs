//! Line classification.
//!
//! Every trimmed, non-empty source line is classified into exactly one
//! [`Line`] given the section the parser is currently in. The order of the
//! checks in [`classify`] is the precedence order: metadata beats section
//! headers, which beat sub-headers, which beat content.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Section;

/// Metadata keys recognized anywhere in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Title,
    Description,
    Category,
    Cuisine,
    Difficulty,
    Servings,
    PrepTime,
    CookTime,
    TotalTime,
    Calories,
    Dietary,
    Allergens,
    Cost,
    Video,
}

/// Lowercase line prefixes, checked in order.
const META_PREFIXES: &[(&str, MetaKey)] = &[
    ("title:", MetaKey::Title),
    ("description:", MetaKey::Description),
    ("category:", MetaKey::Category),
    ("cuisine:", MetaKey::Cuisine),
    ("difficulty:", MetaKey::Difficulty),
    ("servings:", MetaKey::Servings),
    ("prep time:", MetaKey::PrepTime),
    ("preptime:", MetaKey::PrepTime),
    ("cook time:", MetaKey::CookTime),
    ("cooktime:", MetaKey::CookTime),
    ("total time:", MetaKey::TotalTime),
    ("totaltime:", MetaKey::TotalTime),
    ("calories:", MetaKey::Calories),
    ("dietary:", MetaKey::Dietary),
    ("allergens:", MetaKey::Allergens),
    ("cost:", MetaKey::Cost),
    ("youtube:", MetaKey::Video),
    ("video:", MetaKey::Video),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Metadata(MetaKey, String),
    SectionHeader(Section),
    /// `## Prepare Vegetables` or `**Sauce**` inside the instructions
    InstructionSubheader(String),
    /// `### Spices` inside the ingredients
    IngredientCategory(String),
    Content(&'a str),
}

static RE_LEADING_HASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s*").unwrap());
static RE_NUMBER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").unwrap());
static RE_LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*]\s*|^\d+\.\s*").unwrap());

/// Classifies one trimmed, non-empty line.
pub fn classify(line: &str, section: Section) -> Line<'_> {
    if let Some((key, value)) = metadata(line) {
        return Line::Metadata(key, value);
    }

    if let Some(header) = section_header(line) {
        return Line::SectionHeader(header);
    }

    if section == Section::Instructions && (line.starts_with("##") || line.starts_with("**")) {
        let title = RE_LEADING_HASHES.replace(line, "").replace("**", "");
        return Line::InstructionSubheader(title.trim().to_string());
    }

    if section == Section::Ingredients && line.starts_with("###") {
        let title = RE_LEADING_HASHES.replace(line, "");
        return Line::IngredientCategory(title.trim().to_string());
    }

    Line::Content(line)
}

fn metadata(line: &str) -> Option<(MetaKey, String)> {
    let lower = line.to_lowercase();
    META_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, key)| (*key, extract_value(line)))
}

fn section_header(line: &str) -> Option<Section> {
    let clean = RE_LEADING_HASHES.replace(line, "").to_lowercase();
    match clean.trim() {
        "ingredients" => Some(Section::Ingredients),
        "instructions" | "directions" => Some(Section::Instructions),
        "notes" => Some(Section::Notes),
        "tags" => Some(Section::Tags),
        _ => None,
    }
}

/// Everything after the first colon, trimmed, with one leading and one
/// trailing quote character removed.
pub fn extract_value(line: &str) -> String {
    let value = line.split_once(':').map(|(_, rest)| rest).unwrap_or("").trim();
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    let value = value.strip_suffix(['"', '\'']).unwrap_or(value);
    value.to_string()
}

/// A list item starts with a bullet, a `N.` marker or a letter.
pub fn is_list_item(line: &str) -> bool {
    line.starts_with('-')
        || line.starts_with('*')
        || RE_NUMBER_MARKER.is_match(line)
        || line.starts_with(|c: char| c.is_ascii_alphabetic())
}

pub fn is_alt_line(line: &str) -> bool {
    line.get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("alt:"))
}

/// Strips one leading `-`/`*` or `N.` marker and the whitespace after it.
pub fn clean_list_item(line: &str) -> String {
    RE_LIST_MARKER.replace(line, "").trim().to_string()
}
