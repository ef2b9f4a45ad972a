//! Frontmatter defaults and serialization.

use crate::model::{Frontmatter, RawFrontmatter};

pub const DEFAULT_TITLE: &str = "Untitled Recipe";
pub const DEFAULT_DESCRIPTION: &str = "A delicious recipe";
pub const DEFAULT_RATING: &str = "4.5";
pub const DEFAULT_AUTHOR: &str = "The IT Chef";
pub const DEFAULT_CATEGORY: &str = "Main";
pub const DEFAULT_CUISINE: &str = "International";
pub const DEFAULT_DIFFICULTY: &str = "Medium";
pub const DEFAULT_SERVINGS: &str = "4";
pub const DEFAULT_PREP_TIME: &str = "15 Minutes";
pub const DEFAULT_COOK_TIME: &str = "20 Minutes";
pub const DEFAULT_TOTAL_TIME: &str = "35 Minutes";
pub const DEFAULT_CALORIES: &str = "300";
pub const DEFAULT_DIETARY: &str = "None";
pub const DEFAULT_ALLERGENS: &str = "None";
pub const DEFAULT_COST: &str = "$5";
pub const DEFAULT_SOURCE: &str = "Home Recipe";

/// Applies every default in one place.
///
/// `existing_date` wins over `today` when present and non-empty.
pub fn resolve_frontmatter(
    raw: &RawFrontmatter,
    tags: &[String],
    existing_date: Option<&str>,
    today: &str,
) -> Frontmatter {
    Frontmatter {
        title: or_default(&raw.title, DEFAULT_TITLE),
        description: or_default(&raw.description, DEFAULT_DESCRIPTION),
        rating: or_default(&raw.rating, DEFAULT_RATING),
        author: or_default(&raw.author, DEFAULT_AUTHOR),
        date: existing_date
            .filter(|date| !date.is_empty())
            .unwrap_or(today)
            .to_string(),
        category: or_default(&raw.category, DEFAULT_CATEGORY),
        cuisine: or_default(&raw.cuisine, DEFAULT_CUISINE),
        difficulty: or_default(&raw.difficulty, DEFAULT_DIFFICULTY),
        servings: or_default(&raw.servings, DEFAULT_SERVINGS),
        prep_time: or_default(&raw.prep_time, DEFAULT_PREP_TIME),
        cook_time: or_default(&raw.cook_time, DEFAULT_COOK_TIME),
        total_time: total_time(raw),
        calories: or_default(&raw.calories, DEFAULT_CALORIES),
        dietary: or_default(&raw.dietary, DEFAULT_DIETARY),
        allergens: or_default(&raw.allergens, DEFAULT_ALLERGENS),
        cost: or_default(&raw.cost, DEFAULT_COST),
        source: or_default(&raw.source, DEFAULT_SOURCE),
        tags: tags.to_vec(),
        video: present(&raw.youtube).map(str::to_string),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn or_default(value: &Option<String>, default: &str) -> String {
    present(value).unwrap_or(default).to_string()
}

/// Explicit total time, else prep + cook when both were given, else the default.
fn total_time(raw: &RawFrontmatter) -> String {
    if let Some(total) = present(&raw.total_time) {
        return total.to_string();
    }
    match (present(&raw.prep_time), present(&raw.cook_time)) {
        (Some(prep), Some(cook)) => format!(
            "{} Minutes",
            leading_int(prep).saturating_add(leading_int(cook))
        ),
        _ => DEFAULT_TOTAL_TIME.to_string(),
    }
}

/// Integer prefix of `value`, or 0 when there is none.
///
/// Leading whitespace and a single sign are accepted: `" 12 min"` is 12,
/// `"1h 30m"` is 1, `"about 5"` is 0. Digit runs past the `i64` range
/// saturate.
pub fn leading_int(value: &str) -> i64 {
    let value = value.trim_start();
    let (sign, digits) = match value.as_bytes().first() {
        Some(b'-') => (-1, &value[1..]),
        Some(b'+') => (1, &value[1..]),
        _ => (1, value),
    };
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(sign * i64::from(digit - b'0'))
        })
}

/// Writes the `---` delimited YAML block.
///
/// Scalars are double-quoted with JSON escaping, which YAML accepts.
pub fn write_frontmatter(fm: &Frontmatter) -> String {
    let fields: [(&str, &str); 17] = [
        ("title", fm.title.as_str()),
        ("description", fm.description.as_str()),
        ("rating", fm.rating.as_str()),
        ("author", fm.author.as_str()),
        ("date", fm.date.as_str()),
        ("category", fm.category.as_str()),
        ("cuisine", fm.cuisine.as_str()),
        ("difficulty", fm.difficulty.as_str()),
        ("servings", fm.servings.as_str()),
        ("prepTime", fm.prep_time.as_str()),
        ("cookTime", fm.cook_time.as_str()),
        ("totalTime", fm.total_time.as_str()),
        ("calories", fm.calories.as_str()),
        ("dietary", fm.dietary.as_str()),
        ("allergens", fm.allergens.as_str()),
        ("cost", fm.cost.as_str()),
        ("source", fm.source.as_str()),
    ];

    let mut result = String::from("---\n");
    for (key, value) in fields {
        result.push_str(&format!("{key}: {}\n", quote(value)));
    }
    if !fm.tags.is_empty() {
        result.push_str("tags:\n");
        for tag in &fm.tags {
            result.push_str(&format!("  - {}\n", quote(tag)));
        }
    }
    result.push_str("---\n");
    result
}

fn quote(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
