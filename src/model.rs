use serde::{Deserialize, Serialize};

/// Section title used for steps that appear before any sub-section header.
pub const DEFAULT_SECTION: &str = "Main Steps";

/// Metadata captured from the source text, before defaults are applied.
///
/// Every field is optional; an empty string is treated the same as a missing
/// value when the frontmatter is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFrontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    pub servings: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub total_time: Option<String>,
    pub calories: Option<String>,
    pub dietary: Option<String>,
    pub allergens: Option<String>,
    pub cost: Option<String>,
    pub source: Option<String>,
    /// Raw `youtube:` / `video:` value (URL or bare id)
    pub youtube: Option<String>,
}

/// Fully-resolved frontmatter: every field has a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
    pub rating: String,
    pub author: String,
    pub date: String,
    pub category: String,
    pub cuisine: String,
    pub difficulty: String,
    pub servings: String,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub calories: String,
    pub dietary: String,
    pub allergens: String,
    pub cost: String,
    pub source: String,
    /// Tags from the explicit `Tags` section, in declaration order
    pub tags: Vec<String>,
    pub video: Option<String>,
}

/// A named group of ingredients, e.g. "Spices".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCategory {
    pub title: String,
    pub ingredients: Vec<String>,
}

/// One numbered instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_number: u32,
    pub text: String,
    #[serde(rename = "sectionTitle", alias = "section")]
    pub section: String,
    #[serde(default)]
    pub alt_texts: Vec<String>,
    /// Single caption carried by documents written before multi-image steps.
    #[serde(rename = "altText", default, skip_serializing_if = "Option::is_none")]
    pub legacy_alt_text: Option<String>,
}

impl Step {
    pub fn new(step_number: u32, text: impl Into<String>, section: impl Into<String>) -> Self {
        Step {
            step_number,
            text: text.into(),
            section: section.into(),
            alt_texts: Vec::new(),
            legacy_alt_text: None,
        }
    }
}

/// Parsed recipe, owned by a single conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDocument {
    pub frontmatter: RawFrontmatter,
    pub ingredients: Vec<String>,
    pub ingredient_categories: Vec<IngredientCategory>,
    pub instructions: Vec<Step>,
    pub notes: Vec<String>,
    pub tags: Vec<String>,
}

impl RecipeDocument {
    /// Every ingredient line: the flat list first, then each category in order.
    pub fn all_ingredients(&self) -> Vec<&str> {
        self.ingredients
            .iter()
            .chain(
                self.ingredient_categories
                    .iter()
                    .flat_map(|category| category.ingredients.iter()),
            )
            .map(String::as_str)
            .collect()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
            + self
                .ingredient_categories
                .iter()
                .map(|category| category.ingredients.len())
                .sum::<usize>()
    }

    pub fn step_count(&self) -> usize {
        self.instructions.len()
    }

    /// Appends to the category with this title, creating it on first use.
    pub(crate) fn push_categorized(&mut self, title: &str, ingredient: String) {
        match self
            .ingredient_categories
            .iter_mut()
            .find(|category| category.title == title)
        {
            Some(category) => category.ingredients.push(ingredient),
            None => self.ingredient_categories.push(IngredientCategory {
                title: title.to_string(),
                ingredients: vec![ingredient],
            }),
        }
    }
}
