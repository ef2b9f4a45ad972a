//! Plain-text recipe parser.
//!
//! A single forward pass over trimmed lines. Each line is classified by
//! [`line::classify`] and then applied to a [`ParseState`] that owns the
//! document under construction. Parsing never fails: lines that match nothing
//! are dropped.

pub mod line;

use log::debug;

use crate::model::{RecipeDocument, Step, DEFAULT_SECTION};

use self::line::{classify, clean_list_item, is_alt_line, is_list_item, Line, MetaKey};

/// The top-level section the parser is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    Ingredients,
    Instructions,
    Notes,
    Tags,
}

/// Mutable state for one `parse` call.
#[derive(Debug)]
pub struct ParseState {
    doc: RecipeDocument,
    section: Section,
    instruction_section: Option<String>,
    ingredient_category: Option<String>,
    step_counter: u32,
}

impl Default for ParseState {
    fn default() -> Self {
        Self {
            doc: RecipeDocument::default(),
            section: Section::None,
            instruction_section: None,
            ingredient_category: None,
            step_counter: 1,
        }
    }
}

impl ParseState {
    fn with_document(doc: RecipeDocument) -> Self {
        Self {
            doc,
            ..Default::default()
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Feeds one raw source line.
    pub fn feed(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let line = classify(trimmed, self.section);
        self.apply(line);
    }

    pub fn apply(&mut self, line: Line<'_>) {
        match line {
            Line::Metadata(key, value) => self.set_metadata(key, value),
            Line::SectionHeader(section) => {
                debug!("Entering section {:?}", section);
                self.section = section;
                if section == Section::Instructions {
                    self.step_counter = 1;
                }
            }
            Line::InstructionSubheader(title) => self.instruction_section = Some(title),
            Line::IngredientCategory(title) => self.ingredient_category = Some(title),
            Line::Content(text) => match self.section {
                Section::None => {}
                Section::Ingredients => self.ingredient(text),
                Section::Instructions => self.instruction(text),
                Section::Notes => {
                    if is_list_item(text) {
                        self.doc.notes.push(clean_list_item(text));
                    }
                }
                Section::Tags => {
                    if is_list_item(text) {
                        self.doc.tags.push(clean_list_item(text));
                    }
                }
            },
        }
    }

    pub fn finish(self) -> RecipeDocument {
        self.doc
    }

    fn set_metadata(&mut self, key: MetaKey, value: String) {
        let fm = &mut self.doc.frontmatter;
        let field = match key {
            MetaKey::Title => &mut fm.title,
            MetaKey::Description => &mut fm.description,
            MetaKey::Category => &mut fm.category,
            MetaKey::Cuisine => &mut fm.cuisine,
            MetaKey::Difficulty => &mut fm.difficulty,
            MetaKey::Servings => &mut fm.servings,
            MetaKey::PrepTime => &mut fm.prep_time,
            MetaKey::CookTime => &mut fm.cook_time,
            MetaKey::TotalTime => &mut fm.total_time,
            MetaKey::Calories => &mut fm.calories,
            MetaKey::Dietary => &mut fm.dietary,
            MetaKey::Allergens => &mut fm.allergens,
            MetaKey::Cost => &mut fm.cost,
            MetaKey::Video => &mut fm.youtube,
        };
        *field = Some(value);
    }

    fn ingredient(&mut self, text: &str) {
        if !is_list_item(text) || is_alt_line(text) {
            return;
        }
        let ingredient = clean_list_item(text);
        match &self.ingredient_category {
            Some(title) => self.doc.push_categorized(title, ingredient),
            None => self.doc.ingredients.push(ingredient),
        }
    }

    fn instruction(&mut self, text: &str) {
        if is_alt_line(text) {
            // Alt text before the first step has nothing to attach to
            if let Some(step) = self.doc.instructions.last_mut() {
                step.alt_texts.push(text[4..].trim().to_string());
            }
            return;
        }

        if is_list_item(text) {
            let section = self
                .instruction_section
                .clone()
                .unwrap_or_else(|| DEFAULT_SECTION.to_string());
            self.doc
                .instructions
                .push(Step::new(self.step_counter, clean_list_item(text), section));
            self.step_counter += 1;
        }
    }
}

/// Parses a plain-text recipe.
pub fn parse(text: &str) -> RecipeDocument {
    parse_into(ParseState::default(), text)
}

/// Parses a plain-text recipe whose category defaults to `category`.
///
/// The first letter is upper-cased. A `category:` line in the text still
/// takes precedence.
pub fn parse_with_category(text: &str, category: &str) -> RecipeDocument {
    let mut doc = RecipeDocument::default();
    if !category.is_empty() {
        doc.frontmatter.category = Some(capitalize(category));
    }
    parse_into(ParseState::with_document(doc), text)
}

fn parse_into(mut state: ParseState, text: &str) -> RecipeDocument {
    for line in text.lines() {
        state.feed(line);
    }
    state.finish()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANCAKES: &str = "\
title: Pancakes
Ingredients
- flour
- milk
Instructions
- Mix flour and milk
Alt: mixing bowl photo
";

    #[test]
    fn test_parse_basic_recipe() {
        let doc = parse(PANCAKES);

        assert_eq!(doc.frontmatter.title.as_deref(), Some("Pancakes"));
        assert_eq!(doc.ingredients, vec!["flour", "milk"]);
        assert_eq!(doc.instructions.len(), 1);

        let step = &doc.instructions[0];
        assert_eq!(step.step_number, 1);
        assert_eq!(step.text, "Mix flour and milk");
        assert_eq!(step.section, DEFAULT_SECTION);
        assert_eq!(step.alt_texts, vec!["mixing bowl photo"]);
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_step_numbers_continue_across_subsections() {
        let doc = parse(
            "## Instructions\n## Dough\n1. Mix\n2. Knead\n**Topping**\n- Slice\n- Spread\n",
        );

        let numbers: Vec<u32> = doc.instructions.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(doc.instructions[1].section, "Dough");
        assert_eq!(doc.instructions[2].section, "Topping");
    }

    #[test]
    fn test_instructions_header_resets_counter() {
        let doc = parse("Instructions\n- one\n- two\nDirections\n- again\n");
        let numbers: Vec<u32> = doc.instructions.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 1]);
    }

    #[test]
    fn test_category_merge_non_adjacent() {
        let doc = parse(
            "Ingredients\n### Spices\n- cumin\n### Vegetables\n- onion\n### Spices\n- paprika\n",
        );

        assert_eq!(doc.ingredient_categories.len(), 2);
        assert_eq!(doc.ingredient_categories[0].title, "Spices");
        assert_eq!(doc.ingredient_categories[0].ingredients, vec!["cumin", "paprika"]);
        assert_eq!(doc.ingredient_categories[1].ingredients, vec!["onion"]);
        assert!(doc.ingredients.is_empty());
    }

    #[test]
    fn test_alt_before_any_step_is_ignored() {
        let doc = parse("Instructions\nAlt: nothing to attach\n- First step\n");

        assert_eq!(doc.instructions.len(), 1);
        assert_eq!(doc.instructions[0].text, "First step");
        assert!(doc.instructions[0].alt_texts.is_empty());
    }

    #[test]
    fn test_multiple_alt_texts_attach_to_latest_step() {
        let doc = parse("Instructions\n- Chop\n- Fry\nalt: pan\nALT: oil shimmering\n");

        assert!(doc.instructions[0].alt_texts.is_empty());
        assert_eq!(doc.instructions[1].alt_texts, vec!["pan", "oil shimmering"]);
    }

    #[test]
    fn test_alt_lines_are_not_ingredients() {
        let doc = parse("Ingredients\n- eggs\nAlt: egg carton\n");
        assert_eq!(doc.ingredients, vec!["eggs"]);
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let doc = parse(
            "Some preamble text\n(ignored)\nIngredients\n2 cups sugar\n> quote\nNotes\n- Keeps well\n",
        );

        assert!(doc.ingredients.is_empty());
        assert_eq!(doc.notes, vec!["Keeps well"]);
        assert!(doc.frontmatter.title.is_none());
    }

    #[test]
    fn test_notes_and_tags() {
        let doc = parse("Notes\n- Serve warm\n1. Freeze leftovers\nTags\n- breakfast\n* sweet\n");

        assert_eq!(doc.notes, vec!["Serve warm", "Freeze leftovers"]);
        assert_eq!(doc.tags, vec!["breakfast", "sweet"]);
    }

    #[test]
    fn test_metadata_inside_sections_does_not_change_section() {
        let doc = parse("Ingredients\n- salt\nServings: 2\n- pepper\n");

        assert_eq!(doc.frontmatter.servings.as_deref(), Some("2"));
        assert_eq!(doc.ingredients, vec!["salt", "pepper"]);
    }

    #[test]
    fn test_parse_with_category_capitalizes_and_yields_to_source() {
        let doc = parse_with_category("title: Toast\n", "breakfast");
        assert_eq!(doc.frontmatter.category.as_deref(), Some("Breakfast"));

        let doc = parse_with_category("title: Toast\ncategory: Snacks\n", "breakfast");
        assert_eq!(doc.frontmatter.category.as_deref(), Some("Snacks"));
    }

    #[test]
    fn test_crlf_and_indentation() {
        let doc = parse("  Title: Soup  \r\n\tIngredients\r\n   - water\r\n");
        assert_eq!(doc.frontmatter.title.as_deref(), Some("Soup"));
        assert_eq!(doc.ingredients, vec!["water"]);
    }
}
