//! MDX rendering of a parsed recipe.
//!
//! Output order is fixed: frontmatter, ingredients, instructions, notes,
//! additional tags and the optional video block. All defaults are applied by
//! [`resolve_frontmatter`] before any block is written, so the block writers
//! only ever see a complete [`Frontmatter`].

pub mod frontmatter;
pub mod video;

use html_escape::encode_double_quoted_attribute;

use crate::highlight::Highlighter;
use crate::model::{Frontmatter, IngredientCategory, RecipeDocument, Step, DEFAULT_SECTION};

pub use self::frontmatter::{leading_int, resolve_frontmatter, write_frontmatter};
pub use self::video::video_id;

/// Category title for uncategorized ingredients when categories exist.
pub const OTHER_INGREDIENTS: &str = "Other Ingredients";

/// Renders `doc`, dating new documents with today's UTC date.
pub fn render(doc: &RecipeDocument, existing_date: Option<&str>) -> String {
    render_with_today(doc, existing_date, &today())
}

/// Same as [`render`] with an explicit current date.
pub fn render_with_today(doc: &RecipeDocument, existing_date: Option<&str>, today: &str) -> String {
    let fm = resolve_frontmatter(&doc.frontmatter, &doc.tags, existing_date, today);
    let highlighter = Highlighter::new(&doc.all_ingredients());

    [
        write_frontmatter(&fm),
        render_ingredients(doc, &highlighter),
        render_instructions(&doc.instructions, &highlighter),
        render_notes(&doc.notes),
        render_tags(&fm),
        render_video(&fm),
    ]
    .concat()
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn render_ingredients(doc: &RecipeDocument, highlighter: &Highlighter) -> String {
    if doc.ingredients.is_empty() && doc.ingredient_categories.is_empty() {
        return String::new();
    }

    let mut result = String::from("### Ingredients\n\n");

    if doc.ingredient_categories.is_empty() {
        result.push_str("<RecipeIngredients>\n");
        for ingredient in &doc.ingredients {
            result.push_str(&format!("<>{}</>\n", highlighter.apply(ingredient)));
        }
        result.push_str("</RecipeIngredients>\n\n");
        return result;
    }

    let mut categories: Vec<IngredientCategory> = doc.ingredient_categories.clone();
    if !doc.ingredients.is_empty() {
        categories.push(IngredientCategory {
            title: OTHER_INGREDIENTS.to_string(),
            ingredients: doc.ingredients.clone(),
        });
    }

    let blocks: Vec<String> = categories
        .iter()
        .map(|category| {
            let items: Vec<String> = category
                .ingredients
                .iter()
                .map(|ingredient| format!("      {}", js_string(&highlighter.apply(ingredient))))
                .collect();
            format!(
                "  {{\n    title: {},\n    ingredients: [\n{}\n    ]\n  }}",
                js_string(&category.title),
                items.join(",\n")
            )
        })
        .collect();

    result.push_str("<RecipeIngredients categories={[\n");
    result.push_str(&blocks.join(",\n"));
    result.push_str("\n]} />\n\n");
    result
}

fn render_instructions(steps: &[Step], highlighter: &Highlighter) -> String {
    if steps.is_empty() {
        return String::new();
    }

    // Group by section, first-seen order
    let mut sections: Vec<(&str, Vec<&Step>)> = Vec::new();
    for step in steps {
        let name = if step.section.is_empty() {
            DEFAULT_SECTION
        } else {
            step.section.as_str()
        };
        match sections.iter_mut().find(|(title, _)| *title == name) {
            Some((_, group)) => group.push(step),
            None => sections.push((name, vec![step])),
        }
    }

    let mut result = String::from("### Instructions\n\n<InstructionsContainer>\n");
    for (title, mut group) in sections {
        group.sort_by_key(|step| step.step_number);
        result.push_str(&format!(
            "  <InstructionsSection title=\"{}\">\n",
            encode_double_quoted_attribute(title)
        ));
        let rendered: Vec<String> = group
            .iter()
            .map(|step| render_step(step, highlighter))
            .collect();
        result.push_str(&rendered.join("\n"));
        result.push_str("  </InstructionsSection>\n");
    }
    result.push_str("</InstructionsContainer>\n\n");
    result
}

fn render_step(step: &Step, highlighter: &Highlighter) -> String {
    let mut result = format!(
        "    <InstructionStep stepNumber={{{}}}>\n      {}\n    </InstructionStep>\n",
        step.step_number,
        highlighter.apply(&step.text)
    );
    for (key, alt) in step_image_refs(step) {
        let alt = encode_double_quoted_attribute(alt);
        result.push_str(&format!(
            "\n    <ServerStepImage stepNumber=\"{key}\" alt=\"{alt}\" caption=\"{alt}\" />\n"
        ));
    }
    result
}

/// Image keys and captions emitted after a step.
///
/// Several alt texts get `"{step}-{n}"` keys; a single one gets the step
/// number zero-padded to two digits.
pub fn step_image_refs(step: &Step) -> Vec<(String, &str)> {
    match step.alt_texts.as_slice() {
        [] => step
            .legacy_alt_text
            .as_deref()
            .map(|alt| vec![(format!("{:02}", step.step_number), alt)])
            .unwrap_or_default(),
        [alt] => vec![(format!("{:02}", step.step_number), alt.as_str())],
        alts => alts
            .iter()
            .enumerate()
            .map(|(index, alt)| (format!("{}-{}", step.step_number, index + 1), alt.as_str()))
            .collect(),
    }
}

fn render_notes(notes: &[String]) -> String {
    if notes.is_empty() {
        return String::new();
    }
    let mut result = String::from("### Notes\n\n<RecipeNotes>\n");
    for note in notes {
        result.push_str(&format!("  <>{note}</>\n"));
    }
    result.push_str("</RecipeNotes>\n\n");
    result
}

fn render_tags(fm: &Frontmatter) -> String {
    let tags = [
        format!("Cuisine: {}", fm.cuisine),
        format!("Dietary: {}", fm.dietary),
        format!("Difficulty: {}", fm.difficulty),
        "Season: All Season".to_string(),
    ];
    let mut result = String::from("### Additional Tags\n\n<RecipeTags>\n");
    for tag in &tags {
        result.push_str(&format!("  <>{tag}</>\n"));
    }
    result.push_str("</RecipeTags>\n");
    result
}

fn render_video(fm: &Frontmatter) -> String {
    let Some(video) = fm.video.as_deref() else {
        return String::new();
    };
    format!(
        "\n### External Sources\n\n<YouTube id=\"{}\" title=\"{}\" />\n\n",
        encode_double_quoted_attribute(video_id(video)),
        encode_double_quoted_attribute(&fm.title)
    )
}

fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const TODAY: &str = "2024-05-01";

    #[test]
    fn test_flat_ingredients_are_highlighted() {
        let doc = parse("Ingredients\n- 2 cups flour\n- milk\n");
        let out = render_with_today(&doc, None, TODAY);

        assert!(out.contains(
            "### Ingredients\n\n<RecipeIngredients>\n<>2 <strong>cups</strong> <strong>flour</strong></>\n<><strong>milk</strong></>\n</RecipeIngredients>\n\n"
        ));
        assert!(!out.contains("categories={["));
    }

    #[test]
    fn test_categories_with_other_ingredients() {
        let doc = parse("Ingredients\n- salt\n### Dough\n- rye \"dark\"\n");
        let out = render_with_today(&doc, None, TODAY);

        let expected = "<RecipeIngredients categories={[\n  {\n    title: \"Dough\",\n    ingredients: [\n      \"rye \\\"<strong>dark</strong>\\\"\"\n    ]\n  },\n  {\n    title: \"Other Ingredients\",\n    ingredients: [\n      \"<strong>salt</strong>\"\n    ]\n  }\n]} />\n\n";
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn test_categories_without_flat_list_have_no_other_block() {
        let doc = parse("Ingredients\n### Spices\n- cumin\n");
        let out = render_with_today(&doc, None, TODAY);
        assert!(!out.contains(OTHER_INGREDIENTS));
    }

    #[test]
    fn test_sections_grouped_in_first_seen_order() {
        let doc = parse("Instructions\n## Sauce\n- Simmer\n## Pasta\n- Boil\n");
        let out = render_with_today(&doc, None, TODAY);

        let sauce = out.find("<InstructionsSection title=\"Sauce\">").unwrap();
        let pasta = out.find("<InstructionsSection title=\"Pasta\">").unwrap();
        assert!(sauce < pasta);
        assert!(out.contains("<InstructionStep stepNumber={2}>\n      Boil\n"));
    }

    #[test]
    fn test_single_alt_text_uses_padded_key() {
        let doc = parse("Instructions\n- Whisk\nAlt: whisking \"fast\"\n");
        let out = render_with_today(&doc, None, TODAY);
        assert!(out.contains(
            "<ServerStepImage stepNumber=\"01\" alt=\"whisking &quot;fast&quot;\" caption=\"whisking &quot;fast&quot;\" />"
        ));
    }

    #[test]
    fn test_multiple_alt_texts_use_dash_keys() {
        let mut step = Step::new(12, "Fold", DEFAULT_SECTION);
        step.alt_texts = vec!["before".to_string(), "after".to_string()];

        let refs = step_image_refs(&step);
        assert_eq!(
            refs,
            vec![("12-1".to_string(), "before"), ("12-2".to_string(), "after")]
        );
    }

    #[test]
    fn test_legacy_alt_text() {
        let mut step = Step::new(4, "Rest", DEFAULT_SECTION);
        step.legacy_alt_text = Some("resting dough".to_string());

        assert_eq!(step_image_refs(&step), vec![("04".to_string(), "resting dough")]);
    }

    #[test]
    fn test_additional_tags_always_present() {
        let doc = parse("title: Plain\ncuisine: Thai\n");
        let out = render_with_today(&doc, None, TODAY);
        assert!(out.ends_with(
            "### Additional Tags\n\n<RecipeTags>\n  <>Cuisine: Thai</>\n  <>Dietary: None</>\n  <>Difficulty: Medium</>\n  <>Season: All Season</>\n</RecipeTags>\n"
        ));
    }

    #[test]
    fn test_video_block() {
        let doc = parse("title: Ramen\nvideo: https://youtu.be/abcdefghijk\n");
        let out = render_with_today(&doc, None, TODAY);
        assert!(out.ends_with(
            "\n### External Sources\n\n<YouTube id=\"abcdefghijk\" title=\"Ramen\" />\n\n"
        ));
        assert_eq!(out.matches("<YouTube").count(), 1);
    }

    #[test]
    fn test_video_title_defaults_to_resolved_title() {
        let doc = parse("youtube: xyz\n");
        let out = render_with_today(&doc, None, TODAY);
        assert!(out.contains("<YouTube id=\"xyz\" title=\"Untitled Recipe\" />"));
    }

    #[test]
    fn test_notes_block() {
        let doc = parse("Notes\n- Best the next day\n");
        let out = render_with_today(&doc, None, TODAY);
        assert!(out.contains("### Notes\n\n<RecipeNotes>\n  <>Best the next day</>\n</RecipeNotes>\n\n"));
    }

    #[test]
    fn test_empty_document_renders_frontmatter_and_tags_only() {
        let out = render_with_today(&RecipeDocument::default(), None, TODAY);
        assert!(out.starts_with("---\ntitle: \"Untitled Recipe\"\n"));
        assert!(!out.contains("### Ingredients"));
        assert!(!out.contains("### Instructions"));
        assert!(!out.contains("### Notes"));
        assert!(out.contains("### Additional Tags"));
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
