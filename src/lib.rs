pub mod batch;
pub mod builder;
pub mod config;
pub mod error;
pub mod highlight;
pub mod images;
pub mod model;
pub mod parser;
pub mod render;

// Re-export main types for convenience
pub use batch::{
    convert_all, convert_file, output_path, slugify, BatchOptions, BatchReport, CleanupReport,
    ConversionOutcome, ConversionStatus, ConvertOptions,
};
pub use builder::{ConvertResult, InputSource, OutputMode, RecipeConverter, RecipeConverterBuilder};
pub use config::{load_config, ConverterConfig};
pub use error::ConvertError;
pub use images::{FsImageResolver, ImageKind, ImageResolver};
pub use model::{Frontmatter, IngredientCategory, RawFrontmatter, RecipeDocument, Step};
pub use parser::{parse, parse_with_category};
pub use render::{render, render_with_today};

/// Converts recipe text straight to MDX.
///
/// # Example
/// ```
/// let mdx = recipe_converter::convert_text("title: Toast\nIngredients\n- bread", None);
/// assert!(mdx.contains("title: \"Toast\""));
/// ```
pub fn convert_text(text: &str, existing_date: Option<&str>) -> String {
    render(&parse(text), existing_date)
}

/// Loads a document previously serialized with [`document_to_json`].
///
/// Older documents that carry a single `altText` per step are accepted.
pub fn document_from_json(json: &str) -> Result<RecipeDocument, ConvertError> {
    Ok(serde_json::from_str(json)?)
}

/// Serializes a parsed document as pretty-printed JSON.
pub fn document_to_json(doc: &RecipeDocument) -> Result<String, ConvertError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_text_keeps_date() {
        let mdx = convert_text("title: Soup", Some("2022-10-10"));
        assert!(mdx.contains("date: \"2022-10-10\"\n"));
    }

    #[test]
    fn test_json_round_trip_renders_identically() {
        let doc = parse("title: Soup\nIngredients\n- leeks\nInstructions\n- Simmer\nAlt: pot");
        let json = document_to_json(&doc).unwrap();
        let loaded = document_from_json(&json).unwrap();

        assert_eq!(loaded, doc);
        assert_eq!(
            render_with_today(&loaded, None, "2024-01-01"),
            render_with_today(&doc, None, "2024-01-01")
        );
    }

    #[test]
    fn test_document_from_invalid_json() {
        assert!(matches!(document_from_json("{"), Err(ConvertError::Json(_))));
    }
}
