use std::fs;
use std::path::PathBuf;

use log::warn;

use crate::batch::{document_slug, extract_existing_date, parse_source};
use crate::images::{missing_step_images, ImageResolver};
use crate::render::render;
use crate::{ConvertError, RecipeDocument};

/// Represents the input source for a recipe
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Use plain text content
    Text(String),
    /// Read the recipe from a file
    File(PathBuf),
}

/// Represents the desired output format
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputMode {
    /// Render the MDX document (default)
    #[default]
    Mdx,
    /// Return the parsed document without rendering
    Document,
}

/// Result of a conversion
#[derive(Debug, Clone)]
pub enum ConvertResult {
    /// Rendered MDX together with the document it was rendered from
    Mdx {
        content: String,
        document: RecipeDocument,
    },
    /// Parsed document only
    Document(RecipeDocument),
}

/// Builder for configuring and executing a single conversion
#[derive(Default)]
pub struct RecipeConverterBuilder {
    source: Option<InputSource>,
    mode: OutputMode,
    category: Option<String>,
    existing_date: Option<String>,
    existing_output: Option<String>,
    images: Option<Box<dyn ImageResolver>>,
}

impl RecipeConverterBuilder {
    /// Set the input source to plain text
    ///
    /// # Example
    /// ```
    /// use recipe_converter::RecipeConverter;
    ///
    /// let builder = RecipeConverter::builder()
    ///     .text("title: Toast\nIngredients\n- bread");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    /// Set the input source to a recipe file
    ///
    /// # Example
    /// ```
    /// use recipe_converter::RecipeConverter;
    ///
    /// let builder = RecipeConverter::builder()
    ///     .file("recipes/breakfast/pancakes.txt");
    /// ```
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(InputSource::File(path.into()));
        self
    }

    /// Category used when the recipe does not declare one
    ///
    /// The first letter is capitalized, as for recipes found in a category
    /// directory.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Keep this creation date instead of today's
    ///
    /// # Example
    /// ```
    /// use recipe_converter::{ConvertResult, RecipeConverter};
    ///
    /// let result = RecipeConverter::builder()
    ///     .text("title: Toast")
    ///     .existing_date("2023-04-01")
    ///     .build()
    ///     .unwrap();
    ///
    /// if let ConvertResult::Mdx { content, .. } = result {
    ///     assert!(content.contains("date: \"2023-04-01\""));
    /// }
    /// ```
    pub fn existing_date(mut self, date: impl Into<String>) -> Self {
        self.existing_date = Some(date.into());
        self
    }

    /// Previously generated output; its `date:` is preserved
    ///
    /// An explicit [`existing_date`](Self::existing_date) takes precedence.
    pub fn existing_output(mut self, content: impl Into<String>) -> Self {
        self.existing_output = Some(content.into());
        self
    }

    /// Set output mode to extract only (no rendering)
    ///
    /// # Example
    /// ```
    /// use recipe_converter::{ConvertResult, RecipeConverter};
    ///
    /// let result = RecipeConverter::builder()
    ///     .text("title: Toast\nInstructions\n- Toast the bread")
    ///     .extract_only()
    ///     .build()
    ///     .unwrap();
    ///
    /// if let ConvertResult::Document(doc) = result {
    ///     assert_eq!(doc.step_count(), 1);
    /// }
    /// ```
    pub fn extract_only(mut self) -> Self {
        self.mode = OutputMode::Document;
        self
    }

    /// Warn about step images that have no file
    pub fn image_resolver(mut self, resolver: Box<dyn ImageResolver>) -> Self {
        self.images = Some(resolver);
        self
    }

    /// Build and execute the conversion
    ///
    /// # Errors
    /// Returns `ConvertError` if:
    /// - No input source was specified
    /// - The input file does not exist or cannot be read
    ///
    /// # Example
    /// ```
    /// # use recipe_converter::RecipeConverter;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = RecipeConverter::builder()
    ///     .text("title: Toast")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<ConvertResult, ConvertError> {
        let source = self.source.ok_or_else(|| {
            ConvertError::Builder("No input source specified. Use .text() or .file()".to_string())
        })?;

        let text = match source {
            InputSource::Text(text) => text,
            InputSource::File(path) => {
                if !path.is_file() {
                    return Err(ConvertError::InputNotFound(path));
                }
                fs::read_to_string(&path).map_err(|e| ConvertError::io(&path, e))?
            }
        };

        let document = parse_source(&text, self.category.as_deref());

        if let Some(resolver) = self.images.as_deref() {
            let slug = document_slug(&document);
            for key in missing_step_images(&document, &slug, resolver) {
                warn!("{}: no image found for step {}", slug, key);
            }
        }

        match self.mode {
            OutputMode::Document => Ok(ConvertResult::Document(document)),
            OutputMode::Mdx => {
                let existing_date = self
                    .existing_date
                    .or_else(|| self.existing_output.as_deref().and_then(extract_existing_date));
                let content = render(&document, existing_date.as_deref());
                Ok(ConvertResult::Mdx { content, document })
            }
        }
    }
}

/// Main entry point for converting recipes
///
/// # Example
/// ```
/// use recipe_converter::{ConvertResult, RecipeConverter};
///
/// let result = RecipeConverter::builder()
///     .text("title: Toast\nIngredients\n- 2 slices bread")
///     .build()
///     .unwrap();
///
/// match result {
///     ConvertResult::Mdx { content, .. } => assert!(content.contains("<RecipeIngredients>")),
///     ConvertResult::Document(_) => unreachable!(),
/// }
/// ```
pub struct RecipeConverter;

impl RecipeConverter {
    /// Create a new builder for configuring a conversion
    pub fn builder() -> RecipeConverterBuilder {
        RecipeConverterBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::ImageKind;

    #[test]
    fn test_builder_no_source() {
        let result = RecipeConverter::builder().build();
        assert!(matches!(result, Err(ConvertError::Builder(_))));
    }

    #[test]
    fn test_builder_text_renders_mdx() {
        let result = RecipeConverter::builder()
            .text("title: Toast\nIngredients\n- bread")
            .existing_date("2020-02-02")
            .build()
            .unwrap();

        match result {
            ConvertResult::Mdx { content, document } => {
                assert!(content.starts_with("---\ntitle: \"Toast\"\n"));
                assert!(content.contains("date: \"2020-02-02\"\n"));
                assert_eq!(document.ingredients, vec!["bread"]);
            }
            ConvertResult::Document(_) => panic!("expected MDX"),
        }
    }

    #[test]
    fn test_builder_existing_output_date() {
        let result = RecipeConverter::builder()
            .text("title: Toast")
            .existing_output("---\ntitle: \"Toast\"\ndate: \"2019-07-04\"\n---\n")
            .build()
            .unwrap();

        let ConvertResult::Mdx { content, .. } = result else {
            panic!("expected MDX");
        };
        assert!(content.contains("date: \"2019-07-04\"\n"));
    }

    #[test]
    fn test_builder_explicit_date_beats_existing_output() {
        let result = RecipeConverter::builder()
            .text("title: Toast")
            .existing_output("date: \"2019-07-04\"\n")
            .existing_date("2021-01-01")
            .build()
            .unwrap();

        let ConvertResult::Mdx { content, .. } = result else {
            panic!("expected MDX");
        };
        assert!(content.contains("date: \"2021-01-01\"\n"));
    }

    #[test]
    fn test_builder_extract_only_with_category() {
        let result = RecipeConverter::builder()
            .text("title: Toast")
            .category("breakfast")
            .extract_only()
            .build()
            .unwrap();

        let ConvertResult::Document(doc) = result else {
            panic!("expected document");
        };
        assert_eq!(doc.frontmatter.category.as_deref(), Some("Breakfast"));
    }

    #[test]
    fn test_builder_missing_file() {
        let result = RecipeConverter::builder()
            .file("no/such/recipe.txt")
            .build();
        assert!(matches!(result, Err(ConvertError::InputNotFound(_))));
    }

    struct NoImages;

    impl ImageResolver for NoImages {
        fn resolve(&self, _slug: &str, _kind: ImageKind) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_builder_image_check_does_not_fail() {
        let result = RecipeConverter::builder()
            .text("Instructions\n- Stir\nAlt: stirring")
            .image_resolver(Box::new(NoImages))
            .build();
        assert!(result.is_ok());
    }
}
