//! File-level conversion: one recipe or a whole recipe tree.
//!
//! The recipe tree looks like `recipes/{category}/{name}.txt`. Each converted
//! file lands at `{content_dir}/{category}/{slug}.{ext}`, where the slug comes
//! from the recipe title. When the target already exists, its `date:` value is
//! carried over so re-running a batch never changes creation dates.

pub mod cleanup;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::images::{missing_step_images, ImageResolver};
use crate::model::RecipeDocument;
use crate::parser::{parse, parse_with_category};
use crate::render::render;

pub use self::cleanup::{remove_orphans, CleanupReport};

/// Slug used when a recipe has no title.
pub const UNTITLED_SLUG: &str = "untitled-recipe";

static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static RE_EXISTING_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?im)^date:\s*"?([^"\r\n]+)"?\s*$"#).unwrap());

/// Lowercase, runs of non-alphanumerics collapsed to `-`, no leading or
/// trailing hyphens.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    RE_NON_ALNUM
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// The `date:` value of a previously generated document.
pub fn extract_existing_date(content: &str) -> Option<String> {
    RE_EXISTING_DATE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|date| !date.is_empty())
}

/// Slug of the document's title, or [`UNTITLED_SLUG`].
pub fn document_slug(doc: &RecipeDocument) -> String {
    let title = doc
        .frontmatter
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED_SLUG);
    slugify(title)
}

/// Where the rendered document for `doc` is written.
pub fn output_path(content_dir: &Path, doc: &RecipeDocument, extension: &str) -> PathBuf {
    let file_name = format!("{}.{}", document_slug(doc), extension);
    match doc.frontmatter.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => content_dir.join(category.to_lowercase()).join(file_name),
        None => content_dir.join(file_name),
    }
}

/// Options for a single conversion.
#[derive(Default)]
pub struct ConvertOptions<'a> {
    /// Category to use unless the source declares one
    pub category: Option<String>,
    /// Explicit output path instead of the derived one
    pub output: Option<PathBuf>,
    /// Checks step-image references against existing files
    pub images: Option<&'a dyn ImageResolver>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Created,
    Updated,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStatus::Created => "created",
            ConversionStatus::Updated => "updated",
        }
    }
}

/// What a single conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub output_path: PathBuf,
    pub status: ConversionStatus,
    pub title: Option<String>,
    pub category: Option<String>,
    pub ingredient_count: usize,
    pub step_count: usize,
    pub missing_images: Vec<String>,
}

/// Parses `source`, honouring an optional default category.
pub fn parse_source(source: &str, category: Option<&str>) -> RecipeDocument {
    match category {
        Some(category) => parse_with_category(source, category),
        None => parse(source),
    }
}

/// Reads the date of an existing output; any read failure means "no date".
fn existing_date_at(path: &Path) -> Option<String> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => extract_existing_date(&content),
        Err(e) => {
            debug!("Could not read existing output {}: {}", path.display(), e);
            None
        }
    }
}

/// Converts one recipe file and writes the result.
pub fn convert_file(
    input: &Path,
    options: &ConvertOptions<'_>,
    config: &ConverterConfig,
) -> Result<ConversionOutcome, ConvertError> {
    if !input.is_file() {
        return Err(ConvertError::InputNotFound(input.to_path_buf()));
    }

    let source = fs::read_to_string(input).map_err(|e| ConvertError::io(input, e))?;
    let doc = parse_source(&source, options.category.as_deref());

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| output_path(&config.content_dir, &doc, &config.output_extension));

    let existing_date = existing_date_at(&output);
    let status = if existing_date.is_some() {
        ConversionStatus::Updated
    } else {
        ConversionStatus::Created
    };

    let rendered = render(&doc, existing_date.as_deref());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }
    fs::write(&output, rendered).map_err(|e| ConvertError::io(&output, e))?;
    info!("Recipe {} and saved to: {}", status.as_str(), output.display());

    let missing_images = match options.images {
        Some(resolver) => {
            let missing = missing_step_images(&doc, &document_slug(&doc), resolver);
            for key in &missing {
                warn!("{}: no image found for step {}", output.display(), key);
            }
            missing
        }
        None => Vec::new(),
    };

    Ok(ConversionOutcome {
        output_path: output,
        status,
        title: doc.frontmatter.title.clone(),
        category: doc.frontmatter.category.clone(),
        ingredient_count: doc.ingredient_count(),
        step_count: doc.step_count(),
        missing_images,
    })
}

/// Totals for a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConversionOutcome>,
    pub failed: Vec<(PathBuf, ConvertError)>,
    pub skipped: Vec<PathBuf>,
    pub cleanup: Option<CleanupReport>,
}

/// Options for a batch run.
#[derive(Default)]
pub struct BatchOptions<'a> {
    pub cleanup: bool,
    pub images: Option<&'a dyn ImageResolver>,
}

fn is_skipped_dir(name: &str) -> bool {
    let lower = name.to_lowercase();
    name.starts_with("_templates")
        || lower.contains("template")
        || lower.contains("readme")
        || name == "images"
}

fn is_recipe_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();
    lower.ends_with(".txt") && !lower.contains("template") && !lower.contains("readme")
}

/// A source file and the category it inherits from its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: PathBuf,
    pub category: Option<String>,
}

/// Lists recipe sources under `recipes_dir` in a stable order.
///
/// The category of a file is the name of the top-level directory it sits in;
/// files directly under `recipes_dir` have none.
pub fn collect_sources(
    recipes_dir: &Path,
    skipped: &mut Vec<PathBuf>,
) -> Result<Vec<SourceEntry>, ConvertError> {
    if !recipes_dir.is_dir() {
        return Err(ConvertError::InputNotFound(recipes_dir.to_path_buf()));
    }
    let mut sources = Vec::new();
    walk(recipes_dir, None, &mut sources, skipped)?;
    Ok(sources)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| ConvertError::io(dir, e))?
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!("Failed to read entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

fn walk(
    dir: &Path,
    category: Option<&str>,
    sources: &mut Vec<SourceEntry>,
    skipped: &mut Vec<PathBuf>,
) -> Result<(), ConvertError> {
    for path in sorted_entries(dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if path.is_dir() {
            if is_skipped_dir(&name) {
                info!("Skipping directory: {}", name);
                skipped.push(path);
                continue;
            }
            let child_category = category.unwrap_or(&name).to_string();
            if category.is_none() {
                info!("Processing category: {}", name);
            }
            if let Err(e) = walk(&path, Some(&child_category), sources, skipped) {
                warn!("Skipping unreadable directory {}: {}", path.display(), e);
                skipped.push(path);
            }
        } else if path.is_file() && name.to_lowercase().ends_with(".txt") {
            if !is_recipe_file(&path) {
                info!("Skipping: {}", name);
                skipped.push(path);
                continue;
            }
            sources.push(SourceEntry {
                path,
                category: category.map(str::to_string),
            });
        }
    }
    Ok(())
}

fn expected_output(
    source: &Path,
    category: Option<&str>,
    config: &ConverterConfig,
) -> Option<PathBuf> {
    let text = fs::read_to_string(source).ok()?;
    let doc = parse_source(&text, category);
    Some(output_path(&config.content_dir, &doc, &config.output_extension))
}

/// Converts every recipe under `config.recipes_dir`.
///
/// A missing recipes directory is fatal; anything that goes wrong with a
/// single file is recorded in the report and the batch continues.
pub fn convert_all(
    config: &ConverterConfig,
    options: &BatchOptions<'_>,
) -> Result<BatchReport, ConvertError> {
    let mut report = BatchReport::default();
    let sources = collect_sources(&config.recipes_dir, &mut report.skipped)?;
    let mut expected: HashSet<PathBuf> = HashSet::new();

    for source in &sources {
        info!("Converting: {}", source.path.display());

        let file_options = ConvertOptions {
            category: source.category.clone(),
            output: None,
            images: options.images,
        };
        match convert_file(&source.path, &file_options, config) {
            Ok(outcome) => {
                expected.insert(outcome.output_path.clone());
                report.converted.push(outcome);
            }
            Err(e) => {
                error!("Error converting recipe {}: {}", source.path.display(), e);
                // A previous output of a failing recipe is not an orphan
                if let Some(path) = expected_output(&source.path, source.category.as_deref(), config) {
                    expected.insert(path);
                }
                report.failed.push((source.path.clone(), e));
            }
        }
    }

    if options.cleanup {
        report.cleanup = Some(remove_orphans(
            &config.content_dir,
            &expected,
            &config.output_extension,
        ));
    }

    Ok(report)
}
