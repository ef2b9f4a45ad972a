//! Recipe image lookup.
//!
//! The converter only emits step-image *references*. Resolving those to files
//! is done by an [`ImageResolver`]; the ordering rules live in the pure
//! comparators [`compare_overview`] and [`compare_steps`] so they can be tested
//! without a filesystem.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::RecipeDocument;
use crate::render::step_image_refs;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif"];

/// Overview stems that sort before everything else, in this order.
const OVERVIEW_PRIORITY: &[&str] = &["main", "hero", "final"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Overview,
    Steps,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Overview => "overview",
            ImageKind::Steps => "steps",
        }
    }
}

/// Returns the ordered web paths of a recipe's existing images.
pub trait ImageResolver {
    fn resolve(&self, slug: &str, kind: ImageKind) -> Vec<String>;
}

/// Step (and optional sub-step) parsed from an image file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StepKey {
    pub step: u32,
    pub sub: u32,
}

static RE_STEP_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:step[-_ ]?)?0*(\d+)(?:[.-]0*(\d+))?$").unwrap());

impl StepKey {
    /// Parses `3`, `03`, `3.1`, `3-1`, `step-3` and `step-3-1` (extension optional).
    pub fn parse(name: &str) -> Option<StepKey> {
        let stem = strip_image_extension(name);
        let caps = RE_STEP_KEY.captures(stem)?;
        let step = caps.get(1)?.as_str().parse().ok()?;
        let sub = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        Some(StepKey { step, sub })
    }
}

/// File name without a known image extension.
fn strip_image_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => name,
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn overview_priority(name: &str) -> Option<usize> {
    let stem = strip_image_extension(file_name(name)).to_lowercase();
    OVERVIEW_PRIORITY
        .iter()
        .position(|priority| stem.starts_with(priority))
}

fn alphabetical(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Order for overview images: `main`, `hero`, `final`, then numbered images,
/// then everything else alphabetically.
pub fn compare_overview(a: &str, b: &str) -> Ordering {
    match (overview_priority(a), overview_priority(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| alphabetical(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_steps(a, b),
    }
}

/// Order for step images: parsed step keys ascending, unparsable names last
/// in alphabetical order.
pub fn compare_steps(a: &str, b: &str) -> Ordering {
    let (name_a, name_b) = (file_name(a), file_name(b));
    match (StepKey::parse(name_a), StepKey::parse(name_b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| alphabetical(name_a, name_b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => alphabetical(name_a, name_b),
    }
}

/// Finds the image for a step-image key such as `"01"` or `"3-2"`.
pub fn find_step_image<'a>(images: &'a [String], key: &str) -> Option<&'a str> {
    let by_name = images.iter().find(|path| {
        let name = file_name(path);
        let stem = strip_image_extension(name);
        stem == key || stem == format!("{key}.0") || name.starts_with(&format!("{key}."))
    });
    if let Some(found) = by_name {
        return Some(found.as_str());
    }

    let wanted = StepKey::parse(key)?;
    images
        .iter()
        .find(|path| StepKey::parse(file_name(path)) == Some(wanted))
        .map(String::as_str)
}

/// Step-image keys in `doc` with no matching file.
pub fn missing_step_images(
    doc: &RecipeDocument,
    slug: &str,
    resolver: &dyn ImageResolver,
) -> Vec<String> {
    let images = resolver.resolve(slug, ImageKind::Steps);
    doc.instructions
        .iter()
        .flat_map(|step| step_image_refs(step).into_iter().map(|(key, _)| key))
        .filter(|key| find_step_image(&images, key).is_none())
        .collect()
}

/// Reads images from `{public_dir}/images/recipes/{slug}/{kind}/`.
#[derive(Debug, Clone)]
pub struct FsImageResolver {
    public_dir: PathBuf,
}

impl FsImageResolver {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    fn kind_dir(&self, slug: &str, kind: ImageKind) -> PathBuf {
        self.public_dir
            .join("images")
            .join("recipes")
            .join(slug)
            .join(kind.as_str())
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

impl ImageResolver for FsImageResolver {
    fn resolve(&self, slug: &str, kind: ImageKind) -> Vec<String> {
        let dir = self.kind_dir(slug, kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No {} images for {}: {}", kind.as_str(), slug, e);
                return Vec::new();
            }
        };

        let mut files: Vec<String> = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) if has_image_extension(&entry.path()) => {
                    files.push(entry.file_name().to_string_lossy().into_owned());
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to read entry in {}: {}", dir.display(), e),
            }
        }

        match kind {
            ImageKind::Overview => files.sort_by(|a, b| compare_overview(a, b)),
            ImageKind::Steps => files.sort_by(|a, b| compare_steps(a, b)),
        }

        files
            .into_iter()
            .map(|file| format!("/images/recipes/{}/{}/{}", slug, kind.as_str(), file))
            .collect()
    }
}
