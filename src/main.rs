use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use recipe_converter::batch::parse_source;
use recipe_converter::{
    convert_all, convert_file, document_to_json, BatchOptions, BatchReport, ConvertError,
    ConvertOptions, ConverterConfig, FsImageResolver, ImageResolver,
};

#[derive(Parser, Debug)]
#[command(
    name = "recipe-converter",
    version,
    about = "Convert plain-text recipes into MDX documents"
)]
struct Cli {
    /// Recipe text file to convert
    #[arg(required_unless_present = "all")]
    input: Option<PathBuf>,

    /// Output path (derived from the recipe title and category when omitted)
    output: Option<PathBuf>,

    /// Category to use when the recipe does not declare one
    #[arg(long)]
    category: Option<String>,

    /// Convert every recipe under the recipes directory
    #[arg(long, conflicts_with = "input")]
    all: bool,

    /// Keep generated files whose source recipe no longer exists
    #[arg(long, requires = "all")]
    no_cleanup: bool,

    /// Print the parsed recipe as JSON instead of writing MDX
    #[arg(long, conflicts_with = "all")]
    json: bool,

    /// Warn about step images missing under the public directory
    #[arg(long)]
    check_images: bool,

    /// Directory containing the recipe sources
    #[arg(long)]
    recipes_dir: Option<PathBuf>,

    /// Directory the MDX documents are written to
    #[arg(long)]
    content_dir: Option<PathBuf>,
}

impl Cli {
    fn apply_to(&self, config: &mut ConverterConfig) {
        if let Some(dir) = &self.recipes_dir {
            config.recipes_dir = dir.clone();
        }
        if let Some(dir) = &self.content_dir {
            config.content_dir = dir.clone();
        }
        if self.no_cleanup {
            config.cleanup = false;
        }
        if self.check_images {
            config.check_images = true;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = ConverterConfig::load()?;
    cli.apply_to(&mut config);
    debug!("Using configuration: {:?}", config);

    let resolver = FsImageResolver::new(&config.public_dir);
    let images: Option<&dyn ImageResolver> = if config.check_images {
        Some(&resolver)
    } else {
        None
    };

    if cli.all {
        println!("Converting all recipes from {}...\n", config.recipes_dir.display());
        let report = convert_all(
            &config,
            &BatchOptions {
                cleanup: config.cleanup,
                images,
            },
        )?;
        print_summary(&report);
        return Ok(());
    }

    let input = cli.input.clone().ok_or("Please provide a recipe file")?;

    if cli.json {
        if !input.is_file() {
            return Err(ConvertError::InputNotFound(input).into());
        }
        let text = fs::read_to_string(&input)?;
        let doc = parse_source(&text, cli.category.as_deref());
        println!("{}", document_to_json(&doc)?);
        return Ok(());
    }

    let options = ConvertOptions {
        category: cli.category.clone(),
        output: cli.output.clone(),
        images,
    };
    let outcome = convert_file(&input, &options, &config)?;

    println!(
        "Recipe {} and saved to: {}",
        outcome.status.as_str(),
        outcome.output_path.display()
    );
    println!(
        "Recipe Details: {} | {} | {} ingredients | {} steps",
        outcome.title.as_deref().unwrap_or("Untitled Recipe"),
        outcome.category.as_deref().unwrap_or("Main"),
        outcome.ingredient_count,
        outcome.step_count
    );

    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!("\nConversion Summary:");
    println!("Successfully converted: {} recipes", report.converted.len());
    if !report.failed.is_empty() {
        println!("Failed to convert: {} recipes", report.failed.len());
        for (path, err) in &report.failed {
            println!("  {}: {}", path.display(), err);
        }
    }

    if let Some(cleanup) = &report.cleanup {
        let mut removed = Vec::new();
        if !cleanup.removed_files.is_empty() {
            removed.push(format!("{} orphaned recipe(s)", cleanup.removed_files.len()));
        }
        if !cleanup.removed_dirs.is_empty() {
            removed.push(format!("{} empty folder(s)", cleanup.removed_dirs.len()));
        }
        if removed.is_empty() {
            println!("\nNo orphaned recipes or empty folders found");
        } else {
            println!("\nCleanup complete: Removed {}", removed.join(" and "));
        }
    }
}
