use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Converter configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConverterConfig {
    /// Root of the plain-text recipe tree
    #[serde(default = "default_recipes_dir")]
    pub recipes_dir: PathBuf,
    /// Root of the generated document tree
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    /// Static asset root holding `images/recipes/{slug}/{overview,steps}`
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Extension of generated documents, without the dot
    #[serde(default = "default_output_extension")]
    pub output_extension: String,
    /// Remove generated documents whose source text no longer exists
    #[serde(default = "default_cleanup")]
    pub cleanup: bool,
    /// Warn about step-image references that have no file in `public_dir`
    #[serde(default)]
    pub check_images: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            recipes_dir: default_recipes_dir(),
            content_dir: default_content_dir(),
            public_dir: default_public_dir(),
            output_extension: default_output_extension(),
            cleanup: default_cleanup(),
            check_images: false,
        }
    }
}

// Default value functions
fn default_recipes_dir() -> PathBuf {
    PathBuf::from("recipes")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content/docs")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_output_extension() -> String {
    "mdx".to_string()
}

fn default_cleanup() -> bool {
    true
}

impl ConverterConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_CONVERTER__ prefix
    /// 2. recipe-converter.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_CONVERTER__CONTENT_DIR
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`ConverterConfig::load`] for the source priority.
pub fn load_config() -> Result<ConverterConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-converter").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_CONVERTER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
