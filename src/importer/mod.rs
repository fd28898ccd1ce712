// Recipe import: turn a third-party recipe page into a normalized record
// using the page's embedded schema.org JSON-LD.

pub mod extract;
pub mod fetcher;
pub mod structured_data;

use crate::config::ImporterConfig;
use crate::error::Result;
use crate::uploads::UploadStore;
use crate::utils::{resolve_image_url, validation};
use fetcher::Fetcher;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Failures that abort an import
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Recipe page unavailable ({url}): {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("No structured recipe data: {0}")]
    NoStructuredData(String),
}

/// Canonical recipe shape, independent of the source page's schema quirks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image_filename: Option<String>,
}

/// What happened to the recipe image during an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// Downloaded into the upload directory under `filename`
    Stored { filename: String },
    /// The page named an image but it could not be stored
    Unavailable { url: String, reason: String },
    /// The page named no image
    Missing,
}

impl ImageOutcome {
    pub fn filename(&self) -> Option<&str> {
        match self {
            ImageOutcome::Stored { filename } => Some(filename),
            _ => None,
        }
    }
}

/// Result of a successful import, possibly degraded (image not stored)
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub recipe: NormalizedRecipe,
    pub image: ImageOutcome,
}

pub struct Importer {
    fetcher: Fetcher,
    uploads: UploadStore,
    allow_private_hosts: bool,
}

impl Importer {
    pub fn new(config: &ImporterConfig, uploads: UploadStore) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            uploads,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    /// Fetch `url` and extract its recipe.
    ///
    /// Only an unreachable page or a page without a usable JSON-LD block
    /// fails the import; a missing or broken image is reported through
    /// [`ImportReport::image`].
    pub async fn import(&self, url: &str) -> std::result::Result<ImportReport, ImportError> {
        info!("Importing recipe from {}", url);

        let html = self.fetcher.fetch_page(url).await.map_err(|e| {
            warn!("Failed to fetch recipe page {}: {}", url, e);
            ImportError::SourceUnavailable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let data = structured_data::find_recipe_block(&html)?;

        let image = match extract::image_reference(&data) {
            Some(reference) => self.store_image(url, &reference).await,
            None => ImageOutcome::Missing,
        };

        let recipe = NormalizedRecipe {
            name: extract::text_or(&data, "name", extract::DEFAULT_NAME),
            ingredients: extract::string_list(&data, "recipeIngredient"),
            steps: extract::instruction_steps(&data, "recipeInstructions"),
            image_filename: image.filename().map(String::from),
        };

        info!(
            "Imported \"{}\": {} ingredients, {} steps, image {:?}",
            recipe.name,
            recipe.ingredients.len(),
            recipe.steps.len(),
            recipe.image_filename
        );

        Ok(ImportReport { recipe, image })
    }

    async fn store_image(&self, page_url: &str, reference: &str) -> ImageOutcome {
        let image_url = extract::strip_query(reference);
        let unavailable = |reason: String| {
            warn!("Recipe image {} unavailable: {}", image_url, reason);
            ImageOutcome::Unavailable {
                url: image_url.to_string(),
                reason,
            }
        };

        let Some(filename) = extract::filename_from_url(image_url) else {
            return unavailable("image URL has no filename".to_string());
        };
        let Some(download_url) = resolve_image_url(image_url, page_url) else {
            return unavailable("image URL cannot be resolved".to_string());
        };
        // The image URL comes from the page, not the caller
        if !self.allow_private_hosts {
            if let Err(e) = validation::validate_import_url(&download_url) {
                return unavailable(e.to_string());
            }
        }

        let bytes = match self.fetcher.fetch_image(&download_url).await {
            Ok(bytes) => bytes,
            Err(e) => return unavailable(e.to_string()),
        };

        match self.uploads.save(&filename, &bytes).await {
            Ok(filename) => ImageOutcome::Stored { filename },
            Err(e) => unavailable(e.to_string()),
        }
    }
}
