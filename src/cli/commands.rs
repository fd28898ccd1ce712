use crate::config::Settings;
use crate::db::{self, models::NewRecipe};
use crate::importer::{ImageOutcome, Importer};
use crate::uploads::UploadStore;
use crate::utils::validation::parse_source_url;
use crate::Result;
use tracing::info;

/// Import a recipe page, print the normalized record, and optionally store it
pub async fn import(settings: &Settings, url: &str, save: bool) -> Result<()> {
    let url = parse_source_url(url)?.to_string();

    let uploads = UploadStore::open(&settings.uploads.dir).await?;
    let importer = Importer::new(&settings.importer, uploads)?;
    let report = importer.import(&url).await?;

    println!("{}", serde_json::to_string_pretty(&report.recipe)?);

    match &report.image {
        ImageOutcome::Stored { filename } => {
            println!(
                "✓ Image saved: {}",
                settings.uploads.dir.join(filename).display()
            );
        }
        ImageOutcome::Unavailable { url, reason } => {
            println!("! Image not saved ({url}): {reason}");
        }
        ImageOutcome::Missing => println!("  No image on page"),
    }

    if save {
        let pool = db::init_pool_with_config(&settings.database).await?;
        db::run_migrations(&pool).await?;

        let recipe =
            db::recipes::create_recipe(&pool, &NewRecipe::from_imported(report.recipe, Some(url)))
                .await?;
        info!("Stored imported recipe {}", recipe.id);
        println!("✓ Saved recipe {} ({})", recipe.id, recipe.name);
    }

    Ok(())
}
