use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::models::{NewRecipe, UpdateRecipe};
use crate::importer::Importer;
use crate::uploads::UploadStore;
use crate::utils::{sanitize::secure_filename, validation};
use crate::{api::models::*, db, Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub importer: Arc<Importer>,
    pub uploads: UploadStore,
    pub settings: crate::config::Settings,
}

fn require_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Recipe name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Image names must already be upload-store names, as `/api/uploads` returns
fn check_image_filename(image: Option<String>) -> Result<Option<String>> {
    match image {
        Some(name) if name.is_empty() || secure_filename(&name) != name => Err(
            Error::Validation(format!("Invalid image filename: {name}")),
        ),
        other => Ok(other),
    }
}

/// Remove an upload once no recipe shows it any more
async fn release_image(state: &AppState, image: &str) -> Result<()> {
    if db::recipes::count_recipes_with_image(&state.pool, image).await? == 0 {
        if let Err(e) = state.uploads.delete(image).await {
            warn!("Failed to remove upload {}: {}", image, e);
        }
    }
    Ok(())
}

/// GET /api/recipes - List recipes, newest first
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<RecipesResponse>> {
    debug!("List recipes request: {:?}", params);

    let pagination = &state.settings.pagination;
    let limit = params
        .limit
        .unwrap_or(pagination.api_default_limit)
        .clamp(1, pagination.api_max_limit);
    let page = params.page.max(1);
    let out_of_range = || Error::Validation(format!("Page {page} is out of range"));
    let offset = page
        .saturating_sub(1)
        .checked_mul(limit)
        .and_then(|offset| i64::try_from(offset).ok())
        .ok_or_else(out_of_range)?;
    let sql_limit = i64::try_from(limit).map_err(|_| out_of_range())?;

    let recipes = db::recipes::list_recipes(&state.pool, sql_limit, offset).await?;
    let total = usize::try_from(db::recipes::count_recipes(&state.pool).await?)
        .map_err(|e| Error::Internal(format!("Invalid recipe count: {e}")))?;

    Ok(Json(RecipesResponse {
        recipes: recipes.into_iter().map(RecipeDetail::from).collect(),
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }))
}

/// GET /api/recipes/:id - Get recipe details
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetail>> {
    debug!("Get recipe request: {}", id);

    let recipe = db::recipes::get_recipe(&state.pool, id).await?;
    Ok(Json(recipe.into()))
}

/// POST /api/recipes - Create a recipe from manual entry
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(input): Json<RecipeInput>,
) -> Result<(StatusCode, Json<RecipeDetail>)> {
    let new_recipe = NewRecipe {
        name: require_name(&input.name)?,
        ingredients: input.ingredients.into_vec(),
        steps: input.steps.into_vec(),
        image_filename: check_image_filename(input.image_filename)?,
        source_url: None,
    };

    let recipe = db::recipes::create_recipe(&state.pool, &new_recipe).await?;
    info!("Created recipe {} ({})", recipe.id, recipe.name);

    Ok((StatusCode::CREATED, Json(recipe.into())))
}

/// PUT /api/recipes/:id - Edit a recipe
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<RecipeInput>,
) -> Result<Json<RecipeDetail>> {
    let update = UpdateRecipe {
        name: require_name(&input.name)?,
        ingredients: input.ingredients.into_vec(),
        steps: input.steps.into_vec(),
        image_filename: check_image_filename(input.image_filename)?,
    };

    let previous = db::recipes::get_recipe(&state.pool, id).await?;
    let recipe = db::recipes::update_recipe(&state.pool, id, &update).await?;
    info!("Updated recipe {}", id);

    if let Some(old_image) = previous.image_filename {
        if recipe.image_filename.as_deref() != Some(old_image.as_str()) {
            release_image(&state, &old_image).await?;
        }
    }

    Ok(Json(recipe.into()))
}

/// DELETE /api/recipes/:id - Delete a recipe
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let recipe = db::recipes::delete_recipe(&state.pool, id).await?;
    info!("Deleted recipe {}", id);

    if let Some(image) = recipe.image_filename {
        release_image(&state, &image).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/import - Import a recipe from a third-party page
pub async fn import_recipe(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<(StatusCode, Json<ImportResponse>)> {
    let parsed = if state.settings.importer.allow_private_hosts {
        validation::parse_source_url(&request.url)?
    } else {
        validation::validate_import_url(&request.url)?
    };
    let url = parsed.to_string();

    // Own task per import: a hanging source page only stalls this request
    let importer = state.importer.clone();
    let task_url = url.clone();
    let report = tokio::spawn(async move { importer.import(&task_url).await })
        .await
        .map_err(|e| Error::Internal(format!("Import task failed: {e}")))??;

    let new_recipe = NewRecipe::from_imported(report.recipe, Some(url));
    let recipe = db::recipes::create_recipe(&state.pool, &new_recipe).await?;
    info!("Stored imported recipe {} ({})", recipe.id, recipe.name);

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            recipe: recipe.into(),
            image: report.image,
        }),
    ))
}

/// POST /api/uploads - Store an image from the multipart field `image`
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let original = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(String::from)
            .ok_or_else(|| Error::Validation("Image upload has no filename".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Failed to read upload: {e}")))?;

        let filename = state.uploads.save(&original, &bytes).await?;
        info!("Stored upload {}", filename);

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("/uploads/{filename}"),
                filename,
            }),
        ));
    }

    Err(Error::Validation("Missing image field".to_string()))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}
