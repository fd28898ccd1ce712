use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;
use sqlx::types::Json;

/// Insert a recipe; the store assigns its id
pub async fn create_recipe(pool: &DbPool, new_recipe: &NewRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (
            name, ingredients, steps, image_filename, source_url, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&new_recipe.name)
    .bind(Json(&new_recipe.ingredients))
    .bind(Json(&new_recipe.steps))
    .bind(&new_recipe.image_filename)
    .bind(&new_recipe.source_url)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(recipe)
}

/// Get recipe by ID
pub async fn get_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// List recipes, newest first
pub async fn list_recipes(pool: &DbPool, limit: i64, offset: i64) -> Result<Vec<Recipe>> {
    let recipes =
        sqlx::query_as::<_, Recipe>("SELECT * FROM recipes ORDER BY id DESC LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

    Ok(recipes)
}

/// Count all recipes
pub async fn count_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Replace a recipe's editable fields
pub async fn update_recipe(pool: &DbPool, recipe_id: i64, update: &UpdateRecipe) -> Result<Recipe> {
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        UPDATE recipes
        SET name = ?, ingredients = ?, steps = ?,
            image_filename = COALESCE(?, image_filename), updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.name)
    .bind(Json(&update.ingredients))
    .bind(Json(&update.steps))
    .bind(&update.image_filename)
    .bind(now)
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Delete a recipe, returning the removed record
pub async fn delete_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>("DELETE FROM recipes WHERE id = ? RETURNING *")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Count recipes referring to an uploaded image
pub async fn count_recipes_with_image(pool: &DbPool, image_filename: &str) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE image_filename = ?")
        .bind(image_filename)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
